//! Placed operator instances.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::Point;
use crate::graph::id::NodeId;
use crate::palette::TemplateKey;

/// Position of a node in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Start,
    End,
    Process,
}

impl NodeRole {
    /// Start nodes never accept incoming connections.
    pub fn accepts_input(self) -> bool {
        !matches!(self, NodeRole::Start)
    }

    /// End nodes never emit outgoing connections.
    pub fn emits_output(self) -> bool {
        !matches!(self, NodeRole::End)
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, NodeRole::Process)
    }
}

/// Which template a node was created from, plus the disambiguation suffix
/// appended to its name. Schema lookup goes through `template` only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeKind {
    pub template: TemplateKey,
    #[serde(default)]
    pub instance_suffix: String,
}

impl NodeKind {
    pub fn new(template: TemplateKey) -> Self {
        Self {
            template,
            instance_suffix: String::new(),
        }
    }
}

/// A parameter value. No type validation is applied; any shape is stored as-is.
///
/// Serialized untagged, so a JSON string reads back as `Text` and an array of
/// strings as `List`. Build `Json` values through `From<serde_json::Value>`,
/// which picks that same variant up front and keeps save and reopen lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
    Json(serde_json::Value),
}

impl ParamValue {
    pub fn empty() -> Self {
        ParamValue::Text(String::new())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Rendering used by form controls; never fails.
    pub fn display_text(&self) -> String {
        match self {
            ParamValue::Text(s) => s.clone(),
            ParamValue::List(items) => items.join(", "),
            ParamValue::Json(serde_json::Value::Null) => String::new(),
            ParamValue::Json(serde_json::Value::String(s)) => s.clone(),
            ParamValue::Json(value) => value.to_string(),
        }
    }
}

impl Default for ParamValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(items: Vec<String>) -> Self {
        ParamValue::List(items)
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => ParamValue::Text(s),
            serde_json::Value::Array(items) if items.iter().all(|v| v.is_string()) => {
                ParamValue::List(
                    items
                        .into_iter()
                        .filter_map(|v| match v {
                            serde_json::Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                )
            }
            value => ParamValue::Json(value),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// Parameter label → value.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// A placed operator instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub role: NodeRole,
    /// World-space position of the node's top-left corner.
    pub position: Point,
    #[serde(default)]
    pub params: ParamMap,
}

impl Node {
    /// Fetch a parameter, treating a missing entry as an empty string.
    pub fn param_text(&self, label: &str) -> String {
        self.params
            .get(label)
            .map(ParamValue::display_text)
            .unwrap_or_default()
    }

    pub fn is_terminal(&self) -> bool {
        self.role.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_port_rules() {
        assert!(!NodeRole::Start.accepts_input());
        assert!(NodeRole::Start.emits_output());
        assert!(NodeRole::End.accepts_input());
        assert!(!NodeRole::End.emits_output());
        assert!(NodeRole::Process.accepts_input() && NodeRole::Process.emits_output());
    }

    #[test]
    fn test_param_value_untagged_serde() {
        let text: ParamValue = serde_json::from_str(r#""EPSG:4326""#).unwrap();
        assert_eq!(text, ParamValue::Text("EPSG:4326".into()));

        let list: ParamValue = serde_json::from_str(r#"["r1","r2"]"#).unwrap();
        assert_eq!(list, ParamValue::List(vec!["r1".into(), "r2".into()]));

        let json: ParamValue = serde_json::from_str(r#"[{"id":"a"}]"#).unwrap();
        assert!(matches!(json, ParamValue::Json(_)));
    }

    #[test]
    fn test_json_values_survive_reopen() {
        for value in [
            serde_json::json!("EPSG:4490"),
            serde_json::json!([]),
            serde_json::json!(["gf2-pms"]),
            serde_json::json!([{ "id": "a" }]),
            serde_json::json!({ "k": 1 }),
        ] {
            let stored = ParamValue::from(value);
            let text = serde_json::to_string(&stored).unwrap();
            let reopened: ParamValue = serde_json::from_str(&text).unwrap();
            assert_eq!(reopened, stored);
        }
        assert_eq!(ParamValue::from(serde_json::json!("x")), ParamValue::Text("x".into()));
    }

    #[test]
    fn test_display_text_never_fails() {
        assert_eq!(ParamValue::List(vec!["a".into(), "b".into()]).display_text(), "a, b");
        assert_eq!(ParamValue::Json(serde_json::Value::Null).display_text(), "");
        assert_eq!(ParamValue::Json(serde_json::json!(3)).display_text(), "3");
    }

    #[test]
    fn test_missing_param_reads_empty() {
        let node = Node {
            id: NodeId(1),
            name: "波段合成".into(),
            kind: NodeKind::new(TemplateKey::from("band_composite")),
            role: NodeRole::Process,
            position: Point::ZERO,
            params: ParamMap::new(),
        };
        assert_eq!(node.param_text("坐标系"), "");
    }
}
