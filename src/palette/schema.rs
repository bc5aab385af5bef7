//! Parameter schemas declared by palette templates.

use serde::{Deserialize, Serialize};

use crate::graph::ParamValue;

/// Control type used to edit a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    Text,
    Select,
    Date,
    File,
    Range,
}

impl FieldType {
    pub fn display_name(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Select => "Select",
            FieldType::Date => "Date",
            FieldType::File => "File",
            FieldType::Range => "Range",
        }
    }
}

/// Bounds for `range` fields. Values are still stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBounds {
    pub min: f64,
    pub max: f64,
    #[serde(default = "default_range_step")]
    pub step: f64,
}

fn default_range_step() -> f64 {
    1.0
}

/// One editable parameter of a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamField {
    pub label: String,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    /// Cosmetic only: rendered as an asterisk, never validated.
    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ParamValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<RangeBounds>,
}

impl ParamField {
    pub fn new(label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            label: label.into(),
            field_type,
            required: false,
            options: Vec::new(),
            default_value: None,
            description: None,
            range: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, value: impl Into<ParamValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_range(mut self, min: f64, max: f64, step: f64) -> Self {
        self.range = Some(RangeBounds { min, max, step });
        self
    }

    /// Value seeded into a fresh node: the explicit default, else the first
    /// option of a `select`, else an empty string.
    pub fn initial_value(&self) -> ParamValue {
        if let Some(value) = &self.default_value {
            return value.clone();
        }
        match (self.field_type, self.options.first()) {
            (FieldType::Select, Some(first)) => ParamValue::Text(first.clone()),
            _ => ParamValue::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_defaults_to_first_option() {
        let field = ParamField::new("坐标系", FieldType::Select)
            .with_options(["EPSG:4326", "EPSG:4490"]);
        assert_eq!(field.initial_value(), ParamValue::Text("EPSG:4326".into()));
    }

    #[test]
    fn test_explicit_default_wins() {
        let field = ParamField::new("坐标系", FieldType::Select)
            .with_options(["EPSG:4326", "EPSG:4490"])
            .with_default("EPSG:4490");
        assert_eq!(field.initial_value(), ParamValue::Text("EPSG:4490".into()));
    }

    #[test]
    fn test_fallback_is_empty_string() {
        assert_eq!(
            ParamField::new("输出路径", FieldType::File).initial_value(),
            ParamValue::empty()
        );
        // A select without options also falls back
        assert_eq!(
            ParamField::new("模型", FieldType::Select).initial_value(),
            ParamValue::empty()
        );
    }

    #[test]
    fn test_field_deserializes_from_toml() {
        let field: ParamField = toml::from_str(
            r#"
            label = "分辨率"
            type = "range"
            required = true
            range = { min = 0.5, max = 30.0 }
            "#,
        )
        .unwrap();
        assert_eq!(field.field_type, FieldType::Range);
        assert!(field.required);
        assert_eq!(field.range.unwrap().step, 1.0);
    }
}
