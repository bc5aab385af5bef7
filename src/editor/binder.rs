//! Parameter panel binder: resolves the current selection to an editable form.
//!
//! Everything here is permissive. Unknown templates give an empty-state form,
//! missing values read as empty strings, and nothing is validated beyond the
//! cosmetic `required` flag.

use serde::{Deserialize, Serialize};

use crate::external::MatchedResource;
use crate::graph::{ConnectionId, Mapping, Node, NodeId, ParamValue, PipelineGraph};
use crate::palette::{FieldType, Palette, RangeBounds, TemplateBehavior};

/// Parameter keys written by the cloud data input form.
pub mod cloud_keys {
    pub const INPUT_PATH: &str = "inputPath";
    pub const MATCHED_FILES: &str = "matchedFiles";
    pub const RULE_IDS: &str = "ruleIds";
}

/// Current selection: a node xor a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    None,
    Node(NodeId),
    Connection(ConnectionId),
}

impl Selection {
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Selection::Node(id) => Some(*id),
            _ => None,
        }
    }

    pub fn connection(&self) -> Option<ConnectionId> {
        match self {
            Selection::Connection(id) => Some(*id),
            _ => None,
        }
    }
}

/// One schema field bound to a node's current value.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundField {
    pub label: String,
    pub field_type: FieldType,
    pub required: bool,
    pub options: Vec<String>,
    pub description: Option<String>,
    pub range: Option<RangeBounds>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeForm {
    pub node: NodeId,
    pub title: String,
    pub fields: Vec<BoundField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloudInputForm {
    pub node: NodeId,
    pub title: String,
    pub input_path: String,
    pub rule_ids: Vec<String>,
    pub matched_files: Vec<MatchedResource>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingForm {
    pub connection: ConnectionId,
    pub source_name: String,
    pub target_name: String,
    /// Outputs the source template declares.
    pub source_outputs: Vec<String>,
    /// Field labels of the target template.
    pub target_inputs: Vec<String>,
    pub rows: Vec<Mapping>,
}

/// What the properties panel should show.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyForm {
    /// Nothing selected, or the selection no longer exists.
    Nothing,
    /// A node without a schema (terminals, unknown templates).
    Empty { node: NodeId, title: String },
    Node(NodeForm),
    CloudInput(CloudInputForm),
    Mapping(MappingForm),
}

/// Resolve `selection` to a form.
pub fn bind(graph: &PipelineGraph, palette: &Palette, selection: Selection) -> PropertyForm {
    match selection {
        Selection::None => PropertyForm::Nothing,
        Selection::Node(id) => match graph.node(id) {
            Some(node) => bind_node(node, palette),
            None => PropertyForm::Nothing,
        },
        Selection::Connection(id) => bind_connection(graph, palette, id),
    }
}

fn bind_node(node: &Node, palette: &Palette) -> PropertyForm {
    let Some(template) = palette.template(&node.kind.template) else {
        return PropertyForm::Empty {
            node: node.id,
            title: node.name.clone(),
        };
    };
    match template.behavior {
        TemplateBehavior::CloudInput => PropertyForm::CloudInput(CloudInputForm {
            node: node.id,
            title: node.name.clone(),
            input_path: node.param_text(cloud_keys::INPUT_PATH),
            rule_ids: read_rule_ids(node.params.get(cloud_keys::RULE_IDS)),
            matched_files: read_matched_files(node.params.get(cloud_keys::MATCHED_FILES)),
        }),
        TemplateBehavior::Schema if template.fields.is_empty() => PropertyForm::Empty {
            node: node.id,
            title: node.name.clone(),
        },
        TemplateBehavior::Schema => PropertyForm::Node(NodeForm {
            node: node.id,
            title: node.name.clone(),
            fields: template
                .fields
                .iter()
                .map(|field| BoundField {
                    label: field.label.clone(),
                    field_type: field.field_type,
                    required: field.required,
                    options: field.options.clone(),
                    description: field.description.clone(),
                    range: field.range,
                    value: node.param_text(&field.label),
                })
                .collect(),
        }),
    }
}

fn bind_connection(graph: &PipelineGraph, palette: &Palette, id: ConnectionId) -> PropertyForm {
    let Some(conn) = graph.connection(id) else {
        return PropertyForm::Nothing;
    };
    let (Some(source), Some(target)) = (graph.node(conn.from), graph.node(conn.to)) else {
        return PropertyForm::Nothing;
    };
    let source_outputs = palette
        .template(&source.kind.template)
        .map(|t| t.outputs.clone())
        .unwrap_or_default();
    let target_inputs = palette
        .template(&target.kind.template)
        .map(|t| t.fields.iter().map(|f| f.label.clone()).collect())
        .unwrap_or_default();
    PropertyForm::Mapping(MappingForm {
        connection: id,
        source_name: source.name.clone(),
        target_name: target.name.clone(),
        source_outputs,
        target_inputs,
        rows: conn.mappings.clone(),
    })
}

fn read_rule_ids(value: Option<&ParamValue>) -> Vec<String> {
    match value {
        Some(ParamValue::List(ids)) => ids.clone(),
        Some(ParamValue::Text(id)) if !id.is_empty() => vec![id.clone()],
        Some(ParamValue::Json(json)) => serde_json::from_value(json.clone()).unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn read_matched_files(value: Option<&ParamValue>) -> Vec<MatchedResource> {
    match value {
        Some(ParamValue::Json(json)) => serde_json::from_value(json.clone()).unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Encode matched resources for storage in `params`.
pub fn matched_files_value(files: &[MatchedResource]) -> ParamValue {
    ParamValue::from(serde_json::to_value(files).unwrap_or(serde_json::Value::Array(Vec::new())))
}

// ==================== Mapping row edits ====================

/// Apply `edit` to a connection's mapping rows and store the result.
pub fn edit_mappings<F>(graph: &mut PipelineGraph, conn: ConnectionId, edit: F) -> bool
where
    F: FnOnce(&mut Vec<Mapping>),
{
    let Some(existing) = graph.connection(conn) else {
        return false;
    };
    let mut rows = existing.mappings.clone();
    edit(&mut rows);
    graph.update_connection_mappings(conn, rows)
}

pub fn add_mapping_row(graph: &mut PipelineGraph, conn: ConnectionId) -> bool {
    edit_mappings(graph, conn, |rows| rows.push(Mapping::default()))
}

/// Returns false for an unknown connection or an out-of-range row.
pub fn remove_mapping_row(graph: &mut PipelineGraph, conn: ConnectionId, index: usize) -> bool {
    if !has_row(graph, conn, index) {
        return false;
    }
    edit_mappings(graph, conn, |rows| {
        rows.remove(index);
    })
}

pub fn set_mapping_row(
    graph: &mut PipelineGraph,
    conn: ConnectionId,
    index: usize,
    mapping: Mapping,
) -> bool {
    if !has_row(graph, conn, index) {
        return false;
    }
    edit_mappings(graph, conn, |rows| rows[index] = mapping)
}

fn has_row(graph: &PipelineGraph, conn: ConnectionId, index: usize) -> bool {
    graph
        .connection(conn)
        .is_some_and(|c| index < c.mappings.len())
}
