//! Persisted pipeline records.
//!
//! A record is the plain-data form of one production line: metadata plus the
//! canvas contents. It is what [`crate::editor::EditorSession`] loads from and
//! saves to, and what [`PipelineStore`] keeps on disk.

mod store;

pub use store::PipelineStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::{Connection, GraphSnapshot, Node};

/// Lifecycle status of a pipeline definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    #[default]
    Draft,
    Published,
    Disabled,
}

impl PipelineStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            PipelineStatus::Draft => "草稿",
            PipelineStatus::Published => "已发布",
            PipelineStatus::Disabled => "已停用",
        }
    }
}

/// Canvas contents as stored. Icons are not part of it; the front end
/// resolves them from each node's template.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasData {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

impl From<GraphSnapshot> for CanvasData {
    fn from(snapshot: GraphSnapshot) -> Self {
        Self {
            nodes: snapshot.nodes,
            connections: snapshot.connections,
        }
    }
}

/// One stored production line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Free-form production-line category, e.g. "影像预处理".
    #[serde(rename = "type", default)]
    pub pipeline_type: String,
    #[serde(default)]
    pub status: PipelineStatus,
    pub create_time: DateTime<Utc>,
    #[serde(default)]
    pub canvas_data: CanvasData,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl PipelineRecord {
    /// New empty draft created now.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: String::new(),
            version: default_version(),
            pipeline_type: String::new(),
            status: PipelineStatus::Draft,
            create_time: Utc::now(),
            canvas_data: CanvasData::default(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_type(mut self, pipeline_type: impl Into<String>) -> Self {
        self.pipeline_type = pipeline_type.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_field_names() {
        let record = PipelineRecord::new("p1", "影像预处理线")
            .with_code("PL-001")
            .with_type("预处理");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "预处理");
        assert_eq!(json["status"], "draft");
        assert!(json.get("createTime").is_some());
        assert!(json["canvasData"]["nodes"].is_array());
        assert!(json.get("pipelineType").is_none());
    }

    #[test]
    fn test_minimal_record_parses() {
        let json = r#"{
            "id": "p9",
            "name": "最小记录",
            "createTime": "2024-03-12T08:00:00Z"
        }"#;
        let record: PipelineRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.version, "1.0.0");
        assert_eq!(record.status, PipelineStatus::Draft);
        assert!(record.canvas_data.nodes.is_empty());
    }
}
