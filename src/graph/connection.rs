//! Directed connections between nodes.

use serde::{Deserialize, Serialize};

use crate::graph::id::{ConnectionId, NodeId};

/// Declares that an upstream output feeds a downstream input parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    pub source_param: String,
    pub target_param: String,
}

impl Mapping {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source_param: source.into(),
            target_param: target.into(),
        }
    }
}

/// A directed edge `from → to`. At most one exists per ordered pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    pub from: NodeId,
    pub to: NodeId,
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

impl Connection {
    pub fn links(&self, from: NodeId, to: NodeId) -> bool {
        self.from == from && self.to == to
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.from == node || self.to == node
    }
}
