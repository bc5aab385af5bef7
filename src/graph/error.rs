//! Graph-specific error types.

use crate::graph::id::{ConnectionId, NodeId};
use thiserror::Error;

/// Reasons a graph mutation was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("Unknown connection {0:?}")]
    UnknownConnection(ConnectionId),

    #[error("Connection from {0:?} to itself")]
    SelfLoop(NodeId),

    #[error("Connection {from:?} -> {to:?} already exists")]
    DuplicateConnection { from: NodeId, to: NodeId },
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;
