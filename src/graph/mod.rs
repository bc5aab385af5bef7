//! Pipeline graph model.
//!
//! A production line is a directed graph of operator nodes between a single
//! start terminal and a single end terminal:
//!
//! ```text
//! [开始] ──► [数据采集] ──► [波段合成] ──► [结束]
//!                 └──────► [AI解译] ───────┘
//! ```
//!
//! Nodes are created from palette templates and carry a parameter bag seeded
//! from the template schema. Connections may carry output→input mappings.

pub mod connection;
pub mod error;
pub mod id;
pub mod model;
pub mod node;

pub use connection::{Connection, Mapping};
pub use error::{GraphError, GraphResult};
pub use id::{ConnectionId, NodeId};
pub use model::{GraphLayout, GraphSnapshot, PipelineGraph, END_NODE_NAME, START_NODE_NAME};
pub use node::{Node, NodeKind, NodeRole, ParamMap, ParamValue};
