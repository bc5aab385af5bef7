//! Identity types for the pipeline graph.
//!
//! Ids are newtypes over `u32` handed out by monotone counters on the graph,
//! so an id is never reused within an editing session, even after undo.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a placed node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Identifier of a connection between two nodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(pub u32);

impl ConnectionId {
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId({})", self.0)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Monotone id source. Restored past the highest id seen when a record is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct IdCounter(u32);

impl IdCounter {
    pub(crate) fn next(&mut self) -> u32 {
        let id = self.0;
        self.0 = self.0.wrapping_add(1);
        id
    }

    /// Ensure the next id handed out is greater than `seen`.
    pub(crate) fn bump_past(&mut self, seen: u32) {
        if seen >= self.0 {
            self.0 = seen.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_display() {
        let id = NodeId(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.to_string(), "node-42");
        assert_eq!(format!("{:?}", id), "NodeId(42)");
    }

    #[test]
    fn test_connection_id_serializes_as_number() {
        let json = serde_json::to_string(&ConnectionId(7)).unwrap();
        assert_eq!(json, "7");
        let back: ConnectionId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ConnectionId(7));
    }

    #[test]
    fn test_counter_bump_past() {
        let mut counter = IdCounter::default();
        assert_eq!(counter.next(), 0);
        counter.bump_past(10);
        assert_eq!(counter.next(), 11);
        // Bumping below the current value is a no-op
        counter.bump_past(3);
        assert_eq!(counter.next(), 12);
    }
}
