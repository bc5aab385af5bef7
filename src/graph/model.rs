//! The authoritative node/connection collections of one editing session.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::graph::connection::{Connection, Mapping};
use crate::graph::error::{GraphError, GraphResult};
use crate::graph::id::{ConnectionId, IdCounter, NodeId};
use crate::graph::node::{Node, NodeKind, NodeRole, ParamMap, ParamValue};
use crate::palette::{Template, TemplateKey};

/// Display name of the start terminal.
pub const START_NODE_NAME: &str = "开始";
/// Display name of the end terminal.
pub const END_NODE_NAME: &str = "结束";

/// Fixed positions used for the baseline graph and for auto-layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphLayout {
    pub start_position: Point,
    pub end_position: Point,
    /// Auto-layout: x of the start node.
    pub origin_x: f32,
    /// Auto-layout: horizontal distance between consecutive nodes.
    pub step_x: f32,
    /// Auto-layout: shared row.
    pub row_y: f32,
}

impl Default for GraphLayout {
    fn default() -> Self {
        Self {
            start_position: Point::new(320.0, 300.0),
            end_position: Point::new(750.0, 300.0),
            origin_x: 100.0,
            step_x: 200.0,
            row_y: 300.0,
        }
    }
}

/// Deep copy of the graph contents used by undo/redo.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

/// In-memory pipeline graph.
///
/// Invariants maintained here:
/// - exactly one `Start` and one `End` node,
/// - no self-loops and at most one connection per ordered pair,
/// - every connection references nodes present in the graph.
///
/// Port-direction rules (no input on start, no output on end) are enforced by
/// the canvas controller, not here.
#[derive(Debug, Clone)]
pub struct PipelineGraph {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    node_ids: IdCounter,
    connection_ids: IdCounter,
    layout: GraphLayout,
}

impl Default for PipelineGraph {
    fn default() -> Self {
        Self::new(GraphLayout::default())
    }
}

impl PipelineGraph {
    /// Baseline graph: just the two terminals.
    pub fn new(layout: GraphLayout) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            connections: Vec::new(),
            node_ids: IdCounter::default(),
            connection_ids: IdCounter::default(),
            layout,
        };
        let start = graph.terminal(NodeRole::Start);
        let end = graph.terminal(NodeRole::End);
        graph.nodes.push(start);
        graph.nodes.push(end);
        graph
    }

    /// Rebuild a graph from persisted parts, repairing whatever would break
    /// the invariants: missing terminals are recreated, surplus terminals
    /// dropped, and dangling, duplicate or self-looping connections pruned.
    pub fn from_parts(nodes: Vec<Node>, connections: Vec<Connection>, layout: GraphLayout) -> Self {
        let mut graph = Self {
            nodes: Vec::with_capacity(nodes.len() + 2),
            connections: Vec::new(),
            node_ids: IdCounter::default(),
            connection_ids: IdCounter::default(),
            layout,
        };

        let mut seen_ids = std::collections::HashSet::new();
        let (mut has_start, mut has_end) = (false, false);
        for node in nodes {
            let surplus = match node.role {
                NodeRole::Start => has_start,
                NodeRole::End => has_end,
                NodeRole::Process => false,
            };
            if surplus || !seen_ids.insert(node.id) {
                tracing::warn!("Dropping surplus node {:?} ({}) on load", node.id, node.name);
                continue;
            }
            // A terminal counts only once it is actually kept
            match node.role {
                NodeRole::Start => has_start = true,
                NodeRole::End => has_end = true,
                NodeRole::Process => {}
            }
            graph.node_ids.bump_past(node.id.raw());
            graph.nodes.push(node);
        }
        for conn in &connections {
            graph.connection_ids.bump_past(conn.id.raw());
        }
        if !has_start {
            let start = graph.terminal(NodeRole::Start);
            graph.nodes.insert(0, start);
        }
        if !has_end {
            let end = graph.terminal(NodeRole::End);
            graph.nodes.push(end);
        }

        graph.connections = connections;
        graph.prune_dangling();
        graph
    }

    fn terminal(&mut self, role: NodeRole) -> Node {
        let (name, key, position) = match role {
            NodeRole::Start => (START_NODE_NAME, TemplateKey::START, self.layout.start_position),
            _ => (END_NODE_NAME, TemplateKey::END, self.layout.end_position),
        };
        Node {
            id: NodeId(self.node_ids.next()),
            name: name.to_string(),
            kind: NodeKind::new(TemplateKey::from(key)),
            role,
            position,
            params: ParamMap::new(),
        }
    }

    // ==================== Lookups ====================

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn layout(&self) -> &GraphLayout {
        &self.layout
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn find_connection(&self, from: NodeId, to: NodeId) -> Option<&Connection> {
        self.connections.iter().find(|c| c.links(from, to))
    }

    pub fn connections_from(&self, node: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.from == node)
    }

    pub fn connections_to(&self, node: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.iter().filter(move |c| c.to == node)
    }

    pub fn start_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.role == NodeRole::Start)
    }

    pub fn end_node(&self) -> Option<&Node> {
        self.nodes.iter().find(|n| n.role == NodeRole::End)
    }

    pub fn process_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.role == NodeRole::Process)
    }

    // ==================== Mutations ====================

    /// Instantiate a process node from `template` at world `position`.
    ///
    /// Parameters are seeded from the template schema; the name is the
    /// template name, suffixed `1`, `2`, … when already taken.
    pub fn add_node(&mut self, template: &Template, position: Point) -> Node {
        let suffix = self.free_suffix(&template.name);
        let params = template
            .fields
            .iter()
            .map(|field| (field.label.clone(), field.initial_value()))
            .collect();
        let node = Node {
            id: NodeId(self.node_ids.next()),
            name: format!("{}{}", template.name, suffix),
            kind: NodeKind {
                template: template.key.clone(),
                instance_suffix: suffix,
            },
            role: NodeRole::Process,
            position,
            params,
        };
        tracing::debug!("Added node {:?} '{}' at {:?}", node.id, node.name, position);
        self.nodes.push(node.clone());
        node
    }

    fn free_suffix(&self, base: &str) -> String {
        let taken = |name: &str| self.nodes.iter().any(|n| n.name == name);
        if !taken(base) {
            return String::new();
        }
        (1u32..)
            .map(|i| i.to_string())
            .find(|suffix| !taken(&format!("{}{}", base, suffix)))
            .unwrap_or_default()
    }

    /// Add `from → to`, or explain why not.
    pub fn try_add_connection(&mut self, from: NodeId, to: NodeId) -> GraphResult<Connection> {
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        for id in [from, to] {
            if self.node(id).is_none() {
                return Err(GraphError::UnknownNode(id));
            }
        }
        if self.find_connection(from, to).is_some() {
            return Err(GraphError::DuplicateConnection { from, to });
        }
        let conn = Connection {
            id: ConnectionId(self.connection_ids.next()),
            from,
            to,
            mappings: Vec::new(),
        };
        tracing::debug!("Added connection {:?}: {:?} -> {:?}", conn.id, from, to);
        self.connections.push(conn.clone());
        Ok(conn)
    }

    /// Add `from → to`; self-loops, duplicates and unknown endpoints are no-ops.
    pub fn add_connection(&mut self, from: NodeId, to: NodeId) -> Option<Connection> {
        self.try_add_connection(from, to)
            .map_err(|e| tracing::debug!("Connection ignored: {}", e))
            .ok()
    }

    /// Whether `add_connection(from, to)` would create an edge.
    pub fn can_connect(&self, from: NodeId, to: NodeId) -> bool {
        from != to
            && self.node(from).is_some()
            && self.node(to).is_some()
            && self.find_connection(from, to).is_none()
    }

    /// Replace one parameter, returning the previous value.
    pub fn try_update_node_param(
        &mut self,
        node: NodeId,
        key: &str,
        value: ParamValue,
    ) -> GraphResult<Option<ParamValue>> {
        let target = self.node_mut(node).ok_or(GraphError::UnknownNode(node))?;
        Ok(target.params.insert(key.to_string(), value))
    }

    /// Replace one parameter. Returns false for an unknown node.
    pub fn update_node_param(&mut self, node: NodeId, key: &str, value: ParamValue) -> bool {
        self.try_update_node_param(node, key, value).is_ok()
    }

    /// Replace a connection's mapping list wholesale.
    pub fn update_connection_mappings(&mut self, conn: ConnectionId, mappings: Vec<Mapping>) -> bool {
        match self.connections.iter_mut().find(|c| c.id == conn) {
            Some(c) => {
                c.mappings = mappings;
                true
            }
            None => false,
        }
    }

    /// Move a node to a new world position.
    pub fn move_node(&mut self, node: NodeId, position: Point) -> bool {
        match self.node_mut(node) {
            Some(n) => {
                n.position = position;
                true
            }
            None => false,
        }
    }

    /// Reset to the two-terminal baseline: every process node and every
    /// connection goes, terminals return to their baseline positions.
    pub fn remove_all_except_terminals(&mut self) {
        let layout = self.layout;
        self.nodes.retain(|n| n.is_terminal());
        for node in &mut self.nodes {
            node.position = match node.role {
                NodeRole::Start => layout.start_position,
                _ => layout.end_position,
            };
        }
        self.connections.clear();
        tracing::info!("Canvas cleared");
    }

    /// Lay nodes out left-to-right on one row: start first, process nodes in
    /// insertion order, end last. Connections are untouched.
    pub fn auto_layout(&mut self) {
        let GraphLayout {
            origin_x,
            step_x,
            row_y,
            ..
        } = self.layout;
        let mut column = 0usize;
        let process_count = self.process_nodes().count();
        for node in &mut self.nodes {
            let slot = match node.role {
                NodeRole::Start => 0,
                NodeRole::Process => {
                    column += 1;
                    column
                }
                NodeRole::End => process_count + 1,
            };
            node.position = Point::new(origin_x + slot as f32 * step_x, row_y);
        }
    }

    /// Drop connections that reference missing nodes, self-loops and
    /// duplicates (first occurrence wins). Returns how many were removed.
    pub fn prune_dangling(&mut self) -> usize {
        let before = self.connections.len();
        let node_ids: std::collections::HashSet<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        let mut seen = std::collections::HashSet::new();
        self.connections.retain(|c| {
            c.from != c.to
                && node_ids.contains(&c.from)
                && node_ids.contains(&c.to)
                && seen.insert((c.from, c.to))
        });
        let removed = before - self.connections.len();
        if removed > 0 {
            tracing::warn!("Pruned {} invalid connections", removed);
        }
        removed
    }

    // ==================== Snapshots ====================

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes.clone(),
            connections: self.connections.clone(),
        }
    }

    /// Replace the contents with `snapshot`. Id counters keep advancing so ids
    /// handed out after an undo never collide with ids seen before it.
    pub fn restore(&mut self, snapshot: GraphSnapshot) {
        self.nodes = snapshot.nodes;
        self.connections = snapshot.connections;
        for node in &self.nodes {
            self.node_ids.bump_past(node.id.raw());
        }
        for conn in &self.connections {
            self.connection_ids.bump_past(conn.id.raw());
        }
    }
}
