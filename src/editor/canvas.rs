//! Canvas interaction controller.
//!
//! Translates pointer events into graph mutations while keeping the pan/zoom
//! transform separate from graph coordinates.
//!
//! ```text
//!            press background          release
//!   Idle ─────────────────────► Panning ───────► Idle
//!    │  press node body                    release (commit pre-drag state)
//!    ├───────────────────────► DraggingNode ───────► Idle
//!    │  press output port                  release on input port → connect
//!    └───────────────────────► Connecting ─────────► Idle (else cancel)
//! ```

use crate::config::EditorSettings;
use crate::editor::history::History;
use crate::editor::viewport::Viewport;
use crate::geometry::{dashed_segments, CubicBezier, Point, Rect, Vec2};
use crate::graph::{Connection, ConnectionId, GraphSnapshot, Node, NodeId, PipelineGraph};

/// What lies under a screen point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Background,
    NodeBody(NodeId),
    OutputPort(NodeId),
    InputPort(NodeId),
    Connection(ConnectionId),
}

/// Pointer gesture in progress.
#[derive(Debug, Clone, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Panning {
        last: Point,
    },
    DraggingNode {
        node: NodeId,
        /// World-space offset from pointer to node origin, so the node does
        /// not jump to the pointer.
        grab_offset: Vec2,
        before: GraphSnapshot,
        moved: bool,
    },
    Connecting {
        from: NodeId,
        /// Live pointer position in screen space.
        pointer: Point,
    },
}

impl Interaction {
    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::Panning { .. } => "panning",
            Interaction::DraggingNode { .. } => "draggingNode",
            Interaction::Connecting { .. } => "connecting",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }
}

/// Result of releasing the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    Nothing,
    /// A node drag finished and was committed to history.
    Moved(NodeId),
    Connected(Connection),
    /// A connection gesture ended somewhere other than a valid input port.
    ConnectCancelled,
}

#[derive(Debug, Clone)]
pub struct CanvasController {
    viewport: Viewport,
    state: Interaction,
    settings: EditorSettings,
}

impl CanvasController {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            viewport: Viewport::new(settings.zoom),
            state: Interaction::Idle,
            settings,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn state(&self) -> &Interaction {
        &self.state
    }

    /// Abandon any gesture in progress without committing it.
    pub fn cancel(&mut self) {
        self.state = Interaction::Idle;
    }

    // ==================== Geometry ====================

    pub fn node_screen_rect(&self, node: &Node) -> Rect {
        let zoom = self.viewport.zoom();
        Rect::from_min_size(
            self.viewport.world_to_screen(node.position),
            self.settings.node.size() * zoom,
        )
    }

    /// Screen anchor where outgoing connections leave a node.
    pub fn output_anchor(&self, node: &Node) -> Point {
        self.node_screen_rect(node).right_center()
    }

    /// Screen anchor where incoming connections enter a node.
    pub fn input_anchor(&self, node: &Node) -> Point {
        self.node_screen_rect(node).left_center()
    }

    fn port_hit_radius(&self) -> f32 {
        self.settings.node.port_radius * self.viewport.zoom() * 2.0
    }

    /// Screen-space S-curve of a committed connection.
    pub fn connection_curve(&self, graph: &PipelineGraph, conn: &Connection) -> Option<CubicBezier> {
        let from = graph.node(conn.from)?;
        let to = graph.node(conn.to)?;
        Some(CubicBezier::s_curve(
            self.output_anchor(from),
            self.input_anchor(to),
        ))
    }

    /// Straight line from the source anchor to the live pointer while connecting.
    pub fn pending_connection(&self, graph: &PipelineGraph) -> Option<(Point, Point)> {
        match &self.state {
            Interaction::Connecting { from, pointer } => {
                let node = graph.node(*from)?;
                Some((self.output_anchor(node), *pointer))
            }
            _ => None,
        }
    }

    /// Dash segments of the pending connection line.
    pub fn pending_connection_dashes(&self, graph: &PipelineGraph) -> Vec<(Point, Point)> {
        self.pending_connection(graph)
            .map(|(from, to)| dashed_segments(from, to, 8.0, 5.0))
            .unwrap_or_default()
    }

    /// Find what lies under `screen`. Ports win over bodies; later nodes
    /// (drawn on top) win over earlier ones. Start nodes have no input port
    /// and end nodes no output port.
    pub fn hit_test(&self, graph: &PipelineGraph, screen: Point) -> HitTarget {
        let port_radius = self.port_hit_radius();
        for node in graph.nodes().iter().rev() {
            if node.role.emits_output() && screen.distance(self.output_anchor(node)) <= port_radius {
                return HitTarget::OutputPort(node.id);
            }
            if node.role.accepts_input() && screen.distance(self.input_anchor(node)) <= port_radius {
                return HitTarget::InputPort(node.id);
            }
            if self.node_screen_rect(node).contains(screen) {
                return HitTarget::NodeBody(node.id);
            }
        }
        let tolerance = self.settings.connection_hit_tolerance;
        for conn in graph.connections().iter().rev() {
            if let Some(curve) = self.connection_curve(graph, conn) {
                if curve.distance_to(screen, self.settings.curve_segments) <= tolerance {
                    return HitTarget::Connection(conn.id);
                }
            }
        }
        HitTarget::Background
    }

    /// World position for a palette drop at `screen`.
    pub fn drop_position(&self, screen: Point) -> Point {
        self.viewport.screen_to_world(screen) - self.settings.node.drop_bias()
    }

    /// Screen rect a node dropped at `screen` would occupy.
    pub fn drop_preview_rect(&self, screen: Point) -> Rect {
        Rect::from_min_size(
            self.viewport.world_to_screen(self.drop_position(screen)),
            self.settings.node.size() * self.viewport.zoom(),
        )
    }

    // ==================== State machine ====================

    /// Pointer pressed. Only starts a gesture from `Idle`.
    pub fn pointer_down(&mut self, graph: &PipelineGraph, screen: Point) -> HitTarget {
        let hit = self.hit_test(graph, screen);
        if !self.state.is_idle() {
            return hit;
        }
        self.state = match hit {
            HitTarget::Background => Interaction::Panning { last: screen },
            HitTarget::NodeBody(id) | HitTarget::InputPort(id) => match graph.node(id) {
                Some(node) => Interaction::DraggingNode {
                    node: id,
                    grab_offset: node.position - self.viewport.screen_to_world(screen),
                    before: graph.snapshot(),
                    moved: false,
                },
                None => Interaction::Idle,
            },
            HitTarget::OutputPort(id) => Interaction::Connecting {
                from: id,
                pointer: screen,
            },
            HitTarget::Connection(_) => Interaction::Idle,
        };
        tracing::trace!("Pointer down on {:?} -> {}", hit, self.state.name());
        hit
    }

    /// Pointer moved (button held or not).
    pub fn pointer_move(&mut self, graph: &mut PipelineGraph, screen: Point) {
        match &mut self.state {
            Interaction::Idle => {}
            Interaction::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.viewport.pan_by(delta);
            }
            Interaction::DraggingNode {
                node,
                grab_offset,
                moved,
                ..
            } => {
                let target = self.viewport.screen_to_world(screen) + *grab_offset;
                if graph.node(*node).is_some_and(|n| n.position != target) {
                    graph.move_node(*node, target);
                    *moved = true;
                }
            }
            Interaction::Connecting { pointer, .. } => {
                *pointer = screen;
            }
        }
    }

    /// Pointer released; finishes the current gesture.
    pub fn pointer_up(
        &mut self,
        graph: &mut PipelineGraph,
        history: &mut History,
        screen: Point,
    ) -> ReleaseOutcome {
        let state = std::mem::take(&mut self.state);
        match state {
            Interaction::Idle | Interaction::Panning { .. } => ReleaseOutcome::Nothing,
            Interaction::DraggingNode {
                node,
                before,
                moved,
                ..
            } => {
                if moved {
                    history.commit_snapshot(before);
                    ReleaseOutcome::Moved(node)
                } else {
                    ReleaseOutcome::Nothing
                }
            }
            Interaction::Connecting { from, .. } => match self.hit_test(graph, screen) {
                HitTarget::InputPort(to) if graph.can_connect(from, to) => {
                    history.commit(graph);
                    match graph.add_connection(from, to) {
                        Some(conn) => ReleaseOutcome::Connected(conn),
                        None => ReleaseOutcome::ConnectCancelled,
                    }
                }
                _ => {
                    tracing::trace!("Connection from {:?} cancelled", from);
                    ReleaseOutcome::ConnectCancelled
                }
            },
        }
    }
}
