//! Test data builders for creating sessions and graphs

use std::sync::Arc;

use geoline_designer::{
    config::EditorSettings,
    geometry::Point,
    graph::{NodeId, PipelineGraph},
    palette::Palette,
    EditorSession,
};

/// Builder for editor sessions with nodes dropped at world positions
pub struct SessionBuilder {
    settings: EditorSettings,
    drops: Vec<(String, Point)>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            settings: EditorSettings::default(),
            drops: Vec::new(),
        }
    }

    pub fn history_depth(mut self, depth: usize) -> Self {
        self.settings.history_depth = depth;
        self
    }

    /// Drop `template` so that the node lands at `world`.
    pub fn drop_at(mut self, template: &str, world: Point) -> Self {
        self.drops.push((template.to_string(), world));
        self
    }

    pub fn build(self) -> (EditorSession, Vec<NodeId>) {
        let mut session = EditorSession::new(Arc::new(Palette::builtin()), self.settings);
        let ids = self
            .drops
            .iter()
            .map(|(name, world)| {
                let screen = screen_for_world(&session, *world);
                session
                    .drop_template(name, screen)
                    .unwrap_or_else(|| panic!("template {} not in palette", name))
            })
            .collect();
        (session, ids)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Screen point at which a palette drop places a node at `world`.
pub fn screen_for_world(session: &EditorSession, world: Point) -> Point {
    let bias = session.settings().node.drop_bias();
    session.viewport().world_to_screen(world + bias)
}

/// Graph with the builtin template `name` added `count` times.
pub fn graph_with_copies(name: &str, count: usize) -> (PipelineGraph, Vec<NodeId>) {
    let palette = Palette::builtin();
    let template = palette
        .template_by_name(name)
        .unwrap_or_else(|| panic!("template {} not in palette", name));
    let mut graph = PipelineGraph::default();
    let ids = (0..count)
        .map(|i| graph.add_node(template, Point::new(i as f32 * 10.0, 0.0)).id)
        .collect();
    (graph, ids)
}
