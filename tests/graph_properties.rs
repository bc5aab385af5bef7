//! Property-based tests for graph, history and viewport invariants

mod common;

use common::builders::graph_with_copies;
use geoline_designer::{
    config::ZoomSettings,
    editor::{History, Viewport},
    geometry::{Point, Vec2},
    graph::PipelineGraph,
    palette::Palette,
};
use proptest::prelude::*;

/// A committed editing step applied to a graph in tests.
#[derive(Debug, Clone)]
enum Edit {
    Add { template: usize, x: f32, y: f32 },
    Connect { from: usize, to: usize },
    Move { node: usize, x: f32, y: f32 },
    Layout,
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (0usize..8, -500.0f32..1500.0, -500.0f32..1500.0)
            .prop_map(|(template, x, y)| Edit::Add { template, x, y }),
        (0usize..16, 0usize..16).prop_map(|(from, to)| Edit::Connect { from, to }),
        (0usize..16, -500.0f32..1500.0, -500.0f32..1500.0)
            .prop_map(|(node, x, y)| Edit::Move { node, x, y }),
        Just(Edit::Layout),
    ]
}

fn apply(graph: &mut PipelineGraph, palette: &Palette, edit: &Edit) {
    let node_at = |graph: &PipelineGraph, index: usize| graph.nodes()[index % graph.nodes().len()].id;
    match *edit {
        Edit::Add { template, x, y } => {
            let templates: Vec<_> = palette.templates().collect();
            graph.add_node(templates[template % templates.len()], Point::new(x, y));
        }
        Edit::Connect { from, to } => {
            let (from, to) = (node_at(graph, from), node_at(graph, to));
            graph.add_connection(from, to);
        }
        Edit::Move { node, x, y } => {
            let node = node_at(graph, node);
            graph.move_node(node, Point::new(x, y));
        }
        Edit::Layout => graph.auto_layout(),
    }
}

proptest! {
    #[test]
    fn prop_drop_names_unique_and_suffixed(count in 1usize..25) {
        let (graph, ids) = graph_with_copies("影像镶嵌", count);
        let names: Vec<String> = ids
            .iter()
            .map(|id| graph.node(*id).unwrap().name.clone())
            .collect();

        for (i, name) in names.iter().enumerate() {
            let expected = if i == 0 {
                "影像镶嵌".to_string()
            } else {
                format!("影像镶嵌{}", i)
            };
            prop_assert_eq!(name, &expected);
        }
        let unique: std::collections::HashSet<_> = names.iter().collect();
        prop_assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn prop_duplicate_connection_is_noop(count in 2usize..6, from in 0usize..8, to in 0usize..8) {
        let (mut graph, _) = graph_with_copies("辐射定标", count);
        let nodes: Vec<_> = graph.nodes().iter().map(|n| n.id).collect();
        let (from, to) = (nodes[from % nodes.len()], nodes[to % nodes.len()]);
        prop_assume!(from != to);

        prop_assert!(graph.add_connection(from, to).is_some());
        let before = graph.connections().to_vec();
        prop_assert!(graph.add_connection(from, to).is_none());
        prop_assert_eq!(graph.connections(), before.as_slice());
    }

    #[test]
    fn prop_self_loop_never_mutates(
        edits in prop::collection::vec(edit_strategy(), 0..12),
        pick in 0usize..32,
    ) {
        let palette = Palette::builtin();
        let mut graph = PipelineGraph::default();
        for edit in &edits {
            apply(&mut graph, &palette, edit);
        }
        let node = graph.nodes()[pick % graph.nodes().len()].id;
        let before = graph.connections().to_vec();

        prop_assert!(!graph.can_connect(node, node));
        prop_assert!(graph.add_connection(node, node).is_none());
        prop_assert_eq!(graph.connections(), before.as_slice());
    }

    #[test]
    fn prop_undo_redo_inverse(edits in prop::collection::vec(edit_strategy(), 1..15)) {
        let palette = Palette::builtin();
        let mut graph = PipelineGraph::default();
        let mut history = History::default();
        let mut states = vec![graph.snapshot()];

        for edit in &edits {
            history.commit(&graph);
            apply(&mut graph, &palette, edit);
            states.push(graph.snapshot());
        }

        // Walk all the way back, then all the way forward
        for expected in states.iter().rev().skip(1) {
            prop_assert!(history.undo(&mut graph));
            prop_assert_eq!(&graph.snapshot(), expected);
        }
        prop_assert!(!history.undo(&mut graph));
        for expected in states.iter().skip(1) {
            prop_assert!(history.redo(&mut graph));
            prop_assert_eq!(&graph.snapshot(), expected);
        }
        prop_assert!(!history.redo(&mut graph));
    }

    #[test]
    fn prop_new_commit_invalidates_redo(
        edits in prop::collection::vec(edit_strategy(), 1..10),
        undos in 1usize..10,
        next in edit_strategy(),
    ) {
        let palette = Palette::builtin();
        let mut graph = PipelineGraph::default();
        let mut history = History::default();
        for edit in &edits {
            history.commit(&graph);
            apply(&mut graph, &palette, edit);
        }
        for _ in 0..undos.min(edits.len()) {
            history.undo(&mut graph);
        }
        prop_assert!(history.can_redo());

        history.commit(&graph);
        apply(&mut graph, &palette, &next);
        let after = graph.snapshot();

        prop_assert!(!history.can_redo());
        prop_assert!(!history.redo(&mut graph));
        prop_assert_eq!(graph.snapshot(), after);
    }

    #[test]
    fn prop_screen_world_round_trip(
        px in -5000.0f32..5000.0,
        py in -5000.0f32..5000.0,
        zoom in 0.5f32..2.0,
        sx in -5000.0f32..5000.0,
        sy in -5000.0f32..5000.0,
    ) {
        let mut viewport = Viewport::new(ZoomSettings::default());
        viewport.set_pan(Vec2::new(px, py));
        viewport.set_zoom(zoom);

        let screen = Point::new(sx, sy);
        let back = viewport.world_to_screen(viewport.screen_to_world(screen));
        // World coordinates reach 1e4 in magnitude at the lowest zoom
        prop_assert!((back.x - screen.x).abs() <= 1e-2, "{:?} vs {:?}", back, screen);
        prop_assert!((back.y - screen.y).abs() <= 1e-2, "{:?} vs {:?}", back, screen);
    }

    #[test]
    fn prop_auto_layout_idempotent(edits in prop::collection::vec(edit_strategy(), 0..15)) {
        let palette = Palette::builtin();
        let mut graph = PipelineGraph::default();
        for edit in &edits {
            apply(&mut graph, &palette, edit);
        }

        graph.auto_layout();
        let first = graph.snapshot();
        graph.auto_layout();
        prop_assert_eq!(graph.snapshot(), first);
    }
}
