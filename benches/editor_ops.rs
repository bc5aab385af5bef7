//! Benchmarks for editor hot paths
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use geoline_designer::{
    config::EditorSettings,
    editor::{CanvasController, History},
    geometry::Point,
    graph::PipelineGraph,
    palette::Palette,
};

/// Chain of `size` process nodes between the terminals, laid out in a row.
fn chain_graph(size: usize) -> PipelineGraph {
    let palette = Palette::builtin();
    let templates: Vec<_> = palette.templates().collect();
    let mut graph = PipelineGraph::default();
    let mut previous = graph.start_node().map(|n| n.id);
    for i in 0..size {
        let node = graph
            .add_node(templates[i % templates.len()], Point::new(i as f32 * 160.0, 0.0))
            .id;
        if let Some(prev) = previous {
            graph.add_connection(prev, node);
        }
        previous = Some(node);
    }
    if let (Some(prev), Some(end)) = (previous, graph.end_node().map(|n| n.id)) {
        graph.add_connection(prev, end);
    }
    graph.auto_layout();
    graph
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");

    for size in [10, 100, 500].iter() {
        let graph = chain_graph(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("commit", size), &graph, |b, graph| {
            let mut history = History::new(100);
            b.iter(|| history.commit(black_box(graph)));
        });
        group.bench_with_input(BenchmarkId::new("undo_redo", size), &graph, |b, graph| {
            let mut graph = graph.clone();
            let mut history = History::new(100);
            history.commit(&graph);
            graph.auto_layout();
            b.iter(|| {
                history.undo(&mut graph);
                history.redo(&mut graph);
            });
        });
    }

    group.finish();
}

fn bench_auto_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("auto_layout");

    for size in [10, 100, 1000].iter() {
        let graph = chain_graph(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("row", size), &graph, |b, graph| {
            let mut graph = graph.clone();
            b.iter(|| graph.auto_layout());
        });
    }

    group.finish();
}

fn bench_hit_test(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_test");
    let canvas = CanvasController::new(EditorSettings::default());

    for size in [10, 100, 500].iter() {
        let graph = chain_graph(*size);
        // Between two nodes, close to a connection: walks every node and curve
        let probe = Point::new(245.0, 330.0);
        group.bench_with_input(BenchmarkId::new("miss_nodes", size), &graph, |b, graph| {
            b.iter(|| canvas.hit_test(black_box(graph), black_box(probe)));
        });
        group.bench_with_input(BenchmarkId::new("background", size), &graph, |b, graph| {
            b.iter(|| canvas.hit_test(black_box(graph), black_box(Point::new(-500.0, -500.0))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_history, bench_auto_layout, bench_hit_test);
criterion_main!(benches);
