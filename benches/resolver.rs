use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use diagram_anchors::config::RenderConfig;
use diagram_anchors::drag::{PointerMove, on_pointer_move};
use diagram_anchors::geometry::Side;
use diagram_anchors::ir::{AnchorSpec, EdgeSpec, Node};
use diagram_anchors::render::render_svg;
use diagram_anchors::resolver::resolve_all;
use diagram_anchors::store::GraphStore;
use diagram_anchors::theme::Theme;
use std::hint::black_box;

/// A hub in the middle of a ring of `spokes` leaves, every third edge fixed.
fn hub_store(spokes: usize) -> GraphStore {
    let mut store = GraphStore::new();
    store
        .add_node(Node::new("hub", 0.0, 0.0, 120.0, 60.0))
        .expect("hub");
    for i in 0..spokes {
        let angle = i as f32 / spokes as f32 * std::f32::consts::TAU;
        let id = format!("leaf{i}");
        store
            .add_node(Node::new(&id, angle.cos() * 400.0, angle.sin() * 400.0, 80.0, 40.0))
            .expect("leaf");
        let target = if i % 3 == 0 {
            AnchorSpec::Side(Side::Left)
        } else {
            AnchorSpec::Dynamic
        };
        store
            .add_edge(EdgeSpec::new(&format!("e{i}"), "hub", &id).anchors(AnchorSpec::Dynamic, target))
            .expect("edge");
    }
    resolve_all(&mut store).expect("resolve");
    store
}

/// A row of `len` nodes joined left to right.
fn chain_store(len: usize) -> GraphStore {
    let mut store = GraphStore::new();
    for i in 0..len {
        store
            .add_node(Node::new(&format!("n{i}"), i as f32 * 200.0, 0.0, 100.0, 50.0))
            .expect("node");
    }
    for i in 1..len {
        store
            .add_edge(EdgeSpec::new(&format!("e{i}"), &format!("n{}", i - 1), &format!("n{i}")))
            .expect("edge");
    }
    resolve_all(&mut store).expect("resolve");
    store
}

fn bench_resolve_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_all");
    for len in [10usize, 100, 1000] {
        let store = chain_store(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &store, |b, store| {
            b.iter(|| {
                let mut store = store.clone();
                let resolution = resolve_all(black_box(&mut store)).expect("resolve");
                black_box(resolution.recomputed.len());
            });
        });
    }
    group.finish();
}

fn bench_hub_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("hub_drag");
    for spokes in [8usize, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(spokes), &spokes, |b, &spokes| {
            let mut store = hub_store(spokes);
            let mut step = 0usize;
            b.iter(|| {
                // circle the hub so sides keep flipping
                step += 1;
                let phase = step as f32 * 0.2;
                let event = PointerMove::new(phase.cos() * 40.0, phase.sin() * 40.0);
                let report = on_pointer_move(black_box(&mut store), "hub", event).expect("drag");
                black_box(report.resolution.recomputed.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let theme = Theme::modern();
    let config = RenderConfig::default();
    let mut group = c.benchmark_group("render");
    for spokes in [8usize, 64] {
        let store = hub_store(spokes);
        group.bench_with_input(BenchmarkId::from_parameter(spokes), &store, |b, store| {
            b.iter(|| {
                let svg = render_svg(black_box(store), &theme, &config);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_resolve_all, bench_hub_drag, bench_render
);
criterion_main!(benches);
