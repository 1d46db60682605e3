//! Benchmarks for the CPU side of a frame.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use textdust::prelude::*;
use textdust::{PointerState, ProximityConnector};

fn state(text: &str, width: u32, height: u32) -> SimulationState {
    let config = EffectConfig {
        text: text.to_string(),
        seed: Some(7),
        ..Default::default()
    };
    SimulationState::new(config, Box::new(BlockRasterizer), width, height)
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for (width, height) in [(800u32, 600u32), (1280, 720), (1920, 1080)] {
        group.bench_with_input(
            BenchmarkId::new("hello", format!("{}x{}", width, height)),
            &(width, height),
            |b, &(width, height)| {
                let mut builder = FieldBuilder::new(BlockRasterizer, EffectConfig::default()).with_seed(7);
                b.iter(|| black_box(builder.build("HELLO", Color::WHITE, width, height)))
            },
        );
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    group.bench_function("idle", |b| {
        let mut state = state("HELLO", 1280, 720);
        let mut frame = DrawList::new();
        b.iter(|| {
            frame.reset();
            state.tick(&mut frame);
            black_box(frame.circles.len())
        })
    });

    group.bench_function("pointer_center", |b| {
        let mut state = state("HELLO", 1280, 720);
        state.pointer_moved(Vec2::new(640.0, 360.0));
        let mut frame = DrawList::new();
        b.iter(|| {
            frame.reset();
            state.tick(&mut frame);
            black_box(frame.lines.len())
        })
    });

    group.finish();
}

fn bench_connector(c: &mut Criterion) {
    let mut group = c.benchmark_group("connector");

    for text in ["HI", "HELLO", "PARTICLES"] {
        group.bench_with_input(BenchmarkId::new("find", text), text, |b, text| {
            let state = state(text, 1280, 720);
            let mut pointer = PointerState::new(state.pointer().influence_radius);
            pointer.move_to(Vec2::new(640.0, 360.0));
            let mut connector = ProximityConnector::default();
            b.iter(|| black_box(connector.find(state.field(), &pointer).len()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_tick, bench_connector);
criterion_main!(benches);
