//! Per-frame cost of the tick loop mid-gather, the busiest point of a
//! playback: hundreds of particles steering plus the full render batch.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use prve::prelude::*;

const DT: f32 = 1.0 / 60.0;

fn mid_gather() -> (Engine, LineStage) {
    let mut stage = LineStage::new(10, Vec2::new(640.0, 320.0), 700.0);
    let mut engine = Engine::new()
        .with_seed(11)
        .with_burst(600)
        .with_coverage(40)
        .with_timeline(
            Timeline::new()
                .at(0.1, Action::Scatter)
                .at(1.0, Action::Gather)
                .at(600.0, Action::Finalize),
        );
    engine.start(&mut stage);
    for _ in 0..90 {
        engine.advance(&mut stage, DT);
    }
    (engine, stage)
}

fn bench_tick_loop(c: &mut Criterion) {
    let (engine, stage) = mid_gather();
    let mut surface = NullSurface::new(Vec2::new(1280.0, 720.0));

    c.bench_function("advance_and_render_10_frames", |b| {
        b.iter_batched(
            || (engine.clone(), stage.clone()),
            |(mut engine, mut stage)| {
                for _ in 0..10 {
                    engine.advance(&mut stage, black_box(DT));
                    engine.render(&mut surface);
                }
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_tick_loop);
criterion_main!(benches);
