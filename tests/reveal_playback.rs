//! Integration tests for full reveal playbacks.
//!
//! Every test drives the engine headlessly with a fixed delta and a seeded
//! RNG, so playbacks are reproducible. The `RecordingStage` wrapper counts
//! stage mutations to verify the engine's "nothing mutates after stop"
//! guarantee.

use prve::prelude::*;

const DT: f32 = 1.0 / 60.0;

/// Stage wrapper that counts every mutation the engine performs.
#[derive(Clone)]
struct RecordingStage {
    inner: LineStage,
    mutations: usize,
}

impl RecordingStage {
    fn new(glyphs: usize) -> Self {
        Self {
            inner: LineStage::new(glyphs, Vec2::new(640.0, 320.0), 600.0),
            mutations: 0,
        }
    }

    fn reduced(mut self) -> Self {
        self.inner = self.inner.with_reduced_motion(true);
        self
    }
}

impl Stage for RecordingStage {
    fn targets(&self) -> Vec<Target> {
        self.inner.targets()
    }

    fn reduced_motion(&self) -> bool {
        Stage::reduced_motion(&self.inner)
    }

    fn set_source_opacity(&mut self, opacity: f32) {
        self.mutations += 1;
        self.inner.set_source_opacity(opacity);
    }

    fn set_glyph_opacity(&mut self, glyph: usize, opacity: f32) {
        self.mutations += 1;
        self.inner.set_glyph_opacity(glyph, opacity);
    }

    fn set_secondary_opacity(&mut self, opacity: f32) {
        self.mutations += 1;
        self.inner.set_secondary_opacity(opacity);
    }

    fn set_backdrop(&mut self, dim: f32) {
        self.mutations += 1;
        self.inner.set_backdrop(dim);
    }
}

fn run_for(engine: &mut Engine, stage: &mut dyn Stage, seconds: f32) {
    let steps = (seconds / DT).round() as usize;
    for _ in 0..steps {
        engine.advance(stage, DT);
    }
}

fn default_stage() -> LineStage {
    LineStage::new(8, Vec2::new(640.0, 320.0), 600.0).with_emphasis(0)
}

#[test]
fn scatter_bursts_and_source_fades() {
    let mut stage = default_stage();
    let mut engine = Engine::new().with_seed(3);
    engine.start(&mut stage);

    run_for(&mut engine, &mut stage, 1.2);
    assert_eq!(engine.phase(), Phase::Scattering);
    assert!(engine.particle_count() > 0);
    assert!(stage.source_opacity() < 1.0);
    assert!(stage.backdrop() > 0.0, "backdrop should darken during scatter");
}

#[test]
fn live_particles_never_outlive_their_budget() {
    let mut stage = default_stage();
    let mut engine = Engine::new().with_seed(3);
    engine.start(&mut stage);

    for _ in 0..(6.0 / DT) as usize {
        engine.advance(&mut stage, DT);
        for p in engine.particles() {
            assert!(p.age >= 0.0);
            assert!(
                p.priority || p.age < p.life,
                "non-priority particle alive past its lifetime budget"
            );
        }
    }
}

#[test]
fn scatter_particles_all_expire_without_gather() {
    let mut stage = default_stage();
    let timeline = Timeline::new()
        .at(0.1, Action::Scatter)
        .at(600.0, Action::Finalize);
    let mut engine = Engine::new().with_seed(5).with_timeline(timeline);
    engine.start(&mut stage);

    run_for(&mut engine, &mut stage, 4.0);
    assert_eq!(engine.phase(), Phase::Scattering);
    assert_eq!(engine.particle_count(), 0, "every burst particle should expire or exit");
}

#[test]
fn gather_tops_up_coverage_from_edges() {
    let mut stage = default_stage();
    let mut engine = Engine::new()
        .with_seed(9)
        .with_burst(3)
        .with_coverage(5);
    engine.start(&mut stage);

    run_for(&mut engine, &mut stage, 2.3);
    assert_eq!(engine.phase(), Phase::Gathering);
    assert!(
        engine.particle_count() >= 8 * 5,
        "every target must have coverage even with a tiny burst"
    );
    assert!(engine.particles().iter().all(|p| p.target.is_some()));
    assert!(
        engine.particles().iter().any(|p| p.priority),
        "emphasis glyph should get priority particles"
    );
}

#[test]
fn convergence_reveals_and_purges() {
    let mut stage = default_stage();
    // Push the fallback far out so only convergence can reveal.
    let timeline = Timeline::new()
        .at(0.9, Action::Scatter)
        .at(2.2, Action::Gather)
        .at(60.0, Action::Finalize)
        .at(60.5, Action::Settle)
        .at(61.0, Action::Secondary);
    let mut engine = Engine::new().with_seed(3).with_timeline(timeline);
    engine.start(&mut stage);

    run_for(&mut engine, &mut stage, 12.0);
    assert!(engine.revealed(), "convergence should have triggered the reveal");
    assert_eq!(engine.phase(), Phase::Revealed);
    assert!(stage.fully_revealed());
    assert_eq!(engine.particle_count(), 0, "residual particles should be purged");
}

#[test]
fn reveal_triggers_at_most_once() {
    let mut stage = default_stage();
    let timeline = Timeline::new()
        .at(0.9, Action::Scatter)
        .at(2.2, Action::Gather)
        .at(60.0, Action::Finalize);
    let mut engine = Engine::new().with_seed(3).with_timeline(timeline);
    engine.start(&mut stage);

    run_for(&mut engine, &mut stage, 12.0);
    assert!(engine.revealed());
    assert!(stage.fully_revealed());

    // Ticking far past the convergence point must not restart the reveal.
    run_for(&mut engine, &mut stage, 4.0);
    assert_eq!(engine.phase(), Phase::Revealed);
    assert!(stage.fully_revealed(), "glyph opacity must never regress");
    assert_eq!(engine.particle_count(), 0);
    assert_eq!(stage.source_opacity(), 0.0);
}

#[test]
fn stop_freezes_all_mutation() {
    for stop_at in [0.0_f32, 1.2, 2.5] {
        let mut stage = RecordingStage::new(8);
        let mut engine = Engine::new().with_seed(3);
        engine.start(&mut stage);

        run_for(&mut engine, &mut stage, stop_at);
        engine.stop();
        assert_eq!(engine.phase(), Phase::Cancelled);
        assert_eq!(engine.particle_count(), 0);

        let frozen = stage.mutations;
        run_for(&mut engine, &mut stage, 3.0);
        assert_eq!(
            stage.mutations, frozen,
            "stage mutated after stop() at t={stop_at}"
        );
        assert_eq!(engine.particle_count(), 0);
    }
}

#[test]
fn reduced_motion_reveals_immediately() {
    let mut stage = RecordingStage::new(8).reduced();
    let mut engine = Engine::new().with_seed(3);
    engine.start(&mut stage);

    assert_eq!(engine.phase(), Phase::Revealed);
    assert!(stage.inner.fully_revealed());
    assert_eq!(stage.inner.source_opacity(), 0.0);
    assert_eq!(stage.inner.secondary_opacity(), 1.0);
    assert_eq!(stage.inner.backdrop(), 0.0);

    let after_start = stage.mutations;
    for _ in 0..(2.0 / DT) as usize {
        engine.advance(&mut stage, DT);
        assert_eq!(engine.particle_count(), 0, "no particle may ever spawn");
    }
    assert_eq!(
        stage.mutations, after_start,
        "no intermediate scatter/gather side effects allowed"
    );
}

#[test]
fn fallback_finalizes_unreachable_targets() {
    let mut stage = default_stage();
    // Arrival within 0px never happens: convergence can never trigger.
    let physics = Physics {
        converge_distance: 0.0,
        ..Physics::default()
    };
    let mut engine = Engine::new().with_seed(3).with_physics(physics);
    engine.start(&mut stage);

    run_for(&mut engine, &mut stage, 4.9);
    assert!(!engine.revealed(), "nothing should converge before the deadline");

    run_for(&mut engine, &mut stage, 0.3);
    assert!(engine.revealed());
    assert_eq!(engine.phase(), Phase::Revealed);
    assert!(stage.fully_revealed(), "finalize must force full opacity");
    assert_eq!(engine.particle_count(), 0);
}

#[test]
fn resize_mid_animation_keeps_state_finite() {
    let mut stage = default_stage();
    let mut surface = NullSurface::new(Vec2::new(1280.0, 720.0));
    let mut engine = Engine::new().with_seed(3);
    engine.start(&mut stage);

    let sizes = [
        Vec2::new(320.0, 200.0),
        Vec2::new(2560.0, 1440.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(1280.0, 720.0),
    ];
    let mut size_iter = sizes.iter().cycle();
    for step in 0..(7.0 / DT) as usize {
        engine.advance(&mut stage, DT);
        engine.render(&mut surface);
        // resize during every phase of the playback
        if step % 30 == 0 {
            let size = *size_iter.next().unwrap();
            surface.resize(size);
            engine.set_bounds(size);
        }
        for p in engine.particles() {
            assert!(p.is_finite(), "particle state went non-finite after resize");
        }
    }
}

#[test]
fn settle_restores_backdrop_and_shows_secondary() {
    let mut stage = default_stage();
    let mut engine = Engine::new().with_seed(3);
    engine.start(&mut stage);

    run_for(&mut engine, &mut stage, 9.0);
    assert_eq!(engine.phase(), Phase::Revealed);
    assert!(stage.secondary_opacity() >= 1.0);
    assert!(
        stage.backdrop() < 0.05,
        "backdrop should ease back to normal after settle"
    );
}

#[test]
fn layout_reflow_between_scatter_and_gather_is_used() {
    let mut stage = default_stage();
    let timeline = Timeline::new()
        .at(0.5, Action::Scatter)
        .at(1.0, Action::Gather)
        .at(60.0, Action::Finalize);
    let mut engine = Engine::new().with_seed(3).with_timeline(timeline);
    engine.start(&mut stage);

    run_for(&mut engine, &mut stage, 0.7);
    // reflow after scatter, before gather
    stage.relocate(Vec2::new(200.0, 500.0), 300.0);
    run_for(&mut engine, &mut stage, 0.5);

    assert_eq!(engine.phase(), Phase::Gathering);
    let targets = stage.targets();
    for p in engine.particles() {
        let dest = p.target.expect("gather particle must have a target");
        let near_new_layout = targets.iter().any(|t| t.position.distance(dest) < 40.0);
        assert!(
            near_new_layout,
            "gather must use post-reflow layout positions, got {dest}"
        );
    }
}
