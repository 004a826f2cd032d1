//! The reveal engine: playback state, phase transitions, and the frame tick.
//!
//! An [`Engine`] owns everything belonging to one playback (the particle
//! set, the phase timeline, and the fade state) as instance fields, so
//! independent instances coexist and teardown is a plain [`Engine::stop`].
//!
//! The host drives the engine from its frame callback:
//!
//! ```ignore
//! let mut engine = Engine::new();
//! engine.start(&mut stage);
//! loop {
//!     let (_, dt) = time.update();
//!     engine.advance(&mut stage, dt);
//!     engine.render(&mut surface);
//! }
//! ```
//!
//! Phase transitions are entries on the [`Timeline`], polled from
//! [`Engine::advance`]; they flip modes and spawn particles but never draw.
//! The `Finalize` entry is the liveness guarantee: the reveal completes by
//! that deadline no matter what the physics did.

use crate::particle::{Mode, Particle};
use crate::physics::Physics;
use crate::spawn::{hsv_to_rgb, SpawnContext};
use crate::stage::{Stage, Target};
use crate::surface::Surface;
use crate::timeline::{Action, Timeline};
use crate::visuals::{smooth, Visuals};
use glam::Vec2;

/// Scatter particles beyond the bounds by this margin are dropped, px.
const OFFSCREEN_MARGIN: f32 = 64.0;

/// Playback state.
///
/// `Revealed` is terminal for the phase sequence; `Cancelled` is the hard
/// stop reached only through [`Engine::stop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, not yet started.
    Idle,
    /// Started; the source content is on display.
    Displayed,
    /// The source has burst into particles.
    Scattering,
    /// Particles are steering onto the glyph targets.
    Gathering,
    /// The content is (or is becoming) fully visible.
    Revealed,
    /// Stopped; nothing mutates after this.
    Cancelled,
}

/// A particle reveal playback.
///
/// Configure with the builder methods, then [`start`](Engine::start) and
/// drive [`advance`](Engine::advance)/[`render`](Engine::render) from the
/// host frame loop.
#[derive(Clone, Debug)]
pub struct Engine {
    phase: Phase,
    physics: Physics,
    visuals: Visuals,
    timeline: Timeline,
    bounds: Vec2,
    burst: usize,
    coverage: usize,
    purge_delay: f32,

    ctx: SpawnContext,
    particles: Vec<Particle>,
    targets: Vec<Target>,
    glyph_alpha: Vec<f32>,

    elapsed: f32,
    origin: Vec2,
    scatter_at: f32,
    reveal_at: f32,
    secondary_at: Option<f32>,

    gather_assigned: usize,
    gather_arrived: usize,

    revealed: bool,
    reveal_done: bool,
    source_opacity: f32,
    secondary_opacity: f32,
    backdrop: f32,
    backdrop_goal: f32,
}

impl Engine {
    /// Create an engine with default physics, visuals, and timeline.
    pub fn new() -> Self {
        let bounds = Vec2::new(1280.0, 720.0);
        Self {
            phase: Phase::Idle,
            physics: Physics::default(),
            visuals: Visuals::default(),
            timeline: Timeline::default(),
            bounds,
            burst: 140,
            coverage: 6,
            purge_delay: 0.35,
            ctx: SpawnContext::new(bounds, None),
            particles: Vec::new(),
            targets: Vec::new(),
            glyph_alpha: Vec::new(),
            elapsed: 0.0,
            origin: bounds * 0.5,
            scatter_at: 0.0,
            reveal_at: 0.0,
            secondary_at: None,
            gather_assigned: 0,
            gather_arrived: 0,
            revealed: false,
            reveal_done: false,
            source_opacity: 1.0,
            secondary_opacity: 0.0,
            backdrop: 0.0,
            backdrop_goal: 0.0,
        }
    }

    /// Set the physics parameters.
    pub fn with_physics(mut self, physics: Physics) -> Self {
        self.physics = physics;
        self
    }

    /// Set the visual parameters.
    pub fn with_visuals(mut self, visuals: Visuals) -> Self {
        self.visuals = visuals;
        self
    }

    /// Replace the phase timeline.
    pub fn with_timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = timeline;
        self
    }

    /// Set the surface size in pixels.
    pub fn with_bounds(mut self, bounds: Vec2) -> Self {
        self.bounds = bounds;
        self.ctx.set_bounds(bounds);
        self.origin = bounds * 0.5;
        self
    }

    /// Number of particles in the scatter burst.
    pub fn with_burst(mut self, count: usize) -> Self {
        self.burst = count;
        self
    }

    /// Minimum gather particles per target; the deficit is topped up from
    /// off-screen edge positions.
    pub fn with_coverage(mut self, per_target: usize) -> Self {
        self.coverage = per_target;
        self
    }

    /// Seed the spawn RNG for a reproducible playback.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.ctx = SpawnContext::new(self.bounds, Some(seed));
        self
    }

    /// Begin the playback.
    ///
    /// Consults the stage's reduced-motion preference once: when set, the
    /// content is revealed immediately and no particle is ever spawned.
    /// Designed for a single invocation per instance.
    pub fn start(&mut self, stage: &mut dyn Stage) {
        if self.phase != Phase::Idle {
            log::warn!("start() called twice; ignoring");
            return;
        }
        if stage.reduced_motion() {
            log::info!("reduced motion preferred; revealing without animation");
            self.force_reveal(stage);
            return;
        }
        self.elapsed = 0.0;
        self.phase = Phase::Displayed;
        stage.set_source_opacity(1.0);
        self.source_opacity = 1.0;
        log::debug!("playback started, {} timeline entries armed", self.timeline.pending());
    }

    /// Cancel the playback.
    ///
    /// Clears every pending timeline entry and the particle set. After this
    /// returns, `advance` and `render` are no-ops: zero further style or
    /// particle mutations occur. Safe at any point, including mid-physics.
    pub fn stop(&mut self) {
        if self.phase == Phase::Cancelled {
            return;
        }
        self.timeline.clear();
        self.particles.clear();
        self.phase = Phase::Cancelled;
        log::debug!("playback cancelled at {:.2}s", self.elapsed);
    }

    /// Immediately show the fully revealed state.
    ///
    /// The degrade path for reduced motion and for hosts whose drawing or
    /// timing primitives are unavailable: content is never left hidden.
    pub fn force_reveal(&mut self, stage: &mut dyn Stage) {
        self.timeline.clear();
        self.particles.clear();
        let targets = stage.targets();
        stage.set_source_opacity(0.0);
        for t in &targets {
            stage.set_glyph_opacity(t.glyph, 1.0);
        }
        stage.set_secondary_opacity(1.0);
        stage.set_backdrop(0.0);
        self.glyph_alpha = vec![1.0; targets.len()];
        self.targets = targets;
        self.source_opacity = 0.0;
        self.secondary_opacity = 1.0;
        self.backdrop = 0.0;
        self.backdrop_goal = 0.0;
        self.revealed = true;
        self.reveal_done = true;
        self.phase = Phase::Revealed;
    }

    /// Advance the playback by `dt` seconds. Call once per frame.
    ///
    /// `dt` is clamped to [`Physics::max_delta`], so a stalled frame loop
    /// resumes with one bounded step.
    pub fn advance(&mut self, stage: &mut dyn Stage, dt: f32) {
        if matches!(self.phase, Phase::Idle | Phase::Cancelled) {
            return;
        }
        let dt = dt.clamp(0.0, self.physics.max_delta);
        self.elapsed += dt;

        for action in self.timeline.take_due(self.elapsed) {
            self.apply(action, stage);
        }

        self.step_particles(dt);

        if self.phase == Phase::Gathering && !self.revealed {
            self.check_convergence();
        }

        self.apply_fades(stage, dt);
    }

    /// Draw the current frame onto `surface`.
    pub fn render(&self, surface: &mut dyn Surface) {
        if self.phase == Phase::Cancelled {
            return;
        }
        surface.clear(self.backdrop);
        if self.phase == Phase::Idle {
            return;
        }
        for p in &self.particles {
            let color = hsv_to_rgb(p.hue, 0.85, 1.0);
            let alpha = p.fade();
            surface.draw_glow(
                p.position,
                p.size * self.visuals.halo_scale,
                color,
                alpha * self.visuals.halo_alpha,
            );
            surface.draw_glow(p.position, p.size, color, alpha);
        }
        let glyph_color = hsv_to_rgb(self.visuals.hue, 0.7, 1.0);
        for (i, t) in self.targets.iter().enumerate() {
            let alpha = self.glyph_alpha.get(i).copied().unwrap_or(0.0);
            if alpha <= 0.0 {
                continue;
            }
            let radius = if t.emphasis {
                self.visuals.glyph_glow * 1.6
            } else {
                self.visuals.glyph_glow
            };
            surface.draw_glow(
                t.position,
                radius,
                glyph_color,
                alpha * self.visuals.glyph_glow_alpha,
            );
        }
    }

    /// Track a viewport resize.
    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
        self.ctx.set_bounds(bounds);
    }

    /// Current playback state.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Live particles, for inspection.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Seconds since `start()`.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Whether the reveal has been triggered (by convergence or fallback).
    #[inline]
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Worst-case glow instances per frame, for sizing render buffers.
    pub fn instance_capacity(&self) -> u32 {
        const MAX_GLYPHS: usize = 64;
        ((self.burst.max(MAX_GLYPHS * self.coverage) + MAX_GLYPHS) * 2) as u32
    }

    fn apply(&mut self, action: Action, stage: &mut dyn Stage) {
        match action {
            Action::Scatter => self.scatter(stage),
            Action::Gather => self.gather(stage),
            Action::Finalize => self.finalize(stage),
            Action::Settle => {
                self.backdrop_goal = 0.0;
                log::debug!("settle at {:.2}s", self.elapsed);
            }
            Action::Secondary => {
                self.secondary_at = Some(self.elapsed);
            }
            Action::Purge => {
                self.particles.clear();
            }
        }
    }

    /// Burst into particles at the centroid of the current targets and
    /// start hiding the source display.
    fn scatter(&mut self, stage: &mut dyn Stage) {
        if self.phase != Phase::Displayed {
            return;
        }
        self.phase = Phase::Scattering;
        self.scatter_at = self.elapsed;
        self.backdrop_goal = self.visuals.dim_level;

        let targets = stage.targets();
        self.origin = centroid(&targets).unwrap_or(self.bounds * 0.5);

        let physics = self.physics.clone();
        let visuals = self.visuals.clone();
        for _ in 0..self.burst {
            let position = self.ctx.jittered(self.origin, physics.target_jitter);
            let velocity = self.ctx.burst_velocity(&physics.scatter_speed);
            let life = self.ctx.range(&physics.lifetime);
            let size = self.ctx.range(&visuals.core_size);
            let hue = self.ctx.hue(visuals.hue, visuals.hue_spread);
            self.particles
                .push(Particle::scatter(position, velocity, life, size, hue));
        }
        log::debug!(
            "scatter: {} particles from ({:.0}, {:.0})",
            self.burst,
            self.origin.x,
            self.origin.y
        );
    }

    /// Re-query targets, retask surviving particles, and top up from the
    /// edges so every target has coverage.
    fn gather(&mut self, stage: &mut dyn Stage) {
        if !matches!(self.phase, Phase::Displayed | Phase::Scattering) {
            return;
        }
        self.phase = Phase::Gathering;

        let targets = stage.targets();
        if targets.is_empty() {
            log::warn!("gather with no targets; relying on fallback finalize");
            self.targets.clear();
            self.glyph_alpha.clear();
            self.gather_assigned = 0;
            self.gather_arrived = 0;
            return;
        }

        let physics = self.physics.clone();
        let visuals = self.visuals.clone();
        let n = targets.len();

        for (i, p) in self.particles.iter_mut().enumerate() {
            let t = &targets[i % n];
            let dest = self.ctx.jittered(t.position, physics.target_jitter);
            p.retask(dest, t.emphasis);
            p.life = self.ctx.range(&physics.lifetime);
        }

        let need = n * self.coverage;
        let mut i = self.particles.len();
        while self.particles.len() < need {
            let t = &targets[i % n];
            let position = self.ctx.edge_position();
            let dest = self.ctx.jittered(t.position, physics.target_jitter);
            let life = self.ctx.range(&physics.lifetime);
            let size = self.ctx.range(&visuals.core_size);
            let hue = self.ctx.hue(visuals.hue, visuals.hue_spread);
            self.particles
                .push(Particle::gather(position, dest, life, size, hue, t.emphasis));
            i += 1;
        }

        self.gather_assigned = self.particles.len();
        self.gather_arrived = 0;
        self.glyph_alpha = vec![0.0; n];
        self.targets = targets;
        log::debug!(
            "gather: {} particles onto {} targets",
            self.gather_assigned,
            n
        );
    }

    /// The safety net: force the fully revealed state and purge particles,
    /// regardless of what convergence did.
    fn finalize(&mut self, stage: &mut dyn Stage) {
        if self.revealed && self.reveal_done {
            self.particles.clear();
            return;
        }
        if !self.revealed {
            log::debug!("fallback finalize at {:.2}s", self.elapsed);
        }
        let targets = stage.targets();
        stage.set_source_opacity(0.0);
        for t in &targets {
            stage.set_glyph_opacity(t.glyph, 1.0);
        }
        self.glyph_alpha = vec![1.0; targets.len()];
        self.targets = targets;
        self.source_opacity = 0.0;
        self.revealed = true;
        self.reveal_done = true;
        self.particles.clear();
        self.phase = Phase::Revealed;
    }

    /// Reveal exactly once; residual particles are purged shortly after.
    fn trigger_reveal(&mut self) {
        if self.revealed {
            return;
        }
        self.revealed = true;
        self.reveal_at = self.elapsed;
        self.phase = Phase::Revealed;
        self.timeline.push(self.elapsed + self.purge_delay, Action::Purge);
        log::debug!("convergence reveal at {:.2}s", self.elapsed);
    }

    fn step_particles(&mut self, dt: f32) {
        let physics = &self.physics;
        let bounds = self.bounds;
        let mut arrived = 0usize;
        self.particles.retain_mut(|p| {
            physics.step(p, dt);
            if !p.is_finite() {
                // fault isolation: drop the bad particle, keep the frame
                return false;
            }
            if p.expired() && !p.priority {
                return false;
            }
            match p.mode {
                Mode::Scatter => {
                    p.position.x >= -OFFSCREEN_MARGIN
                        && p.position.x <= bounds.x + OFFSCREEN_MARGIN
                        && p.position.y >= -OFFSCREEN_MARGIN
                        && p.position.y <= bounds.y + OFFSCREEN_MARGIN
                }
                Mode::Gather => {
                    if physics.arrived(p) {
                        arrived += 1;
                        return false;
                    }
                    true
                }
            }
        });
        self.gather_arrived += arrived;
    }

    /// Majority-of-arrivals heuristic; the thresholds are defaults, not a
    /// contract. `Finalize` is the guarantee.
    fn check_convergence(&mut self) {
        if self.gather_assigned == 0 {
            return;
        }
        let fraction = self.gather_arrived as f32 / self.gather_assigned as f32;
        if fraction >= self.physics.converge_fraction {
            self.trigger_reveal();
        }
    }

    fn apply_fades(&mut self, stage: &mut dyn Stage, dt: f32) {
        // source display dissolves while particles scatter
        if matches!(self.phase, Phase::Scattering | Phase::Gathering) && self.source_opacity > 0.0 {
            let t = (self.elapsed - self.scatter_at) / self.visuals.source_fade.max(1e-3);
            self.source_opacity = (1.0 - t).clamp(0.0, 1.0);
            stage.set_source_opacity(smooth(self.source_opacity));
        }

        // glyphs fade in, staggered, once the reveal has triggered
        if self.revealed && !self.reveal_done {
            let mut done = true;
            for (i, t) in self.targets.iter().enumerate() {
                let delay = t.glyph as f32 * self.visuals.glyph_stagger;
                let progress = ((self.elapsed - self.reveal_at - delay)
                    / self.visuals.reveal_fade.max(1e-3))
                .clamp(0.0, 1.0);
                self.glyph_alpha[i] = progress;
                stage.set_glyph_opacity(t.glyph, smooth(progress));
                if progress < 1.0 {
                    done = false;
                }
            }
            self.reveal_done = done;
        }

        // secondary content fades in after its timeline entry
        if let Some(at) = self.secondary_at {
            if self.secondary_opacity < 1.0 {
                let progress =
                    ((self.elapsed - at) / self.visuals.secondary_fade.max(1e-3)).clamp(0.0, 1.0);
                self.secondary_opacity = progress;
                stage.set_secondary_opacity(smooth(progress));
            }
        }

        // backdrop eases toward its goal
        if (self.backdrop - self.backdrop_goal).abs() > 1e-3 {
            let k = 1.0 - (-self.visuals.backdrop_rate * dt).exp();
            self.backdrop += (self.backdrop_goal - self.backdrop) * k;
            stage.set_backdrop(self.backdrop);
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn centroid(targets: &[Target]) -> Option<Vec2> {
    if targets.is_empty() {
        return None;
    }
    let sum: Vec2 = targets.iter().map(|t| t.position).sum();
    Some(sum / targets.len() as f32)
}
