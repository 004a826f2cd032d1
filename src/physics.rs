//! Physics parameters and the per-tick integration step.
//!
//! All heuristics are named fields on [`Physics`] rather than literals in
//! the step code, so edge configurations (zero gravity, huge drag) can be
//! exercised deterministically.
//!
//! # Example
//!
//! ```ignore
//! let physics = Physics {
//!     gravity: 0.0,   // feather fall
//!     drag: 12.0,
//!     ..Physics::default()
//! };
//! Engine::new().with_physics(physics);
//! ```

use crate::particle::{Mode, Particle};
use std::ops::Range;

/// Tunable physics parameters for both particle modes.
///
/// Units: pixels, seconds. The y axis grows downward, so a positive
/// `gravity` pulls particles toward the bottom of the surface.
#[derive(Clone, Debug)]
pub struct Physics {
    /// Downward acceleration applied in scatter mode, px/s².
    pub gravity: f32,
    /// Exponential velocity damping coefficient, 1/s.
    pub drag: f32,
    /// Steering gain for gather mode. The acceleration toward the target is
    /// `steer_gain / distance`, so the pull strengthens as a particle closes
    /// in, up to `max_steer`.
    pub steer_gain: f32,
    /// Clamp on the steering acceleration, px/s².
    pub max_steer: f32,
    /// Inside this distance of the target, `arrive_drag` replaces `drag` so
    /// particles settle instead of orbiting.
    pub arrive_radius: f32,
    /// Damping coefficient near the target, 1/s.
    pub arrive_drag: f32,
    /// A gather particle within this distance of its target counts as
    /// arrived and is merged.
    pub converge_distance: f32,
    /// Fraction of assigned particles that must arrive before the reveal is
    /// considered visually complete.
    pub converge_fraction: f32,
    /// Random offset applied to each assigned target, px.
    pub target_jitter: f32,
    /// Lifetime budget range, seconds.
    pub lifetime: Range<f32>,
    /// Outward speed range for scatter bursts, px/s.
    pub scatter_speed: Range<f32>,
    /// Upper clamp on the per-frame delta, seconds. A stalled frame loop
    /// resumes with one bounded step instead of a teleport.
    pub max_delta: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            gravity: 420.0,
            drag: 1.6,
            steer_gain: 420_000.0,
            max_steer: 4200.0,
            arrive_radius: 70.0,
            arrive_drag: 7.0,
            converge_distance: 14.0,
            converge_fraction: 0.6,
            target_jitter: 9.0,
            lifetime: 1.4..2.6,
            scatter_speed: 80.0..380.0,
            max_delta: 0.05,
        }
    }
}

impl Physics {
    /// Advance one particle by `dt` seconds: age it, apply the acceleration
    /// for its mode, damp, and integrate position.
    pub fn step(&self, p: &mut Particle, dt: f32) {
        p.age += dt;
        match p.mode {
            Mode::Scatter => {
                p.velocity.y += self.gravity * dt;
                p.velocity *= (-self.drag * dt).exp();
            }
            Mode::Gather => {
                if let Some(target) = p.target {
                    let to_target = target - p.position;
                    let dist = to_target.length();
                    if dist > f32::EPSILON {
                        let accel = (self.steer_gain / dist).min(self.max_steer);
                        p.velocity += to_target / dist * accel * dt;
                    }
                    let drag = if dist < self.arrive_radius {
                        self.arrive_drag
                    } else {
                        self.drag
                    };
                    p.velocity *= (-drag * dt).exp();
                }
            }
        }
        p.position += p.velocity * dt;
    }

    /// Whether a gather particle is close enough to its target to merge.
    #[inline]
    pub fn arrived(&self, p: &Particle) -> bool {
        match p.target {
            Some(target) => p.position.distance(target) <= self.converge_distance,
            None => false,
        }
    }
}
