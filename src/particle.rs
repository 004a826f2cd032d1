//! Particle state and lifetime bookkeeping.
//!
//! A [`Particle`] is one glowing dot of the reveal animation. Particles are
//! spawned in bursts, stepped once per frame by [`Physics`](crate::Physics),
//! and removed when their lifetime budget runs out, when they leave the
//! visible bounds (scatter) or when they merge into their target (gather).
//! No particle outlives a single playback.

use glam::Vec2;

/// Behavior mode of a live particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Flying outward from the burst origin under gravity and drag.
    Scatter,
    /// Steering toward an assigned target position.
    Gather,
}

/// A single glowing dot.
///
/// Positions and velocities are in surface pixels (y grows downward), ages
/// and lifetimes in seconds, hue in `0..1` HSV space.
#[derive(Clone, Debug)]
pub struct Particle {
    /// Position in pixels.
    pub position: Vec2,
    /// Velocity in pixels per second.
    pub velocity: Vec2,
    /// Seconds since spawn (or since the last retask).
    pub age: f32,
    /// Lifetime budget in seconds.
    pub life: f32,
    /// Core radius in pixels.
    pub size: f32,
    /// Hue in `0..1`.
    pub hue: f32,
    /// Current behavior mode.
    pub mode: Mode,
    /// Gather destination, set when the particle is tasked.
    pub target: Option<Vec2>,
    /// Dedicated to an emphasized glyph. Priority particles are exempt from
    /// age-based removal so the glyph they rebuild always gets coverage.
    pub priority: bool,
}

impl Particle {
    /// Create a scatter-mode particle at `position` with an outward velocity.
    pub fn scatter(position: Vec2, velocity: Vec2, life: f32, size: f32, hue: f32) -> Self {
        Self {
            position,
            velocity,
            age: 0.0,
            life,
            size,
            hue,
            mode: Mode::Scatter,
            target: None,
            priority: false,
        }
    }

    /// Create a gather-mode particle at `position` headed for `target`.
    pub fn gather(position: Vec2, target: Vec2, life: f32, size: f32, hue: f32, priority: bool) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            age: 0.0,
            life,
            size,
            hue,
            mode: Mode::Gather,
            target: Some(target),
            priority,
        }
    }

    /// Convert an existing particle to gather mode with a fresh age budget.
    pub fn retask(&mut self, target: Vec2, priority: bool) {
        self.mode = Mode::Gather;
        self.target = Some(target);
        self.age = 0.0;
        self.priority = priority;
    }

    /// Whether the lifetime budget has been spent.
    #[inline]
    pub fn expired(&self) -> bool {
        self.age >= self.life
    }

    /// Whether position and velocity are still finite numbers.
    ///
    /// A particle that went non-finite is removed without disturbing the
    /// rest of the frame.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Opacity factor derived from remaining lifetime (1 at birth, 0 at death).
    #[inline]
    pub fn fade(&self) -> f32 {
        if self.life <= f32::EPSILON {
            return 0.0;
        }
        (1.0 - self.age / self.life).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_at_life() {
        let mut p = Particle::scatter(Vec2::ZERO, Vec2::ZERO, 1.0, 2.0, 0.5);
        assert!(!p.expired());
        p.age = 1.0;
        assert!(p.expired());
        p.age = 1.5;
        assert!(p.expired());
    }

    #[test]
    fn test_retask_resets_age() {
        let mut p = Particle::scatter(Vec2::new(10.0, 10.0), Vec2::new(5.0, 0.0), 2.0, 2.0, 0.5);
        p.age = 1.7;
        p.retask(Vec2::new(100.0, 40.0), true);
        assert_eq!(p.mode, Mode::Gather);
        assert_eq!(p.age, 0.0);
        assert!(p.priority);
        assert_eq!(p.target, Some(Vec2::new(100.0, 40.0)));
        // retask keeps momentum and appearance
        assert_eq!(p.velocity, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_fade_spans_lifetime() {
        let mut p = Particle::scatter(Vec2::ZERO, Vec2::ZERO, 2.0, 2.0, 0.5);
        assert_eq!(p.fade(), 1.0);
        p.age = 1.0;
        assert!((p.fade() - 0.5).abs() < 1e-6);
        p.age = 3.0;
        assert_eq!(p.fade(), 0.0);
    }

    #[test]
    fn test_non_finite_detected() {
        let mut p = Particle::scatter(Vec2::ZERO, Vec2::ZERO, 1.0, 2.0, 0.5);
        assert!(p.is_finite());
        p.position.x = f32::NAN;
        assert!(!p.is_finite());
    }
}
