//! Spawn context for particle bursts.
//!
//! Wraps the RNG and the current surface bounds behind helpers for the two
//! spawn patterns the engine uses: outward burst velocities at a scatter
//! origin, and off-screen edge positions for gather top-up. Seed the context
//! for reproducible playbacks in tests.

use glam::{Vec2, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use std::ops::Range;

/// How far outside the visible bounds edge spawns appear, px.
const EDGE_INSET: f32 = 24.0;

/// RNG and bounds for spawning particles.
#[derive(Clone, Debug)]
pub struct SpawnContext {
    bounds: Vec2,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context for a surface of the given size.
    ///
    /// With `seed: None` the RNG is seeded from the wall clock, so every
    /// playback looks a little different; pass a seed for deterministic runs.
    pub fn new(bounds: Vec2, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });
        Self {
            bounds,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Track a viewport resize.
    pub fn set_bounds(&mut self, bounds: Vec2) {
        self.bounds = bounds;
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in the given range; degenerate ranges yield the start.
    #[inline]
    pub fn range(&mut self, range: &Range<f32>) -> f32 {
        if range.end <= range.start {
            return range.start;
        }
        self.rng.gen_range(range.start..range.end)
    }

    /// Random outward velocity for a scatter burst: uniform direction,
    /// speed drawn from `speed`.
    pub fn burst_velocity(&mut self, speed: &Range<f32>) -> Vec2 {
        let angle = self.rng.gen_range(0.0..TAU);
        Vec2::new(angle.cos(), angle.sin()) * self.range(speed)
    }

    /// Random position just outside one of the four surface edges.
    pub fn edge_position(&mut self) -> Vec2 {
        let (w, h) = (self.bounds.x, self.bounds.y);
        match self.rng.gen_range(0..4u32) {
            0 => Vec2::new(self.rng.gen_range(0.0..w.max(1.0)), -EDGE_INSET),
            1 => Vec2::new(self.rng.gen_range(0.0..w.max(1.0)), h + EDGE_INSET),
            2 => Vec2::new(-EDGE_INSET, self.rng.gen_range(0.0..h.max(1.0))),
            _ => Vec2::new(w + EDGE_INSET, self.rng.gen_range(0.0..h.max(1.0))),
        }
    }

    /// `point` displaced by a uniform offset within `jitter` on each axis.
    pub fn jittered(&mut self, point: Vec2, jitter: f32) -> Vec2 {
        if jitter <= 0.0 {
            return point;
        }
        point
            + Vec2::new(
                self.rng.gen_range(-jitter..jitter),
                self.rng.gen_range(-jitter..jitter),
            )
    }

    /// Hue near `base`, spread by up to `±spread`, wrapped into `0..1`.
    pub fn hue(&mut self, base: f32, spread: f32) -> f32 {
        let h = if spread > 0.0 {
            base + self.rng.gen_range(-spread..spread)
        } else {
            base
        };
        h.rem_euclid(1.0)
    }
}

/// Convert HSV to RGB.
///
/// * `h` - 0.0 to 1.0 (wraps: red → yellow → green → cyan → blue → magenta → red)
/// * `s` - 0.0 (gray) to 1.0 (vivid)
/// * `v` - 0.0 (black) to 1.0 (bright)
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}
