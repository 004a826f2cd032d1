//! Drawing surface abstraction.
//!
//! The engine draws through this trait and never touches a backend
//! directly. The windowed backend in [`window`](crate::window) implements
//! it on top of an instanced glow pipeline; tests use [`NullSurface`] or
//! their own recording implementations.

use glam::{Vec2, Vec3};

/// A 2D raster surface the engine renders glows onto.
pub trait Surface {
    /// Current surface size in pixels.
    fn size(&self) -> Vec2;

    /// Track a viewport resize for the remainder of the animation.
    fn resize(&mut self, size: Vec2);

    /// Begin a frame: drop last frame's draws and darken the backdrop by
    /// `dim` (0 = normal, 1 = black).
    fn clear(&mut self, dim: f32);

    /// Draw one soft circular glow: a radial falloff from `color` at the
    /// center to transparent at `radius`.
    fn draw_glow(&mut self, position: Vec2, radius: f32, color: Vec3, alpha: f32);
}

/// Surface that discards every draw. For headless playbacks and benches.
#[derive(Clone, Debug)]
pub struct NullSurface {
    size: Vec2,
}

impl NullSurface {
    pub fn new(size: Vec2) -> Self {
        Self { size }
    }
}

impl Surface for NullSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    fn clear(&mut self, _dim: f32) {}

    fn draw_glow(&mut self, _position: Vec2, _radius: f32, _color: Vec3, _alpha: f32) {}
}
