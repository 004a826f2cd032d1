//! # PRVE - Particle Reveal Engine
//!
//! CPU particle physics driving a timed dissolve-and-reconstruct reveal:
//! content bursts into glowing particles, the particles scatter under
//! gravity, then steer back onto the content's glyph positions until the
//! reconstruction is close enough to swap in the real thing.
//!
//! ## Quick Start
//!
//! ```ignore
//! use prve::prelude::*;
//!
//! fn main() {
//!     let stage = LineStage::from_text("RADIANCE", Vec2::new(640.0, 320.0), 700.0);
//!     let engine = Engine::new()
//!         .with_burst(160)
//!         .with_physics(Physics {
//!             gravity: 300.0,
//!             ..Physics::default()
//!         });
//!     prve::window::run(engine, stage, "reveal").unwrap();
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Playback
//!
//! An [`Engine`] owns one playback: the particle set, the phase
//! [`Timeline`], and all fade state. The host calls
//! [`start`](Engine::start) once, then [`advance`](Engine::advance) and
//! [`render`](Engine::render) every frame. [`stop`](Engine::stop) cancels
//! everything; nothing mutates after it returns.
//!
//! ### Phases
//!
//! | Phase | Meaning |
//! |-------|---------|
//! | [`Phase::Displayed`] | Source content on display |
//! | [`Phase::Scattering`] | Burst particles falling under gravity |
//! | [`Phase::Gathering`] | Particles steering onto glyph targets |
//! | [`Phase::Revealed`] | Content visible (terminal) |
//! | [`Phase::Cancelled`] | Stopped via [`Engine::stop`] |
//!
//! The timeline's `Finalize` entry forces `Revealed` by its deadline even
//! if convergence never triggers, so the animation cannot stall. A stage that
//! prefers reduced motion skips straight to `Revealed` with no particles.
//!
//! ### Host integration
//!
//! The engine only touches the host through two traits: [`Surface`] (where
//! glows are drawn) and [`Stage`] (where glyph targets live and opacity is
//! mutated). The built-in [`window`] backend implements [`Surface`] on a
//! wgpu instanced pipeline; [`NullSurface`] and [`LineStage`] cover
//! headless runs and tests.

mod engine;
pub mod error;
mod particle;
mod physics;
mod shader;
pub mod spawn;
mod stage;
mod surface;
pub mod time;
mod timeline;
mod visuals;
pub mod window;

pub use engine::{Engine, Phase};
pub use glam::{Vec2, Vec3};
pub use particle::{Mode, Particle};
pub use physics::Physics;
pub use stage::{LineStage, Stage, Target};
pub use surface::{NullSurface, Surface};
pub use timeline::{Action, Timeline};
pub use visuals::Visuals;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use prve::prelude::*;
/// ```
pub mod prelude {
    pub use crate::engine::{Engine, Phase};
    pub use crate::physics::Physics;
    pub use crate::spawn::SpawnContext;
    pub use crate::stage::{LineStage, Stage, Target};
    pub use crate::surface::{NullSurface, Surface};
    pub use crate::time::Time;
    pub use crate::timeline::{Action, Timeline};
    pub use crate::visuals::Visuals;
    pub use crate::{Vec2, Vec3};
}
