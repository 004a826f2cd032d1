//! Reduced-motion path: the stage reports a reduced-motion preference, so
//! the engine reveals everything immediately and never spawns a particle.
//! Run with: cargo run --example no_motion

use prve::prelude::*;

fn main() {
    env_logger::init();

    let stage = LineStage::from_text("CALM", Vec2::new(640.0, 320.0), 400.0)
        .with_reduced_motion(true);

    if let Err(e) = prve::window::run(Engine::new(), stage, "reveal: reduced motion") {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
