//! Edge-configuration demo: no gravity, heavy drag.
//!
//! Scatter particles hang in the air and drift to a stop before being
//! pulled onto their targets. Useful for eyeballing how the physics
//! parameters compose.
//! Run with: cargo run --example feather_fall

use prve::prelude::*;

fn main() {
    env_logger::init();

    let stage = LineStage::from_text("FEATHER", Vec2::new(640.0, 300.0), 620.0);

    let engine = Engine::new()
        .with_physics(Physics {
            gravity: 0.0,
            drag: 4.5,
            scatter_speed: 120.0..520.0,
            lifetime: 2.2..3.4,
            ..Physics::default()
        })
        .with_timeline(
            Timeline::new()
                .at(0.9, Action::Scatter)
                .at(3.0, Action::Gather)
                .at(6.5, Action::Finalize)
                .at(7.1, Action::Settle)
                .at(7.7, Action::Secondary),
        )
        .with_visuals(Visuals {
            hue: 0.78,
            hue_spread: 0.1,
            ..Visuals::default()
        });

    if let Err(e) = prve::window::run(engine, stage, "reveal: feather fall") {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
