//! Standard title reveal.
//!
//! Pass a title as the first argument to change the text.
//! Run with: cargo run --example title_reveal

use prve::prelude::*;

fn main() {
    env_logger::init();

    let title = std::env::args().nth(1).unwrap_or_else(|| "RADIANCE".to_string());
    let stage = LineStage::from_text(&title, Vec2::new(640.0, 320.0), 700.0);

    let engine = Engine::new()
        .with_burst(180)
        .with_coverage(8)
        .with_visuals(Visuals {
            hue: 0.52,
            glyph_glow: 30.0,
            ..Visuals::default()
        });

    if let Err(e) = prve::window::run(engine, stage, &format!("reveal: {title}")) {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
