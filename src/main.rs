use prve::prelude::*;

fn main() {
    env_logger::init();

    let stage = LineStage::from_text("RADIANCE", Vec2::new(640.0, 320.0), 700.0);
    let engine = Engine::new();

    if let Err(e) = prve::window::run(engine, stage, "PRVE - Particle Reveal Engine") {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
