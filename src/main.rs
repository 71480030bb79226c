//! Circle Escape headless runner
//!
//! Runs a session at a fixed step with autopilot input and reports what
//! happened. Rendering and keyboard handling belong to a front end.

use std::path::Path;

use circle_escape::Settings;
use circle_escape::sim::{GameState, TickInput};

fn main() {
    env_logger::init();
    log::info!("Circle Escape (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path)),
        None => Settings::default(),
    };

    let seed = settings.seed.unwrap_or_else(rand::random);
    let mut state = GameState::new(seed, settings.arena());
    state.start();

    let input = TickInput {
        idle_mode: settings.idle_mode,
        ..Default::default()
    };
    let dt = settings.tick_dt();
    let ticks_per_second = settings.ticks_per_second as u64;

    for tick_index in 1..=settings.total_ticks() {
        let Some(report) = state.advance(&input, dt) else {
            break;
        };
        if tick_index % ticks_per_second == 0 {
            log::info!(
                "t={:.0}s balls={} score={} rotation={:.2}",
                state.elapsed_secs,
                report.live,
                state.score,
                state.rotation
            );
        }
    }

    println!(
        "Finished: {:.1}s simulated, {} escapes, {} balls live",
        state.elapsed_secs,
        state.score,
        state.balls.len()
    );

    if settings.dump_snapshot {
        match serde_json::to_string_pretty(&state.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Could not serialize snapshot: {e}"),
        }
    }

    state.end();
}
