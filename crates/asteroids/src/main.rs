//! Headless Asteroids demo
//!
//! Runs a scripted round without a window: the ship spins, fires
//! continuously and thrusts in bursts. Pass a TOML or RON config path as the
//! first argument to override the defaults.

use std::path::PathBuf;

use asteroids::prelude::*;
use rust_engine::foundation::logging::{self, LevelFilter};
use rust_engine::foundation::math::{utils, Vec2};
use rust_engine::foundation::time::Stopwatch;

const DEMO_SEED: u64 = 0x5EED;
const DEMO_SECONDS: u32 = 180;

/// Presentation that writes everything to the log
#[derive(Debug, Default)]
struct LogPresentation {
    last_score: u32,
}

impl Presentation for LogPresentation {
    fn play_sound(&mut self, cue: SoundCue) {
        log::debug!("Sound: {:?}", cue);
    }

    fn set_score_display(&mut self, score: u32) {
        if score / 1000 != self.last_score / 1000 {
            log::info!("Score passed {}", score / 1000 * 1000);
        }
        self.last_score = score;
    }

    fn set_life_display(&mut self, life: u32) {
        log::info!("Lives: {}", life);
    }

    fn show_game_over_screen(&mut self, final_score: u32) {
        log::info!("=== GAME OVER === final score {}", final_score);
    }

    fn set_indestructible_display(&mut self, indestructible: bool) {
        log::debug!("Ship shield {}", if indestructible { "up" } else { "down" });
    }
}

fn load_config() -> Result<GameConfig, GameError> {
    let mut config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    config.session.rng_seed.get_or_insert(DEMO_SEED);
    Ok(config)
}

fn scripted_input(tick: u64, dt: f32) -> PlayerInput {
    #[allow(clippy::cast_possible_truncation)]
    let seconds = (tick as f64 * f64::from(dt)) as f32;
    PlayerInput {
        thrust: (seconds % 4.0) < 0.5,
        aim: Some(utils::direction_from_angle(seconds * 1.5) * 100.0),
        fire: true,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(LevelFilter::Info);

    log::info!("Starting headless Asteroids demo");

    let config = load_config()?;
    let dt = config.session.fixed_timestep;
    let ticks = (DEMO_SECONDS as f32 / dt).round() as u64;

    let context = GameContext::builder(config)
        .presentation(LogPresentation::default())
        .build()?;
    let mut game = Game::new(context);
    game.start()?;

    let wall_clock = Stopwatch::start_new();
    let mut fired = 0;
    for tick in 0..ticks {
        let report = game.step(&scripted_input(tick, dt));
        fired += report.missiles_fired;

        if game.context().session().phase() == SessionPhase::GameOver {
            break;
        }
    }

    let ctx = game.context_mut();
    let player = ctx
        .entity(ctx.player_id())
        .map_or(Vec2::zeros(), |p| p.position);
    log::info!(
        "Demo finished at t={:.1}s ({:.0} ms wall): score {}, {} missiles fired, {} pooled entities, ship at ({:.0}, {:.0})",
        ctx.now(),
        wall_clock.elapsed_millis(),
        ctx.session().score(),
        fired,
        ctx.pool().len(),
        player.x,
        player.y
    );

    if ctx.session().phase() == SessionPhase::GameOver && ctx.final_score_qualifies() {
        ctx.submit_highscore("DEMO");
        log::info!("Demo score entered the highscore board");
    }

    Ok(())
}
