//! Bamboo Breakout entry point
//!
//! Runs a headless session with an autopilot on the paddle and logs what
//! happens. Set `RUST_LOG=debug` to see contacts and regulator nudges.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use bamboo_breakout::consts::SIM_DT;
    use bamboo_breakout::level::{BuiltinSource, DirectorySource, LevelSource};
    use bamboo_breakout::sim::{EffectCommand, EffectLog, Intent, PhysicsWorld, SessionState};
    use bamboo_breakout::{Game, LevelLoadError, Settings};
    use glam::Vec2;

    const SETTINGS_PATH: &str = "bamboo-breakout.json";
    /// Simulated wall time before the demo gives up
    const DEMO_SECS: f32 = 600.0;
    /// Largest paddle move per frame, in points
    const AUTOPILOT_MAX_STEP: f32 = 24.0;

    pub fn run() -> Result<(), LevelLoadError> {
        let settings = Settings::load(SETTINGS_PATH);
        match settings.levels_dir.clone() {
            Some(dir) => {
                log::info!("Reading levels from {}", dir.display());
                play(settings, DirectorySource::new(dir))
            }
            None => {
                let total = settings.total_levels;
                play(settings, BuiltinSource::new(total))
            }
        }
    }

    fn play<S: LevelSource>(settings: Settings, source: S) -> Result<(), LevelLoadError> {
        let mut game = Game::new(settings, source, EffectLog::new())?;
        let mut clock = 0.0;

        while clock < DEMO_SECS {
            autopilot(&mut game);
            game.frame(SIM_DT);
            clock += SIM_DT;

            for command in game.effects_mut().drain() {
                match command {
                    EffectCommand::Sound(sound) => log::debug!("Sound: {}", sound.asset_name()),
                    EffectCommand::Alert { title, message } => {
                        log::warn!("Alert: {} - {}", title, message)
                    }
                    EffectCommand::Prompt(prompt) => log::info!("Prompt: {}", prompt.text()),
                    other => log::trace!("{:?}", other),
                }
            }

            let session = game.session();
            if session.current_state() == SessionState::GameOver && !game.is_loading() {
                log::info!(
                    "Run finished after {:.1}s: {:?} on the scene before level {}",
                    clock,
                    session.outcome(),
                    session.level().next_level
                );
                return Ok(());
            }
        }

        log::info!("Demo time limit reached");
        Ok(())
    }

    /// Tap through prompts and keep the paddle under the ball
    fn autopilot<E, S>(game: &mut Game<E, S>)
    where
        E: bamboo_breakout::sim::Effects,
        S: LevelSource,
    {
        let session = game.session();
        match session.current_state() {
            SessionState::WaitingForTap => game.input(Intent::Tap { at: Vec2::ZERO }),
            SessionState::LevelOver if !game.is_loading() => {
                game.input(Intent::Tap { at: Vec2::ZERO })
            }
            SessionState::Playing => {
                let world = session.world();
                let nodes = session.nodes();
                let (Some(ball), Some(paddle)) =
                    (world.position(nodes.ball), world.position(nodes.paddle))
                else {
                    return;
                };
                let dx = (ball.x - paddle.x).clamp(-AUTOPILOT_MAX_STEP, AUTOPILOT_MAX_STEP);
                game.input(Intent::Drag {
                    delta: Vec2::new(dx, 0.0),
                });
            }
            _ => {}
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bamboo Breakout (headless) starting...");

    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library is driven by an embedding page
}
