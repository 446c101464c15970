//! Bamboo Breakout - a single-screen brick breaker session core
//!
//! Core modules:
//! - `sim`: Session state machine, contact rules, velocity regulation, progress
//! - `level`: Level layouts and the asynchronous level loader
//! - `game`: Host frame loop that owns the session and swaps scenes
//! - `settings`: Data-driven tuning and configuration

pub mod audio;
pub mod error;
pub mod game;
pub mod level;
pub mod settings;
pub mod sim;

pub use audio::SoundEffect;
pub use error::{LevelLoadError, SceneError};
pub use game::Game;
pub use settings::{RegulatorSettings, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the display link)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Axis speed at or below which the ball counts as stalled on that axis
    pub const STALL_SPEED: f32 = 10.0;
    /// Impulse applied along a stalled axis
    pub const STALL_IMPULSE: f32 = 3.0;
    /// Speed above which drag kicks in
    pub const BALL_MAX_SPEED: f32 = 400.0;
    /// Linear damping applied while the ball is over the max speed
    pub const OVERSPEED_DAMPING: f32 = 0.4;

    /// Number of levels in a full run
    pub const TOTAL_LEVELS: u32 = 6;
    /// `next_level` carried by the first scene of a run
    pub const FIRST_NEXT_LEVEL: u32 = 2;

    /// Game message reveal duration (seconds)
    pub const MESSAGE_REVEAL_SECS: f32 = 0.25;
    /// Game message hide duration (seconds)
    pub const MESSAGE_HIDE_SECS: f32 = 0.4;
    /// Lifetime of the block break emitter (seconds)
    pub const BREAK_EMITTER_SECS: f32 = 1.0;
    /// Scene flip transition duration (seconds)
    pub const SCENE_FLIP_SECS: f32 = 0.5;
}
