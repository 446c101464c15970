//! Sound effects requested by the session
//!
//! Playback belongs to the host; the core only names what should be heard.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball hits the border
    Blip,
    /// Ball hits the paddle
    PaddleBlip,
    /// Block breaks
    BambooBreak,
    /// Final level cleared
    GameWon,
    /// Ball fell past the paddle
    GameOver,
}

impl SoundEffect {
    /// Asset name of the sound file (without extension)
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::Blip => "pongblip",
            SoundEffect::PaddleBlip => "paddleBlip",
            SoundEffect::BambooBreak => "BambooBreak",
            SoundEffect::GameWon => "game-won",
            SoundEffect::GameOver => "game-over",
        }
    }

    /// Game-over jingle for an outcome
    pub fn for_outcome(won: bool) -> Self {
        if won {
            SoundEffect::GameWon
        } else {
            SoundEffect::GameOver
        }
    }
}
