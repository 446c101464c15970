//! Session states and their transition table

use serde::{Deserialize, Serialize};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Ball at rest, "tap to play" shown
    WaitingForTap,
    /// Active gameplay
    Playing,
    /// Level cleared, waiting for a tap to load the next one
    LevelOver,
    /// Run ended (won or lost)
    GameOver,
}

impl SessionState {
    pub const ALL: [SessionState; 4] = [
        SessionState::WaitingForTap,
        SessionState::Playing,
        SessionState::LevelOver,
        SessionState::GameOver,
    ];

    /// States this one may hand over to
    ///
    /// LevelOver and GameOver are terminal for a session; play resumes in a
    /// fresh session built by the host.
    pub fn valid_next_states(self) -> &'static [SessionState] {
        match self {
            SessionState::WaitingForTap => &[SessionState::Playing],
            SessionState::Playing => &[SessionState::LevelOver, SessionState::GameOver],
            SessionState::LevelOver | SessionState::GameOver => &[],
        }
    }

    pub fn is_valid_next_state(self, next: SessionState) -> bool {
        self.valid_next_states().contains(&next)
    }

    /// Whether the per-tick hook does any work
    pub fn runs_tick(self) -> bool {
        self == SessionState::Playing
    }

    /// Whether contacts have gameplay meaning
    pub fn accepts_contacts(self) -> bool {
        self == SessionState::Playing
    }

    pub fn name(self) -> &'static str {
        match self {
            SessionState::WaitingForTap => "WaitingForTap",
            SessionState::Playing => "Playing",
            SessionState::LevelOver => "LevelOver",
            SessionState::GameOver => "GameOver",
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    pub fn is_won(self) -> bool {
        self == Outcome::Won
    }
}
