//! Game settings
//!
//! Read from a JSON file next to the binary. Missing fields take defaults.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::consts::{BALL_MAX_SPEED, OVERSPEED_DAMPING, STALL_IMPULSE, STALL_SPEED, TOTAL_LEVELS};

/// Ball speed regulation tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulatorSettings {
    /// Axis speed at or below which the ball counts as stalled
    pub stall_speed: f32,
    /// Impulse magnitude for stall correction and launch
    pub stall_impulse: f32,
    /// Speed above which damping kicks in
    pub max_speed: f32,
    /// Linear damping while over `max_speed`
    pub damping: f32,
}

impl Default for RegulatorSettings {
    fn default() -> Self {
        Self {
            stall_speed: STALL_SPEED,
            stall_impulse: STALL_IMPULSE,
            max_speed: BALL_MAX_SPEED,
            damping: OVERSPEED_DAMPING,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of levels in the game
    pub total_levels: u32,
    /// RNG seed; derived from the clock when absent
    pub seed: Option<u64>,
    /// Directory holding `level{n}.json`; built-in levels when absent
    pub levels_dir: Option<PathBuf>,
    pub regulator: RegulatorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_levels: TOTAL_LEVELS,
            seed: None,
            levels_dir: None,
            regulator: RegulatorSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Configured seed, or one taken from the clock
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }
}
