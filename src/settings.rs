//! Match configuration and preferences
//!
//! Persisted as JSON next to the executable. Everything the host can
//! configure about a match passes through `MatchConfig`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_MATCH_DURATION;
use crate::tuning::Tuning;

/// Configuration errors surfaced at the host boundary
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("player count must be 1 or 2, got {0}")]
    InvalidPlayerCount(u8),

    #[error("match duration must be a positive number of seconds, got {0}")]
    InvalidDuration(f32),

    #[error("tuning value `{field}` is out of range")]
    InvalidTuning { field: &'static str },
}

/// Device player 1 aims with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputDevice {
    /// Mouse or touch pointer; aim follows the cursor
    #[default]
    Pointer,
    /// Left stick aims, face buttons fire
    Gamepad,
}

impl InputDevice {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputDevice::Pointer => "pointer",
            InputDevice::Gamepad => "gamepad",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pointer" | "mouse" | "keyboard" => Some(InputDevice::Pointer),
            "gamepad" | "controller" | "pad" => Some(InputDevice::Gamepad),
            _ => None,
        }
    }
}

/// Parameters accepted when leaving the menu
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// 1 = versus AI (a second controller can hot-join), 2 = local versus
    pub player_count: u8,
    /// Total match time in seconds
    pub match_duration: f32,
    pub p1_input: InputDevice,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            player_count: 1,
            match_duration: DEFAULT_MATCH_DURATION,
            p1_input: InputDevice::Pointer,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !matches!(self.player_count, 1 | 2) {
            return Err(SettingsError::InvalidPlayerCount(self.player_count));
        }
        if !(self.match_duration.is_finite() && self.match_duration > 0.0) {
            return Err(SettingsError::InvalidDuration(self.match_duration));
        }
        Ok(())
    }

    pub fn is_single_player(&self) -> bool {
        self.player_count == 1
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Defaults offered by the menu
    pub match_config: MatchConfig,
    pub tuning: Tuning,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            match_config: MatchConfig::default(),
            tuning: Tuning::default(),
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.match_config.validate()?;
        self.tuning.validate()
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
