//! Player settings.
//!
//! Settings are plain serde data; the presentation layer edits them and the
//! session validates before applying. They travel in the export document's
//! `config` section.
//!
//! ```
//! use rebirth_logic::settings::{validate_settings, GameSettings};
//!
//! let settings = GameSettings::from_json(r#"{"journey_tick_ms": 250}"#).unwrap();
//! assert!(validate_settings(&settings).is_empty());
//! assert_eq!(settings.language, "en");
//! ```

use serde::{Deserialize, Serialize};

use crate::modes::GameMode;

/// Fastest allowed journey tick.
pub const MIN_TICK_MS: u64 = 50;
/// Slowest allowed journey tick.
pub const MAX_TICK_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Mode preselected on the generate screen.
    pub preferred_mode: GameMode,
    /// Milliseconds of wall time per journey year.
    pub journey_tick_ms: u64,
    /// Stop the journey clock when a decision is surfaced.
    pub pause_on_decision: bool,
    /// Fixed RNG seed for reproducible sessions (`None` = entropy).
    pub seed: Option<u64>,
    /// BCP 47 language tag for the string tables.
    pub language: String,
    pub sound_enabled: bool,
    pub animations_enabled: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            preferred_mode: GameMode::Classic,
            journey_tick_ms: 1_000,
            pause_on_decision: true,
            seed: None,
            language: "en".to_string(),
            sound_enabled: true,
            animations_enabled: true,
        }
    }
}

impl GameSettings {
    /// Parse settings; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    TickTooFast(u64),
    TickTooSlow(u64),
    EmptyLanguage,
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::TickTooFast(ms) => {
                write!(f, "journey tick {}ms is below the {}ms minimum", ms, MIN_TICK_MS)
            }
            SettingsError::TickTooSlow(ms) => {
                write!(f, "journey tick {}ms is above the {}ms maximum", ms, MAX_TICK_MS)
            }
            SettingsError::EmptyLanguage => write!(f, "language tag is empty"),
        }
    }
}

/// Validate settings, returning every problem found.
pub fn validate_settings(settings: &GameSettings) -> Vec<SettingsError> {
    let mut errors = Vec::new();
    if settings.journey_tick_ms < MIN_TICK_MS {
        errors.push(SettingsError::TickTooFast(settings.journey_tick_ms));
    }
    if settings.journey_tick_ms > MAX_TICK_MS {
        errors.push(SettingsError::TickTooSlow(settings.journey_tick_ms));
    }
    if settings.language.trim().is_empty() {
        errors.push(SettingsError::EmptyLanguage);
    }
    errors
}
