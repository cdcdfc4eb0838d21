//! Game session - main entry point for the presentation layer

use rand::rngs::StdRng;
use rand::SeedableRng;

use rebirth_logic::achievements::{check_new, Achievement, AchievementId};
use rebirth_logic::generator::{generate_life, GeneratedLife};
use rebirth_logic::journey::{EnhancedLifeJourney, JourneyError, JourneyStep, LifeJourney};
use rebirth_logic::karma::{calculate_soul_level, create_initial_profile, KarmaProfile, SoulLevel};
use rebirth_logic::life::{Rarity, ReincarnationResult};
use rebirth_logic::modes::GameMode;
use rebirth_logic::settings::{validate_settings, GameSettings, SettingsError};
use rebirth_logic::statistics::PlayerStatistics;

use crate::export::{export_game_data, import_game_data, ExportDocument, ImportError, ImportSummary};
use crate::persistence::{GameStore, StoreError};
use crate::ticker::JourneyTicker;

/// One player's session over an injected store.
///
/// The session owns the RNG, the in-memory karma profile, and at most one
/// running journey. Every generation folds karma in memory and writes the
/// profile back as one unit before returning, so the profile is never
/// read-modify-written concurrently.
pub struct GameSession<S: GameStore> {
    store: S,
    settings: GameSettings,
    rng: StdRng,
    karma: KarmaProfile,
    /// Kept so a life whose save failed can still be journeyed.
    last_generated: Option<ReincarnationResult>,
    journey: Option<LifeJourney>,
    ticker: JourneyTicker,
}

/// Everything one `generate` call produced.
#[derive(Debug, Clone)]
pub struct Generation {
    pub life: GeneratedLife,
    pub soul_level: SoulLevel,
    pub new_achievements: Vec<Achievement>,
    /// False when any write failed; the life is shown but not remembered.
    pub persisted: bool,
}

/// Headline numbers for the home screen.
#[derive(Debug, Clone, PartialEq)]
pub struct QuickStats {
    pub total_lives: u32,
    pub soul_level: u8,
    pub soul_title: String,
    pub total_karma: i64,
    pub achievements_unlocked: usize,
    pub achievements_total: usize,
    pub highest_rarity: Option<Rarity>,
    pub unlocked_modes: Vec<GameMode>,
}

impl<S: GameStore> GameSession<S> {
    /// Create a session. A profile or settings the store cannot produce are
    /// replaced by fresh defaults.
    pub fn new(store: S, settings: GameSettings, now: u64) -> Self {
        let karma = match store.load_karma_profile() {
            Ok(Some(profile)) => profile,
            Ok(None) => create_initial_profile(now),
            Err(e) => {
                log::warn!("karma profile not loaded: {}", e);
                create_initial_profile(now)
            }
        };
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            ticker: JourneyTicker::from_settings(&settings),
            store,
            settings,
            rng,
            karma,
            last_generated: None,
            journey: None,
        }
    }

    /// Create a session using the settings saved in the store, if any.
    pub fn with_stored_settings(store: S, now: u64) -> Self {
        let settings = match store.load_settings() {
            Ok(Some(settings)) => settings,
            Ok(None) => GameSettings::default(),
            Err(e) => {
                log::warn!("settings not loaded: {}", e);
                GameSettings::default()
            }
        };
        Self::new(store, settings, now)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Validate and apply new settings. The RNG is reseeded when the seed changes.
    pub fn update_settings(&mut self, settings: GameSettings) -> Result<(), SessionError> {
        let errors = validate_settings(&settings);
        if !errors.is_empty() {
            return Err(SessionError::InvalidSettings(errors));
        }
        if settings.seed != self.settings.seed {
            if let Some(seed) = settings.seed {
                self.rng = StdRng::seed_from_u64(seed);
            }
        }
        self.ticker = JourneyTicker::from_settings(&settings);
        if let Err(e) = self.store.save_settings(&settings) {
            log::warn!("settings not saved: {}", e);
        }
        self.settings = settings;
        Ok(())
    }

    pub fn karma_profile(&self) -> &KarmaProfile {
        &self.karma
    }

    pub fn soul_level(&self) -> SoulLevel {
        calculate_soul_level(&self.karma)
    }

    /// Stored lives, newest first. Empty when the store cannot be read.
    pub fn history(&self) -> Vec<ReincarnationResult> {
        self.store.load_all().unwrap_or_else(|e| {
            log::warn!("history not loaded: {}", e);
            Vec::new()
        })
    }

    fn unlocked_ids(&self) -> Vec<String> {
        self.store.load_unlocked_achievement_ids().unwrap_or_else(|e| {
            log::warn!("achievements not loaded: {}", e);
            Vec::new()
        })
    }

    pub fn statistics(&self) -> PlayerStatistics {
        PlayerStatistics::from_history(&self.history(), &self.unlocked_ids())
    }

    pub fn unlocked_modes(&self) -> Vec<GameMode> {
        let stats = self.statistics();
        GameMode::ALL
            .into_iter()
            .filter(|mode| mode.is_unlocked(&stats))
            .collect()
    }

    /// Generate, persist and evaluate one new life.
    pub fn generate(&mut self, mode: GameMode, now: u64) -> Result<Generation, SessionError> {
        if !mode.is_unlocked(&self.statistics()) {
            return Err(SessionError::ModeLocked(mode));
        }

        let life = generate_life(mode, Some(&self.karma), now, &mut self.rng);
        self.karma = life.karma_profile.clone();
        self.last_generated = Some(life.result.clone());

        let persisted = match self.store.save_generation(&life) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("life {} not saved: {}", life.result.id, e);
                false
            }
        };

        let new_achievements = if persisted {
            self.unlock_achievements(now)
        } else {
            Vec::new()
        };

        Ok(Generation {
            soul_level: calculate_soul_level(&self.karma),
            life,
            new_achievements,
            persisted,
        })
    }

    fn unlock_achievements(&mut self, now: u64) -> Vec<Achievement> {
        let history = self.history();
        let fresh = check_new(&history, &self.unlocked_ids());
        for achievement in &fresh {
            if let Err(e) = self.store.save_achievement_unlock(achievement.id.as_str(), now) {
                log::warn!("achievement {} not saved: {}", achievement.id.as_str(), e);
            } else {
                log::info!("achievement unlocked: {}", achievement.id.as_str());
            }
        }
        fresh
    }

    /// Delete a stored life with its overlay and karma records.
    pub fn delete_life(&mut self, id: &str) -> Result<(), SessionError> {
        self.store.delete(id)?;
        if self.journey.as_ref().map_or(false, |j| j.state().life_id == id) {
            self.reset_journey();
        }
        Ok(())
    }

    // ── Journey ─────────────────────────────────────────────────────────

    /// Begin a journey for a stored (or the last generated) life.
    pub fn start_journey(&mut self, life_id: &str) -> Result<&EnhancedLifeJourney, SessionError> {
        let result = self
            .last_generated
            .as_ref()
            .filter(|r| r.id == life_id)
            .cloned()
            .or_else(|| self.history().into_iter().find(|r| r.id == life_id))
            .ok_or_else(|| SessionError::UnknownLife(life_id.to_string()))?;

        self.ticker.pause();
        let journey = LifeJourney::start(&result, &self.karma, &mut self.rng);
        log::debug!(
            "journey {} started with {} scheduled events",
            life_id,
            journey.schedule().len()
        );
        Ok(self.journey.insert(journey).state())
    }

    pub fn journey(&self) -> Option<&LifeJourney> {
        self.journey.as_ref()
    }

    /// Advance the journey by one year.
    pub fn advance_journey(&mut self) -> Result<JourneyStep, SessionError> {
        let journey = self.journey.as_mut().ok_or(SessionError::NoJourney)?;
        Ok(journey.advance())
    }

    pub fn resolve_decision(&mut self, event_id: &str, option_id: &str) -> Result<(), SessionError> {
        let journey = self.journey.as_mut().ok_or(SessionError::NoJourney)?;
        journey.resolve_decision(event_id, option_id)?;
        Ok(())
    }

    /// Drop the current journey and stop its clock.
    pub fn reset_journey(&mut self) {
        self.ticker.pause();
        self.journey = None;
    }

    pub fn play_journey(&mut self) -> Result<(), SessionError> {
        if self.journey.is_none() {
            return Err(SessionError::NoJourney);
        }
        self.ticker.play();
        Ok(())
    }

    pub fn pause_journey(&mut self) {
        self.ticker.pause();
    }

    pub fn is_journey_playing(&self) -> bool {
        self.ticker.is_running()
    }

    /// Feed wall time to the journey clock.
    pub fn tick(&mut self, elapsed_ms: u64) -> Vec<JourneyStep> {
        match self.journey.as_mut() {
            Some(journey) => self.ticker.on_elapsed(journey, elapsed_ms),
            None => Vec::new(),
        }
    }

    // ── Stats & data transfer ───────────────────────────────────────────

    pub fn quick_stats(&self) -> QuickStats {
        let stats = self.statistics();
        let soul = calculate_soul_level(&self.karma);
        QuickStats {
            total_lives: stats.total_lives,
            soul_level: soul.level,
            soul_title: soul.title,
            total_karma: self.karma.total_karma,
            achievements_unlocked: stats.unlocked_achievements.len(),
            achievements_total: AchievementId::ALL.len(),
            highest_rarity: stats.highest_rarity,
            unlocked_modes: GameMode::ALL
                .into_iter()
                .filter(|mode| mode.is_unlocked(&stats))
                .collect(),
        }
    }

    pub fn export(&self, now: u64) -> Result<ExportDocument, SessionError> {
        Ok(export_game_data(&self.store, &self.settings, now)?)
    }

    pub fn export_json(&self, now: u64) -> Result<String, SessionError> {
        Ok(crate::export::export_json(&self.store, &self.settings, now)?)
    }

    /// Replace all stored data with an export document and reload session state.
    pub fn import_json(&mut self, json: &str, now: u64) -> Result<ImportSummary, SessionError> {
        let summary = import_game_data(&mut self.store, json)?;
        self.reset_journey();
        self.last_generated = None;
        self.karma = self
            .store
            .load_karma_profile()?
            .unwrap_or_else(|| create_initial_profile(now));
        self.ticker = JourneyTicker::from_settings(&summary.config);
        self.settings = summary.config.clone();
        Ok(summary)
    }
}

/// Errors returned by session commands
#[derive(Debug)]
pub enum SessionError {
    ModeLocked(GameMode),
    NoJourney,
    UnknownLife(String),
    Journey(JourneyError),
    InvalidSettings(Vec<SettingsError>),
    Store(StoreError),
    Import(ImportError),
}

impl From<JourneyError> for SessionError {
    fn from(e: JourneyError) -> Self {
        SessionError::Journey(e)
    }
}

impl From<StoreError> for SessionError {
    fn from(e: StoreError) -> Self {
        SessionError::Store(e)
    }
}

impl From<ImportError> for SessionError {
    fn from(e: ImportError) -> Self {
        SessionError::Import(e)
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::ModeLocked(mode) => write!(f, "{} mode is locked", mode.as_str()),
            SessionError::NoJourney => write!(f, "no journey in progress"),
            SessionError::UnknownLife(id) => write!(f, "no life with id {}", id),
            SessionError::Journey(e) => write!(f, "journey: {}", e),
            SessionError::InvalidSettings(errors) => {
                write!(f, "invalid settings:")?;
                for e in errors {
                    write!(f, " {};", e)?;
                }
                Ok(())
            }
            SessionError::Store(e) => write!(f, "store: {}", e),
            SessionError::Import(e) => write!(f, "import: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}
