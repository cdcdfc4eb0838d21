//! Export/import of the full dataset as one versioned JSON document.
//!
//! ```text
//! { "version": 1, "timestamp": <ms>, "data": {
//!     "reincarnations": [...], "achievements": [...],
//!     "config": {...}, "statistics": {...},
//!     "karma_profile": {...}, "karma_records": [...], "mode_results": [...] } }
//! ```
//!
//! Import validates the whole document before clearing the store, so a
//! malformed payload never destroys existing data.

use serde::{Deserialize, Serialize};

use rebirth_logic::achievements::UnlockedAchievement;
use rebirth_logic::karma::{KarmaProfile, KarmaRecord};
use rebirth_logic::life::ReincarnationResult;
use rebirth_logic::modes::ModeSpecificResult;
use rebirth_logic::settings::GameSettings;
use rebirth_logic::statistics::PlayerStatistics;

use crate::persistence::{GameStore, StoreError};

/// Current export document version.
pub const EXPORT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub version: u32,
    /// Export time, milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub data: ExportData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    /// Newest first, as returned by the store.
    pub reincarnations: Vec<ReincarnationResult>,
    pub achievements: Vec<UnlockedAchievement>,
    pub config: GameSettings,
    /// Derived from the other sections; recomputed on import.
    pub statistics: PlayerStatistics,
    #[serde(default)]
    pub karma_profile: Option<KarmaProfile>,
    #[serde(default)]
    pub karma_records: Vec<KarmaRecord>,
    #[serde(default)]
    pub mode_results: Vec<ModeResultEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeResultEntry {
    pub life_id: String,
    pub result: ModeSpecificResult,
}

/// What an import restored.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub reincarnations: usize,
    pub achievements: usize,
    pub karma_records: usize,
    pub config: GameSettings,
}

/// Collect everything in `store` into an export document.
pub fn export_game_data(
    store: &impl GameStore,
    config: &GameSettings,
    now: u64,
) -> Result<ExportDocument, StoreError> {
    let reincarnations = store.load_all()?;
    let achievements = store.load_unlocked_achievements()?;
    let unlocked_ids: Vec<String> = achievements.iter().map(|a| a.id.clone()).collect();
    let statistics = PlayerStatistics::from_history(&reincarnations, &unlocked_ids);

    let mut mode_results = Vec::new();
    for life in &reincarnations {
        if let Some(result) = store.load_mode_result(&life.id)? {
            mode_results.push(ModeResultEntry {
                life_id: life.id.clone(),
                result,
            });
        }
    }

    Ok(ExportDocument {
        version: EXPORT_VERSION,
        timestamp: now,
        data: ExportData {
            reincarnations,
            achievements,
            config: config.clone(),
            statistics,
            karma_profile: store.load_karma_profile()?,
            karma_records: store.load_karma_records(None)?,
            mode_results,
        },
    })
}

/// Export straight to a pretty-printed JSON string.
pub fn export_json(
    store: &impl GameStore,
    config: &GameSettings,
    now: u64,
) -> Result<String, ImportError> {
    let document = export_game_data(store, config, now)?;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Parse and validate a document without touching any store.
pub fn parse_document(json: &str) -> Result<ExportDocument, ImportError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let version = value
        .get("version")
        .and_then(serde_json::Value::as_u64)
        .ok_or(ImportError::MissingVersion)?;
    if version == 0 || version > EXPORT_VERSION as u64 {
        return Err(ImportError::UnsupportedVersion {
            found: version,
            supported: EXPORT_VERSION,
        });
    }
    if !value.get("data").map_or(false, serde_json::Value::is_object) {
        return Err(ImportError::MissingData);
    }
    Ok(serde_json::from_value(value)?)
}

/// Replace the contents of `store` with an exported document.
pub fn import_game_data(
    store: &mut impl GameStore,
    json: &str,
) -> Result<ImportSummary, ImportError> {
    let document = parse_document(json)?;
    let data = document.data;

    store.clear()?;
    // Oldest first so the store's recency order matches the export order.
    for life in data.reincarnations.iter().rev() {
        store.save(life)?;
    }
    for entry in &data.mode_results {
        store.save_mode_result(&entry.life_id, &entry.result)?;
    }
    for unlock in &data.achievements {
        store.save_achievement_unlock(&unlock.id, unlock.unlocked_at)?;
    }
    if let Some(profile) = &data.karma_profile {
        store.save_karma_profile(profile)?;
    }
    for record in &data.karma_records {
        store.save_karma_record(record)?;
    }
    store.save_settings(&data.config)?;

    log::info!(
        "imported {} lives, {} achievements (export v{} from {})",
        data.reincarnations.len(),
        data.achievements.len(),
        document.version,
        document.timestamp
    );

    Ok(ImportSummary {
        reincarnations: data.reincarnations.len(),
        achievements: data.achievements.len(),
        karma_records: data.karma_records.len(),
        config: data.config,
    })
}

/// Errors that can occur during export or import
#[derive(Debug)]
pub enum ImportError {
    Json(serde_json::Error),
    MissingVersion,
    MissingData,
    UnsupportedVersion { found: u64, supported: u32 },
    Store(StoreError),
}

impl From<serde_json::Error> for ImportError {
    fn from(e: serde_json::Error) -> Self {
        ImportError::Json(e)
    }
}

impl From<StoreError> for ImportError {
    fn from(e: StoreError) -> Self {
        ImportError::Store(e)
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Json(e) => write!(f, "Malformed export document: {}", e),
            ImportError::MissingVersion => write!(f, "Export document has no version"),
            ImportError::MissingData => write!(f, "Export document has no data section"),
            ImportError::UnsupportedVersion { found, supported } => write!(
                f,
                "Unsupported export version {} (this build reads up to {})",
                found, supported
            ),
            ImportError::Store(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for ImportError {}
