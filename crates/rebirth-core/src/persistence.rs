//! Durable storage for lives, karma, overlays, achievements and settings.
//!
//! The session talks to storage only through [`GameStore`], so the same
//! engine runs against [`MemoryStore`] in tests and [`FileStore`] on disk.
//! The file store keeps everything in memory and writes a versioned bincode
//! snapshot after every mutation. A mutation only becomes visible once its
//! snapshot is on disk.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use rebirth_logic::achievements::UnlockedAchievement;
use rebirth_logic::generator::GeneratedLife;
use rebirth_logic::karma::{KarmaInfluence, KarmaProfile, KarmaRecord};
use rebirth_logic::life::{
    Birthplace, Country, Era, FamilyStructure, Gender, Rarity, ReincarnationResult, Season,
    SocialClass, Zodiac,
};
use rebirth_logic::modes::{FantasyLife, HistoricalLife, ModeSpecificResult, ScifiLife};
use rebirth_logic::settings::GameSettings;

/// Version number for the snapshot format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Storage operations the session depends on.
pub trait GameStore {
    /// Insert or replace a life by id.
    fn save(&mut self, result: &ReincarnationResult) -> Result<(), StoreError>;
    /// All lives, newest first.
    fn load_all(&self) -> Result<Vec<ReincarnationResult>, StoreError>;
    /// Delete a life together with its overlay and karma records.
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;

    fn save_mode_result(
        &mut self,
        life_id: &str,
        overlay: &ModeSpecificResult,
    ) -> Result<(), StoreError>;
    fn load_mode_result(&self, life_id: &str) -> Result<Option<ModeSpecificResult>, StoreError>;

    fn save_karma_profile(&mut self, profile: &KarmaProfile) -> Result<(), StoreError>;
    fn load_karma_profile(&self) -> Result<Option<KarmaProfile>, StoreError>;
    fn save_karma_record(&mut self, record: &KarmaRecord) -> Result<(), StoreError>;
    /// Karma records in insertion order, optionally restricted to one life.
    fn load_karma_records(&self, life_id: Option<&str>) -> Result<Vec<KarmaRecord>, StoreError>;

    /// Persist a fresh life with its overlay, karma records and the folded
    /// profile. Stores that can write all of it at once should override this.
    fn save_generation(&mut self, life: &GeneratedLife) -> Result<(), StoreError> {
        self.save(&life.result)?;
        if let Some(overlay) = &life.mode_result {
            self.save_mode_result(&life.result.id, overlay)?;
        }
        self.save_karma_profile(&life.karma_profile)?;
        for record in life.karma_events() {
            self.save_karma_record(record)?;
        }
        Ok(())
    }

    /// Record an unlock. Re-unlocking keeps the first timestamp.
    fn save_achievement_unlock(&mut self, id: &str, unlocked_at: u64) -> Result<(), StoreError>;
    fn load_unlocked_achievements(&self) -> Result<Vec<UnlockedAchievement>, StoreError>;

    fn load_unlocked_achievement_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .load_unlocked_achievements()?
            .into_iter()
            .map(|a| a.id)
            .collect())
    }

    fn save_settings(&mut self, settings: &GameSettings) -> Result<(), StoreError>;
    fn load_settings(&self) -> Result<Option<GameSettings>, StoreError>;

    /// Remove every stored item.
    fn clear(&mut self) -> Result<(), StoreError>;
}

/// Everything a store holds, shared by both store implementations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreData {
    /// Insertion order; `load_all` derives recency from it.
    reincarnations: Vec<ReincarnationResult>,
    overlays: Vec<(String, ModeSpecificResult)>,
    karma_profile: Option<KarmaProfile>,
    karma_records: Vec<KarmaRecord>,
    achievements: Vec<UnlockedAchievement>,
    settings: Option<GameSettings>,
}

impl StoreData {
    fn save(&mut self, result: &ReincarnationResult) {
        self.reincarnations.retain(|r| r.id != result.id);
        self.reincarnations.push(result.clone());
    }

    fn load_all(&self) -> Vec<ReincarnationResult> {
        let mut all: Vec<_> = self.reincarnations.iter().rev().cloned().collect();
        // Stable sort keeps later insertions first among equal timestamps.
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        all
    }

    fn delete(&mut self, id: &str) {
        self.reincarnations.retain(|r| r.id != id);
        self.overlays.retain(|(life_id, _)| life_id != id);
        self.karma_records.retain(|r| r.life_id != id);
    }

    fn save_mode_result(&mut self, life_id: &str, overlay: &ModeSpecificResult) {
        self.overlays.retain(|(id, _)| id != life_id);
        self.overlays.push((life_id.to_string(), overlay.clone()));
    }

    fn load_mode_result(&self, life_id: &str) -> Option<ModeSpecificResult> {
        self.overlays
            .iter()
            .find(|(id, _)| id == life_id)
            .map(|(_, overlay)| overlay.clone())
    }

    fn save_karma_record(&mut self, record: &KarmaRecord) {
        self.karma_records.retain(|r| r.id != record.id);
        self.karma_records.push(record.clone());
    }

    fn load_karma_records(&self, life_id: Option<&str>) -> Vec<KarmaRecord> {
        self.karma_records
            .iter()
            .filter(|r| life_id.map_or(true, |id| r.life_id == id))
            .cloned()
            .collect()
    }

    fn save_generation(&mut self, life: &GeneratedLife) {
        self.save(&life.result);
        if let Some(overlay) = &life.mode_result {
            self.save_mode_result(&life.result.id, overlay);
        }
        self.karma_profile = Some(life.karma_profile.clone());
        for record in life.karma_events() {
            self.save_karma_record(record);
        }
    }

    fn save_achievement_unlock(&mut self, id: &str, unlocked_at: u64) {
        if self.achievements.iter().any(|a| a.id == id) {
            return;
        }
        self.achievements.push(UnlockedAchievement {
            id: id.to_string(),
            unlocked_at,
        });
    }
}

// ── In-memory store ─────────────────────────────────────────────────────

/// Store that lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: StoreData,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn save(&mut self, result: &ReincarnationResult) -> Result<(), StoreError> {
        self.data.save(result);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<ReincarnationResult>, StoreError> {
        Ok(self.data.load_all())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.data.delete(id);
        Ok(())
    }

    fn save_mode_result(
        &mut self,
        life_id: &str,
        overlay: &ModeSpecificResult,
    ) -> Result<(), StoreError> {
        self.data.save_mode_result(life_id, overlay);
        Ok(())
    }

    fn load_mode_result(&self, life_id: &str) -> Result<Option<ModeSpecificResult>, StoreError> {
        Ok(self.data.load_mode_result(life_id))
    }

    fn save_karma_profile(&mut self, profile: &KarmaProfile) -> Result<(), StoreError> {
        self.data.karma_profile = Some(profile.clone());
        Ok(())
    }

    fn load_karma_profile(&self) -> Result<Option<KarmaProfile>, StoreError> {
        Ok(self.data.karma_profile.clone())
    }

    fn save_karma_record(&mut self, record: &KarmaRecord) -> Result<(), StoreError> {
        self.data.save_karma_record(record);
        Ok(())
    }

    fn load_karma_records(&self, life_id: Option<&str>) -> Result<Vec<KarmaRecord>, StoreError> {
        Ok(self.data.load_karma_records(life_id))
    }

    fn save_generation(&mut self, life: &GeneratedLife) -> Result<(), StoreError> {
        self.data.save_generation(life);
        Ok(())
    }

    fn save_achievement_unlock(&mut self, id: &str, unlocked_at: u64) -> Result<(), StoreError> {
        self.data.save_achievement_unlock(id, unlocked_at);
        Ok(())
    }

    fn load_unlocked_achievements(&self) -> Result<Vec<UnlockedAchievement>, StoreError> {
        Ok(self.data.achievements.clone())
    }

    fn save_settings(&mut self, settings: &GameSettings) -> Result<(), StoreError> {
        self.data.settings = Some(settings.clone());
        Ok(())
    }

    fn load_settings(&self) -> Result<Option<GameSettings>, StoreError> {
        Ok(self.data.settings.clone())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.data = StoreData::default();
        Ok(())
    }
}

// ── File store ──────────────────────────────────────────────────────────

/// Store backed by a bincode snapshot file.
///
/// `open` loads the snapshot (or starts empty when the file does not exist),
/// every mutation rewrites it, and `close` flushes a final time. Any call
/// after `close` fails with [`StoreError::Closed`]. A mutation whose snapshot
/// cannot be written is dropped, so memory never runs ahead of the file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: Option<StoreData>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = if path.exists() {
            let file = File::open(&path)?;
            load_snapshot(BufReader::new(file))?
        } else {
            StoreData::default()
        };
        log::debug!(
            "opened store {} ({} lives)",
            path.display(),
            data.reincarnations.len()
        );
        Ok(Self {
            path,
            data: Some(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.data.is_some()
    }

    /// Flush and release the store. Closing twice is a no-op.
    pub fn close(&mut self) -> Result<(), StoreError> {
        if self.data.is_none() {
            return Ok(());
        }
        self.flush()?;
        self.data = None;
        log::debug!("closed store {}", self.path.display());
        Ok(())
    }

    fn data(&self) -> Result<&StoreData, StoreError> {
        self.data.as_ref().ok_or(StoreError::Closed)
    }

    /// Apply a mutation to a copy, persist the copy, then adopt it.
    fn mutate(&mut self, f: impl FnOnce(&mut StoreData)) -> Result<(), StoreError> {
        let mut next = self.data()?.clone();
        f(&mut next);
        self.write_snapshot(&next)?;
        self.data = Some(next);
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        self.write_snapshot(self.data()?)
    }

    fn write_snapshot(&self, data: &StoreData) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            save_snapshot(&mut writer, data)?;
            writer.flush()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl GameStore for FileStore {
    fn save(&mut self, result: &ReincarnationResult) -> Result<(), StoreError> {
        self.mutate(|d| d.save(result))
    }

    fn load_all(&self) -> Result<Vec<ReincarnationResult>, StoreError> {
        Ok(self.data()?.load_all())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        self.mutate(|d| d.delete(id))
    }

    fn save_mode_result(
        &mut self,
        life_id: &str,
        overlay: &ModeSpecificResult,
    ) -> Result<(), StoreError> {
        self.mutate(|d| d.save_mode_result(life_id, overlay))
    }

    fn load_mode_result(&self, life_id: &str) -> Result<Option<ModeSpecificResult>, StoreError> {
        Ok(self.data()?.load_mode_result(life_id))
    }

    fn save_karma_profile(&mut self, profile: &KarmaProfile) -> Result<(), StoreError> {
        self.mutate(|d| d.karma_profile = Some(profile.clone()))
    }

    fn load_karma_profile(&self) -> Result<Option<KarmaProfile>, StoreError> {
        Ok(self.data()?.karma_profile.clone())
    }

    fn save_karma_record(&mut self, record: &KarmaRecord) -> Result<(), StoreError> {
        self.mutate(|d| d.save_karma_record(record))
    }

    fn load_karma_records(&self, life_id: Option<&str>) -> Result<Vec<KarmaRecord>, StoreError> {
        Ok(self.data()?.load_karma_records(life_id))
    }

    fn save_generation(&mut self, life: &GeneratedLife) -> Result<(), StoreError> {
        self.mutate(|d| d.save_generation(life))
    }

    fn save_achievement_unlock(&mut self, id: &str, unlocked_at: u64) -> Result<(), StoreError> {
        self.mutate(|d| d.save_achievement_unlock(id, unlocked_at))
    }

    fn load_unlocked_achievements(&self) -> Result<Vec<UnlockedAchievement>, StoreError> {
        Ok(self.data()?.achievements.clone())
    }

    fn save_settings(&mut self, settings: &GameSettings) -> Result<(), StoreError> {
        self.mutate(|d| d.settings = Some(settings.clone()))
    }

    fn load_settings(&self) -> Result<Option<GameSettings>, StoreError> {
        Ok(self.data()?.settings.clone())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.mutate(|d| *d = StoreData::default())
    }
}

// ── Snapshot format ─────────────────────────────────────────────────────

/// Serializable snapshot of a store
#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    reincarnations: Vec<SerializableLife>,
    overlays: Vec<(String, SerializableOverlay)>,
    karma_profile: Option<KarmaProfile>,
    karma_records: Vec<KarmaRecord>,
    achievements: Vec<UnlockedAchievement>,
    settings: Option<GameSettings>,
}

/// Positional mirror of `ReincarnationResult` (bincode cannot skip fields)
#[derive(Serialize, Deserialize)]
struct SerializableLife {
    id: String,
    timestamp: u64,
    country: Country,
    gender: Gender,
    social_class: SocialClass,
    birthplace: Birthplace,
    family_structure: FamilyStructure,
    era: Era,
    health: u8,
    luck: u8,
    lifespan: u32,
    talents: Vec<String>,
    personality: Vec<String>,
    challenges: Vec<String>,
    opportunities: Vec<String>,
    birth_season: Season,
    zodiac: Zodiac,
    rarity: Rarity,
    karma_influence: Option<KarmaInfluence>,
    karma_events: Option<Vec<KarmaRecord>>,
    special_events: Option<Vec<String>>,
}

impl From<&ReincarnationResult> for SerializableLife {
    fn from(r: &ReincarnationResult) -> Self {
        Self {
            id: r.id.clone(),
            timestamp: r.timestamp,
            country: r.country,
            gender: r.gender,
            social_class: r.social_class,
            birthplace: r.birthplace,
            family_structure: r.family_structure,
            era: r.era,
            health: r.health,
            luck: r.luck,
            lifespan: r.lifespan,
            talents: r.talents.clone(),
            personality: r.personality.clone(),
            challenges: r.challenges.clone(),
            opportunities: r.opportunities.clone(),
            birth_season: r.birth_season,
            zodiac: r.zodiac,
            rarity: r.rarity,
            karma_influence: r.karma_influence.clone(),
            karma_events: r.karma_events.clone(),
            special_events: r.special_events.clone(),
        }
    }
}

impl From<SerializableLife> for ReincarnationResult {
    fn from(s: SerializableLife) -> Self {
        Self {
            id: s.id,
            timestamp: s.timestamp,
            country: s.country,
            gender: s.gender,
            social_class: s.social_class,
            birthplace: s.birthplace,
            family_structure: s.family_structure,
            era: s.era,
            health: s.health,
            luck: s.luck,
            lifespan: s.lifespan,
            talents: s.talents,
            personality: s.personality,
            challenges: s.challenges,
            opportunities: s.opportunities,
            birth_season: s.birth_season,
            zodiac: s.zodiac,
            rarity: s.rarity,
            karma_influence: s.karma_influence,
            karma_events: s.karma_events,
            special_events: s.special_events,
        }
    }
}

/// Externally tagged mirror of `ModeSpecificResult`
#[derive(Serialize, Deserialize)]
enum SerializableOverlay {
    Historical(HistoricalLife),
    Fantasy(FantasyLife),
    Scifi(ScifiLife),
}

impl From<&ModeSpecificResult> for SerializableOverlay {
    fn from(m: &ModeSpecificResult) -> Self {
        match m {
            ModeSpecificResult::Historical(h) => SerializableOverlay::Historical(h.clone()),
            ModeSpecificResult::Fantasy(f) => SerializableOverlay::Fantasy(f.clone()),
            ModeSpecificResult::Scifi(s) => SerializableOverlay::Scifi(s.clone()),
        }
    }
}

impl From<SerializableOverlay> for ModeSpecificResult {
    fn from(s: SerializableOverlay) -> Self {
        match s {
            SerializableOverlay::Historical(h) => ModeSpecificResult::Historical(h),
            SerializableOverlay::Fantasy(f) => ModeSpecificResult::Fantasy(f),
            SerializableOverlay::Scifi(s) => ModeSpecificResult::Scifi(s),
        }
    }
}

/// Write a store snapshot to a writer
pub fn save_snapshot<W: Write>(writer: W, data: &StoreData) -> Result<(), StoreError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        reincarnations: data.reincarnations.iter().map(SerializableLife::from).collect(),
        overlays: data
            .overlays
            .iter()
            .map(|(id, o)| (id.clone(), SerializableOverlay::from(o)))
            .collect(),
        karma_profile: data.karma_profile.clone(),
        karma_records: data.karma_records.clone(),
        achievements: data.achievements.clone(),
        settings: data.settings.clone(),
    };
    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Read a store snapshot from a reader
pub fn load_snapshot<R: Read>(reader: R) -> Result<StoreData, StoreError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(StoreError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    Ok(StoreData {
        reincarnations: save_data.reincarnations.into_iter().map(Into::into).collect(),
        overlays: save_data
            .overlays
            .into_iter()
            .map(|(id, o)| (id, o.into()))
            .collect(),
        karma_profile: save_data.karma_profile,
        karma_records: save_data.karma_records,
        achievements: save_data.achievements,
        settings: save_data.settings,
    })
}

/// Errors that can occur while reading or writing a store
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
    Closed,
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for StoreError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        StoreError::Bincode(e)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "IO error: {}", e),
            StoreError::Bincode(e) => write!(f, "Serialization error: {}", e),
            StoreError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            StoreError::Closed => write!(f, "store is closed"),
        }
    }
}

impl std::error::Error for StoreError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rebirth_logic::generator::generate_life;
    use rebirth_logic::modes::GameMode;

    fn life(seed: u64, now: u64) -> ReincarnationResult {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_life(GameMode::Classic, None, now, &mut rng).result
    }

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("rebirth-{}-{}.bin", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    #[test]
    fn test_load_all_newest_first() {
        let mut store = MemoryStore::new();
        let a = life(1, 100);
        let b = life(2, 300);
        let c = life(3, 200);
        for l in [&a, &b, &c] {
            store.save(l).unwrap();
        }
        let ids: Vec<_> = store.load_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![b.id, c.id, a.id]);
    }

    #[test]
    fn test_save_replaces_same_id() {
        let mut store = MemoryStore::new();
        let mut a = life(1, 100);
        store.save(&a).unwrap();
        a.luck = 3;
        store.save(&a).unwrap();
        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].luck, 3);
    }

    #[test]
    fn test_delete_cascades() {
        let mut rng = StdRng::seed_from_u64(4);
        let generated = generate_life(GameMode::Fantasy, None, 10, &mut rng);
        let id = generated.result.id.clone();

        let mut store = MemoryStore::new();
        store.save(&generated.result).unwrap();
        store
            .save_mode_result(&id, generated.mode_result.as_ref().unwrap())
            .unwrap();
        for record in generated.karma_events() {
            store.save_karma_record(record).unwrap();
        }
        assert!(!store.load_karma_records(Some(&id)).unwrap().is_empty());

        store.delete(&id).unwrap();
        assert!(store.load_all().unwrap().is_empty());
        assert_eq!(store.load_mode_result(&id).unwrap(), None);
        assert!(store.load_karma_records(None).unwrap().is_empty());
    }

    #[test]
    fn test_achievement_unlock_keeps_first_timestamp() {
        let mut store = MemoryStore::new();
        store.save_achievement_unlock("first_life", 5).unwrap();
        store.save_achievement_unlock("first_life", 9).unwrap();
        let unlocked = store.load_unlocked_achievements().unwrap();
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].unlocked_at, 5);
        assert_eq!(store.load_unlocked_achievement_ids().unwrap(), vec!["first_life"]);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut store = MemoryStore::new();
        for (i, mode) in GameMode::ALL.iter().enumerate() {
            let g = generate_life(*mode, None, i as u64, &mut rng);
            store.save(&g.result).unwrap();
            if let Some(overlay) = &g.mode_result {
                store.save_mode_result(&g.result.id, overlay).unwrap();
            }
            store.save_karma_profile(&g.karma_profile).unwrap();
        }
        store.save_settings(&GameSettings::default()).unwrap();

        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, &store.data).unwrap();
        let loaded = load_snapshot(&buffer[..]).unwrap();
        assert_eq!(loaded, store.data);
    }

    #[test]
    fn test_snapshot_version_mismatch() {
        let mut buffer = Vec::new();
        save_snapshot(&mut buffer, &StoreData::default()).unwrap();
        buffer[0] = 99;
        match load_snapshot(&buffer[..]) {
            Err(StoreError::VersionMismatch { expected, found }) => {
                assert_eq!(expected, SAVE_VERSION);
                assert_eq!(found, 99);
            }
            other => panic!("expected version mismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_file_store_reopen() {
        let path = temp_path("reopen");
        let a = life(5, 50);
        {
            let mut store = FileStore::open(&path).unwrap();
            store.save(&a).unwrap();
            store.save_achievement_unlock("first_life", 50).unwrap();
            store.close().unwrap();
            assert!(!store.is_open());
        }
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![a]);
        assert_eq!(store.load_unlocked_achievement_ids().unwrap(), vec!["first_life"]);
        let _ = std::fs::remove_file(&path);
    }

    fn missing_dir(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("rebirth-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_save_generation_matches_piecewise_writes() {
        let mut rng = StdRng::seed_from_u64(11);
        let g = generate_life(GameMode::Historical, None, 7, &mut rng);

        let mut batched = MemoryStore::new();
        batched.save_generation(&g).unwrap();

        let mut piecewise = MemoryStore::new();
        piecewise.save(&g.result).unwrap();
        piecewise
            .save_mode_result(&g.result.id, g.mode_result.as_ref().unwrap())
            .unwrap();
        piecewise.save_karma_profile(&g.karma_profile).unwrap();
        for record in g.karma_events() {
            piecewise.save_karma_record(record).unwrap();
        }
        assert_eq!(batched.data, piecewise.data);
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let dir = missing_dir("unwritable");
        let path = dir.join("store.bin");
        let mut store = FileStore::open(&path).unwrap();

        let mut rng = StdRng::seed_from_u64(12);
        let lost = generate_life(GameMode::Classic, None, 1, &mut rng);
        assert!(matches!(store.save_generation(&lost), Err(StoreError::Io(_))));
        assert!(matches!(store.save(&life(13, 2)), Err(StoreError::Io(_))));
        assert!(store.load_all().unwrap().is_empty());
        assert!(store.load_karma_records(None).unwrap().is_empty());
        assert_eq!(store.load_karma_profile().unwrap(), None);

        std::fs::create_dir_all(&dir).unwrap();
        let kept = generate_life(GameMode::Classic, None, 3, &mut rng);
        store.save_generation(&kept).unwrap();
        store.close().unwrap();

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![kept.result.clone()]);
        assert_eq!(store.load_karma_records(None).unwrap(), kept.karma_events());
        assert!(store
            .load_karma_records(Some(&lost.result.id))
            .unwrap()
            .is_empty());
        assert_eq!(store.load_karma_profile().unwrap(), Some(kept.karma_profile.clone()));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_closed_file_store_rejects_calls() {
        let path = temp_path("closed");
        let mut store = FileStore::open(&path).unwrap();
        store.close().unwrap();
        store.close().unwrap();
        assert!(matches!(store.load_all(), Err(StoreError::Closed)));
        assert!(matches!(store.save(&life(6, 1)), Err(StoreError::Closed)));
        let _ = std::fs::remove_file(&path);
    }
}
