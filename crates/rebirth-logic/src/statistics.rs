//! Aggregate player statistics over the life history.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::achievements::AchievementId;
use crate::life::{Country, Era, Rarity, ReincarnationResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatistics {
    pub total_lives: u32,
    pub rarity_counts: BTreeMap<Rarity, u32>,
    pub era_counts: BTreeMap<Era, u32>,
    pub countries_visited: BTreeSet<Country>,
    pub unlocked_achievements: BTreeSet<AchievementId>,
    pub average_lifespan: f64,
    pub average_health: f64,
    pub average_luck: f64,
    pub highest_rarity: Option<Rarity>,
    pub longest_lifespan: u32,
}

impl PlayerStatistics {
    /// Build statistics from the full history and the persisted unlock ids.
    /// Unknown unlock ids are ignored.
    pub fn from_history(history: &[ReincarnationResult], unlocked_ids: &[String]) -> Self {
        let mut stats = Self {
            total_lives: history.len() as u32,
            unlocked_achievements: unlocked_ids
                .iter()
                .filter_map(|id| AchievementId::from_str_id(id))
                .collect(),
            ..Self::default()
        };

        if history.is_empty() {
            return stats;
        }

        let mut lifespan_sum = 0u64;
        let mut health_sum = 0u64;
        let mut luck_sum = 0u64;
        for life in history {
            *stats.rarity_counts.entry(life.rarity).or_default() += 1;
            *stats.era_counts.entry(life.era).or_default() += 1;
            stats.countries_visited.insert(life.country);
            lifespan_sum += life.lifespan as u64;
            health_sum += life.health as u64;
            luck_sum += life.luck as u64;
            stats.longest_lifespan = stats.longest_lifespan.max(life.lifespan);
            stats.highest_rarity = stats.highest_rarity.max(Some(life.rarity));
        }

        let n = history.len() as f64;
        stats.average_lifespan = lifespan_sum as f64 / n;
        stats.average_health = health_sum as f64 / n;
        stats.average_luck = luck_sum as f64 / n;
        stats
    }

    pub fn count_of(&self, rarity: Rarity) -> u32 {
        self.rarity_counts.get(&rarity).copied().unwrap_or(0)
    }
}
