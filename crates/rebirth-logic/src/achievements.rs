//! Achievement catalog and evaluation.
//!
//! Every predicate is a pure function of the life history and is monotonic:
//! appending lives can only turn a predicate from false to true. Unlocks
//! are never revoked.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::life::{Country, Era, Rarity, ReincarnationResult, Season, SocialClass, Zodiac};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstLife,
    CuriousSoul,
    SeasonedTraveler,
    EternalWanderer,
    EpicJourney,
    LegendarySoul,
    RarityCollector,
    GlobeTrotter,
    WorldCitizen,
    SilverSpoon,
    HumbleBeginnings,
    Centenarian,
    FortuneFavored,
    IronConstitution,
    Prodigy,
    TimeTraveler,
    AncientSoul,
    FourSeasons,
    ZodiacMaster,
}

impl AchievementId {
    pub const ALL: [AchievementId; 19] = [
        AchievementId::FirstLife,
        AchievementId::CuriousSoul,
        AchievementId::SeasonedTraveler,
        AchievementId::EternalWanderer,
        AchievementId::EpicJourney,
        AchievementId::LegendarySoul,
        AchievementId::RarityCollector,
        AchievementId::GlobeTrotter,
        AchievementId::WorldCitizen,
        AchievementId::SilverSpoon,
        AchievementId::HumbleBeginnings,
        AchievementId::Centenarian,
        AchievementId::FortuneFavored,
        AchievementId::IronConstitution,
        AchievementId::Prodigy,
        AchievementId::TimeTraveler,
        AchievementId::AncientSoul,
        AchievementId::FourSeasons,
        AchievementId::ZodiacMaster,
    ];

    /// Stable string id used by persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            AchievementId::FirstLife => "first_life",
            AchievementId::CuriousSoul => "curious_soul",
            AchievementId::SeasonedTraveler => "seasoned_traveler",
            AchievementId::EternalWanderer => "eternal_wanderer",
            AchievementId::EpicJourney => "epic_journey",
            AchievementId::LegendarySoul => "legendary_soul",
            AchievementId::RarityCollector => "rarity_collector",
            AchievementId::GlobeTrotter => "globe_trotter",
            AchievementId::WorldCitizen => "world_citizen",
            AchievementId::SilverSpoon => "silver_spoon",
            AchievementId::HumbleBeginnings => "humble_beginnings",
            AchievementId::Centenarian => "centenarian",
            AchievementId::FortuneFavored => "fortune_favored",
            AchievementId::IronConstitution => "iron_constitution",
            AchievementId::Prodigy => "prodigy",
            AchievementId::TimeTraveler => "time_traveler",
            AchievementId::AncientSoul => "ancient_soul",
            AchievementId::FourSeasons => "four_seasons",
            AchievementId::ZodiacMaster => "zodiac_master",
        }
    }

    pub fn from_str_id(id: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.as_str() == id)
    }

    pub fn definition(self) -> Achievement {
        let (icon, rarity) = match self {
            AchievementId::FirstLife => ("🌱", Rarity::Common),
            AchievementId::CuriousSoul => ("🔍", Rarity::Common),
            AchievementId::SeasonedTraveler => ("🧭", Rarity::Uncommon),
            AchievementId::EternalWanderer => ("♾️", Rarity::Epic),
            AchievementId::EpicJourney => ("💜", Rarity::Rare),
            AchievementId::LegendarySoul => ("👑", Rarity::Epic),
            AchievementId::RarityCollector => ("💎", Rarity::Legendary),
            AchievementId::GlobeTrotter => ("🌍", Rarity::Rare),
            AchievementId::WorldCitizen => ("🗺️", Rarity::Epic),
            AchievementId::SilverSpoon => ("🥄", Rarity::Common),
            AchievementId::HumbleBeginnings => ("🏚️", Rarity::Common),
            AchievementId::Centenarian => ("🎂", Rarity::Rare),
            AchievementId::FortuneFavored => ("🍀", Rarity::Rare),
            AchievementId::IronConstitution => ("💪", Rarity::Uncommon),
            AchievementId::Prodigy => ("🎓", Rarity::Rare),
            AchievementId::TimeTraveler => ("🚀", Rarity::Epic),
            AchievementId::AncientSoul => ("🏛️", Rarity::Uncommon),
            AchievementId::FourSeasons => ("🍂", Rarity::Uncommon),
            AchievementId::ZodiacMaster => ("✨", Rarity::Rare),
        };
        Achievement {
            id: self,
            name_key: format!("achievement.{}.name", self.as_str()),
            description_key: format!("achievement.{}.description", self.as_str()),
            icon,
            rarity,
        }
    }

    /// Whether the history satisfies this achievement.
    pub fn is_met(self, history: &[ReincarnationResult]) -> bool {
        match self {
            AchievementId::FirstLife => !history.is_empty(),
            AchievementId::CuriousSoul => history.len() >= 5,
            AchievementId::SeasonedTraveler => history.len() >= 20,
            AchievementId::EternalWanderer => history.len() >= 100,
            AchievementId::EpicJourney => any_life(history, |r| r.rarity == Rarity::Epic),
            AchievementId::LegendarySoul => any_life(history, |r| r.rarity == Rarity::Legendary),
            AchievementId::RarityCollector => {
                distinct(history, |r| r.rarity).len() == Rarity::ALL.len()
            }
            AchievementId::GlobeTrotter => distinct(history, |r| r.country).len() >= 10,
            AchievementId::WorldCitizen => {
                distinct(history, |r| r.country).len() == Country::ALL.len()
            }
            AchievementId::SilverSpoon => any_life(history, |r| r.social_class == SocialClass::High),
            AchievementId::HumbleBeginnings => any_life(history, |r| r.social_class == SocialClass::Low),
            AchievementId::Centenarian => any_life(history, |r| r.lifespan > 100),
            AchievementId::FortuneFavored => any_life(history, |r| r.luck >= 95),
            AchievementId::IronConstitution => any_life(history, |r| r.health >= 95),
            AchievementId::Prodigy => any_life(history, |r| r.talents.len() >= 5),
            AchievementId::TimeTraveler => any_life(history, |r| r.era == Era::Future),
            AchievementId::AncientSoul => any_life(history, |r| r.era == Era::Ancient),
            AchievementId::FourSeasons => {
                distinct(history, |r| r.birth_season).len() == Season::ALL.len()
            }
            AchievementId::ZodiacMaster => {
                distinct(history, |r| r.zodiac).len() == Zodiac::ALL.len()
            }
        }
    }
}

fn any_life(history: &[ReincarnationResult], pred: impl Fn(&ReincarnationResult) -> bool) -> bool {
    history.iter().any(pred)
}

fn distinct<K: Ord>(
    history: &[ReincarnationResult],
    key: impl Fn(&ReincarnationResult) -> K,
) -> BTreeSet<K> {
    history.iter().map(key).collect()
}

/// Static achievement definition for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub name_key: String,
    pub description_key: String,
    pub icon: &'static str,
    pub rarity: Rarity,
}

/// Runtime unlock record, persisted separately from the definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub id: String,
    pub unlocked_at: u64,
}

/// Every achievement whose predicate holds for `history`.
pub fn check_all(history: &[ReincarnationResult]) -> Vec<Achievement> {
    AchievementId::ALL
        .iter()
        .filter(|id| id.is_met(history))
        .map(|id| id.definition())
        .collect()
}

/// Achievements met by `history` that are not in `already_unlocked`.
pub fn check_new(history: &[ReincarnationResult], already_unlocked: &[String]) -> Vec<Achievement> {
    check_all(history)
        .into_iter()
        .filter(|a| !already_unlocked.iter().any(|id| id == a.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_life;
    use crate::modes::GameMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn history(n: usize, seed: u64) -> Vec<ReincarnationResult> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|i| generate_life(GameMode::Classic, None, i as u64, &mut rng).result)
            .collect()
    }

    fn ids(list: &[Achievement]) -> Vec<AchievementId> {
        list.iter().map(|a| a.id).collect()
    }

    #[test]
    fn test_empty_history_unlocks_nothing() {
        assert!(check_all(&[]).is_empty());
    }

    #[test]
    fn test_seasoned_traveler_at_twenty() {
        let mut lives = history(19, 1);
        assert!(!AchievementId::SeasonedTraveler.is_met(&lives));
        let extra = history(30, 2);
        lives.push(extra[0].clone());
        assert!(AchievementId::SeasonedTraveler.is_met(&lives));
        for life in &extra[1..] {
            lives.push(life.clone());
            assert!(AchievementId::SeasonedTraveler.is_met(&lives));
        }
    }

    #[test]
    fn test_all_predicates_monotonic_under_append() {
        let lives = history(150, 3);
        let mut previously: Vec<AchievementId> = Vec::new();
        for n in 0..=lives.len() {
            let now = ids(&check_all(&lives[..n]));
            assert!(previously.iter().all(|id| now.contains(id)), "lost an achievement at {n}");
            previously = now;
        }
    }

    #[test]
    fn test_order_independent() {
        let mut lives = history(40, 4);
        let forward = ids(&check_all(&lives));
        lives.reverse();
        assert_eq!(forward, ids(&check_all(&lives)));
    }

    #[test]
    fn test_check_new_skips_unlocked() {
        let lives = history(5, 5);
        let all = check_all(&lives);
        assert!(ids(&all).contains(&AchievementId::FirstLife));
        let fresh = check_new(&lives, &["first_life".to_string()]);
        assert!(!ids(&fresh).contains(&AchievementId::FirstLife));
        assert_eq!(fresh.len(), all.len() - 1);
        assert_eq!(check_new(&lives, &lives_ids(&all)), vec![]);
    }

    fn lives_ids(all: &[Achievement]) -> Vec<String> {
        all.iter().map(|a| a.id.as_str().to_string()).collect()
    }

    #[test]
    fn test_legendary_soul_needs_legendary_life() {
        let mut lives = history(3, 6);
        for l in &mut lives {
            l.rarity = Rarity::Common;
        }
        assert!(!AchievementId::LegendarySoul.is_met(&lives));
        lives[1].rarity = Rarity::Legendary;
        assert!(AchievementId::LegendarySoul.is_met(&lives));
    }

    #[test]
    fn test_string_ids_round_trip() {
        for id in AchievementId::ALL {
            assert_eq!(AchievementId::from_str_id(id.as_str()), Some(id));
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
        assert_eq!(AchievementId::from_str_id("nope"), None);
    }
}
