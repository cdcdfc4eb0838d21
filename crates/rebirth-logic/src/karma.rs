//! Karma ledger: the meta-progression carried across lives.
//!
//! The ledger works in two explicit phases around each generation:
//!
//! 1. [`calculate_influence`] derives generation bonuses from the current
//!    profile (read-only).
//! 2. [`generate_events_for_life`] draws the life's karma records, and
//!    [`update_profile`] folds them into a new profile.
//!
//! The profile total always equals the sum of its five category totals.
//!
//! ```
//! use rebirth_logic::karma::{calculate_influence, calculate_soul_level, KarmaProfile};
//!
//! let mut profile = KarmaProfile::new(0);
//! profile.total_karma = 10_000;
//! profile.moral_karma = 10_000;
//! assert_eq!(calculate_influence(&profile).health_bonus, 30);
//! assert_eq!(calculate_soul_level(&profile).level, 10);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::life::{Country, ReincarnationResult};

/// The five karma categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KarmaCategory {
    Moral,
    Social,
    Environmental,
    Intellectual,
    Spiritual,
}

impl KarmaCategory {
    pub const ALL: [KarmaCategory; 5] = [
        KarmaCategory::Moral,
        KarmaCategory::Social,
        KarmaCategory::Environmental,
        KarmaCategory::Intellectual,
        KarmaCategory::Spiritual,
    ];
}

/// Karma-affecting actions. Six raise karma, six lower it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KarmaAction {
    HelpOthers,
    Charity,
    Honesty,
    EnvironmentalProtection,
    Teaching,
    Meditation,
    Harm,
    Dishonesty,
    Selfishness,
    EnvironmentalDamage,
    Ignorance,
    SpiritualNeglect,
}

impl KarmaAction {
    pub const ALL: [KarmaAction; 12] = [
        KarmaAction::HelpOthers,
        KarmaAction::Charity,
        KarmaAction::Honesty,
        KarmaAction::EnvironmentalProtection,
        KarmaAction::Teaching,
        KarmaAction::Meditation,
        KarmaAction::Harm,
        KarmaAction::Dishonesty,
        KarmaAction::Selfishness,
        KarmaAction::EnvironmentalDamage,
        KarmaAction::Ignorance,
        KarmaAction::SpiritualNeglect,
    ];

    /// Inclusive signed value range.
    pub fn value_range(self) -> (i64, i64) {
        match self {
            KarmaAction::HelpOthers => (5, 15),
            KarmaAction::Charity => (10, 25),
            KarmaAction::Honesty => (3, 10),
            KarmaAction::EnvironmentalProtection => (8, 20),
            KarmaAction::Teaching => (5, 18),
            KarmaAction::Meditation => (3, 12),
            KarmaAction::Harm => (-20, -5),
            KarmaAction::Dishonesty => (-12, -3),
            KarmaAction::Selfishness => (-10, -2),
            KarmaAction::EnvironmentalDamage => (-18, -5),
            KarmaAction::Ignorance => (-8, -2),
            KarmaAction::SpiritualNeglect => (-10, -3),
        }
    }

    pub fn category(self) -> KarmaCategory {
        match self {
            KarmaAction::Honesty | KarmaAction::Harm | KarmaAction::Dishonesty => {
                KarmaCategory::Moral
            }
            KarmaAction::HelpOthers | KarmaAction::Charity | KarmaAction::Selfishness => {
                KarmaCategory::Social
            }
            KarmaAction::EnvironmentalProtection | KarmaAction::EnvironmentalDamage => {
                KarmaCategory::Environmental
            }
            KarmaAction::Teaching | KarmaAction::Ignorance => KarmaCategory::Intellectual,
            KarmaAction::Meditation | KarmaAction::SpiritualNeglect => KarmaCategory::Spiritual,
        }
    }

    pub fn is_positive(self) -> bool {
        self.value_range().0 > 0
    }

    pub fn is_negative(self) -> bool {
        self.value_range().1 < 0
    }

    /// Localization key for the record description.
    pub fn description_key(self) -> &'static str {
        match self {
            KarmaAction::HelpOthers => "karma.action.help_others",
            KarmaAction::Charity => "karma.action.charity",
            KarmaAction::Honesty => "karma.action.honesty",
            KarmaAction::EnvironmentalProtection => "karma.action.environmental_protection",
            KarmaAction::Teaching => "karma.action.teaching",
            KarmaAction::Meditation => "karma.action.meditation",
            KarmaAction::Harm => "karma.action.harm",
            KarmaAction::Dishonesty => "karma.action.dishonesty",
            KarmaAction::Selfishness => "karma.action.selfishness",
            KarmaAction::EnvironmentalDamage => "karma.action.environmental_damage",
            KarmaAction::Ignorance => "karma.action.ignorance",
            KarmaAction::SpiritualNeglect => "karma.action.spiritual_neglect",
        }
    }
}

/// Life-stage buckets karma events are drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KarmaStage {
    Childhood,
    Youth,
    Adulthood,
    MiddleAge,
    OldAge,
}

impl KarmaStage {
    pub const ALL: [KarmaStage; 5] = [
        KarmaStage::Childhood,
        KarmaStage::Youth,
        KarmaStage::Adulthood,
        KarmaStage::MiddleAge,
        KarmaStage::OldAge,
    ];

    /// Inclusive age range `(start, end)`.
    pub fn ages(self) -> (u32, u32) {
        match self {
            KarmaStage::Childhood => (0, 12),
            KarmaStage::Youth => (13, 19),
            KarmaStage::Adulthood => (20, 39),
            KarmaStage::MiddleAge => (40, 59),
            KarmaStage::OldAge => (60, 100),
        }
    }

    pub fn event_count(self) -> usize {
        match self {
            KarmaStage::Childhood => 1,
            KarmaStage::Youth => 2,
            KarmaStage::Adulthood => 3,
            KarmaStage::MiddleAge => 2,
            KarmaStage::OldAge => 1,
        }
    }
}

/// Per-player karma totals. Singleton per player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KarmaProfile {
    pub total_karma: i64,
    pub moral_karma: i64,
    pub social_karma: i64,
    pub environmental_karma: i64,
    pub intellectual_karma: i64,
    pub spiritual_karma: i64,
    /// Number of lives generated so far.
    pub life_count: u32,
    /// Milliseconds since the Unix epoch.
    pub last_updated: u64,
}

impl KarmaProfile {
    /// Zeroed profile with no lives.
    pub fn new(now: u64) -> Self {
        Self {
            total_karma: 0,
            moral_karma: 0,
            social_karma: 0,
            environmental_karma: 0,
            intellectual_karma: 0,
            spiritual_karma: 0,
            life_count: 0,
            last_updated: now,
        }
    }

    pub fn category(&self, category: KarmaCategory) -> i64 {
        match category {
            KarmaCategory::Moral => self.moral_karma,
            KarmaCategory::Social => self.social_karma,
            KarmaCategory::Environmental => self.environmental_karma,
            KarmaCategory::Intellectual => self.intellectual_karma,
            KarmaCategory::Spiritual => self.spiritual_karma,
        }
    }

    fn category_mut(&mut self, category: KarmaCategory) -> &mut i64 {
        match category {
            KarmaCategory::Moral => &mut self.moral_karma,
            KarmaCategory::Social => &mut self.social_karma,
            KarmaCategory::Environmental => &mut self.environmental_karma,
            KarmaCategory::Intellectual => &mut self.intellectual_karma,
            KarmaCategory::Spiritual => &mut self.spiritual_karma,
        }
    }

    /// Whether the total matches the sum of the category totals.
    pub fn is_balanced(&self) -> bool {
        let sum: i64 = KarmaCategory::ALL.iter().map(|c| self.category(*c)).sum();
        sum == self.total_karma
    }
}

impl Default for KarmaProfile {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Zeroed profile, life count 0.
pub fn create_initial_profile(now: u64) -> KarmaProfile {
    KarmaProfile::new(now)
}

/// One karma event within a life.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KarmaRecord {
    pub id: String,
    pub life_id: String,
    pub timestamp: u64,
    pub action: KarmaAction,
    pub value: i64,
    pub category: KarmaCategory,
    pub description: String,
    pub country: Country,
    pub stage: KarmaStage,
    /// Age the event nominally happened at.
    pub age: u32,
}

/// Generation bonuses derived from a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KarmaInfluence {
    pub health_bonus: i32,
    pub luck_bonus: i32,
    /// Extra talents, 0-3.
    pub talent_bonus: u32,
    /// Social class shift, −2..=2.
    pub social_class_bonus: i32,
    pub lifespan_bonus: i32,
    pub special_abilities: Vec<String>,
}

impl KarmaInfluence {
    /// Influence of a fresh profile: no bonuses at all.
    pub fn neutral() -> Self {
        Self {
            health_bonus: 0,
            luck_bonus: 0,
            talent_bonus: 0,
            social_class_bonus: 0,
            lifespan_bonus: 0,
            special_abilities: Vec::new(),
        }
    }
}

fn scaled_bonus(total: i64, factor: f64, min: f64, max: f64) -> i32 {
    (total as f64 * factor).clamp(min, max).round() as i32
}

/// Derive generation bonuses. Each bonus is clamped independently.
pub fn calculate_influence(profile: &KarmaProfile) -> KarmaInfluence {
    let total = profile.total_karma;

    let talent_bonus = [
        profile.intellectual_karma > 50,
        profile.spiritual_karma > 100,
        profile.social_karma > 75,
    ]
    .iter()
    .filter(|crossed| **crossed)
    .count() as u32;

    let social_class_bonus = if total >= 200 {
        2
    } else if total >= 100 {
        1
    } else if total <= -200 {
        -2
    } else if total <= -100 {
        -1
    } else {
        0
    };

    KarmaInfluence {
        health_bonus: scaled_bonus(total, 0.15, -20.0, 30.0),
        luck_bonus: scaled_bonus(total, 0.2, -25.0, 35.0),
        talent_bonus,
        social_class_bonus,
        lifespan_bonus: scaled_bonus(total, 0.1, -15.0, 25.0),
        special_abilities: calculate_soul_level(profile).abilities,
    }
}

/// Derived soul progression tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoulLevel {
    /// 1-10.
    pub level: u8,
    pub experience: i64,
    /// 0 at max level.
    pub experience_to_next: i64,
    /// Every ability unlocked up to and including this level.
    pub abilities: Vec<String>,
    pub title: String,
}

struct SoulTier {
    level: u8,
    exp_required: i64,
    abilities: &'static [&'static str],
    title: &'static str,
}

static SOUL_TIERS: [SoulTier; 10] = [
    SoulTier { level: 1, exp_required: 0, abilities: &[], title: "soul.title.newborn" },
    SoulTier { level: 2, exp_required: 100, abilities: &["intuition"], title: "soul.title.awakening" },
    SoulTier { level: 3, exp_required: 250, abilities: &["empathy"], title: "soul.title.seeking" },
    SoulTier { level: 4, exp_required: 500, abilities: &["past_life_glimpse"], title: "soul.title.growing" },
    SoulTier { level: 5, exp_required: 1000, abilities: &["fortune_sense"], title: "soul.title.wise" },
    SoulTier { level: 6, exp_required: 2000, abilities: &["healing_aura"], title: "soul.title.enlightened" },
    SoulTier { level: 7, exp_required: 3500, abilities: &["destiny_weaving"], title: "soul.title.ascending" },
    SoulTier { level: 8, exp_required: 5500, abilities: &["karmic_shield"], title: "soul.title.transcendent" },
    SoulTier { level: 9, exp_required: 8000, abilities: &["rebirth_choice"], title: "soul.title.celestial" },
    SoulTier { level: 10, exp_required: 12000, abilities: &["eternal_memory"], title: "soul.title.eternal" },
];

pub fn calculate_soul_level(profile: &KarmaProfile) -> SoulLevel {
    let experience = (profile.total_karma + profile.life_count as i64 * 10).max(0);

    let index = SOUL_TIERS
        .iter()
        .rposition(|tier| tier.exp_required <= experience)
        .unwrap_or(0);
    let tier = &SOUL_TIERS[index];

    let experience_to_next = SOUL_TIERS
        .get(index + 1)
        .map_or(0, |next| next.exp_required - experience);

    let abilities = SOUL_TIERS[..=index]
        .iter()
        .flat_map(|t| t.abilities.iter().map(|a| a.to_string()))
        .collect();

    SoulLevel {
        level: tier.level,
        experience,
        experience_to_next,
        abilities,
        title: tier.title.to_string(),
    }
}

/// Candidate actions after karma bias: enlightened souls rarely sin,
/// fallen souls rarely do good.
fn candidate_actions(profile: &KarmaProfile, rng: &mut impl Rng) -> Vec<KarmaAction> {
    let enlightened = calculate_soul_level(profile).level > 5;
    let fallen = profile.total_karma < -50;

    let pool: Vec<KarmaAction> = KarmaAction::ALL
        .iter()
        .copied()
        .filter(|action| {
            if enlightened && action.is_negative() {
                rng.gen_bool(0.3)
            } else if fallen && action.is_positive() {
                rng.gen_bool(0.7)
            } else {
                true
            }
        })
        .collect();

    if pool.is_empty() {
        KarmaAction::ALL.to_vec()
    } else {
        pool
    }
}

/// Draw the karma records for one life.
///
/// Each stage bucket the life reaches (lifespan above its starting age)
/// contributes a fixed number of events.
pub fn generate_events_for_life(
    result: &ReincarnationResult,
    profile: &KarmaProfile,
    rng: &mut impl Rng,
) -> Vec<KarmaRecord> {
    let mut records = Vec::new();

    for stage in KarmaStage::ALL {
        let (start, end) = stage.ages();
        if result.lifespan <= start {
            continue;
        }
        let last_age = end.min(result.lifespan);

        for _ in 0..stage.event_count() {
            let pool = candidate_actions(profile, rng);
            let action = pool[rng.gen_range(0..pool.len())];
            let (min, max) = action.value_range();
            let n = records.len() as u64;

            records.push(KarmaRecord {
                id: format!("{}-karma-{}", result.id, n),
                life_id: result.id.clone(),
                timestamp: result.timestamp + n,
                action,
                value: rng.gen_range(min..=max),
                category: action.category(),
                description: action.description_key().to_string(),
                country: result.country,
                stage,
                age: rng.gen_range(start..=last_age),
            });
        }
    }

    records
}

/// Fold a life's karma records into the profile and count the life.
pub fn update_profile(profile: &KarmaProfile, events: &[KarmaRecord], now: u64) -> KarmaProfile {
    let mut next = profile.clone();
    for event in events {
        next.total_karma += event.value;
        *next.category_mut(event.category) += event.value;
    }
    next.life_count += 1;
    next.last_updated = now;

    debug_assert!(next.is_balanced(), "karma categories diverged from total");
    log::debug!(
        "karma folded: {} events, total {} -> {}, lives {}",
        events.len(),
        profile.total_karma,
        next.total_karma,
        next.life_count
    );
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_life;
    use crate::modes::GameMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn profile_with_total(total: i64) -> KarmaProfile {
        let mut p = KarmaProfile::new(0);
        p.total_karma = total;
        p.moral_karma = total;
        p
    }

    #[test]
    fn test_initial_profile_is_zeroed() {
        let p = create_initial_profile(42);
        assert_eq!(p.total_karma, 0);
        assert_eq!(p.life_count, 0);
        assert_eq!(p.last_updated, 42);
        assert!(p.is_balanced());
    }

    #[test]
    fn test_influence_is_clamped() {
        let high = calculate_influence(&profile_with_total(10_000));
        assert_eq!(high.health_bonus, 30);
        assert_eq!(high.luck_bonus, 35);
        assert_eq!(high.lifespan_bonus, 25);
        assert_eq!(high.social_class_bonus, 2);

        let low = calculate_influence(&profile_with_total(-10_000));
        assert_eq!(low.health_bonus, -20);
        assert_eq!(low.luck_bonus, -25);
        assert_eq!(low.lifespan_bonus, -15);
        assert_eq!(low.social_class_bonus, -2);
    }

    #[test]
    fn test_influence_is_pure() {
        let p = profile_with_total(137);
        assert_eq!(calculate_influence(&p), calculate_influence(&p));
    }

    #[test]
    fn test_influence_scales_linearly_inside_bounds() {
        let inf = calculate_influence(&profile_with_total(100));
        assert_eq!(inf.health_bonus, 15);
        assert_eq!(inf.luck_bonus, 20);
        assert_eq!(inf.lifespan_bonus, 10);
        assert_eq!(inf.social_class_bonus, 1);
    }

    #[test]
    fn test_social_class_steps() {
        let bonus = |t| calculate_influence(&profile_with_total(t)).social_class_bonus;
        assert_eq!(bonus(-250), -2);
        assert_eq!(bonus(-150), -1);
        assert_eq!(bonus(0), 0);
        assert_eq!(bonus(99), 0);
        assert_eq!(bonus(150), 1);
        assert_eq!(bonus(200), 2);
    }

    #[test]
    fn test_talent_bonus_counts_thresholds() {
        let mut p = KarmaProfile::new(0);
        p.intellectual_karma = 51;
        p.spiritual_karma = 101;
        p.social_karma = 76;
        p.total_karma = 51 + 101 + 76;
        assert_eq!(calculate_influence(&p).talent_bonus, 3);

        p.social_karma = 75;
        p.total_karma -= 1;
        assert_eq!(calculate_influence(&p).talent_bonus, 2);
    }

    #[test]
    fn test_soul_level_walks_table() {
        let fresh = calculate_soul_level(&KarmaProfile::new(0));
        assert_eq!(fresh.level, 1);
        assert_eq!(fresh.experience, 0);
        assert_eq!(fresh.experience_to_next, 100);
        assert!(fresh.abilities.is_empty());

        let mut p = profile_with_total(230);
        p.life_count = 2; // 230 + 20 = 250
        let lvl = calculate_soul_level(&p);
        assert_eq!(lvl.level, 3);
        assert_eq!(lvl.experience_to_next, 250);
        assert_eq!(lvl.abilities, vec!["intuition", "empathy"]);
    }

    #[test]
    fn test_soul_experience_never_negative() {
        let lvl = calculate_soul_level(&profile_with_total(-500));
        assert_eq!(lvl.experience, 0);
        assert_eq!(lvl.level, 1);
    }

    #[test]
    fn test_max_level_has_nothing_to_next() {
        let lvl = calculate_soul_level(&profile_with_total(50_000));
        assert_eq!(lvl.level, 10);
        assert_eq!(lvl.experience_to_next, 0);
        assert_eq!(lvl.abilities.len(), 9);
    }

    #[test]
    fn test_long_life_draws_nine_events() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut life = generate_life(GameMode::Classic, None, 0, &mut rng).result;
        life.lifespan = 80;
        let events = generate_events_for_life(&life, &KarmaProfile::new(0), &mut rng);
        assert_eq!(events.len(), 9);
        for e in &events {
            let (min, max) = e.action.value_range();
            assert!(e.value >= min && e.value <= max);
            assert_eq!(e.category, e.action.category());
            assert_eq!(e.life_id, life.id);
        }
    }

    #[test]
    fn test_short_life_skips_late_buckets() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut life = generate_life(GameMode::Classic, None, 0, &mut rng).result;
        life.lifespan = 20;
        // Childhood (1) + youth (2); adulthood starts at 20 and is not exceeded.
        let events = generate_events_for_life(&life, &KarmaProfile::new(0), &mut rng);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|e| e.age <= 20));
    }

    #[test]
    fn test_enlightened_souls_skew_positive() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut life = generate_life(GameMode::Classic, None, 0, &mut rng).result;
        life.lifespan = 90;
        let saint = profile_with_total(5_000);
        let mut positive = 0;
        let mut total = 0;
        for _ in 0..200 {
            for e in generate_events_for_life(&life, &saint, &mut rng) {
                total += 1;
                if e.value > 0 {
                    positive += 1;
                }
            }
        }
        assert!(positive as f64 / total as f64 > 0.6);
    }

    fn positive_share(profile: &KarmaProfile, seed: u64) -> f64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut life = generate_life(GameMode::Classic, None, 0, &mut rng).result;
        life.lifespan = 90;
        let events: Vec<_> = (0..200)
            .flat_map(|_| generate_events_for_life(&life, profile, &mut rng))
            .collect();
        events.iter().filter(|e| e.value > 0).count() as f64 / events.len() as f64
    }

    #[test]
    fn test_fallen_souls_skew_negative() {
        let neutral = positive_share(&KarmaProfile::new(0), 15);
        let fallen = positive_share(&profile_with_total(-500), 15);
        assert!((neutral - 0.5).abs() < 0.05, "neutral share {neutral}");
        // 6 negatives plus ~4.2 surviving positives per pool
        assert!(fallen < neutral - 0.04, "fallen {fallen} vs neutral {neutral}");
        assert!(fallen > 0.3, "positives are thinned, not removed: {fallen}");
    }

    /// Rng whose every `gen_bool(p < 1)` comes up false.
    struct Unlucky;

    impl rand::RngCore for Unlucky {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xFF);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_empty_pool_falls_back_to_every_action() {
        // Enlightened by life count while still below -50 total.
        let mut profile = profile_with_total(-100);
        profile.life_count = 300;
        assert!(calculate_soul_level(&profile).level > 5);

        assert_eq!(candidate_actions(&profile, &mut Unlucky), KarmaAction::ALL.to_vec());
        assert_eq!(
            candidate_actions(&profile_with_total(-500), &mut Unlucky),
            KarmaAction::ALL
                .iter()
                .copied()
                .filter(|a| a.is_negative())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_update_preserves_category_sum() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut profile = KarmaProfile::new(0);
        for i in 0..50 {
            let life = generate_life(GameMode::Classic, Some(&profile), i, &mut rng);
            let events = generate_events_for_life(&life.result, &profile, &mut rng);
            profile = update_profile(&profile, &events, i);
            assert!(profile.is_balanced());
        }
        assert_eq!(profile.life_count, 50);
    }

    #[test]
    fn test_update_counts_life_without_events() {
        let p = update_profile(&KarmaProfile::new(0), &[], 99);
        assert_eq!(p.life_count, 1);
        assert_eq!(p.total_karma, 0);
        assert_eq!(p.last_updated, 99);
    }
}
