//! Life generation: one reincarnation per call.
//!
//! Pipeline: karma influence → demographic sampling → attributes →
//! collections → lifespan → rarity → mode overlay and lifespan blend →
//! karma events folded into an updated profile. Nothing here persists;
//! the caller stores both the result and the updated profile.

use rand::Rng;

use crate::catalog::{country_weights, CHALLENGES, OPPORTUNITIES, PERSONALITY_TRAITS, TALENTS};
use crate::karma::{
    calculate_influence, generate_events_for_life, update_profile, KarmaInfluence, KarmaProfile,
    KarmaRecord,
};
use crate::life::*;
use crate::modes::{blend_lifespan, generate_overlay, GameMode, ModeSpecificResult};
use crate::rarity::calculate_rarity;
use crate::sampler::{pick, sample_keys, weighted_pick};

/// Talents never exceed this, whatever the karma bonus.
pub const MAX_TALENTS: usize = 6;

/// Everything one generation produces.
#[derive(Debug, Clone)]
pub struct GeneratedLife {
    pub result: ReincarnationResult,
    pub mode_result: Option<ModeSpecificResult>,
    /// Profile after folding this life's karma events.
    pub karma_profile: KarmaProfile,
}

impl GeneratedLife {
    pub fn karma_events(&self) -> &[KarmaRecord] {
        self.result.karma_events.as_deref().unwrap_or(&[])
    }
}

pub fn sample_country(rng: &mut impl Rng) -> Country {
    weighted_pick(rng, &country_weights())
        .copied()
        .unwrap_or(Country::China)
}

pub fn sample_gender(rng: &mut impl Rng) -> Gender {
    if rng.gen_bool(0.504) {
        Gender::Male
    } else {
        Gender::Female
    }
}

/// Three-way split at 0.6 / 0.9, shifted toward higher classes by good karma.
pub fn sample_social_class(rng: &mut impl Rng, social_class_bonus: i32) -> SocialClass {
    let low_cut = 0.6 - social_class_bonus as f64 * 0.1;
    let middle_cut = 0.9 - social_class_bonus as f64 * 0.05;
    let roll: f64 = rng.gen();
    if roll < low_cut {
        SocialClass::Low
    } else if roll < middle_cut {
        SocialClass::Middle
    } else {
        SocialClass::High
    }
}

pub fn sample_birthplace(rng: &mut impl Rng) -> Birthplace {
    Birthplace::ALL[rng.gen_range(0..Birthplace::ALL.len())]
}

pub fn sample_family_structure(rng: &mut impl Rng) -> FamilyStructure {
    if rng.gen_bool(0.3) {
        FamilyStructure::OnlyChild
    } else {
        FamilyStructure::Siblings
    }
}

/// Successive ranges: ancient 2%, medieval 3%, future 1%, modern the rest.
pub fn sample_era(rng: &mut impl Rng) -> Era {
    let roll: f64 = rng.gen();
    if roll < 0.02 {
        Era::Ancient
    } else if roll < 0.05 {
        Era::Medieval
    } else if roll < 0.06 {
        Era::Future
    } else {
        Era::Modern
    }
}

fn class_health_bonus(class: SocialClass) -> f64 {
    match class {
        SocialClass::High => 10.0,
        SocialClass::Middle => 5.0,
        SocialClass::Low => 0.0,
    }
}

pub fn roll_health(rng: &mut impl Rng, class: SocialClass, health_bonus: i32) -> u8 {
    let base = (rng.gen_range(40.0..90.0) + class_health_bonus(class)).round() as i32;
    (base + health_bonus).clamp(10, 100) as u8
}

pub fn roll_luck(rng: &mut impl Rng, luck_bonus: i32) -> u8 {
    let base = rng.gen_range(0.0..100.0_f64).round() as i32;
    (base + luck_bonus).clamp(0, 100) as u8
}

/// Base talent count (10% four, else 30% three, else 60% two, else one)
/// plus the karma bonus, capped at [`MAX_TALENTS`].
pub fn talent_count(rng: &mut impl Rng, talent_bonus: u32) -> usize {
    let base = if rng.gen_bool(0.1) {
        4
    } else if rng.gen_bool(0.3) {
        3
    } else if rng.gen_bool(0.6) {
        2
    } else {
        1
    };
    (base + talent_bonus as usize).min(MAX_TALENTS)
}

fn personality_count(rng: &mut impl Rng) -> usize {
    if rng.gen_bool(0.2) {
        4
    } else if rng.gen_bool(0.5) {
        3
    } else {
        2
    }
}

fn challenge_count(rng: &mut impl Rng) -> usize {
    if rng.gen_bool(0.15) {
        3
    } else if rng.gen_bool(0.4) {
        2
    } else {
        1
    }
}

fn opportunity_count(rng: &mut impl Rng) -> usize {
    if rng.gen_bool(0.2) {
        4
    } else if rng.gen_bool(0.5) {
        3
    } else {
        2
    }
}

/// Country life expectancy adjusted by class, health, and ±10 years of jitter.
pub fn base_lifespan(rng: &mut impl Rng, country: Country, class: SocialClass, health: u8) -> f64 {
    let class_adjust = match class {
        SocialClass::High => 8.0,
        SocialClass::Middle => 3.0,
        SocialClass::Low => -2.0,
    };
    country.info().life_expectancy
        + class_adjust
        + (health as f64 - 50.0) * 0.5
        + rng.gen_range(-10.0..10.0)
}

fn special_event_tags(result: &ReincarnationResult) -> Option<Vec<String>> {
    let mut tags = Vec::new();
    match result.era {
        Era::Ancient => tags.push("era_ancient".to_string()),
        Era::Medieval => tags.push("era_medieval".to_string()),
        Era::Future => tags.push("era_future".to_string()),
        Era::Modern => {}
    }
    if result.lifespan > 100 {
        tags.push("centenarian".to_string());
    }
    if result.luck >= 95 {
        tags.push("blessed_by_fortune".to_string());
    }
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

fn roll_base_life(
    influence: &KarmaInfluence,
    now: u64,
    rng: &mut impl Rng,
) -> ReincarnationResult {
    let id = format!("life-{}-{:08x}", now, rng.gen::<u32>());

    let country = sample_country(rng);
    let gender = sample_gender(rng);
    let social_class = sample_social_class(rng, influence.social_class_bonus);
    let birthplace = sample_birthplace(rng);
    let family_structure = sample_family_structure(rng);
    let era = sample_era(rng);

    let health = roll_health(rng, social_class, influence.health_bonus);
    let luck = roll_luck(rng, influence.luck_bonus);

    let talents_n = talent_count(rng, influence.talent_bonus);
    let talents = sample_keys(rng, &TALENTS, talents_n);
    let personality_n = personality_count(rng);
    let personality = sample_keys(rng, &PERSONALITY_TRAITS, personality_n);
    let challenges_n = challenge_count(rng);
    let challenges = sample_keys(rng, &CHALLENGES, challenges_n);
    let opportunities_n = opportunity_count(rng);
    let opportunities = sample_keys(rng, &OPPORTUNITIES, opportunities_n);

    let birth_season = *pick(rng, &Season::ALL).unwrap_or(&Season::Spring);
    let zodiac = *pick(rng, &Zodiac::ALL).unwrap_or(&Zodiac::Aries);

    let base = base_lifespan(rng, country, social_class, health);
    let lifespan = ((base + influence.lifespan_bonus as f64).round() as i64).max(20) as u32;

    ReincarnationResult {
        id,
        timestamp: now,
        country,
        gender,
        social_class,
        birthplace,
        family_structure,
        era,
        health,
        luck,
        lifespan,
        talents,
        personality,
        challenges,
        opportunities,
        birth_season,
        zodiac,
        rarity: Rarity::Common,
        karma_influence: Some(influence.clone()),
        karma_events: None,
        special_events: None,
    }
}

/// Generate one life for `mode`, biased by `karma` (a fresh profile when absent).
pub fn generate_life(
    mode: GameMode,
    karma: Option<&KarmaProfile>,
    now: u64,
    rng: &mut impl Rng,
) -> GeneratedLife {
    let profile = karma.cloned().unwrap_or_else(|| KarmaProfile::new(now));
    let influence = calculate_influence(&profile);

    let mut result = roll_base_life(&influence, now, rng);
    result.rarity = calculate_rarity(&result);

    let mode_result = generate_overlay(mode, &result, rng);
    if mode_result.is_some() {
        result.lifespan = blend_lifespan(result.lifespan, mode_result.as_ref());
    }
    result.special_events = special_event_tags(&result);

    let events = generate_events_for_life(&result, &profile, rng);
    let karma_profile = update_profile(&profile, &events, now);
    result.karma_events = Some(events);

    log::info!(
        "generated {} ({:?}, {:?}, {:?}, lifespan {}) in {:?} mode",
        result.id,
        result.country,
        result.social_class,
        result.rarity,
        result.lifespan,
        mode
    );

    GeneratedLife {
        result,
        mode_result,
        karma_profile,
    }
}
