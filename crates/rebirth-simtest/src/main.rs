//! Rebirth Headless Simulation Harness
//!
//! Sweeps the engine statistically: thousands of seeded generations,
//! karma folds, journeys and a full session export/import. Runs entirely
//! in-process with an in-memory store.
//!
//! Usage:
//!   cargo run -p rebirth-simtest
//!   cargo run -p rebirth-simtest -- --verbose
//!   RUST_LOG=debug cargo run -p rebirth-simtest

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use rebirth_core::prelude::*;
use rebirth_logic::achievements::check_all;
use rebirth_logic::catalog::country_weights;
use rebirth_logic::generator::{generate_life, MAX_TALENTS};
use rebirth_logic::journey::{JourneyStep, LifeJourney};
use rebirth_logic::karma::{calculate_influence, KarmaProfile};
use rebirth_logic::life::{Era, Rarity, ReincarnationResult};
use rebirth_logic::rarity::calculate_rarity;
use rebirth_logic::sampler::weighted_pick;

const SEED: u64 = 0x5EED;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let verbose = std::env::args().any(|a| a == "--verbose");
    log::info!("harness seed {:#x}", SEED);
    println!("=== Rebirth Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Weighted sampler frequencies
    results.extend(validate_sampler(verbose));

    // 2. Life generation sweep
    results.extend(validate_generation(verbose));

    // 3. Karma ledger
    results.extend(validate_karma(verbose));

    // 4. Life journeys
    results.extend(validate_journeys(verbose));

    // 5. Achievements
    results.extend(validate_achievements(verbose));

    // 6. Session export/import
    results.extend(validate_session_round_trip(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn classic_lives(n: usize, seed: u64) -> Vec<ReincarnationResult> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|i| generate_life(GameMode::Classic, None, i as u64, &mut rng).result)
        .collect()
}

// ── 1. Weighted Sampler ─────────────────────────────────────────────────

fn validate_sampler(verbose: bool) -> Vec<TestResult> {
    println!("--- Weighted Sampler ---");
    let mut results = Vec::new();

    const DRAWS: usize = 100_000;
    const EMPTY: [(u8, f64); 0] = [];
    let table = country_weights();
    let total_weight: f64 = table.iter().map(|(_, w)| w).sum();
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut counts = BTreeMap::new();
    for _ in 0..DRAWS {
        if let Some(country) = weighted_pick(&mut rng, &table) {
            *counts.entry(*country).or_insert(0usize) += 1;
        }
    }

    let mut worst = 0.0f64;
    for (country, weight) in &table {
        let expected = weight / total_weight;
        let observed = counts.get(country).copied().unwrap_or(0) as f64 / DRAWS as f64;
        worst = worst.max((expected - observed).abs());
        if verbose {
            println!("  {:?}: expected {:.4} observed {:.4}", country, expected, observed);
        }
    }
    results.push(TestResult {
        name: "sampler_country_frequencies".into(),
        passed: worst < 0.01,
        detail: format!("max deviation {:.4} over {} draws", worst, DRAWS),
    });

    results.push(TestResult {
        name: "sampler_empty_table".into(),
        passed: weighted_pick(&mut rng, &EMPTY).is_none(),
        detail: "empty table yields nothing".into(),
    });

    results
}

// ── 2. Generation ───────────────────────────────────────────────────────

fn validate_generation(verbose: bool) -> Vec<TestResult> {
    println!("--- Life Generation ---");
    let mut results = Vec::new();

    const LIVES: usize = 20_000;
    let lives = classic_lives(LIVES, SEED);

    let bounded = lives.iter().all(|l| {
        l.health <= 100 && l.luck <= 100 && l.lifespan >= 20 && l.talents.len() <= MAX_TALENTS
    });
    results.push(TestResult {
        name: "generation_bounds".into(),
        passed: bounded,
        detail: format!("{} lives within attribute bounds", LIVES),
    });

    let rarity_consistent = lives.iter().all(|l| l.rarity == calculate_rarity(l));
    results.push(TestResult {
        name: "generation_rarity_deterministic".into(),
        passed: rarity_consistent,
        detail: "stored rarity equals rescored rarity".into(),
    });

    let mut eras = BTreeMap::new();
    for l in &lives {
        *eras.entry(l.era).or_insert(0usize) += 1;
    }
    let share = |era: Era| eras.get(&era).copied().unwrap_or(0) as f64 / LIVES as f64;
    let era_ok = (share(Era::Ancient) - 0.02).abs() < 0.005
        && (share(Era::Medieval) - 0.03).abs() < 0.006
        && (share(Era::Future) - 0.01).abs() < 0.004;
    results.push(TestResult {
        name: "generation_era_distribution".into(),
        passed: era_ok,
        detail: format!(
            "ancient {:.3} medieval {:.3} future {:.3} modern {:.3}",
            share(Era::Ancient),
            share(Era::Medieval),
            share(Era::Future),
            share(Era::Modern)
        ),
    });

    let mut tiers = BTreeMap::new();
    for l in &lives {
        *tiers.entry(l.rarity).or_insert(0usize) += 1;
    }
    let count = |r: Rarity| tiers.get(&r).copied().unwrap_or(0);
    results.push(TestResult {
        name: "generation_rarity_ordering".into(),
        passed: count(Rarity::Common) > count(Rarity::Rare)
            && count(Rarity::Rare) >= count(Rarity::Legendary),
        detail: format!("{:?}", tiers),
    });
    if verbose {
        for r in Rarity::ALL {
            println!("  {:>10}: {}", r.as_str(), count(r));
        }
    }

    let mut rng = StdRng::seed_from_u64(SEED + 1);
    let overlays_ok = GameMode::ALL.iter().all(|mode| {
        (0..200).all(|i| {
            let g = generate_life(*mode, None, i, &mut rng);
            let matches = match mode {
                GameMode::Classic => g.mode_result.is_none(),
                other => g.mode_result.as_ref().map(|m| m.mode()) == Some(*other),
            };
            matches && g.result.lifespan >= 20
        })
    });
    results.push(TestResult {
        name: "generation_mode_overlays".into(),
        passed: overlays_ok,
        detail: "every mode attaches its own overlay".into(),
    });

    results
}

// ── 3. Karma ────────────────────────────────────────────────────────────

fn validate_karma(_verbose: bool) -> Vec<TestResult> {
    println!("--- Karma Ledger ---");
    let mut results = Vec::new();

    let mut rng = StdRng::seed_from_u64(SEED + 2);
    let mut profile = KarmaProfile::new(0);
    let mut balanced = true;
    for i in 0..2_000u64 {
        profile = generate_life(GameMode::Classic, Some(&profile), i, &mut rng).karma_profile;
        balanced &= profile.is_balanced();
    }
    results.push(TestResult {
        name: "karma_categories_sum_to_total".into(),
        passed: balanced && profile.life_count == 2_000,
        detail: format!(
            "total {} after {} lives",
            profile.total_karma, profile.life_count
        ),
    });

    let mut saint = KarmaProfile::new(0);
    saint.total_karma = 10_000;
    let influence = calculate_influence(&saint);
    results.push(TestResult {
        name: "karma_influence_clamped".into(),
        passed: influence.health_bonus == 30 && influence == calculate_influence(&saint),
        detail: format!("health bonus {} at total 10000", influence.health_bonus),
    });

    results
}

// ── 4. Journeys ─────────────────────────────────────────────────────────

fn validate_journeys(_verbose: bool) -> Vec<TestResult> {
    println!("--- Life Journeys ---");
    let mut results = Vec::new();

    let lives = classic_lives(300, SEED + 3);
    let karma = KarmaProfile::new(0);
    let mut rng = StdRng::seed_from_u64(SEED + 3);

    let mut exact_once = 0;
    let mut attributes_bounded = true;
    for life in &lives {
        let mut journey = LifeJourney::start(life, &karma, &mut rng);
        let mut completions = 0;
        for _ in 0..(life.lifespan + 20) {
            if let Some(event) = journey.pending_decision().cloned() {
                if let Some(option) = event.options.first() {
                    let _ = journey.resolve_decision(&event.id, &option.id);
                }
            }
            if let JourneyStep::Completed { age } = journey.advance() {
                if age == life.lifespan + 1 {
                    completions += 1;
                }
            }
        }
        let a = &journey.state().attributes;
        attributes_bounded &= [a.health, a.happiness, a.wealth, a.intelligence]
            .iter()
            .all(|v| *v <= 100);
        if completions == 1 && journey.state().is_completed {
            exact_once += 1;
        }
    }
    results.push(TestResult {
        name: "journey_completes_exactly_once".into(),
        passed: exact_once == lives.len(),
        detail: format!("{}/{} journeys completed once", exact_once, lives.len()),
    });
    results.push(TestResult {
        name: "journey_attributes_clamped".into(),
        passed: attributes_bounded,
        detail: "attributes stay within 0..=100".into(),
    });

    results
}

// ── 5. Achievements ─────────────────────────────────────────────────────

fn validate_achievements(_verbose: bool) -> Vec<TestResult> {
    println!("--- Achievements ---");
    let mut results = Vec::new();

    let lives = classic_lives(250, SEED + 4);
    let mut monotonic = true;
    let mut previous = 0;
    for n in 0..=lives.len() {
        let now = check_all(&lives[..n]);
        let prev = check_all(&lives[..n.saturating_sub(1)]);
        monotonic &= prev.iter().all(|a| now.contains(a));
        monotonic &= now.len() >= previous;
        previous = now.len();
    }
    results.push(TestResult {
        name: "achievements_monotonic".into(),
        passed: monotonic,
        detail: format!("{} achievements after {} lives", previous, lives.len()),
    });

    results
}

// ── 6. Session Round Trip ───────────────────────────────────────────────

fn validate_session_round_trip(_verbose: bool) -> Vec<TestResult> {
    println!("--- Session Export/Import ---");
    let mut results = Vec::new();

    let settings = GameSettings {
        seed: Some(SEED),
        ..GameSettings::default()
    };
    let mut source = GameSession::new(MemoryStore::new(), settings, 0);
    let mut generated = 0;
    for i in 0..40 {
        if source.generate(GameMode::Classic, 1_000 + i).is_ok() {
            generated += 1;
        }
    }

    let json = match source.export_json(rebirth_core::unix_millis()) {
        Ok(json) => json,
        Err(e) => {
            results.push(TestResult {
                name: "session_export".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let mut target = GameSession::new(MemoryStore::new(), GameSettings::default(), 0);
    let imported = target.import_json(&json, 0);
    let same = imported.is_ok()
        && target.history() == source.history()
        && target.karma_profile() == source.karma_profile()
        && target.settings() == source.settings();
    results.push(TestResult {
        name: "session_round_trip".into(),
        passed: generated == 40 && same,
        detail: format!("{} lives, {} bytes of JSON", generated, json.len()),
    });

    let rejected = target.import_json("{\"data\": {}}", 0).is_err() && target.history().len() == 40;
    results.push(TestResult {
        name: "session_rejects_bad_import".into(),
        passed: rejected,
        detail: "versionless document refused without clearing".into(),
    });

    results
}
