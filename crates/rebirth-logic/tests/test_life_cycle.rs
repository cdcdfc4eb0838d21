//! Integration tests for the full engine loop.
//!
//! Exercises: KarmaProfile → generate_life → rarity → mode overlay
//! → LifeJourney → achievements → statistics → mode unlocks
//!
//! All tests are pure logic with seeded randomness.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rebirth_logic::achievements::{check_all, check_new, AchievementId};
use rebirth_logic::generator::generate_life;
use rebirth_logic::journey::{JourneyStep, LifeJourney};
use rebirth_logic::karma::{calculate_soul_level, KarmaProfile};
use rebirth_logic::life::{ReincarnationResult, Rarity};
use rebirth_logic::modes::GameMode;
use rebirth_logic::rarity::calculate_rarity;
use rebirth_logic::statistics::PlayerStatistics;

// ── Helpers ────────────────────────────────────────────────────────────

/// Play `n` classic lives, threading the karma profile through each.
fn play(n: usize, seed: u64) -> (Vec<ReincarnationResult>, KarmaProfile) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut profile = KarmaProfile::new(0);
    let mut history = Vec::with_capacity(n);
    for i in 0..n {
        let life = generate_life(GameMode::Classic, Some(&profile), i as u64, &mut rng);
        profile = life.karma_profile;
        history.push(life.result);
    }
    (history, profile)
}

// ── Karma loop ─────────────────────────────────────────────────────────

#[test]
fn karma_profile_threads_through_lives() {
    let (history, profile) = play(60, 1);
    assert_eq!(profile.life_count, 60);
    assert!(profile.is_balanced());

    let recorded: i64 = history
        .iter()
        .flat_map(|l| l.karma_events.iter().flatten())
        .map(|e| e.value)
        .sum();
    assert_eq!(profile.total_karma, recorded);
}

#[test]
fn soul_experience_counts_lives() {
    let (_, profile) = play(30, 2);
    let soul = calculate_soul_level(&profile);
    assert_eq!(soul.experience, (profile.total_karma + 300).max(0));
}

#[test]
fn deterministic_with_seed() {
    let (a, pa) = play(10, 3);
    let (b, pb) = play(10, 3);
    assert_eq!(a, b);
    assert_eq!(pa, pb);
}

// ── Rarity ─────────────────────────────────────────────────────────────

#[test]
fn classic_rarity_matches_scorer() {
    let (history, _) = play(500, 4);
    for life in &history {
        assert_eq!(life.rarity, calculate_rarity(life));
    }
    let stats = PlayerStatistics::from_history(&history, &[]);
    let counted: u32 = Rarity::ALL.iter().map(|r| stats.count_of(*r)).sum();
    assert_eq!(counted, 500);
}

// ── Journey ────────────────────────────────────────────────────────────

#[test]
fn every_generated_life_can_be_journeyed() {
    let (history, profile) = play(20, 5);
    let mut rng = StdRng::seed_from_u64(5);
    for life in &history {
        let mut journey = LifeJourney::start(life, &profile, &mut rng);
        let mut completed = 0;
        for _ in 0..1_000 {
            if let Some(event) = journey.pending_decision() {
                let choice = (event.id.clone(), event.options.last().unwrap().id.clone());
                journey.resolve_decision(&choice.0, &choice.1).unwrap();
            }
            if let JourneyStep::Completed { .. } = journey.advance() {
                completed += 1;
            }
        }
        assert_eq!(completed, 1);
        assert_eq!(journey.state().current_age, life.lifespan + 1);
    }
}

// ── Achievements & modes ───────────────────────────────────────────────

#[test]
fn achievements_and_unlocks_grow_with_play() {
    let (history, _) = play(120, 6);

    let early = check_all(&history[..4]);
    let late = check_all(&history);
    assert!(late.len() > early.len());
    assert!(late.iter().any(|a| a.id == AchievementId::EternalWanderer));

    let unlocked: Vec<String> = early.iter().map(|a| a.id.as_str().to_string()).collect();
    let newly = check_new(&history, &unlocked);
    assert_eq!(newly.len(), late.len() - early.len());

    let stats = PlayerStatistics::from_history(&history, &[]);
    assert!(GameMode::Historical.is_unlocked(&stats));
    assert!(!GameMode::Historical.is_unlocked(&PlayerStatistics::from_history(&history[..9], &[])));
}

#[test]
fn mode_lives_carry_matching_overlay() {
    let mut rng = StdRng::seed_from_u64(7);
    for mode in GameMode::ALL {
        let life = generate_life(mode, None, 0, &mut rng);
        assert_eq!(life.mode_result.as_ref().map(|m| m.mode()), match mode {
            GameMode::Classic => None,
            other => Some(other),
        });
    }
}
