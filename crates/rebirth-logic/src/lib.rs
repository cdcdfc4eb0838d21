//! Pure life-generation logic for Rebirth.
//!
//! This crate contains the whole game engine independent of any storage,
//! renderer, or runtime. Functions take plain data plus an explicit random
//! source and return results, making them unit-testable with a seeded RNG.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`achievements`] | Achievement catalog and history predicates |
//! | [`catalog`] | Countries, talents, traits, challenges, opportunities |
//! | [`generator`] | One reincarnation per call: sampling, karma bonuses, mode blend |
//! | [`journey`] | Life journey state machine (stages, attributes, decisions) |
//! | [`karma`] | Karma ledger, influence bonuses, soul levels, per-life events |
//! | [`life`] | `ReincarnationResult` and its categorical fields |
//! | [`life_events`] | Decision event templates and per-stage event scheduling |
//! | [`modes`] | Game modes, unlock rules, historical/fantasy/sci-fi overlays |
//! | [`rarity`] | Deterministic rarity scoring |
//! | [`sampler`] | Weighted and distinct random sampling |
//! | [`settings`] | Player settings and validation |
//! | [`statistics`] | Aggregate player statistics over the life history |
//!
//! ```
//! use rand::SeedableRng;
//! use rebirth_logic::generator::generate_life;
//! use rebirth_logic::modes::GameMode;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let life = generate_life(GameMode::Classic, None, 1_700_000_000_000, &mut rng);
//! assert!(life.result.lifespan >= 20);
//! assert_eq!(life.karma_profile.life_count, 1);
//! ```

pub mod achievements;
pub mod catalog;
pub mod generator;
pub mod journey;
pub mod karma;
pub mod life;
pub mod life_events;
pub mod modes;
pub mod rarity;
pub mod sampler;
pub mod settings;
pub mod statistics;
