//! Deterministic rarity scoring.

use crate::life::{Era, Rarity, ReincarnationResult, SocialClass};

/// Integer rarity score of a generated life.
pub fn rarity_score(result: &ReincarnationResult) -> u32 {
    let mut score = 0;
    if result.social_class == SocialClass::High {
        score += 2;
    }
    if result.health > 90 {
        score += 2;
    }
    if result.luck > 90 {
        score += 3;
    }
    if result.talents.len() > 3 {
        score += 2;
    }
    if result.era == Era::Future {
        score += 4;
    }
    if result.lifespan > 100 {
        score += 3;
    }
    if result.country.info().development_index > 0.9 {
        score += 1;
    }
    score
}

impl Rarity {
    pub fn from_score(score: u32) -> Self {
        match score {
            12.. => Rarity::Legendary,
            8..=11 => Rarity::Epic,
            5..=7 => Rarity::Rare,
            2..=4 => Rarity::Uncommon,
            _ => Rarity::Common,
        }
    }
}

pub fn calculate_rarity(result: &ReincarnationResult) -> Rarity {
    Rarity::from_score(rarity_score(result))
}
