//! The generated life record and its categorical fields.
//!
//! A [`ReincarnationResult`] is created once by the generator and never
//! mutated afterwards; journeys and statistics only read it.

use serde::{Deserialize, Serialize};

use crate::catalog::CountryInfo;
use crate::karma::{KarmaInfluence, KarmaRecord};

/// Birth countries, weighted by population in [`crate::catalog::COUNTRIES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Country {
    China,
    India,
    UnitedStates,
    Indonesia,
    Pakistan,
    Brazil,
    Nigeria,
    Bangladesh,
    Russia,
    Mexico,
    Japan,
    Germany,
    UnitedKingdom,
    France,
}

impl Country {
    pub const ALL: [Country; 14] = [
        Country::China,
        Country::India,
        Country::UnitedStates,
        Country::Indonesia,
        Country::Pakistan,
        Country::Brazil,
        Country::Nigeria,
        Country::Bangladesh,
        Country::Russia,
        Country::Mexico,
        Country::Japan,
        Country::Germany,
        Country::UnitedKingdom,
        Country::France,
    ];

    /// Static demographic data for this country.
    pub fn info(self) -> &'static CountryInfo {
        crate::catalog::country_info(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Social class tier, ordered low to high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialClass {
    Low,
    Middle,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Birthplace {
    Urban,
    Suburban,
    Rural,
}

impl Birthplace {
    pub const ALL: [Birthplace; 3] = [Birthplace::Urban, Birthplace::Suburban, Birthplace::Rural];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyStructure {
    OnlyChild,
    Siblings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Era {
    Ancient,
    Medieval,
    Modern,
    Future,
}

impl Era {
    pub const ALL: [Era; 4] = [Era::Ancient, Era::Medieval, Era::Modern, Era::Future];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zodiac {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Zodiac {
    pub const ALL: [Zodiac; 12] = [
        Zodiac::Aries,
        Zodiac::Taurus,
        Zodiac::Gemini,
        Zodiac::Cancer,
        Zodiac::Leo,
        Zodiac::Virgo,
        Zodiac::Libra,
        Zodiac::Scorpio,
        Zodiac::Sagittarius,
        Zodiac::Capricorn,
        Zodiac::Aquarius,
        Zodiac::Pisces,
    ];
}

/// Rarity tier of a generated life, ordered common to legendary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

/// One generated life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReincarnationResult {
    pub id: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub country: Country,
    pub gender: Gender,
    pub social_class: SocialClass,
    pub birthplace: Birthplace,
    pub family_structure: FamilyStructure,
    pub era: Era,
    /// 0-100.
    pub health: u8,
    /// 0-100.
    pub luck: u8,
    /// Years, never below 20.
    pub lifespan: u32,
    pub talents: Vec<String>,
    pub personality: Vec<String>,
    pub challenges: Vec<String>,
    pub opportunities: Vec<String>,
    pub birth_season: Season,
    pub zodiac: Zodiac,
    pub rarity: Rarity,
    /// Karma bonuses applied when this life was generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub karma_influence: Option<KarmaInfluence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub karma_events: Option<Vec<KarmaRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_events: Option<Vec<String>>,
}

impl ReincarnationResult {
    pub fn has_talent(&self, talent: &str) -> bool {
        self.talents.iter().any(|t| t == talent)
    }
}
