//! Static catalogs the generator draws from.
//!
//! Country weights are population shares (percent of world population),
//! life expectancy is in years, development index is HDI-like (0-1).

use crate::life::Country;

/// Demographic data for one birth country.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryInfo {
    pub country: Country,
    pub weight: f64,
    pub life_expectancy: f64,
    pub development_index: f64,
}

/// Indexed by `Country as usize`; order must match the enum.
pub static COUNTRIES: [CountryInfo; 14] = [
    CountryInfo { country: Country::China, weight: 18.5, life_expectancy: 77.0, development_index: 0.768 },
    CountryInfo { country: Country::India, weight: 17.7, life_expectancy: 70.0, development_index: 0.633 },
    CountryInfo { country: Country::UnitedStates, weight: 4.3, life_expectancy: 79.0, development_index: 0.921 },
    CountryInfo { country: Country::Indonesia, weight: 3.5, life_expectancy: 72.0, development_index: 0.705 },
    CountryInfo { country: Country::Pakistan, weight: 2.8, life_expectancy: 67.0, development_index: 0.544 },
    CountryInfo { country: Country::Brazil, weight: 2.7, life_expectancy: 76.0, development_index: 0.754 },
    CountryInfo { country: Country::Nigeria, weight: 2.6, life_expectancy: 55.0, development_index: 0.535 },
    CountryInfo { country: Country::Bangladesh, weight: 2.2, life_expectancy: 73.0, development_index: 0.661 },
    CountryInfo { country: Country::Russia, weight: 1.9, life_expectancy: 73.0, development_index: 0.822 },
    CountryInfo { country: Country::Mexico, weight: 1.7, life_expectancy: 75.0, development_index: 0.758 },
    CountryInfo { country: Country::Japan, weight: 1.6, life_expectancy: 85.0, development_index: 0.925 },
    CountryInfo { country: Country::Germany, weight: 1.1, life_expectancy: 81.0, development_index: 0.942 },
    CountryInfo { country: Country::UnitedKingdom, weight: 0.9, life_expectancy: 81.0, development_index: 0.929 },
    CountryInfo { country: Country::France, weight: 0.9, life_expectancy: 82.0, development_index: 0.903 },
];

pub fn country_info(country: Country) -> &'static CountryInfo {
    &COUNTRIES[country as usize]
}

/// `(country, weight)` table for the weighted sampler.
pub fn country_weights() -> Vec<(Country, f64)> {
    COUNTRIES.iter().map(|c| (c.country, c.weight)).collect()
}

pub static TALENTS: [&str; 16] = [
    "music",
    "art",
    "sports",
    "mathematics",
    "languages",
    "leadership",
    "science",
    "writing",
    "cooking",
    "technology",
    "dance",
    "acting",
    "memory",
    "empathy",
    "business",
    "craftsmanship",
];

pub static PERSONALITY_TRAITS: [&str; 14] = [
    "optimistic",
    "curious",
    "stubborn",
    "kind",
    "ambitious",
    "introverted",
    "extroverted",
    "patient",
    "impulsive",
    "loyal",
    "creative",
    "anxious",
    "humorous",
    "disciplined",
];

pub static CHALLENGES: [&str; 10] = [
    "poverty",
    "chronic_illness",
    "family_conflict",
    "discrimination",
    "natural_disaster",
    "war",
    "addiction",
    "loneliness",
    "disability",
    "political_instability",
];

pub static OPPORTUNITIES: [&str; 10] = [
    "scholarship",
    "mentor",
    "inheritance",
    "travel_abroad",
    "business_venture",
    "lucky_break",
    "supportive_community",
    "technological_boom",
    "artistic_patron",
    "political_career",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_table_aligned_with_enum() {
        for country in Country::ALL {
            assert_eq!(country_info(country).country, country);
        }
    }

    #[test]
    fn test_five_highly_developed_countries() {
        let developed = COUNTRIES
            .iter()
            .filter(|c| c.development_index > 0.9)
            .count();
        assert_eq!(developed, 5);
    }

    #[test]
    fn test_weights_positive() {
        assert!(country_weights().iter().all(|(_, w)| *w > 0.0));
    }
}
