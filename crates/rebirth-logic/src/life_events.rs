//! Scheduled life events and their decision templates.
//!
//! Birth, education, career change, marriage and achievement events carry
//! decision options. The other nine kinds are automatic: they are logged in
//! the journey when reached but ask nothing of the player.
//!
//! Each option has a probability weight (0-100) deciding whether it is
//! offered at all; an event whose options all fail the roll becomes
//! automatic.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::journey::{
    Attribute, CareerCategory, EnhancedLifeJourney, LifeStage, RelationshipKind,
};
use crate::karma::{calculate_soul_level, KarmaProfile};
use crate::life::ReincarnationResult;
use crate::sampler::pick;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeEventKind {
    Birth,
    Education,
    CareerChange,
    Marriage,
    Achievement,
    Illness,
    Travel,
    Friendship,
    Loss,
    Relocation,
    Hobby,
    Retirement,
    Childbirth,
    Windfall,
}

impl LifeEventKind {
    pub const ALL: [LifeEventKind; 14] = [
        LifeEventKind::Birth,
        LifeEventKind::Education,
        LifeEventKind::CareerChange,
        LifeEventKind::Marriage,
        LifeEventKind::Achievement,
        LifeEventKind::Illness,
        LifeEventKind::Travel,
        LifeEventKind::Friendship,
        LifeEventKind::Loss,
        LifeEventKind::Relocation,
        LifeEventKind::Hobby,
        LifeEventKind::Retirement,
        LifeEventKind::Childbirth,
        LifeEventKind::Windfall,
    ];

    pub fn title_key(self) -> &'static str {
        match self {
            LifeEventKind::Birth => "event.birth",
            LifeEventKind::Education => "event.education",
            LifeEventKind::CareerChange => "event.career_change",
            LifeEventKind::Marriage => "event.marriage",
            LifeEventKind::Achievement => "event.achievement",
            LifeEventKind::Illness => "event.illness",
            LifeEventKind::Travel => "event.travel",
            LifeEventKind::Friendship => "event.friendship",
            LifeEventKind::Loss => "event.loss",
            LifeEventKind::Relocation => "event.relocation",
            LifeEventKind::Hobby => "event.hobby",
            LifeEventKind::Retirement => "event.retirement",
            LifeEventKind::Childbirth => "event.childbirth",
            LifeEventKind::Windfall => "event.windfall",
        }
    }

    /// Decision options this kind can offer; empty for automatic kinds.
    fn option_templates(self) -> &'static [OptionTemplate] {
        match self {
            LifeEventKind::Birth => &BIRTH_OPTIONS,
            LifeEventKind::Education => &EDUCATION_OPTIONS,
            LifeEventKind::CareerChange => &CAREER_OPTIONS,
            LifeEventKind::Marriage => &MARRIAGE_OPTIONS,
            LifeEventKind::Achievement => &ACHIEVEMENT_OPTIONS,
            LifeEventKind::Illness
            | LifeEventKind::Travel
            | LifeEventKind::Friendship
            | LifeEventKind::Loss
            | LifeEventKind::Relocation
            | LifeEventKind::Hobby
            | LifeEventKind::Retirement
            | LifeEventKind::Childbirth
            | LifeEventKind::Windfall => &[],
        }
    }

    pub fn has_decisions(self) -> bool {
        !self.option_templates().is_empty()
    }
}

impl LifeStage {
    /// Event kinds that typically happen during this stage.
    pub fn common_events(self) -> &'static [LifeEventKind] {
        use LifeEventKind::*;
        match self {
            LifeStage::Infant => &[Birth, Illness, Relocation],
            LifeStage::Childhood => &[Education, Friendship, Hobby, Illness],
            LifeStage::Adolescence => &[Education, Friendship, Achievement, Hobby],
            LifeStage::Youth => &[Education, CareerChange, Travel, Friendship, Marriage],
            LifeStage::EarlyAdulthood => {
                &[CareerChange, Marriage, Childbirth, Achievement, Relocation]
            }
            LifeStage::MiddleAdulthood => &[CareerChange, Achievement, Loss, Windfall, Illness],
            LifeStage::LateAdulthood => &[Retirement, Travel, Loss, Hobby, Illness],
            LifeStage::Elderly => &[Retirement, Loss, Illness, Achievement],
        }
    }
}

/// One effect of choosing a decision option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Consequence {
    Attribute { attribute: Attribute, delta: i32 },
    AdvanceEducation,
    StartCareer { category: CareerCategory },
    Promotion,
    AddRelationship { kind: RelationshipKind },
    Karma { delta: i32 },
}

impl Consequence {
    const fn attr(attribute: Attribute, delta: i32) -> Self {
        Consequence::Attribute { attribute, delta }
    }
}

struct OptionTemplate {
    id: &'static str,
    consequences: &'static [Consequence],
    probability: u8,
}

use Attribute::*;

static BIRTH_OPTIONS: [OptionTemplate; 3] = [
    OptionTemplate {
        id: "nurture_curiosity",
        consequences: &[Consequence::attr(Intelligence, 5), Consequence::attr(Creativity, 5)],
        probability: 80,
    },
    OptionTemplate {
        id: "nurture_health",
        consequences: &[Consequence::attr(Health, 5), Consequence::attr(Resilience, 5)],
        probability: 80,
    },
    OptionTemplate {
        id: "nurture_social",
        consequences: &[Consequence::attr(Charisma, 5), Consequence::attr(Happiness, 5)],
        probability: 80,
    },
];

static EDUCATION_OPTIONS: [OptionTemplate; 3] = [
    OptionTemplate {
        id: "study_hard",
        consequences: &[
            Consequence::attr(Intelligence, 10),
            Consequence::attr(Happiness, -5),
            Consequence::AdvanceEducation,
            Consequence::Karma { delta: 2 },
        ],
        probability: 70,
    },
    OptionTemplate {
        id: "pursue_arts",
        consequences: &[
            Consequence::attr(Creativity, 10),
            Consequence::attr(Happiness, 5),
            Consequence::AdvanceEducation,
        ],
        probability: 60,
    },
    OptionTemplate {
        id: "drop_out",
        consequences: &[
            Consequence::attr(Intelligence, -5),
            Consequence::attr(Happiness, 5),
            Consequence::attr(Reputation, -5),
        ],
        probability: 30,
    },
];

static CAREER_OPTIONS: [OptionTemplate; 4] = [
    OptionTemplate {
        id: "corporate_job",
        consequences: &[
            Consequence::attr(Wealth, 15),
            Consequence::attr(Happiness, -5),
            Consequence::StartCareer { category: CareerCategory::Business },
        ],
        probability: 70,
    },
    OptionTemplate {
        id: "follow_passion",
        consequences: &[
            Consequence::attr(Happiness, 10),
            Consequence::attr(Creativity, 5),
            Consequence::attr(Wealth, -5),
            Consequence::StartCareer { category: CareerCategory::Arts },
        ],
        probability: 60,
    },
    OptionTemplate {
        id: "public_service",
        consequences: &[
            Consequence::attr(Reputation, 10),
            Consequence::Karma { delta: 5 },
            Consequence::StartCareer { category: CareerCategory::PublicService },
        ],
        probability: 50,
    },
    OptionTemplate {
        id: "start_business",
        consequences: &[
            Consequence::attr(Wealth, 20),
            Consequence::attr(Health, -5),
            Consequence::attr(Resilience, 5),
            Consequence::StartCareer { category: CareerCategory::Entrepreneur },
        ],
        probability: 40,
    },
];

static MARRIAGE_OPTIONS: [OptionTemplate; 2] = [
    OptionTemplate {
        id: "marry",
        consequences: &[
            Consequence::attr(Happiness, 15),
            Consequence::attr(Wealth, 5),
            Consequence::AddRelationship { kind: RelationshipKind::Spouse },
            Consequence::Karma { delta: 3 },
        ],
        probability: 80,
    },
    OptionTemplate {
        id: "stay_single",
        consequences: &[Consequence::attr(Creativity, 5), Consequence::attr(Resilience, 5)],
        probability: 60,
    },
];

static ACHIEVEMENT_OPTIONS: [OptionTemplate; 3] = [
    OptionTemplate {
        id: "share_credit",
        consequences: &[
            Consequence::attr(Reputation, 5),
            Consequence::attr(Charisma, 5),
            Consequence::Karma { delta: 5 },
        ],
        probability: 70,
    },
    OptionTemplate {
        id: "take_credit",
        consequences: &[
            Consequence::attr(Reputation, 10),
            Consequence::Promotion,
            Consequence::Karma { delta: -5 },
        ],
        probability: 50,
    },
    OptionTemplate {
        id: "celebrate",
        consequences: &[Consequence::attr(Happiness, 10)],
        probability: 90,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub id: String,
    /// Localization key.
    pub label: String,
    pub consequences: Vec<Consequence>,
    /// Offer weight after adjustment, 0-100.
    pub probability: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeEvent {
    pub id: String,
    pub kind: LifeEventKind,
    pub age: u32,
    pub stage: LifeStage,
    pub title: String,
    pub options: Vec<DecisionOption>,
}

impl LifeEvent {
    pub fn is_decision(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn option(&self, option_id: &str) -> Option<&DecisionOption> {
        self.options.iter().find(|o| o.id == option_id)
    }
}

/// Offer weight of an option for this character.
///
/// Kind-hearted options get easier with soul level; options that train the
/// mind are likelier for already-bright characters.
fn adjusted_probability(
    template: &OptionTemplate,
    journey: &EnhancedLifeJourney,
    soul_level: u8,
) -> u8 {
    let mut probability = template.probability as i32;
    for consequence in template.consequences {
        match *consequence {
            Consequence::Karma { delta } if delta > 0 => {
                probability += (soul_level as i32 - 1) * 2;
            }
            Consequence::Attribute { attribute: Intelligence, delta } if delta > 0 => {
                probability += (journey.attributes.intelligence as i32 - 50) / 2;
            }
            _ => {}
        }
    }
    probability.clamp(0, 100) as u8
}

/// Build a concrete event of `kind`, rolling which options are offered.
pub fn materialize(
    kind: LifeEventKind,
    age: u32,
    journey: &EnhancedLifeJourney,
    soul_level: u8,
    rng: &mut impl Rng,
) -> LifeEvent {
    let options = kind
        .option_templates()
        .iter()
        .filter_map(|template| {
            let probability = adjusted_probability(template, journey, soul_level);
            if rng.gen_range(0..100) < probability as u32 {
                Some(DecisionOption {
                    id: template.id.to_string(),
                    label: format!("{}.{}", kind.title_key(), template.id),
                    consequences: template.consequences.to_vec(),
                    probability,
                })
            } else {
                None
            }
        })
        .collect();

    LifeEvent {
        id: String::new(),
        kind,
        age,
        stage: LifeStage::for_age(age),
        title: kind.title_key().to_string(),
        options,
    }
}

/// Schedule the events of a whole life, sorted by age.
///
/// Every stage the life reaches gets 1-3 events at random ages inside the
/// stage (clamped to the lifespan). At most one event fires per age; later
/// draws for an age already taken are dropped.
pub fn generate_events(
    result: &ReincarnationResult,
    journey: &EnhancedLifeJourney,
    karma: &KarmaProfile,
    rng: &mut impl Rng,
) -> Vec<LifeEvent> {
    let soul_level = calculate_soul_level(karma).level;
    let mut events = Vec::new();

    for stage in LifeStage::ALL {
        let (lo, hi) = stage.age_range();
        if lo > result.lifespan {
            continue;
        }
        let hi = hi.min(result.lifespan);

        for _ in 0..rng.gen_range(1..=3) {
            let age = rng.gen_range(lo..=hi);
            let Some(kind) = pick(rng, stage.common_events()).copied() else {
                continue;
            };
            events.push(materialize(kind, age, journey, soul_level, rng));
        }
    }

    events.sort_by_key(|e| e.age);
    events.dedup_by_key(|e| e.age);
    for (i, event) in events.iter_mut().enumerate() {
        event.id = format!("{}-event-{:02}", result.id, i);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_life;
    use crate::modes::GameMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn life(seed: u64, lifespan: u32) -> ReincarnationResult {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut result = generate_life(GameMode::Classic, None, 0, &mut rng).result;
        result.lifespan = lifespan;
        result
    }

    #[test]
    fn test_five_kinds_carry_decisions() {
        let with_options: Vec<_> = LifeEventKind::ALL
            .iter()
            .filter(|k| k.has_decisions())
            .collect();
        assert_eq!(with_options.len(), 5);
    }

    #[test]
    fn test_schedule_sorted_unique_and_within_lifespan() {
        let result = life(1, 70);
        let journey = EnhancedLifeJourney::seed(&result);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let events = generate_events(&result, &journey, &KarmaProfile::new(0), &mut rng);
            assert!(!events.is_empty());
            assert!(events.windows(2).all(|w| w[0].age < w[1].age));
            assert!(events.iter().all(|e| e.age <= 70));
            for e in &events {
                assert!(e.stage.common_events().contains(&e.kind));
                assert_eq!(e.stage, LifeStage::for_age(e.age));
            }
        }
    }

    #[test]
    fn test_short_life_skips_unreached_stages() {
        let result = life(2, 20);
        let journey = EnhancedLifeJourney::seed(&result);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let events = generate_events(&result, &journey, &KarmaProfile::new(0), &mut rng);
            assert!(events.iter().all(|e| e.age <= 20));
            assert!(events.iter().all(|e| e.stage <= LifeStage::Youth));
        }
    }

    #[test]
    fn test_event_ids_are_unique() {
        let result = life(3, 90);
        let journey = EnhancedLifeJourney::seed(&result);
        let mut rng = StdRng::seed_from_u64(3);
        let events = generate_events(&result, &journey, &KarmaProfile::new(0), &mut rng);
        let mut ids: Vec<_> = events.iter().map(|e| e.id.clone()).collect();
        ids.dedup();
        assert_eq!(ids.len(), events.len());
        assert!(ids.iter().all(|id| id.starts_with(&result.id)));
    }

    #[test]
    fn test_automatic_kinds_have_no_options() {
        let result = life(4, 80);
        let journey = EnhancedLifeJourney::seed(&result);
        let mut rng = StdRng::seed_from_u64(4);
        let event = materialize(LifeEventKind::Windfall, 45, &journey, 1, &mut rng);
        assert!(!event.is_decision());
        assert_eq!(event.stage, LifeStage::MiddleAdulthood);
    }

    #[test]
    fn test_offered_options_follow_probability() {
        let result = life(5, 80);
        let journey = EnhancedLifeJourney::seed(&result);
        let mut rng = StdRng::seed_from_u64(5);
        let n = 10_000;
        let celebrate = (0..n)
            .filter(|_| {
                materialize(LifeEventKind::Achievement, 30, &journey, 1, &mut rng)
                    .option("celebrate")
                    .is_some()
            })
            .count();
        assert!((celebrate as f64 / n as f64 - 0.9).abs() < 0.02);
    }

    #[test]
    fn test_soul_level_raises_kind_options() {
        let result = life(6, 80);
        let mut journey = EnhancedLifeJourney::seed(&result);
        journey.attributes.intelligence = 50;
        let share_credit = &ACHIEVEMENT_OPTIONS[0];
        assert_eq!(adjusted_probability(share_credit, &journey, 1), 70);
        assert_eq!(adjusted_probability(share_credit, &journey, 10), 88);

        journey.attributes.intelligence = 90;
        let study = &EDUCATION_OPTIONS[0];
        // +20 from intelligence, +0 karma bonus at level 1
        assert_eq!(adjusted_probability(study, &journey, 1), 90);
    }
}
