//! Life journey state machine.
//!
//! A journey replays one generated life year by year. The stage is purely
//! a function of age; the caller drives time with [`LifeJourney::advance`]
//! and answers decision events with [`LifeJourney::resolve_decision`].
//!
//! # Attribute policy
//!
//! All eight attributes are clamped to `0..=100` on every write: at seeding
//! and on each consequence application. `health 95 + 10` becomes `100`.
//!
//! ```
//! use rand::SeedableRng;
//! use rebirth_logic::generator::generate_life;
//! use rebirth_logic::journey::{JourneyStep, LifeJourney};
//! use rebirth_logic::modes::GameMode;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let mut life = generate_life(GameMode::Classic, None, 0, &mut rng).result;
//! life.lifespan = 30;
//! let mut journey = LifeJourney::with_schedule(&life, Vec::new());
//! for _ in 0..31 {
//!     journey.advance();
//! }
//! assert!(journey.state().is_completed);
//! assert_eq!(journey.advance(), JourneyStep::Finished);
//! ```

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::karma::KarmaProfile;
use crate::life::{FamilyStructure, ReincarnationResult, SocialClass};
use crate::life_events::{generate_events, Consequence, LifeEvent, LifeEventKind};

/// Ordered life stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    Infant,
    Childhood,
    Adolescence,
    Youth,
    EarlyAdulthood,
    MiddleAdulthood,
    LateAdulthood,
    Elderly,
}

impl LifeStage {
    pub const ALL: [LifeStage; 8] = [
        LifeStage::Infant,
        LifeStage::Childhood,
        LifeStage::Adolescence,
        LifeStage::Youth,
        LifeStage::EarlyAdulthood,
        LifeStage::MiddleAdulthood,
        LifeStage::LateAdulthood,
        LifeStage::Elderly,
    ];

    /// Inclusive, non-overlapping age range.
    pub fn age_range(self) -> (u32, u32) {
        match self {
            LifeStage::Infant => (0, 2),
            LifeStage::Childhood => (3, 12),
            LifeStage::Adolescence => (13, 17),
            LifeStage::Youth => (18, 24),
            LifeStage::EarlyAdulthood => (25, 39),
            LifeStage::MiddleAdulthood => (40, 59),
            LifeStage::LateAdulthood => (60, 74),
            LifeStage::Elderly => (75, 120),
        }
    }

    /// Stage containing `age`; anything past the last range is elderly.
    pub fn for_age(age: u32) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|stage| {
                let (lo, hi) = stage.age_range();
                (lo..=hi).contains(&age)
            })
            .unwrap_or(LifeStage::Elderly)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Health,
    Wealth,
    Happiness,
    Intelligence,
    Charisma,
    Creativity,
    Resilience,
    Reputation,
}

pub const ATTRIBUTE_MIN: i32 = 0;
pub const ATTRIBUTE_MAX: i32 = 100;

/// Bonus to a seeded attribute when the life has a matching talent.
pub const TALENT_ATTRIBUTE_BONUS: i32 = 20;

/// The eight bounded attributes (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub health: u8,
    pub wealth: u8,
    pub happiness: u8,
    pub intelligence: u8,
    pub charisma: u8,
    pub creativity: u8,
    pub resilience: u8,
    pub reputation: u8,
}

fn clamp_attribute(value: i32) -> u8 {
    value.clamp(ATTRIBUTE_MIN, ATTRIBUTE_MAX) as u8
}

impl Attributes {
    pub fn get(&self, attribute: Attribute) -> u8 {
        match attribute {
            Attribute::Health => self.health,
            Attribute::Wealth => self.wealth,
            Attribute::Happiness => self.happiness,
            Attribute::Intelligence => self.intelligence,
            Attribute::Charisma => self.charisma,
            Attribute::Creativity => self.creativity,
            Attribute::Resilience => self.resilience,
            Attribute::Reputation => self.reputation,
        }
    }

    /// Set an attribute, clamped to 0-100.
    pub fn set(&mut self, attribute: Attribute, value: i32) {
        let v = clamp_attribute(value);
        match attribute {
            Attribute::Health => self.health = v,
            Attribute::Wealth => self.wealth = v,
            Attribute::Happiness => self.happiness = v,
            Attribute::Intelligence => self.intelligence = v,
            Attribute::Charisma => self.charisma = v,
            Attribute::Creativity => self.creativity = v,
            Attribute::Resilience => self.resilience = v,
            Attribute::Reputation => self.reputation = v,
        }
    }

    /// Add a signed delta, clamped to 0-100.
    pub fn apply(&mut self, attribute: Attribute, delta: i32) {
        self.set(attribute, self.get(attribute) as i32 + delta);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerCategory {
    Business,
    Arts,
    PublicService,
    Entrepreneur,
}

impl CareerCategory {
    fn entry_position(self) -> &'static str {
        match self {
            CareerCategory::Business => "career.business.analyst",
            CareerCategory::Arts => "career.arts.apprentice",
            CareerCategory::PublicService => "career.public_service.clerk",
            CareerCategory::Entrepreneur => "career.entrepreneur.founder",
        }
    }

    fn base_salary(self) -> u32 {
        match self {
            CareerCategory::Business => 50_000,
            CareerCategory::Arts => 25_000,
            CareerCategory::PublicService => 40_000,
            CareerCategory::Entrepreneur => 30_000,
        }
    }

    fn base_satisfaction(self) -> u8 {
        match self {
            CareerCategory::Business => 45,
            CareerCategory::Arts => 75,
            CareerCategory::PublicService => 65,
            CareerCategory::Entrepreneur => 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Career {
    /// `None` until the first career decision.
    pub category: Option<CareerCategory>,
    pub position: String,
    pub level: u8,
    pub satisfaction: u8,
    pub salary: u32,
    /// Years employed, kept across career changes.
    pub experience: u32,
}

impl Default for Career {
    fn default() -> Self {
        Self {
            category: None,
            position: "career.none".to_string(),
            level: 0,
            satisfaction: 50,
            salary: 0,
            experience: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    #[default]
    None,
    Primary,
    Secondary,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub fn next(self) -> Self {
        match self {
            EducationLevel::None => EducationLevel::Primary,
            EducationLevel::Primary => EducationLevel::Secondary,
            EducationLevel::Secondary => EducationLevel::Bachelor,
            EducationLevel::Bachelor => EducationLevel::Master,
            EducationLevel::Master | EducationLevel::Doctorate => EducationLevel::Doctorate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Education {
    pub level: EducationLevel,
    /// Intelligence at the last completed level.
    pub performance: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Parent,
    Sibling,
    Friend,
    Spouse,
    Child,
    Mentor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub since_age: u32,
    pub closeness: u8,
}

/// An event the character lived through, in the order reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorEvent {
    pub event_id: String,
    pub kind: LifeEventKind,
    pub age: u32,
    pub stage: LifeStage,
    /// `None` for automatic events.
    pub chosen_option: Option<String>,
}

/// Mutable view of a life being played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedLifeJourney {
    pub life_id: String,
    pub current_stage: LifeStage,
    pub current_age: u32,
    pub attributes: Attributes,
    pub career: Career,
    pub education: Education,
    pub relationships: Vec<Relationship>,
    /// Append-only.
    pub major_events: Vec<MajorEvent>,
    /// Karma earned through decisions during this journey.
    pub karma_earned: i32,
    pub is_completed: bool,
}

impl EnhancedLifeJourney {
    /// Initial state at birth.
    pub fn seed(result: &ReincarnationResult) -> Self {
        let talent_bonus = |talents: &[&str]| {
            if talents.iter().any(|t| result.has_talent(t)) {
                TALENT_ATTRIBUTE_BONUS
            } else {
                0
            }
        };

        let wealth = match result.social_class {
            SocialClass::High => 70,
            SocialClass::Middle => 50,
            SocialClass::Low => 30,
        };

        let attributes = Attributes {
            health: clamp_attribute(result.health as i32),
            wealth: clamp_attribute(wealth),
            happiness: clamp_attribute(60),
            intelligence: clamp_attribute(50 + talent_bonus(&["mathematics", "science"])),
            charisma: clamp_attribute(50 + talent_bonus(&["leadership", "acting"])),
            creativity: clamp_attribute(50 + talent_bonus(&["art", "music", "writing"])),
            resilience: clamp_attribute(50),
            reputation: clamp_attribute(20),
        };

        let mut relationships = vec![
            Relationship { kind: RelationshipKind::Parent, since_age: 0, closeness: 80 },
            Relationship { kind: RelationshipKind::Parent, since_age: 0, closeness: 80 },
        ];
        if result.family_structure == FamilyStructure::Siblings {
            relationships.push(Relationship {
                kind: RelationshipKind::Sibling,
                since_age: 0,
                closeness: 60,
            });
        }

        Self {
            life_id: result.id.clone(),
            current_stage: LifeStage::Infant,
            current_age: 0,
            attributes,
            career: Career::default(),
            education: Education::default(),
            relationships,
            major_events: Vec::new(),
            karma_earned: 0,
            is_completed: false,
        }
    }

    /// Apply a consequence set. Attribute deltas are additive per key and clamped.
    pub fn apply_consequences(&mut self, consequences: &[Consequence]) {
        for consequence in consequences {
            match *consequence {
                Consequence::Attribute { attribute, delta } => {
                    self.attributes.apply(attribute, delta);
                }
                Consequence::AdvanceEducation => {
                    self.education.level = self.education.level.next();
                    self.education.performance = self.attributes.intelligence;
                }
                Consequence::StartCareer { category } => {
                    self.career.category = Some(category);
                    self.career.position = category.entry_position().to_string();
                    self.career.level = 1;
                    self.career.salary = category.base_salary();
                    self.career.satisfaction = category.base_satisfaction();
                }
                Consequence::Promotion => {
                    if self.career.category.is_some() {
                        self.career.level = self.career.level.saturating_add(1);
                        self.career.salary = self.career.salary + self.career.salary / 5;
                    }
                }
                Consequence::AddRelationship { kind } => {
                    self.relationships.push(Relationship {
                        kind,
                        since_age: self.current_age,
                        closeness: 70,
                    });
                }
                Consequence::Karma { delta } => {
                    self.karma_earned += delta;
                }
            }
        }
    }

    fn age_one_year(&mut self) {
        if self.career.category.is_some() {
            self.career.experience += 1;
        }
    }
}

/// Outcome of one [`LifeJourney::advance`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyStep {
    /// A plain year passed.
    Aged { age: u32, stage: LifeStage },
    /// An automatic event was reached and logged.
    AutomaticEvent { age: u32, event_id: String },
    /// A decision event was reached; advancement pauses until resolved.
    DecisionRequired { event_id: String },
    /// Advance called while a decision is still open; nothing happened.
    AwaitingDecision { event_id: String },
    /// Age passed the lifespan on this call. Returned exactly once.
    Completed { age: u32 },
    /// The journey was already complete; nothing happened.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JourneyError {
    NoPendingDecision,
    EventMismatch { expected: String, found: String },
    UnknownOption { event_id: String, option_id: String },
}

impl fmt::Display for JourneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JourneyError::NoPendingDecision => write!(f, "no decision is pending"),
            JourneyError::EventMismatch { expected, found } => {
                write!(f, "pending decision is {}, not {}", expected, found)
            }
            JourneyError::UnknownOption { event_id, option_id } => {
                write!(f, "event {} has no option {}", event_id, option_id)
            }
        }
    }
}

impl std::error::Error for JourneyError {}

/// Summary of a journey for end-of-life screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneySummary {
    pub life_id: String,
    pub final_age: u32,
    pub final_stage: LifeStage,
    pub attributes: Attributes,
    pub decisions_made: usize,
    pub events_experienced: usize,
    pub karma_earned: i32,
    pub completed: bool,
}

/// The state machine driving one journey.
#[derive(Debug, Clone)]
pub struct LifeJourney {
    state: EnhancedLifeJourney,
    lifespan: u32,
    schedule: Vec<LifeEvent>,
    pending: Option<LifeEvent>,
}

impl LifeJourney {
    /// Seed a journey and schedule its events.
    pub fn start(result: &ReincarnationResult, karma: &KarmaProfile, rng: &mut impl Rng) -> Self {
        let state = EnhancedLifeJourney::seed(result);
        let schedule = generate_events(result, &state, karma, rng);
        Self::from_parts(state, result.lifespan, schedule)
    }

    /// Journey with an explicit event schedule (sorted by age).
    pub fn with_schedule(result: &ReincarnationResult, schedule: Vec<LifeEvent>) -> Self {
        Self::from_parts(EnhancedLifeJourney::seed(result), result.lifespan, schedule)
    }

    fn from_parts(state: EnhancedLifeJourney, lifespan: u32, schedule: Vec<LifeEvent>) -> Self {
        let mut journey = Self {
            state,
            lifespan,
            schedule,
            pending: None,
        };
        // Events scheduled at birth fire immediately.
        journey.arrive_at(0);
        journey
    }

    pub fn state(&self) -> &EnhancedLifeJourney {
        &self.state
    }

    pub fn schedule(&self) -> &[LifeEvent] {
        &self.schedule
    }

    pub fn pending_decision(&self) -> Option<&LifeEvent> {
        self.pending.as_ref()
    }

    pub fn lifespan(&self) -> u32 {
        self.lifespan
    }

    /// Advance one year.
    pub fn advance(&mut self) -> JourneyStep {
        if self.state.is_completed {
            return JourneyStep::Finished;
        }
        if let Some(event) = &self.pending {
            return JourneyStep::AwaitingDecision {
                event_id: event.id.clone(),
            };
        }

        let age = self.state.current_age + 1;
        self.state.current_age = age;

        if age > self.lifespan {
            self.state.is_completed = true;
            log::info!(
                "journey {} completed at age {} ({} events)",
                self.state.life_id,
                age,
                self.state.major_events.len()
            );
            return JourneyStep::Completed { age };
        }

        self.state.current_stage = LifeStage::for_age(age);
        self.state.age_one_year();
        self.arrive_at(age)
    }

    fn arrive_at(&mut self, age: u32) -> JourneyStep {
        let Some(event) = self.schedule.iter().find(|e| e.age == age) else {
            return JourneyStep::Aged {
                age,
                stage: self.state.current_stage,
            };
        };

        if event.is_decision() {
            let event_id = event.id.clone();
            self.pending = Some(event.clone());
            return JourneyStep::DecisionRequired { event_id };
        }

        let event_id = event.id.clone();
        self.state.major_events.push(MajorEvent {
            event_id: event.id.clone(),
            kind: event.kind,
            age,
            stage: self.state.current_stage,
            chosen_option: None,
        });
        JourneyStep::AutomaticEvent { age, event_id }
    }

    /// Apply the chosen option of the pending decision and resume.
    pub fn resolve_decision(&mut self, event_id: &str, option_id: &str) -> Result<(), JourneyError> {
        let event = self.pending.as_ref().ok_or(JourneyError::NoPendingDecision)?;
        if event.id != event_id {
            return Err(JourneyError::EventMismatch {
                expected: event.id.clone(),
                found: event_id.to_string(),
            });
        }
        let option = event
            .option(option_id)
            .ok_or_else(|| JourneyError::UnknownOption {
                event_id: event_id.to_string(),
                option_id: option_id.to_string(),
            })?;

        let consequences = option.consequences.clone();
        let record = MajorEvent {
            event_id: event.id.clone(),
            kind: event.kind,
            age: event.age,
            stage: self.state.current_stage,
            chosen_option: Some(option.id.clone()),
        };

        self.state.apply_consequences(&consequences);
        self.state.major_events.push(record);
        self.pending = None;
        Ok(())
    }

    pub fn summary(&self) -> JourneySummary {
        JourneySummary {
            life_id: self.state.life_id.clone(),
            final_age: self.state.current_age,
            final_stage: self.state.current_stage,
            attributes: self.state.attributes,
            decisions_made: self
                .state
                .major_events
                .iter()
                .filter(|e| e.chosen_option.is_some())
                .count(),
            events_experienced: self.state.major_events.len(),
            karma_earned: self.state.karma_earned,
            completed: self.state.is_completed,
        }
    }
}
