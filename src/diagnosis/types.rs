use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::signature::FaultSignature;

pub const CHECK_ENGINE_LIGHT_ON: &str = "check_engine_light_on";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One utterance. Immutable once appended to a history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Explicitly stated facts carried across turns. A missing key is "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownFacts {
    facts: BTreeMap<String, bool>,
}

impl KnownFacts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.facts.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, value: bool) {
        self.facts.insert(name.into(), value);
    }

    pub fn forget(&mut self, name: &str) {
        self.facts.remove(name);
    }

    pub fn check_engine_light(&self) -> Option<bool> {
        self.get(CHECK_ENGINE_LIGHT_ON)
    }

    pub fn set_check_engine_light(&mut self, on: bool) {
        self.set(CHECK_ENGINE_LIGHT_ON, on);
    }

    /// True when the light is known off or nobody said.
    pub fn check_engine_light_not_on(&self) -> bool {
        self.check_engine_light() != Some(true)
    }

    pub fn with_check_engine_light(mut self, on: bool) -> Self {
        self.set_check_engine_light(on);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomCategory {
    Noises,
    Vibrations,
    Performance,
    Handling,
    Leaks,
    Smells,
    Lights,
    Temperature,
    Starting,
    Shifting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTag {
    SpeedRelated,
    TemperatureRelated,
    LoadRelated,
    TimeRelated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationTag {
    Front,
    Rear,
    Left,
    Right,
    Under,
    Inside,
    Engine,
    Transmission,
    Wheels,
    Brakes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTag {
    Mild,
    Severe,
    Worsening,
}

/// Signals extracted from the whole conversation. Rebuilt every turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomAnalysis {
    pub symptoms: BTreeSet<SymptomCategory>,
    pub conditions: BTreeSet<ConditionTag>,
    pub locations: BTreeSet<LocationTag>,
    pub severity: BTreeSet<SeverityTag>,
    pub specific_keywords: BTreeSet<String>,
}

impl SymptomAnalysis {
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.specific_keywords.contains(keyword)
    }

    pub fn has_any_keyword(&self, keywords: &[&str]) -> bool {
        keywords.iter().any(|k| self.has_keyword(k))
    }

    /// Number of evidence categories (symptoms, conditions, locations, severity) with a hit.
    pub fn covered_categories(&self) -> usize {
        [
            !self.symptoms.is_empty(),
            !self.conditions.is_empty(),
            !self.locations.is_empty(),
            !self.severity.is_empty(),
        ]
        .iter()
        .filter(|covered| **covered)
        .count()
    }

    pub fn is_empty(&self) -> bool {
        self.covered_categories() == 0 && self.specific_keywords.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    /// Always within [0.0, 1.0].
    pub score: f32,
    pub matched_signature: Option<FaultSignature>,
    pub contradiction_detected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticAction {
    Ask,
    ExitWithCause,
    ExitInsufficient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    SchedulingIntent,
    FastPath,
    Sufficiency,
    MaxTurnsInsufficient,
}

/// Outcome of one diagnostic turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticDecision {
    pub action: DiagnosticAction,
    /// Turn counter after this turn.
    pub turn_count: u32,
    pub confidence: f32,
    pub signature: Option<FaultSignature>,
    pub exit_reason: Option<ExitReason>,
    pub next_question: Option<String>,
    pub probable_cause: Option<String>,
    pub updated_facts: KnownFacts,
}

impl DiagnosticDecision {
    pub fn is_exit(&self) -> bool {
        self.action != DiagnosticAction::Ask
    }
}

/// The slice of the caller's session the diagnostic core reads and updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticSession {
    pub turn_count: u32,
    pub known_facts: KnownFacts,
    pub probable_cause: Option<String>,
}

impl DiagnosticSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facts(known_facts: KnownFacts) -> Self {
        Self { known_facts, ..Self::default() }
    }

    /// Apply the writes a decision carries: counter, facts, final cause.
    pub fn record(&mut self, decision: &DiagnosticDecision) {
        self.turn_count = decision.turn_count;
        self.known_facts = decision.updated_facts.clone();
        if let Some(cause) = &decision.probable_cause {
            self.probable_cause = Some(cause.clone());
        }
    }

    /// Start a fresh diagnostic episode. Facts the caller stated survive.
    pub fn begin_episode(&mut self) {
        self.turn_count = 0;
        self.probable_cause = None;
    }
}
