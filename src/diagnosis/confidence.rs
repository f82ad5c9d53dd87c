use super::lexicon::{self, contains_any};
use super::matcher::MAX_CONFIDENCE_BOOST;
use super::signature::FaultSignature;
use super::types::{ConditionTag, ConfidenceResult, KnownFacts, LocationTag, SymptomAnalysis};

const COVERAGE_WEIGHT: f32 = 0.5;
const COVERAGE_CATEGORIES: f32 = 4.0;
const CONTRADICTION_PENALTY: f32 = 0.3;

/// A scoring heuristic. Unlike signature detection, every pattern is checked
/// and the strongest bonus wins.
struct PatternRule {
    bonus: f32,
    applies: fn(&PatternInput) -> bool,
}

struct PatternInput<'a> {
    text: &'a str,
    analysis: &'a SymptomAnalysis,
    facts: &'a KnownFacts,
}

// Electrical and mechanical certainty signatures outrank cosmetic noises.
static PATTERN_RULES: &[PatternRule] = &[
    PatternRule { bonus: 0.4, applies: brake_pad },
    PatternRule { bonus: 0.25, applies: belt_cold_start },
    PatternRule { bonus: 0.25, applies: belt_accessory_load },
    PatternRule { bonus: 0.35, applies: cv_axle },
    PatternRule { bonus: 0.25, applies: suspension_clunk },
    PatternRule { bonus: 0.2, applies: exhaust_rattle },
    PatternRule { bonus: 0.3, applies: cooling },
    PatternRule { bonus: 0.3, applies: charging },
    PatternRule { bonus: 0.4, applies: starter_no_crank },
    PatternRule { bonus: 0.35, applies: transmission_slip },
];

fn brake_pad(input: &PatternInput) -> bool {
    let a = input.analysis;
    let brake_context = a.has_any_keyword(&["brake", "brakes"]) || a.locations.contains(&LocationTag::Brakes);
    let braking_condition = a.conditions.contains(&ConditionTag::SpeedRelated) || a.has_keyword("brake");
    brake_context && a.has_keyword("squealing") && braking_condition && input.facts.check_engine_light_not_on()
}

fn belt_cold_start(input: &PatternInput) -> bool {
    contains_any(input.text, lexicon::SQUEAL)
        && contains_any(input.text, &["start", "cold", "under the hood", "hood"])
}

fn belt_accessory_load(input: &PatternInput) -> bool {
    contains_any(input.text, lexicon::SQUEAL)
        && contains_any(input.text, &["ac", "air conditioning", "steering", "turning the wheel", "rpm"])
}

fn cv_axle(input: &PatternInput) -> bool {
    input.text.contains("click")
        && contains_any(input.text, lexicon::TURN)
        && contains_any(input.text, &["front", "wheel"])
}

fn suspension_clunk(input: &PatternInput) -> bool {
    contains_any(input.text, &["clunk", "rattle"]) && contains_any(input.text, &["bump", "rough road", "pothole"])
}

fn exhaust_rattle(input: &PatternInput) -> bool {
    input.text.contains("rattle") && contains_any(input.text, &["under the car", "metallic", "certain rpm", "rpm"])
}

fn cooling(input: &PatternInput) -> bool {
    contains_any(input.text, lexicon::COOLING)
        || (input.text.contains(lexicon::OVERHEAT) && input.text.contains("coolant"))
}

fn charging(input: &PatternInput) -> bool {
    contains_any(input.text, &["battery light", "alternator"])
        || (input.text.contains("whine") && input.text.contains("rpm"))
}

fn starter_no_crank(input: &PatternInput) -> bool {
    contains_any(input.text, lexicon::CLICK) && contains_any(input.text, lexicon::NO_START)
}

fn transmission_slip(input: &PatternInput) -> bool {
    contains_any(input.text, lexicon::TRANSMISSION_SLIP)
}

/// Conservative confidence in the current hypothesis:
/// coverage + strongest pattern + catalog boost - contradiction, clamped to [0, 1].
pub struct ConfidenceScorer;

impl ConfidenceScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn coverage(&self, analysis: &SymptomAnalysis) -> f32 {
        analysis.covered_categories() as f32 / COVERAGE_CATEGORIES
    }

    /// Strongest heuristic bonus that applies, 0.0 when none does.
    pub fn pattern_bonus(&self, text: &str, analysis: &SymptomAnalysis, facts: &KnownFacts) -> f32 {
        let input = PatternInput { text, analysis, facts };
        PATTERN_RULES
            .iter()
            .filter(|rule| (rule.applies)(&input))
            .map(|rule| rule.bonus)
            .fold(0.0, f32::max)
    }

    /// Engine-light symptoms while the light is known off.
    pub fn contradiction(&self, analysis: &SymptomAnalysis, facts: &KnownFacts) -> bool {
        facts.check_engine_light() == Some(false) && analysis.has_any_keyword(lexicon::ENGINE_LIGHT_KEYWORDS)
    }

    pub fn score(
        &self,
        text: &str,
        analysis: &SymptomAnalysis,
        facts: &KnownFacts,
        signature: Option<FaultSignature>,
        catalog_boost: f32,
    ) -> ConfidenceResult {
        let coverage = self.coverage(analysis);
        let pattern = self.pattern_bonus(text, analysis, facts) + catalog_boost.clamp(0.0, MAX_CONFIDENCE_BOOST);
        let contradiction_detected = self.contradiction(analysis, facts);
        let penalty = if contradiction_detected { CONTRADICTION_PENALTY } else { 0.0 };

        let score = (COVERAGE_WEIGHT * coverage + pattern - penalty).clamp(0.0, 1.0);

        ConfidenceResult {
            score,
            matched_signature: signature,
            contradiction_detected,
        }
    }
}

impl Default for ConfidenceScorer {
    fn default() -> Self {
        Self::new()
    }
}
