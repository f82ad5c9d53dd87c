use serde::{Deserialize, Serialize};
use std::fmt;

use super::lexicon::{self, contains_any};
use super::types::KnownFacts;

/// A hand-authored fault pattern recognized from raw conversation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultSignature {
    SerpentineBelt,
    BrakeSqueal,
    CvAxleTurnClick,
    CoolingSystem,
    AlternatorCharging,
    StarterNoCrank,
    TransmissionSlip,
}

impl FaultSignature {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultSignature::SerpentineBelt => "serpentine_belt",
            FaultSignature::BrakeSqueal => "brake_squeal",
            FaultSignature::CvAxleTurnClick => "cv_axle_turn_click",
            FaultSignature::CoolingSystem => "cooling_system",
            FaultSignature::AlternatorCharging => "alternator_charging",
            FaultSignature::StarterNoCrank => "starter_no_crank",
            FaultSignature::TransmissionSlip => "transmission_slip",
        }
    }
}

impl fmt::Display for FaultSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct SignatureRule {
    pub signature: FaultSignature,
    pub fires: fn(&str, &KnownFacts) -> bool,
}

/// First match wins. Broader context sits earlier: a belt squeal under the
/// hood outranks a brake squeal mentioned in the same call.
pub static SIGNATURE_RULES: &[SignatureRule] = &[
    SignatureRule { signature: FaultSignature::SerpentineBelt, fires: serpentine_belt },
    SignatureRule { signature: FaultSignature::BrakeSqueal, fires: brake_squeal },
    SignatureRule { signature: FaultSignature::CvAxleTurnClick, fires: cv_axle_turn_click },
    SignatureRule { signature: FaultSignature::CoolingSystem, fires: cooling_system },
    SignatureRule { signature: FaultSignature::AlternatorCharging, fires: alternator_charging },
    SignatureRule { signature: FaultSignature::StarterNoCrank, fires: starter_no_crank },
    SignatureRule { signature: FaultSignature::TransmissionSlip, fires: transmission_slip },
];

fn serpentine_belt(text: &str, _facts: &KnownFacts) -> bool {
    contains_any(text, lexicon::SQUEAL) && contains_any(text, lexicon::SERPENTINE_CONTEXT)
}

fn brake_squeal(text: &str, facts: &KnownFacts) -> bool {
    contains_any(text, lexicon::SQUEAL)
        && contains_any(text, lexicon::BRAKE_EXPLICIT)
        && facts.check_engine_light_not_on()
}

// "turn the key" on a no-start call is not a CV joint.
fn cv_axle_turn_click(text: &str, _facts: &KnownFacts) -> bool {
    text.contains("click") && text.contains("turn") && !contains_any(text, lexicon::NO_START)
}

fn cooling_system(text: &str, _facts: &KnownFacts) -> bool {
    contains_any(text, lexicon::COOLING) || text.contains(lexicon::OVERHEAT)
}

fn alternator_charging(text: &str, _facts: &KnownFacts) -> bool {
    text.contains("battery light") || (text.contains("whine") && text.contains("rpm"))
}

fn starter_no_crank(text: &str, _facts: &KnownFacts) -> bool {
    contains_any(text, lexicon::NO_START) && contains_any(text, lexicon::CLICK)
}

fn transmission_slip(text: &str, _facts: &KnownFacts) -> bool {
    contains_any(text, lexicon::TRANSMISSION_SLIP)
}

pub struct SignatureMatcher;

impl SignatureMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Walk the ordered rule list over lowercase conversation text.
    pub fn detect(&self, text: &str, facts: &KnownFacts) -> Option<FaultSignature> {
        SIGNATURE_RULES
            .iter()
            .find(|rule| (rule.fires)(text, facts))
            .map(|rule| rule.signature)
    }
}

impl Default for SignatureMatcher {
    fn default() -> Self {
        Self::new()
    }
}
