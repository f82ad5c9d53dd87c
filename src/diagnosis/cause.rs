use tracing::info;

use super::lexicon::{self, contains_any};
use super::matcher::CatalogMatch;
use super::types::{ConditionTag as C, KnownFacts, LocationTag as L, SymptomAnalysis, SymptomCategory as S};

pub const FALLBACK_CAUSE: &str = "mechanical issue requiring diagnostic inspection";
pub const BRAKE_PADS: &str = "worn brake pads";

const NO_START_KEYWORDS: &[&str] = &["won't start", "wont start", "not start", "no start", "trouble starting"];
const CLICK_KEYWORDS: &[&str] = &["clicking", "just clicks"];

/// Picks one human-readable probable cause for the conversation.
pub struct CauseResolver;

impl CauseResolver {
    pub fn new() -> Self {
        Self
    }

    /// 1. A strong catalog match names the cause outright.
    /// 2. Otherwise walk the decision tree.
    /// 3. Then apply the brake guardrail.
    pub fn resolve(
        &self,
        analysis: &SymptomAnalysis,
        text: &str,
        facts: &KnownFacts,
        catalog_match: Option<&CatalogMatch>,
    ) -> String {
        if let Some(diagnosis) = catalog_match.and_then(CatalogMatch::diagnosis) {
            info!("Catalog diagnosis: {}", diagnosis);
            return diagnosis.to_string();
        }

        let mut cause = self.from_analysis(analysis);

        // Keyword matching lets belt and brake both fire on one squeal. Explicit
        // brake talk with no belt context goes to the pads.
        let brake_explicit = contains_any(text, lexicon::BRAKE_EXPLICIT);
        let serpentine_context = contains_any(text, lexicon::SERPENTINE_GUARD);
        if brake_explicit
            && analysis.has_keyword("squealing")
            && !serpentine_context
            && facts.check_engine_light_not_on()
        {
            cause = BRAKE_PADS;
        }

        info!("Determined probable cause: {}", cause);
        cause.to_string()
    }

    /// Decision tree over the analysis alone. Never empty. Categories are tried
    /// in priority order; a generic noise with no dominant keyword falls through.
    pub fn from_analysis(&self, analysis: &SymptomAnalysis) -> &'static str {
        let symptoms = &analysis.symptoms;
        let conditions = &analysis.conditions;
        let locations = &analysis.locations;
        let kw = |k: &str| analysis.has_keyword(k);

        if symptoms.contains(&S::Noises) {
            if let Some(cause) = noise_cause(analysis) {
                return cause;
            }
        }
        if symptoms.contains(&S::Vibrations) {
            if conditions.contains(&C::SpeedRelated) {
                if kw("steering wheel") || locations.contains(&L::Front) {
                    return "wheel balance or alignment issue";
                } else if kw("seat") || locations.contains(&L::Rear) {
                    return "wheel balance or driveshaft issue";
                }
                return "wheel balance or tire issue";
            }
            return "engine mount or suspension issue";
        }
        if symptoms.contains(&S::Performance) {
            if kw("hesitation") || kw("misfire") {
                return "ignition system or fuel system issue";
            } else if kw("stalling") {
                return "fuel system or electrical issue";
            } else if kw("rough idle") {
                return "engine mechanical or fuel system issue";
            }
            return "engine performance issue requiring diagnostic";
        }
        if symptoms.contains(&S::Handling) {
            if kw("pulling") {
                return "alignment or brake issue";
            } else if kw("wandering") || kw("loose steering") {
                return "steering or suspension component issue";
            }
            return "steering or suspension issue";
        }
        if symptoms.contains(&S::Leaks) {
            if kw("oil") {
                return "engine oil leak";
            } else if kw("coolant") || kw("sweet") {
                return "cooling system leak";
            } else if kw("transmission") {
                return "transmission fluid leak";
            }
            return "fluid leak requiring inspection";
        }
        if symptoms.contains(&S::Starting) {
            let no_start = analysis.has_any_keyword(NO_START_KEYWORDS);
            let clicking = analysis.has_any_keyword(CLICK_KEYWORDS);
            if no_start && clicking {
                return "starter motor";
            } else if no_start {
                return "battery, starter, or electrical issue";
            } else if kw("hard start") {
                return "fuel system or ignition issue";
            } else if clicking {
                return "battery or starter issue";
            }
            return "starting system issue";
        }
        if symptoms.contains(&S::Shifting) {
            if kw("hard shift") {
                return "transmission mechanical issue";
            } else if kw("slipping") {
                return "transmission clutch or band issue";
            }
            return "transmission issue requiring diagnostic";
        }
        if symptoms.contains(&S::Temperature) {
            if kw("overheating") {
                return "cooling system issue";
            }
            return "temperature regulation issue";
        }
        if symptoms.contains(&S::Lights) {
            return "engine diagnostic issue requiring scan tool";
        }
        if !locations.is_empty() {
            if locations.contains(&L::Front) {
                return "front suspension or steering issue";
            } else if locations.contains(&L::Rear) {
                return "rear suspension or brake issue";
            } else if locations.contains(&L::Engine) {
                return "engine mechanical issue";
            }
            return "mechanical issue requiring inspection";
        }

        FALLBACK_CAUSE
    }
}

impl Default for CauseResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Dominant noise keyword crossed with location and condition.
/// `None` when the noise is generic ("a noise", "a sound").
fn noise_cause(analysis: &SymptomAnalysis) -> Option<&'static str> {
    let conditions = &analysis.conditions;
    let locations = &analysis.locations;
    let kw = |k: &str| analysis.has_keyword(k);
    let speed = conditions.contains(&C::SpeedRelated);
    let brakes = locations.contains(&L::Brakes) || kw("brake");
    let engine = locations.contains(&L::Engine);

    let cause = if kw("humming") {
        if speed && locations.contains(&L::Front) {
            "front wheel bearing issue"
        } else if speed && locations.contains(&L::Rear) {
            "rear wheel bearing issue"
        } else if speed {
            "wheel bearing issue"
        } else if engine {
            "engine accessory drive issue (alternator, water pump, or power steering pump)"
        } else {
            "wheel bearing or tire issue"
        }
    } else if kw("squealing") {
        if brakes {
            BRAKE_PADS
        } else if engine || locations.contains(&L::Front) {
            if conditions.contains(&C::TemperatureRelated) {
                "serpentine belt or belt tensioner issue"
            } else {
                "serpentine belt issue"
            }
        } else {
            "belt or brake system issue"
        }
    } else if kw("grinding") {
        if brakes {
            "worn brake pads or rotors"
        } else if speed {
            "wheel bearing or brake issue"
        } else {
            "mechanical grinding issue requiring inspection"
        }
    } else if kw("knocking") {
        if engine {
            "engine mechanical issue (rod knock, piston slap, or valve train)"
        } else if speed {
            "wheel bearing or suspension issue"
        } else {
            "mechanical knocking issue"
        }
    } else if kw("whining") {
        if engine {
            "power steering pump or alternator issue"
        } else if speed {
            "wheel bearing or differential issue"
        } else {
            "bearing or pump issue"
        }
    } else if kw("clunking") {
        if speed {
            "suspension or steering component issue"
        } else if kw("turning") {
            "CV joint or steering component issue"
        } else {
            "suspension or steering issue"
        }
    } else {
        return None;
    };

    Some(cause)
}
