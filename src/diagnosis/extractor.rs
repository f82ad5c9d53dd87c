use super::types::{ConditionTag, LocationTag, SeverityTag, SymptomAnalysis, SymptomCategory};

const SYMPTOMS: &[(SymptomCategory, &[&str])] = &[
    (
        SymptomCategory::Noises,
        &[
            "noise", "sound", "humming", "grinding", "squealing", "knocking", "whining", "clunking",
            "rattling", "buzzing", "roaring", "whistling",
        ],
    ),
    (SymptomCategory::Vibrations, &["vibration", "shaking", "trembling", "pulsing", "wobbling"]),
    (
        SymptomCategory::Performance,
        &["hesitation", "stalling", "rough idle", "poor acceleration", "loss of power", "misfire"],
    ),
    (
        SymptomCategory::Handling,
        &["pulling", "drifting", "wandering", "loose steering", "hard steering"],
    ),
    (
        SymptomCategory::Leaks,
        &["leak", "drip", "puddle", "fluid", "oil", "coolant", "transmission fluid"],
    ),
    (SymptomCategory::Smells, &["smell", "odor", "burning", "gas", "sweet", "rotten egg"]),
    (
        SymptomCategory::Lights,
        &["check engine", "warning light", "service light", "abs light", "traction control"],
    ),
    (SymptomCategory::Temperature, &["overheating", "hot", "cold", "temperature"]),
    (
        SymptomCategory::Starting,
        &[
            "won't start", "wont start", "not start", "no start", "trouble starting", "hard start",
            "cranking", "clicking", "just clicks",
        ],
    ),
    (SymptomCategory::Shifting, &["hard shift", "slipping", "jerking", "delayed shift"]),
];

const CONDITIONS: &[(ConditionTag, &[&str])] = &[
    (ConditionTag::SpeedRelated, &["faster", "speed", "accelerate", "decelerate", "brake"]),
    (
        ConditionTag::TemperatureRelated,
        &["cold", "warm", "hot", "after driving", "when starting"],
    ),
    (ConditionTag::LoadRelated, &["uphill", "downhill", "turning", "straight", "parking"]),
    (
        ConditionTag::TimeRelated,
        &["constant", "intermittent", "comes and goes", "getting worse", "getting better"],
    ),
];

const LOCATIONS: &[(LocationTag, &[&str])] = &[
    (LocationTag::Front, &["front", "forward", "hood", "engine bay"]),
    (LocationTag::Rear, &["back", "rear", "trunk", "tail"]),
    (LocationTag::Left, &["left", "driver side"]),
    (LocationTag::Right, &["right", "passenger side"]),
    (LocationTag::Under, &["under", "beneath", "below"]),
    (LocationTag::Inside, &["inside", "interior", "cabin"]),
    (LocationTag::Engine, &["engine", "motor"]),
    (LocationTag::Transmission, &["transmission", "gearbox"]),
    (LocationTag::Wheels, &["wheel", "tire", "rim"]),
    (LocationTag::Brakes, &["brake", "rotor", "caliper"]),
];

const SEVERITY: &[(SeverityTag, &[&str])] = &[
    (SeverityTag::Mild, &["slight", "faint", "quiet", "minor", "a little"]),
    (SeverityTag::Severe, &["loud", "severe", "terrible", "really bad", "scary"]),
    (SeverityTag::Worsening, &["getting worse", "worse and worse", "more often"]),
];

/// Turns free conversation text into categorized signals.
pub struct SymptomExtractor;

impl SymptomExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Scan lowercase text against the four taxonomies. Total over any input;
    /// an empty string yields an empty analysis.
    pub fn extract(&self, text: &str) -> SymptomAnalysis {
        let mut analysis = SymptomAnalysis::default();

        scan(text, SYMPTOMS, &mut analysis.symptoms, &mut analysis.specific_keywords);
        scan(text, CONDITIONS, &mut analysis.conditions, &mut analysis.specific_keywords);
        scan(text, LOCATIONS, &mut analysis.locations, &mut analysis.specific_keywords);
        scan(text, SEVERITY, &mut analysis.severity, &mut analysis.specific_keywords);

        analysis
    }
}

impl Default for SymptomExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn scan<T: Ord + Copy>(
    text: &str,
    taxonomy: &[(T, &[&str])],
    tags: &mut std::collections::BTreeSet<T>,
    keywords: &mut std::collections::BTreeSet<String>,
) {
    for (tag, phrases) in taxonomy {
        for phrase in phrases.iter() {
            if text.contains(phrase) {
                tags.insert(*tag);
                keywords.insert((*phrase).to_string());
            }
        }
    }
}
