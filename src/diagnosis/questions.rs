use super::matcher::CatalogMatch;
use super::types::{ConditionTag, KnownFacts, LocationTag, SymptomAnalysis};

/// A diagnostic question and the words that suggest the caller already covered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub text: &'static str,
    pub topic: &'static [&'static str],
}

const fn q(text: &'static str, topic: &'static [&'static str]) -> Question {
    Question { text, topic }
}

const WHERE: &[&str] = &["front", "back", "left", "right", "side"];
const CONSTANT: &[&str] = &["constant", "intermittent", "comes and goes"];
const HOW_LONG: &[&str] = &["how long", "when", "started"];
const STEERING: &[&str] = &["steering", "turn", "wheel"];
const NOISES: &[&str] = &["noise", "sound", "grinding", "squealing", "knocking", "humming"];

pub const CHECK_ENGINE_QUESTION: Question = q(
    "Is your Check Engine Light on right now, or has it come on recently?",
    &["check engine", "light on", "warning light"],
);

const BRAKE_POOL: &[Question] = &[
    q("Where exactly do you hear the brake noise — front, back, left, or right?", WHERE),
    q(
        "Does the noise happen mostly when you're braking, or do you hear it while driving too?",
        &["only when braking", "only when i brake", "while driving too", "all the time"],
    ),
    q("Is the noise constant or does it come and go?", CONSTANT),
    q("On a scale of 1 to 10, how severe is the noise?", &["severe", "scale", "1 to 10"]),
    q("How long has this been happening, and is it getting worse?", HOW_LONG),
    q("Do you feel any vibration in the steering wheel when braking?", STEERING),
    q(
        "Have you had any recent brake work or tire rotations?",
        &["brake job", "new pads", "rotation", "recent work"],
    ),
];

const LEAK_SMELL_POOL: &[Question] = &[
    q(
        "Have you noticed any fluid under the car — and if so, what color was it?",
        &["green", "pink", "brown", "black fluid", "color"],
    ),
    q(
        "Do you smell anything like burning, gas, or a sweet odor when this happens?",
        &["smell", "odor", "burning", "gas"],
    ),
    q("Does the temperature gauge ever run hotter than normal?", &["gauge", "running hot", "temperature"]),
];

const ENGINE_POOL: &[Question] = &[
    q(
        "Do you notice any hesitation or loss of power when accelerating?",
        &["hesitat", "stumble", "loss of power"],
    ),
    q("Does the engine idle smoothly, or does it feel rough?", &["idle", "rough", "smooth"]),
];

const VIBRATION_POOL: &[Question] = &[
    q("Do you feel the vibration more in the steering wheel or the seat?", STEERING),
    q(
        "Does the vibration change with speed — better or worse on the highway?",
        &["worse", "better", "improved"],
    ),
];

const TRANSMISSION_POOL: &[Question] = &[
    q(
        "Does the transmission shift smoothly, or do you feel any slipping or delays?",
        &["transmission", "shift", "gear"],
    ),
    q("Do you hear any noises when shifting gears?", NOISES),
];

const STARTING_POOL: &[Question] = &[
    q(
        "When you turn the key, does it make a clicking sound, crank slowly, or nothing at all?",
        &["click", "crank", "nothing at all"],
    ),
    q("Is it a rapid clicking or just one click?", &["rapid", "one click", "single click"]),
    q(
        "When did this problem start - was it gradual or sudden?",
        &["gradual", "sudden", "all of a sudden", "yesterday", "this morning"],
    ),
    q("Have you tried jump-starting the battery?", &["jump"]),
    q(
        "Do any lights come on when you turn the key?",
        &["dash", "lights come on", "lights are on", "no lights"],
    ),
    q("How old is the battery, if you happen to know?", &["years old", "new battery", "old battery"]),
];

const TEMPERATURE_POOL: &[Question] = &[
    q("Have you seen the temperature gauge go higher than normal?", &["gauge", "running hot"]),
    q("Have you noticed the heater or AC acting differently?", &["heater", "air conditioning", "a/c"]),
];

pub const GENERIC_POOL: &[Question] = &[
    q("Does this happen while driving, idling, or starting the car?", &["driving", "idling", "starting"]),
    q("Where exactly do you notice it — front, back, left, or right?", WHERE),
    q("Is it constant or does it come and go?", CONSTANT),
    q("How long has this been happening?", HOW_LONG),
];

const BELT_START_GUIDED: &[Question] = &[
    q(
        "Does this squealing happen only when you first start the car, or while driving too?",
        &["only when i start", "only at start", "while driving too", "first start"],
    ),
    q("Does the noise change when you turn on the air conditioning?", &["air conditioning", "a/c"]),
    q("Is it more noticeable when the engine is cold?", &["cold", "warm", "temperature"]),
];

const BRAKE_GUIDED: &[Question] = &[
    q(
        "Does the squealing happen only when you're braking, or while driving too?",
        &["only when braking", "only when i brake", "while driving too"],
    ),
    q("Where do you hear it coming from - front, back, left, or right?", WHERE),
    q("How long has this been happening?", HOW_LONG),
];

const CLICK_GUIDED: &[Question] = &[
    q("Is it a single click or rapid clicking?", &["rapid", "one click", "single click"]),
    q("Does it happen every time you turn the key?", &["every time", "sometimes", "once in a while"]),
    q(
        "Do any dashboard lights come on when you try to start?",
        &["dash", "lights come on", "lights are on", "no lights"],
    ),
];

const NO_START_GUIDED: &[Question] = &[
    q(
        "When you turn the key, do you hear clicking, slow cranking, or nothing at all?",
        &["click", "crank", "nothing at all"],
    ),
    q("How old is your battery, if you know?", &["years old", "new battery", "old battery"]),
    q("Have you tried jump-starting it?", &["jump"]),
];

const HANDLING_GUIDED: &[Question] = &[
    q("Does this happen at all speeds or only at certain speeds?", &["speed", "mph", "highway"]),
    q(
        "Do you feel it in the steering wheel, seat, or throughout the car?",
        &["steering wheel", "seat", "whole car"],
    ),
    q(
        "Is it worse during acceleration, braking, or constant speed?",
        &["accelerat", "braking", "cruising"],
    ),
];

/// At most this many catalog-guided questions are considered per turn.
const GUIDED_LIMIT: usize = 2;

pub const OPEN_FOLLOW_UP: &str =
    "Can you tell me more about when this first started and whether it's getting better or worse?";

/// True if any of the topic words already appear in the conversation.
/// Deliberately loose: the words need not answer this exact question.
pub fn was_topic_covered(topic_keywords: &[&str], full_text: &str) -> bool {
    topic_keywords.iter().any(|k| full_text.contains(k))
}

/// Context buckets, in the order their pools are concatenated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuestionContext {
    pub brake: bool,
    pub leak_smell: bool,
    pub engine_light: bool,
    pub vibration: bool,
    pub transmission: bool,
    pub starting: bool,
    pub temperature: bool,
}

impl QuestionContext {
    /// A no-start complaint silences every other bucket.
    pub fn classify(analysis: &SymptomAnalysis, facts: &KnownFacts) -> Self {
        let kw = |keys: &[&str]| analysis.has_any_keyword(keys);

        let starting = kw(&["won't start", "wont start", "not start", "no start", "trouble starting", "hard start", "clicking"]);
        if starting {
            return Self { starting, ..Self::default() };
        }

        Self {
            brake: (kw(&["brake", "brakes"]) || analysis.locations.contains(&LocationTag::Brakes))
                && kw(&["squealing", "grinding", "noise"]),
            leak_smell: kw(&["leak", "puddle", "smell", "odor", "sweet", "burning", "coolant"]),
            engine_light: kw(&["check engine", "misfire", "hesitation", "rough idle", "loss of power"])
                || facts.check_engine_light() == Some(true),
            vibration: kw(&["vibration", "wobbling"]) || analysis.conditions.contains(&ConditionTag::SpeedRelated),
            transmission: kw(&["hard shift", "slipping", "delayed shift"]),
            starting: false,
            temperature: kw(&["overheating", "hot", "temperature"]),
        }
    }

    pub fn candidates(&self, facts: &KnownFacts) -> Vec<Question> {
        let mut candidates = Vec::new();

        if self.brake {
            candidates.extend_from_slice(BRAKE_POOL);
        }
        if self.leak_smell {
            candidates.extend_from_slice(LEAK_SMELL_POOL);
        }
        if self.engine_light {
            if facts.check_engine_light().is_none() {
                candidates.push(CHECK_ENGINE_QUESTION);
            }
            candidates.extend_from_slice(ENGINE_POOL);
        }
        if self.vibration {
            candidates.extend_from_slice(VIBRATION_POOL);
        }
        if self.transmission {
            candidates.extend_from_slice(TRANSMISSION_POOL);
        }
        if self.starting {
            candidates.extend_from_slice(STARTING_POOL);
        }
        if self.temperature {
            candidates.extend_from_slice(TEMPERATURE_POOL);
        }

        candidates
    }
}

/// Follow-ups keyed by the matched catalog category and example phrasing.
pub fn guided_questions(catalog_match: &CatalogMatch) -> &'static [Question] {
    let symptom = catalog_match.symptom.to_lowercase();
    let pool: &'static [Question] = match catalog_match.category.as_str() {
        "noises" if symptom.contains("start") => BELT_START_GUIDED,
        "noises" if symptom.contains("brake") => BRAKE_GUIDED,
        "noises" if symptom.contains("click") => CLICK_GUIDED,
        "performance" if symptom.contains("start") => NO_START_GUIDED,
        "feel_handling" => HANDLING_GUIDED,
        _ => &[],
    };
    &pool[..pool.len().min(GUIDED_LIMIT)]
}

pub struct QuestionSelector;

impl QuestionSelector {
    pub fn new() -> Self {
        Self
    }

    /// Next question to ask, never empty.
    ///
    /// 1. Catalog-guided follow-ups for a real match.
    /// 2. Context-bucket pools, or the generic pool if no bucket fired.
    /// 3. Open-ended follow-up once everything looks answered.
    pub fn next_question(
        &self,
        analysis: &SymptomAnalysis,
        text: &str,
        facts: &KnownFacts,
        catalog_match: Option<&CatalogMatch>,
    ) -> String {
        if let Some(m) = catalog_match.filter(|m| m.is_match()) {
            if let Some(question) = first_open(guided_questions(m), text, facts) {
                return question.to_string();
            }
        }

        let mut candidates = QuestionContext::classify(analysis, facts).candidates(facts);
        if candidates.is_empty() {
            candidates.extend_from_slice(GENERIC_POOL);
        }

        first_open(&candidates, text, facts)
            .unwrap_or(OPEN_FOLLOW_UP)
            .to_string()
    }
}

impl Default for QuestionSelector {
    fn default() -> Self {
        Self::new()
    }
}

fn first_open(questions: &[Question], text: &str, facts: &KnownFacts) -> Option<&'static str> {
    let light_known_off = facts.check_engine_light() == Some(false);
    questions
        .iter()
        .filter(|q| !(light_known_off && q.text.to_lowercase().contains("check engine")))
        .find(|q| !was_topic_covered(q.topic, text))
        .map(|q| q.text)
}
