//! Phrase tables shared by the signature rules, the confidence patterns,
//! the cause guardrails and the question buckets.
//!
//! All matching is plain substring containment over lowercase text. Word
//! fragments match too ("cel" inside "cancel"); the guardrails downstream are
//! tuned against that looseness, so it stays.

pub const SQUEAL: &[&str] = &["squeal", "squealing"];

/// Belt-drive context: cold start, under the hood, accessory load.
pub const SERPENTINE_CONTEXT: &[&str] = &[
    "start",
    "cold",
    "under the hood",
    "hood",
    "ac",
    "air conditioning",
    "steering",
];

/// Narrower belt context used by the brake guardrail.
pub const SERPENTINE_GUARD: &[&str] = &["under the hood", "hood", "start", "starting", "cold"];

pub const BRAKE_EXPLICIT: &[&str] = &["brake", "brakes", "from the brake", "brake noise"];

pub const CLICK: &[&str] = &["click", "clicking", "just clicks", "single click", "rapid click"];

pub const NO_START: &[&str] = &[
    "won't start",
    "wont start",
    "not start",
    "no start",
    "trouble starting",
    "doesn't start",
    "won't turn over",
];

pub const TURN: &[&str] = &["turn", "turning"];

pub const COOLING: &[&str] = &["sweet smell", "maple syrup", "coolant"];

pub const OVERHEAT: &str = "overheat";

pub const TRANSMISSION_SLIP: &[&str] = &["slip", "slipping", "delayed shift", "harsh shift", "rpm flare"];

pub const ENGINE_LIGHT_KEYWORDS: &[&str] = &["misfire", "check engine", "rough idle"];

pub const SCHEDULING_INTENT: &[&str] = &["schedule", "appointment", "book", "come in", "bring it in"];

pub const CEL_MENTION: &[&str] = &["check engine", "cel"];
pub const CEL_OFF: &[&str] = &["not on", "isn't on", "is not on", "off", "no"];
pub const CEL_ON: &[&str] = &["on", "lit", "light is on"];

// Post-diagnosis routing
pub const NEW_ISSUE: &[&str] = &[
    "another problem", "another issue", "another thing", "something else", "different problem",
    "new problem", "one more thing",
];
pub const NEW_SYMPTOM: &[&str] = &[
    "smell", "noise", "sound", "leak", "smoke", "grinding", "squealing", "knocking", "vibration",
    "shaking", "temperature", "hot", "overheating", "burning", "spot", "puddle",
];
pub const AFFIRMATION: &[&str] = &[
    "yes", "yeah", "yep", "sure", "correct", "okay", "schedule", "tomorrow", "today", "monday",
    "tuesday", "wednesday", "thursday", "friday",
];
/// "Tomorrow, right?" confirms a slot too.
pub const CONFIRMATION: &str = "right";
pub const CONFIRMATION_TIME: &[&str] = &["tomorrow", "today", "monday", "tuesday", "am", "pm"];

pub fn contains_any(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text.contains(p))
}

/// Lowercase concatenation of every turn plus the latest utterance.
pub fn conversation_text<'a, I>(turns: I, latest: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut text = turns.into_iter().collect::<Vec<_>>().join(" ");
    if !latest.is_empty() {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(latest);
    }
    text.to_lowercase()
}
