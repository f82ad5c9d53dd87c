use jaimes::diagnosis::cause::{BRAKE_PADS, FALLBACK_CAUSE};
use jaimes::diagnosis::questions::{GENERIC_POOL, OPEN_FOLLOW_UP};
use jaimes::diagnosis::{
    was_topic_covered, CatalogMatch, CauseResolver, KnownFacts, QuestionSelector, SymptomExtractor,
};

fn resolve(text: &str, catalog_match: Option<&CatalogMatch>) -> String {
    let analysis = SymptomExtractor::new().extract(text);
    CauseResolver::new().resolve(&analysis, text, &KnownFacts::new(), catalog_match)
}

fn ask(text: &str, facts: &KnownFacts, catalog_match: Option<&CatalogMatch>) -> String {
    let analysis = SymptomExtractor::new().extract(text);
    QuestionSelector::new().next_question(&analysis, text, facts, catalog_match)
}

fn belt_match(score: f32) -> CatalogMatch {
    CatalogMatch {
        score,
        category: "noises".to_string(),
        symptom: "squealing noise when starting the car".to_string(),
        potential_problems: vec!["worn serpentine belt".to_string(), "belt tensioner".to_string()],
        common_repairs: vec!["Serpentine belt replacement".to_string()],
    }
}

#[test]
fn test_cause_strong_catalog_match_wins() {
    let m = belt_match(0.8);
    assert_eq!(resolve("my brakes squeal", Some(&m)), "worn serpentine belt");
}

#[test]
fn test_cause_weak_catalog_match_falls_back_to_tree() {
    let m = belt_match(0.45);
    assert_eq!(resolve("there is a noise from the front", Some(&m)), "front suspension or steering issue");
}

#[test]
fn test_cause_brake_guardrail() {
    assert_eq!(resolve("i hear a brake noise and squealing when i stop", None), BRAKE_PADS);
}

#[test]
fn test_cause_starter_motor() {
    let text = "i'm having trouble starting my car it just clicks when i turn the key nothing else";
    assert_eq!(resolve(text, None), "starter motor");
}

#[test]
fn test_cause_generic_noise_falls_through_to_location() {
    assert_eq!(resolve("there is a noise from the front", None), "front suspension or steering issue");
}

#[test]
fn test_cause_wheel_bearing() {
    assert_eq!(
        resolve("humming from the front that gets louder with speed", None),
        "front wheel bearing issue"
    );
}

#[test]
fn test_cause_never_empty() {
    assert_eq!(resolve("", None), FALLBACK_CAUSE);
}

#[test]
fn test_question_empty_conversation() {
    let question = ask("", &KnownFacts::new(), None);
    assert_eq!(question, GENERIC_POOL[0].text);
    assert_eq!(question, "Does this happen while driving, idling, or starting the car?");
}

#[test]
fn test_question_skips_covered_topic() {
    let question = ask("it happens while driving", &KnownFacts::new(), None);
    assert_eq!(question, GENERIC_POOL[1].text);
}

#[test]
fn test_question_starting_silences_other_buckets() {
    let question = ask("my car won't start and there's a burning smell", &KnownFacts::new(), None);
    assert_eq!(
        question,
        "When you turn the key, does it make a clicking sound, crank slowly, or nothing at all?"
    );
}

#[test]
fn test_question_check_engine_light() {
    let text = "the engine has a misfire";

    let unknown = ask(text, &KnownFacts::new(), None);
    assert_eq!(unknown, "Is your Check Engine Light on right now, or has it come on recently?");

    let off = ask(text, &KnownFacts::new().with_check_engine_light(false), None);
    assert_eq!(off, "Do you notice any hesitation or loss of power when accelerating?");

    let on = ask(text, &KnownFacts::new().with_check_engine_light(true), None);
    assert!(!on.to_lowercase().contains("check engine"));
}

#[test]
fn test_question_catalog_guided() {
    let m = belt_match(0.6);
    let question = ask("my car squeals when i start it", &KnownFacts::new(), Some(&m));
    assert_eq!(
        question,
        "Does this squealing happen only when you first start the car, or while driving too?"
    );
}

#[test]
fn test_question_open_follow_up_when_all_covered() {
    let text = "driving front constant how long";
    assert_eq!(ask(text, &KnownFacts::new(), None), OPEN_FOLLOW_UP);
}

#[test]
fn test_was_topic_covered() {
    assert!(was_topic_covered(&["rapid", "one click"], "it was one click"));
    assert!(!was_topic_covered(&["jump"], "nothing happens"));
    assert!(!was_topic_covered(&[], "anything"));
}
