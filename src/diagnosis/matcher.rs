use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::catalog::SymptomCatalog;

/// Above this a catalog match steers the follow-up questions and boosts confidence.
pub const MATCH_THRESHOLD: f32 = 0.3;
/// Above this a catalog match names the probable cause outright.
pub const DIAGNOSIS_THRESHOLD: f32 = 0.5;
pub const MAX_CONFIDENCE_BOOST: f32 = 0.4;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "i",
    "my", "is", "it", "when", "from", "under", "car", "vehicle",
];

const COOLING_PHRASES: &[&str] = &["sweet smell", "overheating", "coolant", "green fluid", "maple syrup"];

const DIAGNOSTIC_KEYWORDS: &[&str] = &[
    "squealing", "clicking", "grinding", "humming", "knocking", "clunking", "won't start",
    "hard start", "slow crank", "just clicks", "overheating", "leaking", "vibration", "shaking",
    "rattling",
];

const COOLING_BONUS: f32 = 0.6;
const KEYWORD_BONUS: f32 = 0.3;
const SYNONYM_BONUS: f32 = 0.2;
const MISMATCH_PENALTY: f32 = 0.5;

/// (example stem, conversation words that count as the same idea)
const SYNONYMS: &[(&str, &[&str])] = &[
    ("start", &["start", "starting", "won't start", "wont start"]),
    ("click", &["click", "clicking", "clicks"]),
    ("squeal", &["squeal", "squealing", "squeak"]),
];

/// Best catalog entry for a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMatch {
    pub score: f32,
    pub category: String,
    pub symptom: String,
    pub potential_problems: Vec<String>,
    pub common_repairs: Vec<String>,
}

impl CatalogMatch {
    pub fn is_match(&self) -> bool {
        self.score > MATCH_THRESHOLD
    }

    pub fn confidence_boost(&self) -> f32 {
        if self.is_match() {
            self.score.min(MAX_CONFIDENCE_BOOST)
        } else {
            0.0
        }
    }

    /// First listed problem, only for a strong match.
    pub fn diagnosis(&self) -> Option<&str> {
        if self.score > DIAGNOSIS_THRESHOLD {
            self.potential_problems.first().map(String::as_str)
        } else {
            None
        }
    }
}

/// Fuzzy score of one catalog example phrase against the conversation, in [0, 1].
pub fn symptom_match_score(conversation_text: &str, symptom_example: &str) -> f32 {
    let conversation = conversation_text.to_lowercase();
    let example = symptom_example.to_lowercase();

    let conv_words: HashSet<&str> = conversation
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w))
        .collect();
    let example_words: HashSet<&str> = example
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w))
        .collect();

    if example_words.is_empty() {
        return 0.0;
    }

    let overlap = conv_words.intersection(&example_words).count();
    let mut score = overlap as f32 / example_words.len() as f32;

    if COOLING_PHRASES.iter().any(|p| conversation.contains(p))
        && COOLING_PHRASES.iter().any(|p| example.contains(p))
    {
        score += COOLING_BONUS;
    }

    for keyword in DIAGNOSTIC_KEYWORDS {
        if conversation.contains(keyword) && example.contains(keyword) {
            score += KEYWORD_BONUS;
        }
    }

    // Noise examples must not win a cooling conversation.
    if example.contains("rattling") && (conversation.contains("overheating") || conversation.contains("sweet")) {
        score -= MISMATCH_PENALTY;
    }

    for (stem, family) in SYNONYMS {
        if example.contains(stem) && family.iter().any(|w| conversation.contains(w)) {
            score += SYNONYM_BONUS;
        }
    }

    score.clamp(0.0, 1.0)
}

impl SymptomCatalog {
    /// Highest scoring example across the catalog. Ties keep the earlier entry.
    /// `None` when the catalog is empty or nothing scores above zero.
    pub fn best_match(&self, conversation_text: &str) -> Option<CatalogMatch> {
        let mut best: Option<CatalogMatch> = None;

        for category in &self.categories {
            for item in &category.items {
                for example in &item.symptom_examples {
                    let score = symptom_match_score(conversation_text, example);
                    let current = best.as_ref().map(|b| b.score).unwrap_or(0.0);
                    if score > current {
                        best = Some(CatalogMatch {
                            score,
                            category: category.category.clone(),
                            symptom: example.clone(),
                            potential_problems: item.potential_problems.clone(),
                            common_repairs: item.common_repairs.clone(),
                        });
                    }
                }
            }
        }

        best
    }
}
