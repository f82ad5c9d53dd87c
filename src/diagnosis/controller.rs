use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::catalog::SymptomCatalog;
use super::cause::CauseResolver;
use super::confidence::ConfidenceScorer;
use super::extractor::SymptomExtractor;
use super::lexicon::{self, contains_any, conversation_text};
use super::questions::QuestionSelector;
use super::signature::SignatureMatcher;
use super::types::{
    ConversationTurn, DiagnosticAction, DiagnosticDecision, DiagnosticSession, ExitReason, KnownFacts,
};

/// Coarse evidence lists for the sufficiency check at the question budget.
const SUFFICIENCY_INDICATORS: &[&[&str]] = &[
    &["noise", "sound", "vibration", "shaking", "leak", "smoke", "smell", "light", "warning"],
    &["driving", "idling", "starting", "stopping", "turning", "accelerating", "braking"],
    &["engine", "transmission", "brakes", "wheels", "front", "back", "side", "under"],
    &["loud", "quiet", "constant", "intermittent", "getting worse", "getting better"],
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticPolicy {
    pub max_turns: u32,
    pub fast_path_confidence: f32,
    pub fast_path_min_turns: u32,
    /// Evidence categories (of four) needed to call the information sufficient.
    pub sufficiency_categories: usize,
}

impl Default for DiagnosticPolicy {
    fn default() -> Self {
        Self {
            max_turns: 5,
            fast_path_confidence: 0.9,
            fast_path_min_turns: 2,
            sufficiency_categories: 3,
        }
    }
}

/// Owns the ask/stop decision for the diagnostic phase.
///
/// Every turn re-derives the full analysis from the whole conversation; nothing
/// is cached between turns. The catalog is shared read-only across sessions.
pub struct DiagnosticController {
    catalog: Arc<SymptomCatalog>,
    policy: DiagnosticPolicy,
    extractor: SymptomExtractor,
    signatures: SignatureMatcher,
    scorer: ConfidenceScorer,
    resolver: CauseResolver,
    selector: QuestionSelector,
}

impl DiagnosticController {
    pub fn new(catalog: Arc<SymptomCatalog>, policy: DiagnosticPolicy) -> Self {
        Self {
            catalog,
            policy,
            extractor: SymptomExtractor::new(),
            signatures: SignatureMatcher::new(),
            scorer: ConfidenceScorer::new(),
            resolver: CauseResolver::new(),
            selector: QuestionSelector::new(),
        }
    }

    /// Heuristics only, no catalog.
    pub fn without_catalog() -> Self {
        Self::new(Arc::new(SymptomCatalog::empty()), DiagnosticPolicy::default())
    }

    pub fn policy(&self) -> &DiagnosticPolicy {
        &self.policy
    }

    pub fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    /// Evaluate one caller turn. Pure: the session is only read; apply the
    /// result with [`DiagnosticSession::record`].
    pub fn analyze_turn(
        &self,
        session: &DiagnosticSession,
        history: &[ConversationTurn],
        latest_utterance: &str,
    ) -> DiagnosticDecision {
        // 1. Count the turn
        let turn_count = session.turn_count + 1;
        let facts = &session.known_facts;

        // 2. Re-derive everything from the full conversation
        let text = conversation_text(history.iter().map(|t| t.content.as_str()), latest_utterance);
        let analysis = self.extractor.extract(&text);
        let signature = self.signatures.detect(&text, facts);
        let catalog_match = self.catalog.best_match(&text);
        let boost = catalog_match.as_ref().map(|m| m.confidence_boost()).unwrap_or(0.0);
        let confidence = self.scorer.score(&text, &analysis, facts, signature, boost);

        debug!(
            "Diagnostic turn {}: confidence {:.2}, signature {:?}, catalog boost {:.2}, analysis {:?}",
            turn_count, confidence.score, signature, boost, analysis
        );

        // 3. Explicit scheduling intent beats the heuristics
        let latest_lower = latest_utterance.to_lowercase();
        let wants_to_schedule = contains_any(&latest_lower, lexicon::SCHEDULING_INTENT);

        let fast_path = confidence.score >= self.policy.fast_path_confidence
            && turn_count >= self.policy.fast_path_min_turns
            && signature.is_some();
        let budget_spent = turn_count >= self.policy.max_turns;
        let sufficient = self.has_sufficient_info(&text);

        // 4. Exit with a cause
        let exit_reason = if wants_to_schedule {
            Some(ExitReason::SchedulingIntent)
        } else if fast_path {
            Some(ExitReason::FastPath)
        } else if budget_spent && sufficient {
            Some(ExitReason::Sufficiency)
        } else if budget_spent {
            Some(ExitReason::MaxTurnsInsufficient)
        } else {
            None
        };

        match exit_reason {
            Some(ExitReason::MaxTurnsInsufficient) => {
                info!("Insufficient diagnostic info after {} turns", turn_count);
                DiagnosticDecision {
                    action: DiagnosticAction::ExitInsufficient,
                    turn_count,
                    confidence: confidence.score,
                    signature,
                    exit_reason,
                    next_question: None,
                    probable_cause: None,
                    updated_facts: facts.clone(),
                }
            }
            Some(reason) => {
                if let Some(sig) = signature {
                    info!("Diagnostic exit ({:?}) with signature {}", reason, sig);
                }
                let cause = self.resolver.resolve(&analysis, &text, facts, catalog_match.as_ref());
                DiagnosticDecision {
                    action: DiagnosticAction::ExitWithCause,
                    turn_count,
                    confidence: confidence.score,
                    signature,
                    exit_reason,
                    next_question: None,
                    probable_cause: Some(cause),
                    updated_facts: facts.clone(),
                }
            }
            // 6. Keep asking
            None => {
                let updated_facts = track_check_engine_light(facts, &latest_lower);
                let question =
                    self.selector.next_question(&analysis, &text, &updated_facts, catalog_match.as_ref());
                DiagnosticDecision {
                    action: DiagnosticAction::Ask,
                    turn_count,
                    confidence: confidence.score,
                    signature,
                    exit_reason: None,
                    next_question: Some(question),
                    probable_cause: None,
                    updated_facts,
                }
            }
        }
    }

    /// Analyze and record in one go.
    pub fn step(
        &self,
        session: &mut DiagnosticSession,
        history: &[ConversationTurn],
        latest_utterance: &str,
    ) -> DiagnosticDecision {
        let decision = self.analyze_turn(session, history, latest_utterance);
        session.record(&decision);
        decision
    }

    /// At least `sufficiency_categories` of the four indicator lists appear.
    pub fn has_sufficient_info(&self, text: &str) -> bool {
        let covered = SUFFICIENCY_INDICATORS
            .iter()
            .filter(|keywords| contains_any(text, keywords))
            .count();
        covered >= self.policy.sufficiency_categories
    }
}

/// Picks up an explicit "the check engine light is on/off" from the latest utterance.
pub fn track_check_engine_light(facts: &KnownFacts, latest_lower: &str) -> KnownFacts {
    let mut updated = facts.clone();
    if contains_any(latest_lower, lexicon::CEL_MENTION) {
        if contains_any(latest_lower, lexicon::CEL_OFF) {
            updated.set_check_engine_light(false);
        } else if contains_any(latest_lower, lexicon::CEL_ON) {
            updated.set_check_engine_light(true);
        }
    }
    updated
}
