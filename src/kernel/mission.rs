use serde::{Deserialize, Serialize};

use crate::diagnosis::questions::OPEN_FOLLOW_UP;
use crate::diagnosis::{DiagnosticAction, DiagnosticDecision};

const GENERIC_CAUSE: &str = "the issue you described";

/// A scripted instruction for the language model for one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mission {
    AskQuestion(String),
    StateProbableCause(String),
    ProposeInspection,
    /// After the diagnosis: steer toward the estimate and scheduling.
    CloseOut { probable_cause: Option<String> },
}

impl Mission {
    /// Full instruction inserted into the model prompt.
    pub fn instruction(&self) -> String {
        match self {
            Mission::AskQuestion(question) => format!(
                "You are an expert mechanic diagnosing a problem over the phone. \
                 Your goal is to narrow down the issue. Ask this specific question: '{}' \
                 Use concise, professional phrasing. Avoid speculative language.",
                question
            ),
            Mission::StateProbableCause(cause) => format!(
                "You have gathered enough diagnostic information. You MUST complete ALL THREE steps: \
                 1. State a probable cause: 'Based on what you've told me, the most likely cause is {}.' \
                 2. Explain inspection needed: 'However, a physical inspection is needed to be certain.' \
                 3. ASK THE ESTIMATE QUESTION: 'Would you like to get a cost estimate for that inspection and repair?' \
                 You must complete all three steps in your response.",
                cause
            ),
            Mission::ProposeInspection => "You have asked several diagnostic questions but still need more \
                 information to determine the issue. Your mission is to: \
                 1. Acknowledge that you need more information to properly diagnose the problem. \
                 2. Explain that a physical inspection by our technicians would be the best way to identify the issue. \
                 3. Ask if they would like to schedule an appointment for a diagnostic inspection."
                .to_string(),
            Mission::CloseOut { probable_cause } => format!(
                "The diagnosis for {} is complete. Do not ask more diagnostic questions. \
                 Offer a cost estimate or ask what day and time works best to bring the vehicle in. \
                 Never say something is scheduled until the date and time are confirmed.",
                probable_cause.as_deref().unwrap_or(GENERIC_CAUSE)
            ),
        }
    }

    /// The line the assistant is expected to say, recorded in the history.
    pub fn utterance(&self) -> String {
        match self {
            Mission::AskQuestion(question) => question.clone(),
            Mission::StateProbableCause(cause) => format!(
                "Based on what you've told me, the most likely cause is {}. \
                 Would you like to get a cost estimate for that inspection and repair?",
                cause
            ),
            Mission::ProposeInspection => "I need a bit more information to pin this down. \
                 Would you like to schedule a diagnostic inspection?"
                .to_string(),
            Mission::CloseOut { .. } => "What day and time works best to bring it in?".to_string(),
        }
    }
}

pub struct MissionPlanner;

impl MissionPlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn plan(&self, decision: &DiagnosticDecision) -> Mission {
        match decision.action {
            DiagnosticAction::Ask => Mission::AskQuestion(
                decision
                    .next_question
                    .clone()
                    .unwrap_or_else(|| OPEN_FOLLOW_UP.to_string()),
            ),
            DiagnosticAction::ExitWithCause => Mission::StateProbableCause(
                decision
                    .probable_cause
                    .clone()
                    .unwrap_or_else(|| GENERIC_CAUSE.to_string()),
            ),
            DiagnosticAction::ExitInsufficient => Mission::ProposeInspection,
        }
    }
}

impl Default for MissionPlanner {
    fn default() -> Self {
        Self::new()
    }
}
