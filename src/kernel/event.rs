use super::mission::Mission;
use super::state::{ConversationPhase, SessionId};
use crate::diagnosis::DiagnosticDecision;

#[derive(Debug, Clone)]
pub enum Event {
    /// A caller utterance (already transcribed).
    Input(InputEvent),
    /// Orchestrator signal: the caller raised a new issue.
    ResetEpisode(SessionId),
    /// Call ended; drop the session.
    EndSession(SessionId),
}

#[derive(Debug, Clone)]
pub struct InputEvent {
    pub session_id: SessionId,
    pub text: String,
}

impl InputEvent {
    pub fn text(session_id: SessionId, text: &str) -> Self {
        Self {
            session_id,
            text: text.to_string(),
        }
    }
}

/// What the kernel decided for one caller turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session_id: SessionId,
    pub phase: ConversationPhase,
    pub mission: Mission,
    /// Present for turns handled by the diagnostic controller.
    pub decision: Option<DiagnosticDecision>,
}
