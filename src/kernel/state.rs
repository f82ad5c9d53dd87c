use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::diagnosis::{ConversationTurn, DiagnosticDecision, DiagnosticSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversationPhase {
    /// Asking questions until an exit condition holds.
    Diagnosing,
    /// A probable cause was stated; waiting on the estimate question.
    AskAboutEstimate,
    /// Not enough information; an inspection was proposed.
    ProposeInspection,
}

/// Strict state delta. This is the ONLY way a session mutates.
#[derive(Debug, Clone)]
pub enum SessionDelta {
    TurnAppended(ConversationTurn),
    DiagnosticRecorded(DiagnosticDecision),
    PhaseChanged(ConversationPhase),
    ServiceBooked(String),
    /// New diagnostic episode: counter and cause reset, analysis restarts from here.
    EpisodeReset,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub id: SessionId,
    pub phase: ConversationPhase,
    history: Vec<ConversationTurn>,
    /// Index into `history` where the current diagnostic episode begins.
    episode_start: usize,
    pub diagnostic: DiagnosticSession,
    pub services_to_book: Vec<String>,
    // Monotonic, bumped by every delta
    pub version: u64,
}

impl SessionState {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            phase: ConversationPhase::Diagnosing,
            history: Vec::new(),
            episode_start: 0,
            diagnostic: DiagnosticSession::new(),
            services_to_book: Vec::new(),
            version: 0,
        }
    }

    pub fn reduce(&mut self, delta: SessionDelta) {
        self.version += 1;
        match delta {
            SessionDelta::TurnAppended(turn) => {
                self.history.push(turn);
            }
            SessionDelta::DiagnosticRecorded(decision) => {
                self.diagnostic.record(&decision);
            }
            SessionDelta::PhaseChanged(phase) => {
                self.phase = phase;
            }
            SessionDelta::ServiceBooked(service) => {
                if !self.services_to_book.contains(&service) {
                    self.services_to_book.push(service);
                }
            }
            SessionDelta::EpisodeReset => {
                self.diagnostic.begin_episode();
                self.episode_start = self.history.len();
                self.phase = ConversationPhase::Diagnosing;
            }
        }
    }

    // Read-only accessors
    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    /// Turns belonging to the current diagnostic episode.
    pub fn episode_history(&self) -> &[ConversationTurn] {
        &self.history[self.episode_start.min(self.history.len())..]
    }
}
