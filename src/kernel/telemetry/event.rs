use serde::{Deserialize, Serialize};

use crate::diagnosis::{DiagnosticAction, ExitReason, FaultSignature};

// Allowed: counts, enums, signature names
// Forbidden: utterances, keywords, probable causes

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    TurnAnalyzed {
        turn: u32,
        action: DiagnosticAction,
    },

    /// High-confidence exit driven by a fault signature.
    FastPath {
        signature: FaultSignature,
    },

    DiagnosisExit {
        reason: ExitReason,
        turns: u32,
    },

    EpisodeReset,

    /// The reactor is running on heuristics only.
    CatalogUnavailable,
}
