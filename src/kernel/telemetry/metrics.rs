use std::collections::{BTreeMap, HashMap, VecDeque};

use super::event::TelemetryEvent;
use crate::diagnosis::{DiagnosticAction, ExitReason};

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub turn_stats: TurnStats,
    pub exit_stats: ExitStats,
    /// Fast-path exits keyed by signature name.
    pub fast_paths: BTreeMap<&'static str, u64>,
    pub episode_resets: u64,
    pub catalog_unavailable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TurnStats {
    pub analyzed: u64,
    pub questions_asked: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ExitStats {
    pub total: u64,
    pub by_reason: HashMap<ExitReason, u64>,
    pub total_turns: u64,
    pub avg_turns_to_exit: f64,
}

impl ExitStats {
    pub fn count(&self, reason: ExitReason) -> u64 {
        self.by_reason.get(&reason).copied().unwrap_or(0)
    }
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();

    for event in events {
        match event {
            TelemetryEvent::TurnAnalyzed { action, .. } => {
                snap.turn_stats.analyzed += 1;
                if *action == DiagnosticAction::Ask {
                    snap.turn_stats.questions_asked += 1;
                }
            }
            TelemetryEvent::FastPath { signature } => {
                *snap.fast_paths.entry(signature.as_str()).or_insert(0) += 1;
            }
            TelemetryEvent::DiagnosisExit { reason, turns } => {
                snap.exit_stats.total += 1;
                snap.exit_stats.total_turns += u64::from(*turns);
                *snap.exit_stats.by_reason.entry(*reason).or_insert(0) += 1;
            }
            TelemetryEvent::EpisodeReset => snap.episode_resets += 1,
            TelemetryEvent::CatalogUnavailable => snap.catalog_unavailable = true,
        }
    }

    if snap.exit_stats.total > 0 {
        snap.exit_stats.avg_turns_to_exit =
            snap.exit_stats.total_turns as f64 / snap.exit_stats.total as f64;
    }

    snap
}
