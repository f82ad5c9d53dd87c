use std::collections::VecDeque;

use jaimes::diagnosis::{DiagnosticAction, DiagnosticController, ExitReason, FaultSignature};
use jaimes::kernel::event::InputEvent;
use jaimes::kernel::reactor::Reactor;
use jaimes::kernel::state::SessionId;
use jaimes::kernel::telemetry::{compute_snapshot, TelemetryEvent, TelemetryRecorder};
use tokio::sync::mpsc;

#[test]
fn test_recorder_is_bounded() {
    let mut recorder = TelemetryRecorder::new();
    for _ in 0..10_001 {
        recorder.record(TelemetryEvent::EpisodeReset);
    }
    assert_eq!(recorder.len(), 10_000);

    recorder.clear();
    assert!(recorder.is_empty());
}

#[test]
fn test_snapshot_aggregates() {
    let events: VecDeque<TelemetryEvent> = vec![
        TelemetryEvent::TurnAnalyzed { turn: 1, action: DiagnosticAction::Ask },
        TelemetryEvent::TurnAnalyzed { turn: 2, action: DiagnosticAction::ExitWithCause },
        TelemetryEvent::DiagnosisExit { reason: ExitReason::FastPath, turns: 2 },
        TelemetryEvent::FastPath { signature: FaultSignature::SerpentineBelt },
        TelemetryEvent::DiagnosisExit { reason: ExitReason::MaxTurnsInsufficient, turns: 5 },
        TelemetryEvent::EpisodeReset,
    ]
    .into();

    let snap = compute_snapshot(&events);
    assert_eq!(snap.turn_stats.analyzed, 2);
    assert_eq!(snap.turn_stats.questions_asked, 1);
    assert_eq!(snap.exit_stats.total, 2);
    assert_eq!(snap.exit_stats.count(ExitReason::FastPath), 1);
    assert_eq!(snap.exit_stats.count(ExitReason::Sufficiency), 0);
    assert!((snap.exit_stats.avg_turns_to_exit - 3.5).abs() < f64::EPSILON);
    assert_eq!(snap.fast_paths.get("serpentine_belt"), Some(&1));
    assert_eq!(snap.episode_resets, 1);
    assert!(!snap.catalog_unavailable);
}

#[test]
fn test_empty_snapshot() {
    let snap = compute_snapshot(&VecDeque::new());
    assert_eq!(snap.exit_stats.avg_turns_to_exit, 0.0);
    assert!(snap.fast_paths.is_empty());
}

#[tokio::test]
async fn test_events_carry_no_caller_text() {
    let (_tx, rx) = mpsc::channel(1);
    let (outcome_tx, _outcome_rx) = mpsc::channel(1);
    let mut reactor = Reactor::in_memory(rx, outcome_tx, DiagnosticController::without_catalog());
    let id = SessionId::new();

    reactor.handle(InputEvent::text(id, "my zebrastripe brakes are squealing")).unwrap();
    reactor.handle(InputEvent::text(id, "please book me in, zebrastripe")).unwrap();

    let serialized = serde_json::to_string(&reactor.telemetry.events().collect::<Vec<_>>()).unwrap();
    assert!(!serialized.contains("zebrastripe"));
    assert!(!serialized.contains("brake pads"));
    assert_eq!(reactor.telemetry.snapshot().exit_stats.total, 1);
}
