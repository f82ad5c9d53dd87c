use std::sync::Arc;

use jaimes::diagnosis::{
    DiagnosticAction, DiagnosticController, DiagnosticPolicy, ExitReason, SymptomCatalog,
};
use jaimes::kernel::event::{Event, InputEvent, TurnOutcome};
use jaimes::kernel::mission::Mission;
use jaimes::kernel::reactor::{is_affirmation, is_new_issue, Reactor, DIAGNOSTIC_INSPECTION};
use jaimes::kernel::state::{ConversationPhase, SessionId};
use jaimes::session::FileSessionStore;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

fn reactor_with(controller: DiagnosticController) -> (Reactor, mpsc::Sender<Event>, mpsc::Receiver<TurnOutcome>) {
    let (tx, rx) = mpsc::channel(100);
    let (outcome_tx, outcome_rx) = mpsc::channel(100);
    (Reactor::in_memory(rx, outcome_tx, controller), tx, outcome_rx)
}

fn never_sufficient() -> DiagnosticController {
    let policy = DiagnosticPolicy { sufficiency_categories: 5, ..DiagnosticPolicy::default() };
    DiagnosticController::new(Arc::new(SymptomCatalog::empty()), policy)
}

#[tokio::test]
async fn test_scheduling_then_close_out_then_new_issue() {
    let (mut reactor, _tx, _rx) = reactor_with(DiagnosticController::without_catalog());
    let id = SessionId::new();

    // 1. Caller asks to book right away
    let outcome = reactor
        .handle(InputEvent::text(id, "I want to schedule an appointment, my brakes are squealing"))
        .unwrap();
    assert_eq!(outcome.phase, ConversationPhase::AskAboutEstimate);
    assert_eq!(outcome.mission, Mission::StateProbableCause("worn brake pads".to_string()));
    assert_eq!(outcome.decision.as_ref().map(|d| d.exit_reason), Some(Some(ExitReason::SchedulingIntent)));

    // 2. Plain answer stays in the closing phase
    let outcome = reactor.handle(InputEvent::text(id, "yes please")).unwrap();
    assert!(outcome.decision.is_none());
    assert_eq!(
        outcome.mission,
        Mission::CloseOut { probable_cause: Some("worn brake pads".to_string()) }
    );

    // 3. Fresh symptoms restart the diagnosis
    let outcome = reactor.handle(InputEvent::text(id, "also there's a grinding noise")).unwrap();
    assert_eq!(outcome.phase, ConversationPhase::Diagnosing);
    let decision = outcome.decision.unwrap();
    assert_eq!(decision.turn_count, 1);
    assert_eq!(decision.action, DiagnosticAction::Ask);

    let state = reactor.session(id).unwrap().unwrap();
    assert_eq!(state.history().len(), 6);
    assert_eq!(state.episode_history().len(), 2);
    assert!(state.services_to_book.contains(&DIAGNOSTIC_INSPECTION.to_string()));

    let snapshot = reactor.telemetry.snapshot();
    assert!(snapshot.catalog_unavailable);
    assert_eq!(snapshot.episode_resets, 1);
    assert_eq!(snapshot.turn_stats.analyzed, 2);
    assert_eq!(snapshot.exit_stats.count(ExitReason::SchedulingIntent), 1);
}

#[tokio::test]
async fn test_insufficient_exit_proposes_inspection() {
    let (mut reactor, _tx, _rx) = reactor_with(never_sufficient());
    let id = SessionId::new();

    let mut last = None;
    for utterance in ["hmm", "not sure", "maybe", "i don't know", "it's weird"] {
        last = Some(reactor.handle(InputEvent::text(id, utterance)).unwrap());
    }

    let outcome = last.unwrap();
    assert_eq!(outcome.phase, ConversationPhase::ProposeInspection);
    assert_eq!(outcome.mission, Mission::ProposeInspection);

    let state = reactor.session(id).unwrap().unwrap();
    assert_eq!(state.services_to_book, vec![DIAGNOSTIC_INSPECTION.to_string()]);
    assert_eq!(state.diagnostic.turn_count, 5);

    let snapshot = reactor.telemetry.snapshot();
    assert_eq!(snapshot.turn_stats.questions_asked, 4);
    assert_eq!(snapshot.exit_stats.count(ExitReason::MaxTurnsInsufficient), 1);
    assert!((snapshot.exit_stats.avg_turns_to_exit - 5.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_reset_and_end_session() {
    let (mut reactor, _tx, _rx) = reactor_with(DiagnosticController::without_catalog());
    let id = SessionId::new();

    reactor.handle(InputEvent::text(id, "can i book an appointment")).unwrap();
    reactor.reset_episode(id).unwrap();

    let state = reactor.session(id).unwrap().unwrap();
    assert_eq!(state.phase, ConversationPhase::Diagnosing);
    assert_eq!(state.diagnostic.turn_count, 0);
    assert!(state.diagnostic.probable_cause.is_none());

    reactor.end_session(id).unwrap();
    assert!(reactor.session(id).unwrap().is_none());
}

#[tokio::test]
async fn test_sessions_survive_in_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let id = SessionId::new();

    for expected_turn in 1..=2 {
        let (_tx, rx) = mpsc::channel(1);
        let (outcome_tx, _outcome_rx) = mpsc::channel(1);
        let store = FileSessionStore::new(dir.path()).unwrap();
        let mut reactor = Reactor::new(rx, outcome_tx, DiagnosticController::without_catalog(), Box::new(store));

        let outcome = reactor.handle(InputEvent::text(id, "hmm")).unwrap();
        assert_eq!(outcome.decision.unwrap().turn_count, expected_turn);
    }
}

#[tokio::test]
async fn test_run_loop_until_cancelled() {
    let (mut reactor, tx, mut outcomes) = reactor_with(DiagnosticController::without_catalog());
    let shutdown = CancellationToken::new();
    let token = shutdown.clone();
    let handle = tokio::spawn(async move {
        reactor.run(token).await;
        reactor
    });

    let id = SessionId::new();
    tx.send(Event::Input(InputEvent::text(id, "my car makes a noise"))).await.unwrap();
    let outcome = outcomes.recv().await.unwrap();
    assert_eq!(outcome.session_id, id);
    assert!(matches!(outcome.mission, Mission::AskQuestion(_)));

    shutdown.cancel();
    let reactor = handle.await.unwrap();
    assert_eq!(reactor.telemetry.snapshot().turn_stats.analyzed, 1);
}

#[tokio::test]
async fn test_run_loop_stops_when_channel_closes() {
    let (mut reactor, tx, _outcomes) = reactor_with(DiagnosticController::without_catalog());
    drop(tx);
    reactor.run(CancellationToken::new()).await;
}

#[test]
fn test_new_issue_detection() {
    assert!(is_new_issue("I have another problem"));
    assert!(is_new_issue("there's also a burning smell"));
    assert!(!is_new_issue("yes, tomorrow morning works"));
    assert!(!is_new_issue("yes, and the noise is still there"));
    assert!(!is_new_issue("how much will it cost"));
}

#[test]
fn test_scheduling_replies_are_not_new_issues() {
    assert!(!is_new_issue("do you have a spot open friday?"));
    assert!(!is_new_issue("another day works"));
    assert!(!is_new_issue("maybe another day, how about thursday"));
    assert!(!is_new_issue("monday works, is the shop hot inside lol"));
    assert!(!is_new_issue("tomorrow at 9am, right? the noise is the same"));
    assert!(!is_new_issue("yes, and one more thing"));
    assert!(is_affirmation("10 am, right?"));
    assert!(!is_affirmation("is that right"));
}

#[tokio::test]
async fn test_scheduling_reply_keeps_closing_phase() {
    let (mut reactor, _tx, _rx) = reactor_with(DiagnosticController::without_catalog());
    let id = SessionId::new();

    reactor
        .handle(InputEvent::text(id, "I want to schedule an appointment, my brakes are squealing"))
        .unwrap();

    for reply in ["do you have a spot open friday?", "another day works"] {
        let outcome = reactor.handle(InputEvent::text(id, reply)).unwrap();
        assert_eq!(outcome.phase, ConversationPhase::AskAboutEstimate, "{}", reply);
        assert!(outcome.decision.is_none(), "{}", reply);
    }

    let state = reactor.session(id).unwrap().unwrap();
    assert!(state.services_to_book.is_empty());
    assert_eq!(state.diagnostic.turn_count, 1);
    assert_eq!(reactor.telemetry.snapshot().episode_resets, 0);
}
