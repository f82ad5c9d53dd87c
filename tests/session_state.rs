use jaimes::diagnosis::{ConversationTurn, DiagnosticController, DiagnosticSession};
use jaimes::kernel::mission::{Mission, MissionPlanner};
use jaimes::kernel::state::{ConversationPhase, SessionDelta, SessionId, SessionState};
use jaimes::diagnosis::questions::OPEN_FOLLOW_UP;
use jaimes::session::{FileSessionStore, InMemorySessionStore, SessionStore, SessionStoreError};

fn sample_state() -> SessionState {
    let mut state = SessionState::new(SessionId::new());
    state.reduce(SessionDelta::TurnAppended(ConversationTurn::user("my brakes squeal")));
    state.reduce(SessionDelta::TurnAppended(ConversationTurn::assistant("Where do you hear it?")));
    state.reduce(SessionDelta::PhaseChanged(ConversationPhase::AskAboutEstimate));
    state
}

#[test]
fn test_reduce_bumps_version() {
    let state = sample_state();
    assert_eq!(state.version, 3);
    assert_eq!(state.history().len(), 2);
    assert_eq!(state.phase, ConversationPhase::AskAboutEstimate);
}

#[test]
fn test_service_booked_once() {
    let mut state = SessionState::new(SessionId::new());
    state.reduce(SessionDelta::ServiceBooked("Diagnostic Inspection".to_string()));
    state.reduce(SessionDelta::ServiceBooked("Diagnostic Inspection".to_string()));
    assert_eq!(state.services_to_book, vec!["Diagnostic Inspection".to_string()]);
}

#[test]
fn test_episode_reset_starts_fresh_history_window() {
    let controller = DiagnosticController::without_catalog();
    let mut state = sample_state();
    let decision = controller.analyze_turn(&DiagnosticSession::new(), &[], "hmm");
    state.reduce(SessionDelta::DiagnosticRecorded(decision));
    assert_eq!(state.diagnostic.turn_count, 1);

    state.reduce(SessionDelta::EpisodeReset);

    assert_eq!(state.phase, ConversationPhase::Diagnosing);
    assert_eq!(state.diagnostic.turn_count, 0);
    assert!(state.episode_history().is_empty());
    assert_eq!(state.history().len(), 2);
}

#[test]
fn test_mission_planner_fallbacks() {
    let controller = DiagnosticController::without_catalog();
    let planner = MissionPlanner::new();

    let mut decision = controller.analyze_turn(&DiagnosticSession::new(), &[], "hmm");
    decision.next_question = None;
    assert_eq!(planner.plan(&decision), Mission::AskQuestion(OPEN_FOLLOW_UP.to_string()));

    let scheduled = controller.analyze_turn(&DiagnosticSession::new(), &[], "can i book an appointment");
    match planner.plan(&scheduled) {
        Mission::StateProbableCause(cause) => assert!(!cause.is_empty()),
        other => panic!("unexpected mission {:?}", other),
    }
}

#[test]
fn test_mission_instruction_mentions_question() {
    let mission = Mission::AskQuestion("Is it constant?".to_string());
    assert!(mission.instruction().contains("Ask this specific question: 'Is it constant?'"));
    assert_eq!(mission.utterance(), "Is it constant?");

    let close = Mission::CloseOut { probable_cause: None };
    assert!(close.instruction().contains("Do not ask more diagnostic questions"));
}

#[test]
fn test_in_memory_store() {
    let mut store = InMemorySessionStore::new();
    let state = sample_state();

    assert!(store.load(state.id).unwrap().is_none());
    store.save(&state).unwrap();
    let loaded = store.load(state.id).unwrap().unwrap();
    assert_eq!(loaded.version, state.version);
    assert_eq!(store.len(), 1);

    store.remove(state.id).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileSessionStore::new(dir.path().join("sessions")).unwrap();
    let state = sample_state();

    store.save(&state).unwrap();
    assert!(store.dir().join(format!("{}.json", state.id)).exists());

    let loaded = store.load(state.id).unwrap().unwrap();
    assert_eq!(loaded.id, state.id);
    assert_eq!(loaded.phase, ConversationPhase::AskAboutEstimate);
    assert_eq!(loaded.history(), state.history());
    assert_eq!(loaded.version, 3);

    store.remove(state.id).unwrap();
    assert!(store.load(state.id).unwrap().is_none());
    // Removing twice is fine
    store.remove(state.id).unwrap();
}

#[test]
fn test_file_store_corrupt_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path()).unwrap();
    let id = SessionId::new();
    std::fs::write(dir.path().join(format!("{}.json", id)), "{ broken").unwrap();

    assert!(matches!(store.load(id), Err(SessionStoreError::Serialization(_))));
}
