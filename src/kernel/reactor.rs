use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::event::{Event, InputEvent, TurnOutcome};
use super::mission::{Mission, MissionPlanner};
use super::state::{ConversationPhase, SessionDelta, SessionId, SessionState};
use super::telemetry::{TelemetryEvent, TelemetryRecorder};
use crate::diagnosis::lexicon::{self, contains_any};
use crate::diagnosis::{ConversationTurn, DiagnosticAction, DiagnosticController, ExitReason};
use crate::session::{InMemorySessionStore, SessionStore, SessionStoreError};

pub const DIAGNOSTIC_INSPECTION: &str = "Diagnostic Inspection";

/// Routes caller turns through the diagnostic controller and turns each
/// decision into a mission for the language model.
pub struct Reactor {
    pub receiver: mpsc::Receiver<Event>,
    outcomes: mpsc::Sender<TurnOutcome>,
    store: Box<dyn SessionStore + Send>,
    controller: DiagnosticController,
    planner: MissionPlanner,
    pub telemetry: TelemetryRecorder,
}

impl Reactor {
    pub fn new(
        receiver: mpsc::Receiver<Event>,
        outcomes: mpsc::Sender<TurnOutcome>,
        controller: DiagnosticController,
        store: Box<dyn SessionStore + Send>,
    ) -> Self {
        let mut telemetry = TelemetryRecorder::new();
        if controller.catalog().is_empty() {
            telemetry.record(TelemetryEvent::CatalogUnavailable);
        }
        Self {
            receiver,
            outcomes,
            store,
            controller,
            planner: MissionPlanner::new(),
            telemetry,
        }
    }

    /// Reactor backed by an in-memory session store.
    pub fn in_memory(
        receiver: mpsc::Receiver<Event>,
        outcomes: mpsc::Sender<TurnOutcome>,
        controller: DiagnosticController,
    ) -> Self {
        Self::new(receiver, outcomes, controller, Box::new(InMemorySessionStore::new()))
    }

    pub fn controller(&self) -> &DiagnosticController {
        &self.controller
    }

    pub fn session(&self, id: SessionId) -> Result<Option<SessionState>, SessionStoreError> {
        self.store.load(id)
    }

    /// Handle one caller utterance: load, step, persist.
    pub fn handle(&mut self, input: InputEvent) -> Result<TurnOutcome, SessionStoreError> {
        let mut state = self
            .store
            .load(input.session_id)?
            .unwrap_or_else(|| SessionState::new(input.session_id));

        let outcome = self.step(&mut state, &input.text);
        self.store.save(&state)?;
        Ok(outcome)
    }

    /// Pure step over an already loaded session.
    pub fn step(&mut self, state: &mut SessionState, text: &str) -> TurnOutcome {
        match state.phase {
            ConversationPhase::Diagnosing => self.diagnose(state, text),
            ConversationPhase::AskAboutEstimate | ConversationPhase::ProposeInspection => {
                if is_new_issue(text) {
                    info!("Session {}: new issue raised, restarting diagnosis", state.id);
                    self.begin_episode(state);
                    state.reduce(SessionDelta::ServiceBooked(DIAGNOSTIC_INSPECTION.to_string()));
                    self.diagnose(state, text)
                } else {
                    let mission = Mission::CloseOut {
                        probable_cause: state.diagnostic.probable_cause.clone(),
                    };
                    self.append_exchange(state, text, &mission);
                    TurnOutcome {
                        session_id: state.id,
                        phase: state.phase,
                        mission,
                        decision: None,
                    }
                }
            }
        }
    }

    fn diagnose(&mut self, state: &mut SessionState, text: &str) -> TurnOutcome {
        let decision = self
            .controller
            .analyze_turn(&state.diagnostic, state.episode_history(), text);

        self.telemetry.record(TelemetryEvent::TurnAnalyzed {
            turn: decision.turn_count,
            action: decision.action,
        });
        if let Some(reason) = decision.exit_reason {
            self.telemetry.record(TelemetryEvent::DiagnosisExit {
                reason,
                turns: decision.turn_count,
            });
            if reason == ExitReason::FastPath {
                if let Some(signature) = decision.signature {
                    self.telemetry.record(TelemetryEvent::FastPath { signature });
                }
            }
        }

        let mission = self.planner.plan(&decision);
        state.reduce(SessionDelta::DiagnosticRecorded(decision.clone()));

        match decision.action {
            DiagnosticAction::Ask => {}
            DiagnosticAction::ExitWithCause => {
                state.reduce(SessionDelta::PhaseChanged(ConversationPhase::AskAboutEstimate));
            }
            DiagnosticAction::ExitInsufficient => {
                state.reduce(SessionDelta::PhaseChanged(ConversationPhase::ProposeInspection));
                state.reduce(SessionDelta::ServiceBooked(DIAGNOSTIC_INSPECTION.to_string()));
            }
        }

        self.append_exchange(state, text, &mission);
        debug!(
            "Session {} turn {}: {:?} -> {:?}",
            state.id, decision.turn_count, decision.action, state.phase
        );

        TurnOutcome {
            session_id: state.id,
            phase: state.phase,
            mission,
            decision: Some(decision),
        }
    }

    fn append_exchange(&self, state: &mut SessionState, text: &str, mission: &Mission) {
        state.reduce(SessionDelta::TurnAppended(ConversationTurn::user(text)));
        state.reduce(SessionDelta::TurnAppended(ConversationTurn::assistant(mission.utterance())));
    }

    fn begin_episode(&mut self, state: &mut SessionState) {
        state.reduce(SessionDelta::EpisodeReset);
        self.telemetry.record(TelemetryEvent::EpisodeReset);
    }

    /// Explicit "new issue" signal from the orchestrator.
    pub fn reset_episode(&mut self, id: SessionId) -> Result<(), SessionStoreError> {
        let mut state = self.store.load(id)?.unwrap_or_else(|| SessionState::new(id));
        self.begin_episode(&mut state);
        self.store.save(&state)
    }

    pub fn end_session(&mut self, id: SessionId) -> Result<(), SessionStoreError> {
        info!("Session {} ended", id);
        self.store.remove(id)
    }

    /// Async driver loop. Stops on cancellation, when the event channel
    /// closes, or when nobody listens for outcomes anymore.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!("Reactor started");

        loop {
            let event = tokio::select! {
                _ = shutdown.cancelled() => break,
                event = self.receiver.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            match event {
                Event::Input(input) => match self.handle(input) {
                    Ok(outcome) => {
                        if self.outcomes.send(outcome).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Dropping turn, session store failed: {}", e),
                },
                Event::ResetEpisode(id) => {
                    if let Err(e) = self.reset_episode(id) {
                        warn!("Episode reset failed for {}: {}", id, e);
                    }
                }
                Event::EndSession(id) => {
                    if let Err(e) = self.end_session(id) {
                        warn!("Could not remove session {}: {}", id, e);
                    }
                }
            }
        }

        info!("Reactor stopped");
    }
}

/// After a diagnosis: explicit new-issue phrasing or fresh symptoms, unless
/// the caller is answering the scheduling question.
pub fn is_new_issue(text: &str) -> bool {
    let lower = text.to_lowercase();
    let raised = contains_any(&lower, lexicon::NEW_ISSUE) || contains_any(&lower, lexicon::NEW_SYMPTOM);
    raised && !is_affirmation(&lower)
}

/// A yes or a day/time for the appointment. Expects lowercase text.
pub fn is_affirmation(lower: &str) -> bool {
    contains_any(lower, lexicon::AFFIRMATION)
        || (lower.contains(lexicon::CONFIRMATION) && contains_any(lower, lexicon::CONFIRMATION_TIME))
}
