pub mod event;
pub mod mission;
pub mod reactor;
pub mod state;
pub mod telemetry;

pub use event::{Event, InputEvent, TurnOutcome};
pub use mission::{Mission, MissionPlanner};
pub use reactor::Reactor;
pub use state::{ConversationPhase, SessionDelta, SessionId, SessionState};
