//! Diagnostic telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a read-only side-effect layer. It is never consulted by the
//! diagnostic controller or the reactor when deciding what to do next.
//!
//! # PRIVACY INVARIANT
//! Events carry no caller content: no utterances, no extracted keywords, no
//! causes. Only turn counts, enums and signature names are allowed.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::TelemetryEvent;
pub use metrics::{compute_snapshot, TelemetrySnapshot};
pub use recorder::TelemetryRecorder;
