pub mod config;
pub mod diagnosis;
pub mod kernel;
pub mod services;
pub mod session;

// Re-export specific items for convenient access
pub use config::JaimesConfig;
pub use diagnosis::{DiagnosticController, DiagnosticDecision, DiagnosticSession};
pub use kernel::reactor::Reactor;
