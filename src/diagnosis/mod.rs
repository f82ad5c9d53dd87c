pub mod catalog;
pub mod cause;
pub mod confidence;
pub mod controller;
pub mod extractor;
pub mod lexicon;
pub mod matcher;
pub mod questions;
pub mod signature;
pub mod types;

pub use catalog::{CatalogCategory, CatalogError, CatalogItem, SymptomCatalog};
pub use cause::CauseResolver;
pub use confidence::ConfidenceScorer;
pub use controller::{DiagnosticController, DiagnosticPolicy};
pub use extractor::SymptomExtractor;
pub use matcher::CatalogMatch;
pub use questions::{was_topic_covered, QuestionSelector};
pub use signature::{FaultSignature, SignatureMatcher};
pub use types::*;
