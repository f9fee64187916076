//! Validation orchestration and input discovery

pub mod file_walker;
pub mod linter;

pub use file_walker::{FileWalker, FileWalkerError};
pub use linter::{EvaluationError, Linter, SearchMatch, ValidationReport, search, validate};
