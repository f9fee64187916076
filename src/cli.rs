//! CLI argument parsing and command dispatch

pub mod args;
pub mod check;
pub(crate) mod common;
pub mod list;
pub mod search;

// Re-export types for convenient access
pub use args::{Cli, ColorChoice, Command, OutputFormat};
pub use check::{CheckOptions, run_check};
pub use common::{EXIT_ERROR, EXIT_FAILURE, EXIT_PARSE_ERROR, EXIT_SUCCESS};
pub use list::{ListOptions, run_list};
pub use search::{SearchOptions, run_search};
