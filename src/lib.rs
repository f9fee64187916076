#![forbid(unsafe_code)]

//! config-lint: policy checks for infrastructure configuration
//!
//! Rules are declared in YAML rule sets. Each rule targets a resource type
//! and holds filters over the resource's property tree; the [`engine`]
//! evaluates selected rules against resources loaded from Kubernetes
//! manifests, Terraform plans or CloudFormation templates.

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod path;
pub mod resources;
pub mod rules;
pub mod types;

// Re-export error types for convenient access
pub use error::{ConfigError, ConfigurationError, LintError, LoadError, RuleError};

// Re-export the evaluation entry points
pub use engine::{Linter, SearchMatch, ValidationReport, search, validate};
pub use path::PropertyPath;
pub use resources::Resource;
pub use rules::{Filter, Predicate, Rule, RuleSelection, RuleSet, ValidationResult};

// Re-export core domain types for convenient access
pub use types::{ResourceFormat, RuleId, Severity, Status};
