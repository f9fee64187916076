//! Error types for config-lint
//!
//! This module defines the error types used throughout config-lint, following
//! a hierarchical structure with specific error variants for different
//! error categories. A path that does not resolve is not an error; it is
//! reported as absence by the resolver.

use std::path::PathBuf;

/// A rule or filter is structurally invalid
///
/// These errors are fatal to the rule that carries them but never to the
/// rest of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// Operator name not recognized
    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    /// Property path expression could not be parsed
    #[error("Invalid property path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// Regular expression in a filter value does not compile
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Operator requires an expected value but none was given
    #[error("Operator '{0}' requires a value")]
    MissingValue(String),

    /// Expected value has the wrong shape for the operator
    #[error("Operator '{op}' cannot compare against {value}: {message}")]
    InvalidValue {
        op: String,
        value: String,
        message: String,
    },

    /// Leaf fields and combinator fields set on the same filter
    #[error("Filter mixes leaf fields with '{0}' combinator")]
    MixedFilter(String),

    /// Filter with neither a key nor a combinator
    #[error("Filter has no key and no combinator")]
    EmptyFilter,

    /// Filter combines more than one of and/or/not
    #[error("Filter sets more than one combinator")]
    MultipleCombinators,

    /// NOT combinator with a child count other than one
    #[error("'not' filter must have exactly one child, found {0}")]
    NotArity(usize),

    /// Filter `type` other than `value`
    #[error("Unknown filter type '{0}'")]
    UnknownFilterType(String),
}

/// Rule document errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Two rules share an id
    #[error("Duplicate rule ID '{0}'")]
    DuplicateId(String),

    /// Rule document could not be parsed
    #[error("Failed to parse rules in {file}: {message}")]
    Parse { file: PathBuf, message: String },

    /// Rule document could not be read
    #[error("Failed to read rules file {file}: {source}")]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },
}

/// Errors surfaced by a resource loader for a single input file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Input file could not be read
    #[error("Failed to read {file}: {source}")]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },

    /// YAML syntax error
    #[error("Invalid YAML in {file}: {message}")]
    Yaml { file: PathBuf, message: String },

    /// JSON syntax error
    #[error("Invalid JSON in {file}: {message}")]
    Json { file: PathBuf, message: String },

    /// Document lacks a field the loader needs
    #[error("Missing field '{field}' in {file}")]
    MissingField { file: PathBuf, field: String },
}

impl LoadError {
    /// Returns the input file this error belongs to
    pub fn file(&self) -> &PathBuf {
        match self {
            LoadError::Io { file, .. }
            | LoadError::Yaml { file, .. }
            | LoadError::Json { file, .. }
            | LoadError::MissingField { file, .. } => file,
        }
    }
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantic validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level error type for config-lint
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    /// Malformed rule or filter
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Rule document error
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Resource loading error
    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    /// Configuration file error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
