//! Common helper functions shared across CLI commands
//!
//! Loading configuration and rule sets, resolving the resource format,
//! discovering input files and choosing output settings.

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::config::Config;
use crate::engine::file_walker::{FileWalker, FileWalkerError};
use crate::error::{ConfigError, ConfigurationError, RuleError};
use crate::rules::selector::split_list;
use crate::rules::{RuleSelection, RuleSet};
use crate::types::ResourceFormat;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_ERROR: i32 = 2;
pub const EXIT_PARSE_ERROR: i32 = 3;

/// Errors that abort a command before or instead of producing a report
#[derive(Debug, thiserror::Error)]
pub(crate) enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    #[error("Invalid expression: {0}")]
    Expression(#[from] ConfigurationError),

    #[error("File walker error: {0}")]
    FileWalker(#[from] FileWalkerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

impl CommandError {
    /// Exit code for this error
    pub(crate) fn exit_code(&self) -> i32 {
        match self {
            CommandError::Config(ConfigError::Parse(_)) => EXIT_PARSE_ERROR,
            CommandError::Rule(RuleError::Parse { .. }) => EXIT_PARSE_ERROR,
            _ => EXIT_ERROR,
        }
    }
}

/// Report an error on stderr and map it to an exit code
pub(crate) fn fail(err: CommandError) -> i32 {
    eprintln!("Error: {}", err);
    err.exit_code()
}

/// Load the configuration file
///
/// An explicit path must exist; otherwise `config-lint.toml` in the working
/// directory is used when present.
///
/// # Errors
///
/// Returns `ConfigError::Io` if an explicit file cannot be read and
/// `ConfigError::Parse` or `ConfigError::Validation` for invalid contents.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => Config::load(path),
        None => Config::load_or_default("."),
    }
}

/// Load rule sets named on the command line, falling back to the config file
pub(crate) fn load_rule_set(flags: &[PathBuf], config: &Config) -> Result<RuleSet, CommandError> {
    let paths: Vec<PathBuf> = if flags.is_empty() {
        config.lint.rules.iter().map(PathBuf::from).collect()
    } else {
        flags.to_vec()
    };

    if paths.is_empty() {
        return Err(CommandError::Usage(
            "No rule files given. Pass --rules or set lint.rules in config-lint.toml".to_string(),
        ));
    }

    Ok(RuleSet::load_all(&paths)?)
}

/// Resource format from the flag, else the rule set, else the config file
pub(crate) fn resolve_format(
    flag: Option<ResourceFormat>,
    rule_set: Option<&RuleSet>,
    config: &Config,
) -> Result<ResourceFormat, CommandError> {
    flag.or_else(|| rule_set.and_then(RuleSet::format))
        .or(config.lint.format)
        .ok_or_else(|| {
            CommandError::Usage(
                "Resource format is unknown. Pass --format or declare a type in the rule set"
                    .to_string(),
            )
        })
}

/// Discover input files for a format
///
/// Include patterns come from the config file, else the rule set `files`
/// list, else the format defaults.
pub(crate) fn discover_files(
    paths: &[String],
    format: ResourceFormat,
    rule_set: Option<&RuleSet>,
    config: &Config,
) -> Result<Vec<PathBuf>, FileWalkerError> {
    let include: Vec<&str> = if !config.lint.include.is_empty() {
        config.lint.include.iter().map(String::as_str).collect()
    } else if let Some(rule_set) = rule_set
        && !rule_set.files().is_empty()
    {
        rule_set.files().iter().map(String::as_str).collect()
    } else {
        format.default_include().to_vec()
    };
    let exclude: Vec<&str> = config.lint.exclude.iter().map(String::as_str).collect();

    let walker = FileWalker::new(&include, &exclude)?;
    walker.discover(paths)
}

/// Rule selection from flags, falling back to the config file per list
pub(crate) fn rule_selection(
    tags: Option<&str>,
    ids: Option<&str>,
    config: &Config,
) -> RuleSelection {
    RuleSelection::new(
        tags.map(split_list).unwrap_or_else(|| config.lint.tags.clone()),
        ids.map(split_list).unwrap_or_else(|| config.lint.ids.clone()),
    )
}

pub(crate) fn output_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.unwrap_or_else(|| config.output.format.into())
}

/// Color choice for stdout, with `auto` resolved against the terminal
pub(crate) fn color_choice(flag: Option<ColorChoice>, config: &Config) -> termcolor::ColorChoice {
    match flag.unwrap_or_else(|| config.output.color.into()) {
        ColorChoice::Always => termcolor::ColorChoice::Always,
        ColorChoice::Never => termcolor::ColorChoice::Never,
        ColorChoice::Auto if std::io::stdout().is_terminal() => termcolor::ColorChoice::Auto,
        ColorChoice::Auto => termcolor::ColorChoice::Never,
    }
}
