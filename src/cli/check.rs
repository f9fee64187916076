//! Check command implementation
//!
//! This module implements the `config-lint check` command, which:
//! - Loads configuration from config-lint.toml (if present)
//! - Loads and merges the rule set files
//! - Discovers and loads resources for the resolved format
//! - Evaluates the selected rules in parallel
//! - Formats output (human or JSONL)
//! - Returns appropriate exit code

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{self, CommandError, EXIT_ERROR, EXIT_FAILURE, EXIT_SUCCESS};
use crate::engine::{Linter, ValidationReport};
use crate::error::LoadError;
use crate::output::{HumanFormatter, JsonlFormatter};
use crate::resources::{load_files, loader_for};
use crate::types::ResourceFormat;
use std::path::PathBuf;
use termcolor::StandardStream;

/// Arguments of the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    pub paths: Vec<String>,
    pub rules: Vec<PathBuf>,
    pub format: Option<ResourceFormat>,
    pub tags: Option<String>,
    pub ids: Option<String>,
    pub output: Option<OutputFormat>,
    pub show_ok: bool,
    pub color: Option<ColorChoice>,
    pub config: Option<PathBuf>,
}

/// Run the check command
///
/// # Returns
///
/// Exit code:
/// - 0: Success (no failures; warnings allowed)
/// - 1: At least one FAILURE verdict
/// - 2: Error (configuration, I/O, unreadable input or unevaluable rule)
/// - 3: Parse error in a rule set or configuration file
pub fn run_check(options: &CheckOptions) -> i32 {
    match run_check_inner(options) {
        Ok((report, load_errors)) => exit_code(&report, &load_errors),
        Err(e) => common::fail(e),
    }
}

/// Errors take precedence over failures
fn exit_code(report: &ValidationReport, load_errors: &[LoadError]) -> i32 {
    if report.has_errors() || !load_errors.is_empty() {
        EXIT_ERROR
    } else if report.has_failures() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

fn run_check_inner(
    options: &CheckOptions,
) -> Result<(ValidationReport, Vec<LoadError>), CommandError> {
    let config = common::load_config(options.config.as_deref())?;
    let rule_set = common::load_rule_set(&options.rules, &config)?;
    let format = common::resolve_format(options.format, Some(&rule_set), &config)?;
    let selection =
        common::rule_selection(options.tags.as_deref(), options.ids.as_deref(), &config);
    let output = common::output_format(options.output, &config);

    let files = common::discover_files(&options.paths, format, Some(&rule_set), &config)?;
    if files.is_empty() {
        eprintln!("Warning: No files found to check.");
    }

    let loader = loader_for(format);
    let loaded = load_files(loader.as_ref(), &files);

    let linter = Linter::new(rule_set).include_ok(options.show_ok);
    if output == OutputFormat::Human {
        eprintln!(
            "Checking {} resources from {} files with {} rules...",
            loaded.resources.len(),
            files.len(),
            linter.selected_rules(&selection).len()
        );
    }
    let report = linter.validate(&loaded.resources, &selection);

    match output {
        OutputFormat::Human => {
            let mut stdout = StandardStream::stdout(common::color_choice(options.color, &config));
            HumanFormatter::new().write_report(&mut stdout, &report, &loaded.errors)?;
        }
        OutputFormat::Jsonl => {
            print!(
                "{}",
                JsonlFormatter::new().format_report(&report, &loaded.errors)
            );
        }
    }

    Ok((report, loaded.errors))
}
