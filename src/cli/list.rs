//! List command implementation
//!
//! This module implements the `config-lint list` command, which shows the
//! rules left after tag and id selection, in rule set order.

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{self, CommandError, EXIT_SUCCESS};
use crate::output::{HumanFormatter, JsonlFormatter};
use crate::rules::Rule;
use std::path::PathBuf;
use termcolor::StandardStream;

/// Arguments of the list command
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub rules: Vec<PathBuf>,
    pub tags: Option<String>,
    pub ids: Option<String>,
    pub output: Option<OutputFormat>,
    pub color: Option<ColorChoice>,
    pub config: Option<PathBuf>,
}

/// Run the list command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error
/// - 3: Parse error in a rule set or configuration file
pub fn run_list(options: &ListOptions) -> i32 {
    match run_list_inner(options) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => common::fail(e),
    }
}

fn run_list_inner(options: &ListOptions) -> Result<(), CommandError> {
    let config = common::load_config(options.config.as_deref())?;
    let rule_set = common::load_rule_set(&options.rules, &config)?;
    let selection =
        common::rule_selection(options.tags.as_deref(), options.ids.as_deref(), &config);
    let rules: Vec<&Rule> = selection.select(&rule_set);

    match common::output_format(options.output, &config) {
        OutputFormat::Human => {
            if rules.is_empty() {
                println!("No rules selected.");
                return Ok(());
            }
            let mut stdout = StandardStream::stdout(common::color_choice(options.color, &config));
            HumanFormatter::new().write_rules(&mut stdout, &rules)?;
        }
        OutputFormat::Jsonl => print!("{}", JsonlFormatter::new().format_rules(&rules)),
    }

    Ok(())
}
