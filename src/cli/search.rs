//! Search command implementation
//!
//! Loads resources like `check` does and prints the value a property path
//! resolves to in each of them.

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::cli::common::{self, CommandError, EXIT_ERROR, EXIT_SUCCESS};
use crate::engine::search;
use crate::output::{HumanFormatter, JsonlFormatter};
use crate::resources::{load_files, loader_for};
use crate::types::ResourceFormat;
use std::path::PathBuf;
use termcolor::StandardStream;

/// Arguments of the search command
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub paths: Vec<String>,
    pub query: String,
    pub format: Option<ResourceFormat>,
    pub rules: Vec<PathBuf>,
    pub output: Option<OutputFormat>,
    pub color: Option<ColorChoice>,
    pub config: Option<PathBuf>,
}

/// Run the search command
///
/// Returns 0 when every input file loaded, 2 otherwise, 3 for parse errors
/// in a rule set or configuration file.
pub fn run_search(options: &SearchOptions) -> i32 {
    match run_search_inner(options) {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_ERROR,
        Err(e) => common::fail(e),
    }
}

fn run_search_inner(options: &SearchOptions) -> Result<bool, CommandError> {
    let config = common::load_config(options.config.as_deref())?;

    // Rule sets are optional here and only consulted for the format and file globs
    let rule_set = if options.rules.is_empty() && config.lint.rules.is_empty() {
        None
    } else {
        Some(common::load_rule_set(&options.rules, &config)?)
    };
    let format = common::resolve_format(options.format, rule_set.as_ref(), &config)?;

    let files = common::discover_files(&options.paths, format, rule_set.as_ref(), &config)?;
    let loader = loader_for(format);
    let loaded = load_files(loader.as_ref(), &files);
    for error in &loaded.errors {
        eprintln!("Error: {}", error);
    }

    let matches = search(&loaded.resources, &options.query)?;

    match common::output_format(options.output, &config) {
        OutputFormat::Human => {
            let mut stdout = StandardStream::stdout(common::color_choice(options.color, &config));
            HumanFormatter::new().write_matches(&mut stdout, &matches)?;
        }
        OutputFormat::Jsonl => print!("{}", JsonlFormatter::new().format_matches(&matches)),
    }

    Ok(loaded.errors.is_empty())
}
