//! CLI argument parsing using clap

use crate::types::ResourceFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for config-lint commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

impl From<crate::config::OutputFormat> for OutputFormat {
    fn from(format: crate::config::OutputFormat) -> Self {
        match format {
            crate::config::OutputFormat::Human => OutputFormat::Human,
            crate::config::OutputFormat::Jsonl => OutputFormat::Jsonl,
        }
    }
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect if terminal supports color
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

impl From<crate::config::ColorOption> for ColorChoice {
    fn from(option: crate::config::ColorOption) -> Self {
        match option {
            crate::config::ColorOption::Auto => ColorChoice::Auto,
            crate::config::ColorOption::Always => ColorChoice::Always,
            crate::config::ColorOption::Never => ColorChoice::Never,
        }
    }
}

/// config-lint CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "config-lint")]
#[command(about = "Policy checks for Kubernetes, Terraform and CloudFormation configuration")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring (defaults to the config file setting, then auto)
    #[arg(long, global = true)]
    pub color: Option<ColorChoice>,

    /// Log rule decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./config-lint.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available config-lint subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate resources against rule sets
    Check {
        /// Files or directories to check
        #[arg(default_value = ".")]
        paths: Vec<String>,

        /// Rule set file (repeatable)
        #[arg(short, long = "rules", value_name = "FILE")]
        rules: Vec<PathBuf>,

        /// Resource format of the input files
        #[arg(long)]
        format: Option<ResourceFormat>,

        /// Only run rules with one of these tags (comma separated)
        #[arg(long)]
        tags: Option<String>,

        /// Only run rules with these ids (comma separated)
        #[arg(long)]
        ids: Option<String>,

        /// Output format
        #[arg(short, long)]
        output: Option<OutputFormat>,

        /// Report passing checks as well as violations
        #[arg(long)]
        show_ok: bool,
    },

    /// Print the value at a property path for every resource
    Search {
        /// Files or directories to search
        #[arg(default_value = ".")]
        paths: Vec<String>,

        /// Property path expression, e.g. spec.containers[*].image
        #[arg(short, long)]
        query: String,

        /// Resource format of the input files
        #[arg(long)]
        format: Option<ResourceFormat>,

        /// Rule set file, consulted for the resource format (repeatable)
        #[arg(short, long = "rules", value_name = "FILE")]
        rules: Vec<PathBuf>,

        /// Output format
        #[arg(short, long)]
        output: Option<OutputFormat>,
    },

    /// List the rules that would run
    List {
        /// Rule set file (repeatable)
        #[arg(short, long = "rules", value_name = "FILE")]
        rules: Vec<PathBuf>,

        /// Only list rules with one of these tags (comma separated)
        #[arg(long)]
        tags: Option<String>,

        /// Only list rules with these ids (comma separated)
        #[arg(long)]
        ids: Option<String>,

        /// Output format
        #[arg(short, long)]
        output: Option<OutputFormat>,
    },
}
