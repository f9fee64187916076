//! config-lint CLI entry point

use clap::Parser;
use config_lint::cli::{
    CheckOptions, Cli, Command, ListOptions, SearchOptions, run_check, run_list, run_search,
};
use std::process;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("CONFIG_LINT_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Command::Check {
            paths,
            rules,
            format,
            tags,
            ids,
            output,
            show_ok,
        } => run_check(&CheckOptions {
            paths,
            rules,
            format,
            tags,
            ids,
            output,
            show_ok,
            color: cli.color,
            config: cli.config,
        }),
        Command::Search {
            paths,
            query,
            format,
            rules,
            output,
        } => run_search(&SearchOptions {
            paths,
            query,
            format,
            rules,
            output,
            color: cli.color,
            config: cli.config,
        }),
        Command::List {
            rules,
            tags,
            ids,
            output,
        } => run_list(&ListOptions {
            rules,
            tags,
            ids,
            output,
            color: cli.color,
            config: cli.config,
        }),
    };

    process::exit(exit_code);
}
