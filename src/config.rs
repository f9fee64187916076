//! Configuration file parsing and validation

pub mod lint_toml;

pub use lint_toml::{
    CONFIG_FILE_NAME, ColorOption, Config, LintSettings, OutputConfig, OutputFormat,
};
