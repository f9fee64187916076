//! Parsing and validation for config-lint.toml configuration files

use crate::error::ConfigError;
use crate::types::ResourceFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default configuration file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "config-lint.toml";

/// Main configuration struct for config-lint.toml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Lint settings
    #[serde(default)]
    pub lint: LintSettings,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load `config-lint.toml` from `dir` if present, defaults otherwise
    pub fn load_or_default(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            tracing::debug!(file = %path.display(), "loading configuration");
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.lint.version != "1" {
            return Err(ConfigError::Validation(format!(
                "Unsupported configuration version '{}'. Expected '1'",
                self.lint.version
            )));
        }

        for (kind, patterns) in [("include", &self.lint.include), ("exclude", &self.lint.exclude)] {
            for pattern in patterns {
                globset::Glob::new(pattern).map_err(|e| {
                    ConfigError::Validation(format!(
                        "Invalid {} glob pattern '{}': {}",
                        kind, pattern, e
                    ))
                })?;
            }
        }

        Ok(())
    }
}

/// `[lint]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintSettings {
    /// Configuration version (must be "1")
    #[serde(default = "default_version")]
    pub version: String,

    /// Rule set files applied when no `--rules` flag is given
    #[serde(default)]
    pub rules: Vec<String>,

    /// Resource format when neither the flag nor the rule set names one
    #[serde(default)]
    pub format: Option<ResourceFormat>,

    /// File patterns to include when walking directories
    #[serde(default)]
    pub include: Vec<String>,

    /// File patterns to exclude when walking directories
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Default tag selection
    #[serde(default)]
    pub tags: Vec<String>,

    /// Default rule id selection
    #[serde(default)]
    pub ids: Vec<String>,
}

impl Default for LintSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            rules: Vec::new(),
            format: None,
            include: Vec::new(),
            exclude: Vec::new(),
            tags: Vec::new(),
            ids: Vec::new(),
        }
    }
}

fn default_version() -> String {
    "1".to_string()
}

/// Output configuration section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Color output setting
    #[serde(default)]
    pub color: ColorOption,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Human,
            color: ColorOption::Auto,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON Lines format
    Jsonl,
}

/// Color output options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorOption {
    /// Auto-detect based on terminal capabilities
    #[default]
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}
