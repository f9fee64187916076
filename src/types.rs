#![forbid(unsafe_code)]

//! Core domain types for config-lint
//!
//! This module defines the small value types shared by the rule engine,
//! the loaders and the output formatters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity a rule reports when its condition does not hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Failure,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Failure => "FAILURE",
            Severity::Warning => "WARNING",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict of one (rule, resource) evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Failure,
    Warning,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Failure => "FAILURE",
            Status::Warning => "WARNING",
        }
    }

    /// Returns true for any status other than `OK`
    pub fn is_violation(&self) -> bool {
        !matches!(self, Status::Ok)
    }
}

impl From<Severity> for Status {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Failure => Status::Failure,
            Severity::Warning => Status::Warning,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source formats understood by the resource loaders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceFormat {
    Kubernetes,
    Terraform,
    #[serde(alias = "cfn")]
    CloudFormation,
}

impl ResourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceFormat::Kubernetes => "kubernetes",
            ResourceFormat::Terraform => "terraform",
            ResourceFormat::CloudFormation => "cloudformation",
        }
    }

    /// File name patterns searched when a directory is given for this format
    pub fn default_include(&self) -> &'static [&'static str] {
        match self {
            ResourceFormat::Kubernetes => &["**/*.yaml", "**/*.yml"],
            ResourceFormat::Terraform => &["**/*.json"],
            ResourceFormat::CloudFormation => {
                &["**/*.yaml", "**/*.yml", "**/*.json", "**/*.template"]
            }
        }
    }
}

impl fmt::Display for ResourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kubernetes" | "k8s" => Ok(ResourceFormat::Kubernetes),
            "terraform" | "tf" => Ok(ResourceFormat::Terraform),
            "cloudformation" | "cfn" => Ok(ResourceFormat::CloudFormation),
            other => Err(format!("unknown resource format '{}'", other)),
        }
    }
}

/// A validated rule identifier
///
/// Rule IDs must be non-empty and contain only alphanumeric characters,
/// hyphens, underscores and dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleId(String);

impl RuleId {
    /// Creates a new RuleId, validating the input
    ///
    /// Returns None if the input is empty or contains invalid characters
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            return None;
        }
        if !id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return None;
        }
        Some(RuleId(id))
    }

    /// Returns the rule ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for RuleId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RuleId::new(value.clone()).ok_or_else(|| format!("Invalid rule ID '{}'", value))
    }
}

impl From<RuleId> for String {
    fn from(rule_id: RuleId) -> Self {
        rule_id.0
    }
}
