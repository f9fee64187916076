#![forbid(unsafe_code)]

//! Rules and the rule matcher
//!
//! A rule's filters describe the *passing* condition: when every top-level
//! filter holds the resource is compliant (`OK`), otherwise it is reported
//! with the rule's severity and message.

use crate::error::ConfigurationError;
use crate::resources::Resource;
use crate::rules::filter::{Filter, FilterDefinition};
use crate::types::{RuleId, Severity, Status};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resource type that makes a rule apply to every resource
pub const WILDCARD_RESOURCE: &str = "*";

/// Rule record as written in a rule document
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleDefinition {
    pub id: RuleId,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: Severity,
    pub resource: String,
    #[serde(default)]
    pub filters: Vec<FilterDefinition>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A named policy check
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: RuleId,
    pub message: String,
    pub severity: Severity,
    pub resource: String,
    pub filters: Vec<Filter>,
    pub tags: Vec<String>,
}

impl From<RuleDefinition> for Rule {
    fn from(def: RuleDefinition) -> Self {
        Rule {
            id: def.id,
            message: def.message,
            severity: def.severity,
            resource: def.resource,
            filters: def.filters.into_iter().map(Filter::from).collect(),
            tags: def.tags,
        }
    }
}

/// One verdict for one (rule, resource) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub rule_id: RuleId,
    pub resource_id: String,
    pub resource_type: String,
    pub status: Status,
    pub message: String,
    pub filename: PathBuf,
}

impl Rule {
    /// Whether this rule targets the resource's type
    pub fn applies_to(&self, resource: &Resource) -> bool {
        self.resource == WILDCARD_RESOURCE || self.resource == resource.resource_type
    }

    /// Report the first malformed filter in this rule, if any
    ///
    /// # Errors
    ///
    /// Returns the `ConfigurationError` of the malformed node.
    pub fn check(&self) -> Result<(), ConfigurationError> {
        self.filters.iter().try_for_each(Filter::check)
    }

    /// Whether the rule's condition holds for the resource
    ///
    /// Top-level filters are combined with AND; an empty list always holds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when a malformed filter is reached.
    pub fn condition_holds(&self, resource: &Resource) -> Result<bool, ConfigurationError> {
        for filter in &self.filters {
            if !filter.evaluate(&resource.properties)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Evaluate this rule against one resource
    ///
    /// Returns `Ok(None)` when the rule does not apply to the resource's type.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` when a malformed filter is reached.
    pub fn validate(
        &self,
        resource: &Resource,
    ) -> Result<Option<ValidationResult>, ConfigurationError> {
        if !self.applies_to(resource) {
            return Ok(None);
        }

        let status = if self.condition_holds(resource)? {
            Status::Ok
        } else {
            Status::from(self.severity)
        };

        tracing::debug!(
            rule = %self.id,
            resource = %resource.id,
            status = %status,
            "evaluated rule"
        );

        Ok(Some(ValidationResult {
            rule_id: self.id.clone(),
            resource_id: resource.id.clone(),
            resource_type: resource.resource_type.clone(),
            status,
            message: self.message.clone(),
            filename: resource.filename.clone(),
        }))
    }
}
