#![forbid(unsafe_code)]

//! Validation orchestration
//!
//! The [`Linter`] evaluates every selected rule against every resource and
//! collects the verdicts. Resources are processed in parallel with rayon;
//! results come back in resource order, then rule order, so repeated runs on
//! the same input produce identical output.

use crate::error::ConfigurationError;
use crate::path::PropertyPath;
use crate::resources::Resource;
use crate::rules::{Rule, RuleSelection, RuleSet, ValidationResult};
use crate::types::{RuleId, Status};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// A rule that could not be evaluated against a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvaluationError {
    pub rule_id: RuleId,
    pub resource_id: String,
    pub resource_type: String,
    pub filename: PathBuf,
    pub message: String,
}

/// Aggregate outcome of one validation run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Verdicts in resource-then-rule order (`OK` verdicts only when requested)
    pub results: Vec<ValidationResult>,
    /// Rules that could not be evaluated
    pub errors: Vec<EvaluationError>,
    /// Number of resources examined
    pub resources_checked: usize,
    /// Number of rules left after selection
    pub rules_selected: usize,
}

impl ValidationReport {
    /// Verdicts other than `OK`
    pub fn violations(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.status.is_violation())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.status == Status::Failure)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.status == Status::Warning)
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// One resource where a search expression resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchMatch {
    pub resource_id: String,
    pub resource_type: String,
    pub filename: PathBuf,
    pub value: Value,
}

/// Evaluates a rule set against resources
#[derive(Debug, Clone)]
pub struct Linter {
    rule_set: RuleSet,
    include_ok: bool,
}

impl Linter {
    pub fn new(rule_set: RuleSet) -> Self {
        Self {
            rule_set,
            include_ok: false,
        }
    }

    /// Keep `OK` verdicts in the report as well as violations
    pub fn include_ok(mut self, include_ok: bool) -> Self {
        self.include_ok = include_ok;
        self
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// Rules remaining after tag and id selection, in rule set order
    pub fn selected_rules(&self, selection: &RuleSelection) -> Vec<&Rule> {
        selection.select(&self.rule_set)
    }

    /// Evaluate selected rules against every resource
    ///
    /// A malformed rule produces an [`EvaluationError`] for each resource it
    /// applies to; other rules are unaffected.
    pub fn validate(&self, resources: &[Resource], selection: &RuleSelection) -> ValidationReport {
        let rules = self.selected_rules(selection);

        // Checked once up front so short-circuiting cannot hide a bad node
        let checked: Vec<(&Rule, Option<ConfigurationError>)> = rules
            .iter()
            .map(|rule| (*rule, rule.check().err()))
            .collect();

        for (rule, err) in &checked {
            if let Some(err) = err {
                tracing::warn!(rule = %rule.id, error = %err, "rule is malformed");
            }
        }

        let per_resource: Vec<(Vec<ValidationResult>, Vec<EvaluationError>)> = resources
            .par_iter()
            .map(|resource| self.validate_resource(resource, &checked))
            .collect();

        let mut report = ValidationReport {
            resources_checked: resources.len(),
            rules_selected: rules.len(),
            ..Default::default()
        };
        for (results, errors) in per_resource {
            report.results.extend(results);
            report.errors.extend(errors);
        }

        tracing::info!(
            resources = report.resources_checked,
            rules = report.rules_selected,
            violations = report.violations().count(),
            errors = report.errors.len(),
            "validation finished"
        );
        report
    }

    fn validate_resource(
        &self,
        resource: &Resource,
        rules: &[(&Rule, Option<ConfigurationError>)],
    ) -> (Vec<ValidationResult>, Vec<EvaluationError>) {
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for (rule, precheck) in rules {
            if !rule.applies_to(resource) {
                continue;
            }
            let outcome = match precheck {
                Some(err) => Err(err.clone()),
                None => rule.validate(resource),
            };
            match outcome {
                Ok(Some(result)) => {
                    if self.include_ok || result.status.is_violation() {
                        results.push(result);
                    }
                }
                Ok(None) => {}
                Err(err) => errors.push(EvaluationError {
                    rule_id: rule.id.clone(),
                    resource_id: resource.id.clone(),
                    resource_type: resource.resource_type.clone(),
                    filename: resource.filename.clone(),
                    message: err.to_string(),
                }),
            }
        }

        (results, errors)
    }
}

/// Validate resources against a rule set selected by tags and ids
pub fn validate(
    resources: &[Resource],
    rule_set: &RuleSet,
    tags: &[String],
    rule_ids: &[String],
) -> ValidationReport {
    Linter::new(rule_set.clone()).validate(
        resources,
        &RuleSelection::new(tags.to_vec(), rule_ids.to_vec()),
    )
}

/// Resolve a path expression against every resource
///
/// Resources where the path does not resolve are left out.
///
/// # Errors
///
/// Returns `ConfigurationError::InvalidPath` if the expression does not parse.
pub fn search(
    resources: &[Resource],
    expression: &str,
) -> Result<Vec<SearchMatch>, ConfigurationError> {
    let path = PropertyPath::parse(expression)?;
    Ok(resources
        .iter()
        .filter_map(|resource| {
            path.resolve(&resource.properties).map(|value| SearchMatch {
                resource_id: resource.id.clone(),
                resource_type: resource.resource_type.clone(),
                filename: resource.filename.clone(),
                value: value.into_owned(),
            })
        })
        .collect())
}
