#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line in a deterministic order:
//! 1. All result records (resource order, then rule order)
//! 2. All error records (load errors first, then evaluation errors)
//! 3. One status record

use crate::engine::{SearchMatch, ValidationReport};
use crate::error::LoadError;
use crate::rules::Rule;
use crate::types::{Severity, Status};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    /// Creates a new JsonlFormatter
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format a validation run as JSONL
    pub fn format_report(&self, report: &ValidationReport, load_errors: &[LoadError]) -> String {
        let mut output = String::new();

        for result in &report.results {
            push_line(
                &mut output,
                &ResultRecord {
                    record_type: "result",
                    rule_id: result.rule_id.as_str(),
                    resource_id: &result.resource_id,
                    resource_type: &result.resource_type,
                    status: result.status,
                    message: &result.message,
                    filename: &result.filename,
                },
            );
        }

        for error in load_errors {
            push_line(
                &mut output,
                &ErrorRecord {
                    record_type: "error",
                    kind: "load",
                    rule_id: None,
                    resource_id: None,
                    filename: error.file(),
                    message: error.to_string(),
                },
            );
        }

        for error in &report.errors {
            push_line(
                &mut output,
                &ErrorRecord {
                    record_type: "error",
                    kind: "evaluation",
                    rule_id: Some(error.rule_id.as_str()),
                    resource_id: Some(&error.resource_id),
                    filename: &error.filename,
                    message: error.message.clone(),
                },
            );
        }

        let errors = report.errors.len() + load_errors.len();
        push_line(
            &mut output,
            &StatusRecord {
                record_type: "status",
                passed: !report.has_failures() && errors == 0,
                resources_checked: report.resources_checked as u64,
                rules_selected: report.rules_selected as u64,
                failures: report.failures().count() as u64,
                warnings: report.warnings().count() as u64,
                errors: errors as u64,
            },
        );

        output
    }

    /// Format search matches, one record per resource
    pub fn format_matches(&self, matches: &[SearchMatch]) -> String {
        let mut output = String::new();
        for found in matches {
            push_line(
                &mut output,
                &MatchRecord {
                    record_type: "match",
                    resource_id: &found.resource_id,
                    resource_type: &found.resource_type,
                    filename: &found.filename,
                    value: &found.value,
                },
            );
        }
        output
    }

    /// Format rule summaries, one record per rule
    pub fn format_rules(&self, rules: &[&Rule]) -> String {
        let mut output = String::new();
        for rule in rules {
            push_line(
                &mut output,
                &RuleRecord {
                    record_type: "rule",
                    id: rule.id.as_str(),
                    severity: rule.severity,
                    resource: &rule.resource,
                    message: &rule.message,
                    tags: &rule.tags,
                    filters: rule.filters.len() as u64,
                },
            );
        }
        output
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_line<T: Serialize>(output: &mut String, record: &T) {
    if let Ok(json) = serde_json::to_string(record) {
        output.push_str(&json);
        output.push('\n');
    }
}

#[derive(Debug, Serialize)]
struct ResultRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    rule_id: &'a str,
    resource_id: &'a str,
    resource_type: &'a str,
    status: Status,
    message: &'a str,
    filename: &'a Path,
}

#[derive(Debug, Serialize)]
struct ErrorRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resource_id: Option<&'a str>,
    filename: &'a Path,
    message: String,
}

#[derive(Debug, Serialize)]
struct StatusRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    passed: bool,
    resources_checked: u64,
    rules_selected: u64,
    failures: u64,
    warnings: u64,
    errors: u64,
}

#[derive(Debug, Serialize)]
struct MatchRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    resource_id: &'a str,
    resource_type: &'a str,
    filename: &'a Path,
    value: &'a Value,
}

#[derive(Debug, Serialize)]
struct RuleRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    id: &'a str,
    severity: Severity,
    resource: &'a str,
    message: &'a str,
    tags: &'a [String],
    filters: u64,
}
