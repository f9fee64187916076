#![forbid(unsafe_code)]

//! Human-readable output with optional color

use crate::engine::{SearchMatch, ValidationReport};
use crate::error::LoadError;
use crate::rules::{Rule, ValidationResult};
use crate::types::Status;
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

/// Human-readable formatter
///
/// Writes to any `termcolor` sink; pass a no-color buffer to get plain text.
pub struct HumanFormatter;

impl HumanFormatter {
    /// Creates a new HumanFormatter
    pub fn new() -> Self {
        HumanFormatter
    }

    /// Write every verdict, then errors, then a one-line summary
    pub fn write_report<W: WriteColor>(
        &self,
        out: &mut W,
        report: &ValidationReport,
        load_errors: &[LoadError],
    ) -> io::Result<()> {
        for result in &report.results {
            write_result(out, result)?;
        }

        let errors = report.errors.len() + load_errors.len();
        if errors > 0 {
            if !report.results.is_empty() {
                writeln!(out)?;
            }
            for error in load_errors {
                write_error_label(out)?;
                writeln!(out, " {}", error)?;
            }
            for error in &report.errors {
                write_error_label(out)?;
                writeln!(
                    out,
                    " {} '{}' in '{}': rule {} could not be evaluated: {}",
                    error.resource_type,
                    error.resource_id,
                    error.filename.display(),
                    error.rule_id,
                    error.message
                )?;
            }
        }

        if !report.results.is_empty() || errors > 0 {
            writeln!(out)?;
        }

        let failures = report.failures().count();
        let warnings = report.warnings().count();
        writeln!(
            out,
            "Checked {} resources with {} rules: {} failures, {} warnings, {} errors",
            report.resources_checked, report.rules_selected, failures, warnings, errors
        )
    }

    /// Write one line per search match
    pub fn write_matches<W: WriteColor>(
        &self,
        out: &mut W,
        matches: &[SearchMatch],
    ) -> io::Result<()> {
        for found in matches {
            out.set_color(ColorSpec::new().set_bold(true))?;
            write!(out, "{} '{}'", found.resource_type, found.resource_id)?;
            out.reset()?;
            writeln!(out, " in '{}': {}", found.filename.display(), found.value)?;
        }
        if matches.is_empty() {
            writeln!(out, "No matches found.")?;
        }
        Ok(())
    }

    /// Write a summary block for each rule
    pub fn write_rules<W: WriteColor>(&self, out: &mut W, rules: &[&Rule]) -> io::Result<()> {
        writeln!(out, "Rules ({} selected):", rules.len())?;
        writeln!(out)?;

        for rule in rules {
            out.set_color(ColorSpec::new().set_bold(true))?;
            write!(out, "{}", rule.id)?;
            out.reset()?;
            write!(out, " ")?;
            write_status(out, Status::from(rule.severity))?;
            writeln!(out)?;
            writeln!(out, "  Resource: {}", rule.resource)?;
            writeln!(out, "  Message: {}", rule.message)?;
            if !rule.tags.is_empty() {
                writeln!(out, "  Tags: {}", rule.tags.join(", "))?;
            }
            writeln!(out, "  Filters: {}", rule.filters.len())?;
            writeln!(out)?;
        }
        Ok(())
    }
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Failure => Color::Red,
        Status::Warning => Color::Yellow,
        Status::Ok => Color::Green,
    }
}

fn write_status<W: WriteColor>(out: &mut W, status: Status) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(status_color(status))).set_bold(true))?;
    write!(out, "{}", status)?;
    out.reset()
}

fn write_error_label<W: WriteColor>(out: &mut W) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    write!(out, "ERROR")?;
    out.reset()
}

fn write_result<W: WriteColor>(out: &mut W, result: &ValidationResult) -> io::Result<()> {
    write_status(out, result.status)?;
    writeln!(
        out,
        " {} '{}' in '{}': {} ({})",
        result.resource_type,
        result.resource_id,
        result.filename.display(),
        result.message,
        result.rule_id
    )
}
