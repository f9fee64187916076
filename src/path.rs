#![forbid(unsafe_code)]

//! Property path expressions
//!
//! A `PropertyPath` addresses a value inside a resource's property tree,
//! e.g. `spec.containers[0].image` or `metadata.labels["app.kubernetes.io/name"]`.
//! Resolution never fails: a missing step anywhere yields `None`.
//! A `[*]` projection collects the values found in each element and is a
//! miss when no element has one.

use crate::error::ConfigurationError;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// One navigation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Map key lookup
    Key(String),
    /// Sequence index lookup
    Index(usize),
    /// Projection over every element of a sequence
    Each,
}

/// A parsed property path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    raw: String,
    steps: Vec<Step>,
}

impl PropertyPath {
    /// Parse a path expression
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidPath` for an empty expression,
    /// empty segments, or malformed bracket selectors.
    pub fn parse(expr: &str) -> Result<Self, ConfigurationError> {
        let invalid = |message: &str| ConfigurationError::InvalidPath {
            path: expr.to_string(),
            message: message.to_string(),
        };

        let expr_trimmed = expr.trim();
        if expr_trimmed.is_empty() {
            return Err(invalid("empty path"));
        }

        let chars: Vec<char> = expr_trimmed.chars().collect();
        let mut steps = Vec::new();
        let mut i = 0;
        // A segment boundary: start of input or just after a '.'
        let mut expect_segment = true;

        while i < chars.len() {
            match chars[i] {
                '.' => {
                    if expect_segment {
                        return Err(invalid("empty segment"));
                    }
                    expect_segment = true;
                    i += 1;
                    if i == chars.len() {
                        return Err(invalid("trailing '.'"));
                    }
                }
                '[' => {
                    let close = chars[i..]
                        .iter()
                        .position(|&c| c == ']')
                        .map(|p| p + i)
                        .ok_or_else(|| invalid("unclosed '['"))?;
                    let inner: String = chars[i + 1..close].iter().collect();
                    steps.push(parse_selector(&inner).ok_or_else(|| {
                        invalid(&format!("invalid selector '[{}]'", inner))
                    })?);
                    expect_segment = false;
                    i = close + 1;
                }
                ']' => return Err(invalid("unexpected ']'")),
                _ => {
                    let start = i;
                    while i < chars.len() && !matches!(chars[i], '.' | '[' | ']') {
                        i += 1;
                    }
                    if !expect_segment {
                        return Err(invalid("missing '.' before key"));
                    }
                    let key: String = chars[start..i].iter().collect();
                    steps.push(Step::Key(key));
                    expect_segment = false;
                }
            }
        }

        Ok(PropertyPath {
            raw: expr_trimmed.to_string(),
            steps,
        })
    }

    /// Returns the expression text as given
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed steps
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Resolve this path against a property tree
    ///
    /// Values are borrowed from the tree unless a `[*]` projection had to
    /// build a new sequence.
    pub fn resolve<'a>(&self, root: &'a Value) -> Option<Cow<'a, Value>> {
        resolve_steps(root, &self.steps)
    }
}

fn parse_selector(inner: &str) -> Option<Step> {
    let inner = inner.trim();
    if inner == "*" {
        return Some(Step::Each);
    }
    if let Some(quoted) = inner
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| inner.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
    {
        return Some(Step::Key(quoted.to_string()));
    }
    inner.parse::<usize>().ok().map(Step::Index)
}

fn resolve_steps<'a>(root: &'a Value, steps: &[Step]) -> Option<Cow<'a, Value>> {
    let mut current = root;
    for (pos, step) in steps.iter().enumerate() {
        match step {
            Step::Key(key) => current = current.as_object()?.get(key)?,
            Step::Index(index) => current = current.as_array()?.get(*index)?,
            Step::Each => {
                let items = current.as_array()?;
                let rest = &steps[pos + 1..];
                let projected: Vec<Value> = items
                    .iter()
                    .filter_map(|item| resolve_steps(item, rest))
                    .map(Cow::into_owned)
                    .collect();
                // Missing in every element is a miss; an empty sequence projects to `[]`
                if projected.is_empty() && !items.is_empty() {
                    return None;
                }
                return Some(Cow::Owned(Value::Array(projected)));
            }
        }
    }
    Some(Cow::Borrowed(current))
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for PropertyPath {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyPath::parse(s)
    }
}
