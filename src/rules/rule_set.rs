#![forbid(unsafe_code)]

//! Rule set documents
//!
//! A rule set is a YAML (or JSON) document whose `rules` field holds an
//! ordered list of rules:
//!
//! ```yaml
//! version: 1
//! description: Kubernetes baseline
//! type: Kubernetes
//! files: ["**/*.yaml"]
//! rules:
//!   - id: POD_IMAGE_PINNED
//!     message: Container images must use a pinned tag
//!     severity: FAILURE
//!     resource: Pod
//!     tags: [images]
//!     filters:
//!       - key: spec.containers[*].image
//!         op: not-contains
//!         value: nginx:latest
//! ```

use crate::error::RuleError;
use crate::rules::rule::{Rule, RuleDefinition};
use crate::types::{ResourceFormat, RuleId};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RuleSetDocument {
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "deserialize_format")]
    format: Option<ResourceFormat>,
    #[serde(default)]
    files: Vec<String>,
    #[serde(default)]
    rules: Vec<RuleDefinition>,
}

fn deserialize_format<'de, D>(deserializer: D) -> Result<Option<ResourceFormat>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| s.parse::<ResourceFormat>().map_err(serde::de::Error::custom))
        .transpose()
}

/// Ordered collection of rules with unique ids
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
    description: Option<String>,
    format: Option<ResourceFormat>,
    files: Vec<String>,
}

impl RuleSet {
    /// Build a rule set from rules already in memory
    ///
    /// # Errors
    ///
    /// Returns `RuleError::DuplicateId` if two rules share an id.
    pub fn new(rules: Vec<Rule>) -> Result<Self, RuleError> {
        ensure_unique(&rules)?;
        Ok(RuleSet {
            rules,
            ..Default::default()
        })
    }

    /// Parse a rule set document
    ///
    /// `source` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Parse` for syntax or schema errors and
    /// `RuleError::DuplicateId` when ids repeat.
    pub fn parse(content: &str, source: &Path) -> Result<Self, RuleError> {
        let doc: RuleSetDocument =
            serde_yaml::from_str(content).map_err(|e| RuleError::Parse {
                file: source.to_path_buf(),
                message: e.to_string(),
            })?;

        let rules: Vec<Rule> = doc.rules.into_iter().map(Rule::from).collect();
        ensure_unique(&rules)?;

        Ok(RuleSet {
            rules,
            description: doc.description,
            format: doc.format,
            files: doc.files,
        })
    }

    /// Read and parse a rule set file
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Io` if the file cannot be read, otherwise the
    /// errors of [`RuleSet::parse`].
    pub fn load(path: &Path) -> Result<Self, RuleError> {
        let content = fs::read_to_string(path).map_err(|source| RuleError::Io {
            file: path.to_path_buf(),
            source,
        })?;
        let rule_set = Self::parse(&content, path)?;
        tracing::debug!(
            file = %path.display(),
            rules = rule_set.len(),
            "loaded rule set"
        );
        Ok(rule_set)
    }

    /// Load and merge several rule set files in order
    ///
    /// # Errors
    ///
    /// Returns the first load error, or `RuleError::DuplicateId` if an id
    /// appears in more than one file.
    pub fn load_all(paths: &[impl AsRef<Path>]) -> Result<Self, RuleError> {
        let mut merged = RuleSet::default();
        for path in paths {
            merged.merge(Self::load(path.as_ref())?)?;
        }
        Ok(merged)
    }

    /// Append another rule set's rules after this one's
    ///
    /// The first declared format and description win; file globs accumulate.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::DuplicateId` if an id is defined in both sets.
    pub fn merge(&mut self, other: RuleSet) -> Result<(), RuleError> {
        let existing: HashSet<&RuleId> = self.rules.iter().map(|r| &r.id).collect();
        if let Some(dup) = other.rules.iter().find(|r| existing.contains(&r.id)) {
            return Err(RuleError::DuplicateId(dup.id.to_string()));
        }
        self.rules.extend(other.rules);
        self.description = self.description.take().or(other.description);
        self.format = self.format.or(other.format);
        self.files.extend(other.files);
        Ok(())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Look up a rule by id
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id.as_str() == id)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Resource format declared by the document's `type` field
    pub fn format(&self) -> Option<ResourceFormat> {
        self.format
    }

    /// Input file globs declared by the document's `files` field
    pub fn files(&self) -> &[String] {
        &self.files
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

fn ensure_unique(rules: &[Rule]) -> Result<(), RuleError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(&rule.id) {
            return Err(RuleError::DuplicateId(rule.id.to_string()));
        }
    }
    Ok(())
}
