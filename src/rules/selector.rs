#![forbid(unsafe_code)]

//! Rule selection by tag and by id
//!
//! An empty selector keeps every rule. A non-empty tag selector drops
//! untagged rules.

use crate::rules::rule::Rule;
use std::collections::HashSet;

/// Requested tags and rule ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSelection {
    pub tags: Vec<String>,
    pub ids: Vec<String>,
}

impl RuleSelection {
    pub fn new(tags: Vec<String>, ids: Vec<String>) -> Self {
        Self { tags, ids }
    }

    /// A selection that keeps every rule
    pub fn all() -> Self {
        Self::default()
    }

    /// Apply the tag selector, then the id selector
    pub fn select<'a, I>(&self, rules: I) -> Vec<&'a Rule>
    where
        I: IntoIterator<Item = &'a Rule>,
    {
        select_by_ids(select_by_tags(rules, &self.tags), &self.ids)
    }
}

/// Keep rules sharing at least one tag with `tags`
pub fn select_by_tags<'a, I>(rules: I, tags: &[String]) -> Vec<&'a Rule>
where
    I: IntoIterator<Item = &'a Rule>,
{
    if tags.is_empty() {
        return rules.into_iter().collect();
    }
    let wanted: HashSet<&str> = tags.iter().map(String::as_str).collect();
    rules
        .into_iter()
        .filter(|rule| rule.tags.iter().any(|tag| wanted.contains(tag.as_str())))
        .collect()
}

/// Keep rules whose id is listed in `ids`
pub fn select_by_ids<'a, I>(rules: I, ids: &[String]) -> Vec<&'a Rule>
where
    I: IntoIterator<Item = &'a Rule>,
{
    if ids.is_empty() {
        return rules.into_iter().collect();
    }
    let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
    rules
        .into_iter()
        .filter(|rule| wanted.contains(rule.id.as_str()))
        .collect()
}

/// Split a comma separated list, dropping blanks
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
