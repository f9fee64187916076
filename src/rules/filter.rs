#![forbid(unsafe_code)]

//! Boolean filter trees
//!
//! Rule documents describe filters as flat records (`key`/`op`/`value` or one
//! of `and`/`or`/`not`). They are converted into the [`Filter`] tree once,
//! when the rule set is parsed. A record that cannot be interpreted becomes
//! [`Filter::Malformed`] so the error surfaces for that rule only.

use crate::error::ConfigurationError;
use crate::rules::predicate::Predicate;
use serde::Deserialize;
use serde_json::Value;

/// Flat filter record as written in a rule document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FilterDefinition {
    #[serde(default, rename = "type")]
    pub filter_type: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub op: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub or: Option<Vec<FilterDefinition>>,
    #[serde(default)]
    pub and: Option<Vec<FilterDefinition>>,
    #[serde(default)]
    pub not: Option<Vec<FilterDefinition>>,
}

/// A node of a filter tree
#[derive(Debug, Clone)]
pub enum Filter {
    /// Single comparison
    Leaf(Predicate),
    /// True iff every child is true; empty is true
    And(Vec<Filter>),
    /// True iff some child is true; empty is false
    Or(Vec<Filter>),
    /// True iff the child is false
    Not(Box<Filter>),
    /// A record that could not be turned into a filter
    Malformed(ConfigurationError),
}

impl Filter {
    /// Evaluate against a property tree
    ///
    /// Children are evaluated in declared order and evaluation stops as soon
    /// as the outcome is known.
    ///
    /// # Errors
    ///
    /// Returns the `ConfigurationError` of the first malformed node reached.
    pub fn evaluate(&self, properties: &Value) -> Result<bool, ConfigurationError> {
        match self {
            Filter::Leaf(predicate) => Ok(predicate.evaluate(properties)),
            Filter::And(children) => {
                for child in children {
                    if !child.evaluate(properties)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Filter::Or(children) => {
                for child in children {
                    if child.evaluate(properties)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Filter::Not(child) => Ok(!child.evaluate(properties)?),
            Filter::Malformed(err) => Err(err.clone()),
        }
    }

    /// Find the first malformed node anywhere in the tree
    ///
    /// # Errors
    ///
    /// Returns the error carried by that node.
    pub fn check(&self) -> Result<(), ConfigurationError> {
        match self {
            Filter::Leaf(_) => Ok(()),
            Filter::And(children) | Filter::Or(children) => {
                children.iter().try_for_each(Filter::check)
            }
            Filter::Not(child) => child.check(),
            Filter::Malformed(err) => Err(err.clone()),
        }
    }
}

impl From<FilterDefinition> for Filter {
    fn from(def: FilterDefinition) -> Self {
        match build(def) {
            Ok(filter) => filter,
            Err(err) => Filter::Malformed(err),
        }
    }
}

fn build(def: FilterDefinition) -> Result<Filter, ConfigurationError> {
    let combinators = [
        ("and", def.and.is_some()),
        ("or", def.or.is_some()),
        ("not", def.not.is_some()),
    ];
    let set: Vec<&str> = combinators
        .iter()
        .filter(|(_, present)| *present)
        .map(|(name, _)| *name)
        .collect();
    let has_leaf_fields = def.key.is_some() || def.op.is_some() || def.value.is_some();

    if set.len() > 1 {
        return Err(ConfigurationError::MultipleCombinators);
    }
    if let Some(name) = set.first()
        && has_leaf_fields
    {
        return Err(ConfigurationError::MixedFilter((*name).to_string()));
    }

    if let Some(children) = def.and {
        return Ok(Filter::And(children.into_iter().map(Filter::from).collect()));
    }
    if let Some(children) = def.or {
        return Ok(Filter::Or(children.into_iter().map(Filter::from).collect()));
    }
    if let Some(mut children) = def.not {
        if children.len() != 1 {
            return Err(ConfigurationError::NotArity(children.len()));
        }
        let child = children.remove(0);
        return Ok(Filter::Not(Box::new(Filter::from(child))));
    }

    if let Some(filter_type) = &def.filter_type
        && filter_type != "value"
    {
        return Err(ConfigurationError::UnknownFilterType(filter_type.clone()));
    }

    let (Some(key), Some(op)) = (def.key, def.op) else {
        return Err(ConfigurationError::EmptyFilter);
    };
    Ok(Filter::Leaf(Predicate::parse(&key, &op, def.value)?))
}
