#![forbid(unsafe_code)]

//! Rule definitions, filter evaluation and rule selection

pub mod filter;
pub mod predicate;
mod rule;
pub mod rule_set;
pub mod selector;

// Re-export core types
pub use filter::{Filter, FilterDefinition};
pub use predicate::{Operator, Predicate};
pub use rule::{Rule, RuleDefinition, ValidationResult, WILDCARD_RESOURCE};
pub use rule_set::RuleSet;
pub use selector::{RuleSelection, select_by_ids, select_by_tags};
