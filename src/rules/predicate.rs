#![forbid(unsafe_code)]

//! Leaf predicates: one operator applied to the value at a property path
//!
//! Absent values only satisfy `absent`. Every other operator, including the
//! negated ones, evaluates false when the key path does not resolve.

use crate::error::ConfigurationError;
use crate::path::PropertyPath;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Comparison operators available to leaf filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Exists,
    Absent,
    Empty,
    NotEmpty,
    Contains,
    NotContains,
    In,
    NotIn,
    Regex,
    NotRegex,
    StartsWith,
    EndsWith,
    Lt,
    Le,
    Gt,
    Ge,
    IsTrue,
    IsFalse,
}

impl Operator {
    /// Canonical operator name as written in rule documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Exists => "exists",
            Operator::Absent => "absent",
            Operator::Empty => "empty",
            Operator::NotEmpty => "not-empty",
            Operator::Contains => "contains",
            Operator::NotContains => "not-contains",
            Operator::In => "in",
            Operator::NotIn => "not-in",
            Operator::Regex => "regex",
            Operator::NotRegex => "not-regex",
            Operator::StartsWith => "starts-with",
            Operator::EndsWith => "ends-with",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::IsTrue => "is-true",
            Operator::IsFalse => "is-false",
        }
    }

    /// Whether the operator compares against an expected value
    pub fn needs_value(&self) -> bool {
        !matches!(
            self,
            Operator::Exists
                | Operator::Absent
                | Operator::Empty
                | Operator::NotEmpty
                | Operator::IsTrue
                | Operator::IsFalse
        )
    }

    fn uses_pattern(&self) -> bool {
        matches!(self, Operator::Regex | Operator::NotRegex)
    }

    fn uses_text(&self) -> bool {
        matches!(
            self,
            Operator::Regex | Operator::NotRegex | Operator::StartsWith | Operator::EndsWith
        )
    }

    fn uses_number(&self) -> bool {
        matches!(self, Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge)
    }

    /// Reject expected values this operator can never compare against
    fn check_value(&self, value: &Value) -> Result<(), ConfigurationError> {
        let message = if self.uses_text() && scalar_text(value).is_none() {
            "expected a string, number or boolean"
        } else if self.uses_number() && as_number(value).is_none() {
            "expected a number"
        } else {
            return Ok(());
        };
        Err(ConfigurationError::InvalidValue {
            op: self.as_str().to_string(),
            value: value.to_string(),
            message: message.to_string(),
        })
    }
}

impl FromStr for Operator {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.replace('_', "-").as_str() {
            "eq" => Operator::Eq,
            "ne" => Operator::Ne,
            "exists" | "present" => Operator::Exists,
            "absent" => Operator::Absent,
            "empty" => Operator::Empty,
            "not-empty" => Operator::NotEmpty,
            "contains" => Operator::Contains,
            "not-contains" | "does-not-contain" => Operator::NotContains,
            "in" => Operator::In,
            "not-in" => Operator::NotIn,
            "regex" => Operator::Regex,
            "not-regex" => Operator::NotRegex,
            "starts-with" => Operator::StartsWith,
            "ends-with" => Operator::EndsWith,
            "lt" => Operator::Lt,
            "le" => Operator::Le,
            "gt" => Operator::Gt,
            "ge" => Operator::Ge,
            "is-true" => Operator::IsTrue,
            "is-false" => Operator::IsFalse,
            _ => return Err(ConfigurationError::UnknownOperator(s.to_string())),
        };
        Ok(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled leaf comparison
#[derive(Debug, Clone)]
pub struct Predicate {
    key: PropertyPath,
    op: Operator,
    value: Value,
    pattern: Option<Regex>,
}

impl Predicate {
    /// Build a predicate, compiling the regex for pattern operators
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::MissingValue` when a comparison operator
    /// has no expected value, `InvalidValue` when the value cannot be used as
    /// text or a number by an operator that needs one, or `InvalidPattern`
    /// when the regex does not compile.
    pub fn new(
        key: PropertyPath,
        op: Operator,
        value: Option<Value>,
    ) -> Result<Self, ConfigurationError> {
        let value = match value {
            Some(value) => value,
            None if op.needs_value() => {
                return Err(ConfigurationError::MissingValue(op.as_str().to_string()));
            }
            None => Value::Null,
        };
        op.check_value(&value)?;

        let pattern = match scalar_text(&value) {
            Some(source) if op.uses_pattern() => {
                let regex = Regex::new(&source).map_err(|e| ConfigurationError::InvalidPattern {
                    pattern: source.clone(),
                    message: e.to_string(),
                })?;
                Some(regex)
            }
            _ => None,
        };

        Ok(Predicate {
            key,
            op,
            value,
            pattern,
        })
    }

    /// Parse operator and key from their textual form
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` for an unknown operator, an invalid key
    /// path, or the errors documented on [`Predicate::new`].
    pub fn parse(key: &str, op: &str, value: Option<Value>) -> Result<Self, ConfigurationError> {
        let op = op.parse::<Operator>()?;
        let key = PropertyPath::parse(key)?;
        Predicate::new(key, op, value)
    }

    pub fn key(&self) -> &PropertyPath {
        &self.key
    }

    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Evaluate against a property tree
    pub fn evaluate(&self, properties: &Value) -> bool {
        let Some(actual) = self.key.resolve(properties) else {
            return self.op == Operator::Absent;
        };
        let actual = actual.as_ref();
        let expected = &self.value;

        match self.op {
            Operator::Exists => true,
            Operator::Absent => false,
            Operator::Eq => values_equal(actual, expected),
            Operator::Ne => !values_equal(actual, expected),
            Operator::Empty => is_empty(actual),
            Operator::NotEmpty => !is_empty(actual),
            Operator::Contains => contains(actual, expected),
            Operator::NotContains => !contains(actual, expected),
            Operator::In => is_member(actual, expected),
            Operator::NotIn => !is_member(actual, expected),
            Operator::Regex => self.pattern_matches(actual).unwrap_or(false),
            Operator::NotRegex => self.pattern_matches(actual).is_some_and(|m| !m),
            Operator::StartsWith => {
                text_pair(actual, expected).is_some_and(|(a, e)| a.starts_with(&e))
            }
            Operator::EndsWith => {
                text_pair(actual, expected).is_some_and(|(a, e)| a.ends_with(&e))
            }
            Operator::Lt => number_pair(actual, expected).is_some_and(|(a, e)| a < e),
            Operator::Le => number_pair(actual, expected).is_some_and(|(a, e)| a <= e),
            Operator::Gt => number_pair(actual, expected).is_some_and(|(a, e)| a > e),
            Operator::Ge => number_pair(actual, expected).is_some_and(|(a, e)| a >= e),
            Operator::IsTrue => truthiness(actual) == Some(true),
            Operator::IsFalse => truthiness(actual) == Some(false),
        }
    }

    /// `None` when the value is not matchable text
    fn pattern_matches(&self, actual: &Value) -> Option<bool> {
        let text = scalar_text(actual)?;
        self.pattern.as_ref().map(|re| re.is_match(&text))
    }
}

/// Text form of a scalar; `None` for null, sequences and maps
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric form of a number or numeric string; `"nan"` and `"inf"` stay text
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Compare by value: `"80" == 80`, `"true" == true`, `1 == 1.0`
pub(crate) fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::Array(_) | Value::Object(_), _) | (_, Value::Array(_) | Value::Object(_)) => {
            actual == expected
        }
        _ => {
            if let (Some(a), Some(e)) = (as_number(actual), as_number(expected)) {
                return a == e;
            }
            scalar_text(actual) == scalar_text(expected)
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn contains(actual: &Value, expected: &Value) -> bool {
    match actual {
        Value::Array(items) => items.iter().any(|item| values_equal(item, expected)),
        Value::String(s) => scalar_text(expected).is_some_and(|e| s.contains(&e)),
        Value::Object(map) => scalar_text(expected).is_some_and(|e| map.contains_key(&e)),
        _ => false,
    }
}

fn is_member(actual: &Value, expected: &Value) -> bool {
    match expected {
        Value::Array(items) => items.iter().any(|item| values_equal(actual, item)),
        Value::String(list) => list
            .split(',')
            .any(|item| values_equal(actual, &Value::String(item.trim().to_string()))),
        other => values_equal(actual, other),
    }
}

fn text_pair(actual: &Value, expected: &Value) -> Option<(String, String)> {
    Some((scalar_text(actual)?, scalar_text(expected)?))
}

fn number_pair(actual: &Value, expected: &Value) -> Option<(f64, f64)> {
    Some((as_number(actual)?, as_number(expected)?))
}

fn truthiness(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree() -> Value {
        json!({
            "spec": {
                "hostNetwork": false,
                "replicas": 3,
                "containers": [
                    { "image": "nginx:latest", "ports": [{ "containerPort": 80 }] }
                ],
                "tags": ["web", "public"],
                "annotations": {},
                "port": "8080"
            }
        })
    }

    fn check(key: &str, op: &str, value: Option<Value>) -> bool {
        Predicate::parse(key, op, value).unwrap().evaluate(&tree())
    }

    #[test]
    fn test_equality_normalizes_by_value() {
        assert!(check("spec.replicas", "eq", Some(json!("3"))));
        assert!(check("spec.replicas", "eq", Some(json!(3.0))));
        assert!(check("spec.port", "eq", Some(json!(8080))));
        assert!(check("spec.hostNetwork", "eq", Some(json!("false"))));
        assert!(check("spec.containers[0].image", "ne", Some(json!("nginx:1.25"))));
        assert!(!check("spec.containers[0].image", "eq", Some(json!("nginx"))));
    }

    #[test]
    fn test_existence() {
        assert!(check("spec.replicas", "exists", None));
        assert!(check("spec.replicas", "present", None));
        assert!(!check("spec.replicas", "absent", None));
        assert!(check("spec.volumes", "absent", None));
        assert!(!check("spec.volumes", "exists", None));
    }

    #[test]
    fn test_absent_path_only_satisfies_absent() {
        let cases: Vec<(&str, Option<Value>)> = vec![
            ("eq", Some(json!("x"))),
            ("ne", Some(json!("x"))),
            ("contains", Some(json!("x"))),
            ("not-contains", Some(json!("x"))),
            ("in", Some(json!(["x"]))),
            ("not-in", Some(json!(["x"]))),
            ("regex", Some(json!(".*"))),
            ("not-regex", Some(json!("x"))),
            ("starts-with", Some(json!(""))),
            ("empty", None),
            ("not-empty", None),
            ("lt", Some(json!(1))),
            ("is-false", None),
            ("exists", None),
        ];
        for key in ["spec.missing.deep", "spec.containers[*].securityContext"] {
            for (op, value) in &cases {
                assert!(
                    !check(key, op, value.clone()),
                    "operator '{}' matched absent path '{}'",
                    op,
                    key
                );
            }
            assert!(check(key, "absent", None));
        }
    }

    #[test]
    fn test_projection_over_empty_sequence_is_present() {
        let tree = json!({ "spec": { "containers": [] } });
        let eval = |op: &str, value: Option<Value>| {
            Predicate::parse("spec.containers[*].image", op, value)
                .unwrap()
                .evaluate(&tree)
        };
        assert!(eval("exists", None));
        assert!(eval("empty", None));
        assert!(eval("not-contains", Some(json!("nginx:latest"))));
        assert!(!eval("absent", None));
    }

    #[test]
    fn test_non_scalar_values_are_rejected() {
        let cases = [
            ("regex", json!(["^x$"])),
            ("not-regex", json!({ "pattern": "x" })),
            ("starts-with", json!(["nginx"])),
            ("ends-with", Value::Null),
            ("lt", json!([1])),
            ("ge", json!("many")),
        ];
        for (op, value) in cases {
            assert!(
                matches!(
                    Predicate::parse("spec.replicas", op, Some(value.clone())),
                    Err(ConfigurationError::InvalidValue { .. })
                ),
                "operator '{}' accepted {}",
                op,
                value
            );
        }
        // Membership and equality still take sequences and maps
        assert!(Predicate::parse("spec.replicas", "in", Some(json!([1, 3]))).is_ok());
        assert!(Predicate::parse("spec.tags", "eq", Some(json!(["web", "public"]))).is_ok());
    }

    #[test]
    fn test_non_finite_text_compares_as_text() {
        let tree = json!({ "a": "nan", "b": "NaN", "c": "inf" });
        let eval = |key: &str, op: &str, value: Value| {
            Predicate::parse(key, op, Some(value)).unwrap().evaluate(&tree)
        };
        assert!(eval("a", "eq", json!("nan")));
        assert!(!eval("b", "ne", json!("NaN")));
        assert!(!eval("a", "eq", json!("NaN")));
        assert!(eval("c", "eq", json!("inf")));
        assert!(!eval("c", "gt", json!(1)));
    }

    #[test]
    fn test_containment() {
        assert!(check("spec.tags", "contains", Some(json!("web"))));
        assert!(!check("spec.tags", "contains", Some(json!("private"))));
        assert!(check("spec.tags", "not-contains", Some(json!("private"))));
        assert!(check("spec.containers[0].image", "contains", Some(json!("latest"))));
        assert!(check("spec", "contains", Some(json!("replicas"))));
        assert!(check("spec.replicas", "in", Some(json!([1, 3, 5]))));
        assert!(check("spec.containers[0].image", "not-in", Some(json!("a, b"))));
        assert!(check("spec.replicas", "in", Some(json!("1,3"))));
    }

    #[test]
    fn test_regex() {
        assert!(check("spec.containers[0].image", "regex", Some(json!("^nginx:"))));
        assert!(!check("spec.containers[0].image", "regex", Some(json!("^nginx:[0-9]"))));
        assert!(check("spec.containers[0].image", "not-regex", Some(json!("^nginx:[0-9]"))));
        assert!(check("spec.replicas", "regex", Some(json!("^[0-9]+$"))));
        // Sequences are not matchable text
        assert!(!check("spec.tags", "regex", Some(json!(".*"))));
        assert!(!check("spec.tags", "not-regex", Some(json!("x"))));
    }

    #[test]
    fn test_string_affixes() {
        assert!(check("spec.containers[0].image", "starts-with", Some(json!("nginx"))));
        assert!(check("spec.containers[0].image", "ends-with", Some(json!(":latest"))));
        assert!(!check("spec.containers[0].image", "ends-with", Some(json!(":1.25"))));
    }

    #[test]
    fn test_numeric_comparison() {
        assert!(check("spec.replicas", "ge", Some(json!(2))));
        assert!(check("spec.replicas", "le", Some(json!("3"))));
        assert!(!check("spec.replicas", "lt", Some(json!(3))));
        assert!(check("spec.containers[0].ports[0].containerPort", "gt", Some(json!(79))));
        assert!(!check("spec.containers[0].image", "gt", Some(json!(1))));
    }

    #[test]
    fn test_empty_and_booleans() {
        assert!(check("spec.annotations", "empty", None));
        assert!(check("spec.tags", "not-empty", None));
        assert!(check("spec.hostNetwork", "is-false", None));
        assert!(!check("spec.hostNetwork", "is-true", None));
        assert!(!check("spec.replicas", "is-true", None));
    }

    #[test]
    fn test_unknown_operator_is_configuration_error() {
        let err = Predicate::parse("spec.replicas", "fuzzy", Some(json!(1))).unwrap_err();
        assert_eq!(err, ConfigurationError::UnknownOperator("fuzzy".to_string()));
    }

    #[test]
    fn test_missing_value_and_bad_pattern() {
        assert!(matches!(
            Predicate::parse("spec.replicas", "eq", None),
            Err(ConfigurationError::MissingValue(_))
        ));
        assert!(matches!(
            Predicate::parse("spec.replicas", "regex", Some(json!("(unclosed"))),
            Err(ConfigurationError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_operator_spellings() {
        assert_eq!("not_in".parse::<Operator>().unwrap(), Operator::NotIn);
        assert_eq!("does-not-contain".parse::<Operator>().unwrap(), Operator::NotContains);
        assert_eq!(Operator::StartsWith.to_string(), "starts-with");
    }
}
