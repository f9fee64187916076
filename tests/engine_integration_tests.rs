//! Integration tests for the evaluation engine
//!
//! These tests drive the public library API end to end: rule set documents
//! are parsed, resources are loaded from manifest text, and the report is
//! checked for verdicts, evaluation errors and ordering.

mod common;

use common::{K8S_RULES, POD_HOST_NETWORK, POD_LATEST, POD_PINNED};
use config_lint::engine::Linter;
use config_lint::resources::KubernetesLoader;
use config_lint::rules::{FilterDefinition, select_by_tags};
use config_lint::{
    Filter, Resource, RuleSelection, RuleSet, Status, ValidationResult, search, validate,
};
use serde_json::{Value, json};
use std::path::Path;

fn rule_set(content: &str) -> RuleSet {
    assert_ok!(RuleSet::parse(content, Path::new("rules.yml")))
}

fn pods() -> Vec<Resource> {
    let mut resources = Vec::new();
    for (name, content) in [
        ("web1.yaml", POD_LATEST),
        ("web2.yaml", POD_HOST_NETWORK),
        ("web3.yaml", POD_PINNED),
    ] {
        resources.extend(assert_ok!(KubernetesLoader.parse(content, Path::new(name))));
    }
    resources
}

fn web1() -> Resource {
    Resource::new(
        "web1",
        "Pod",
        json!({ "spec": { "containers": [{ "image": "nginx:latest" }] } }),
        "web1.yaml",
    )
}

fn filter(value: Value) -> Filter {
    let def: FilterDefinition = assert_ok!(serde_json::from_value(value));
    Filter::from(def)
}

fn verdicts(results: &[ValidationResult]) -> Vec<(&str, &str, Status)> {
    results
        .iter()
        .map(|r| (r.rule_id.as_str(), r.resource_id.as_str(), r.status))
        .collect()
}

// ============================================================================
// RULE MATCHER SCENARIOS
// ============================================================================

#[test]
fn test_equality_filter_passes_compliant_resource() {
    let rules = rule_set(
        r#"
rules:
  - id: R1
    message: Image must be nginx:latest
    severity: FAILURE
    resource: Pod
    filters:
      - key: spec.containers[0].image
        op: eq
        value: nginx:latest
"#,
    );
    let report = Linter::new(rules)
        .include_ok(true)
        .validate(&[web1()], &RuleSelection::all());
    assert_eq!(verdicts(&report.results), vec![("R1", "web1", Status::Ok)]);
    assert!(report.errors.is_empty());
}

#[test]
fn test_regex_filter_reports_failure_with_rule_message() {
    let rules = rule_set(
        r#"
rules:
  - id: R1
    message: Image tag must be pinned
    severity: FAILURE
    resource: Pod
    filters:
      - key: spec.containers[0].image
        op: regex
        value: "^nginx:[0-9]"
"#,
    );
    let report = validate(&[web1()], &rules, &[], &[]);
    assert_eq!(verdicts(&report.results), vec![("R1", "web1", Status::Failure)]);
    assert_eq!(report.results[0].message, "Image tag must be pinned");
    assert_eq!(report.results[0].resource_type, "Pod");
    assert_eq!(report.results[0].filename, Path::new("web1.yaml"));
}

#[test]
fn test_rule_for_other_type_produces_nothing() {
    let rules = rule_set(
        r#"
rules:
  - id: SVC
    message: Services only
    resource: Service
    filters:
      - key: spec.type
        op: eq
        value: ClusterIP
"#,
    );
    let report = Linter::new(rules)
        .include_ok(true)
        .validate(&[web1()], &RuleSelection::all());
    assert!(report.results.is_empty());
    assert!(report.errors.is_empty());
}

#[test]
fn test_wildcard_rule_and_empty_filters() {
    let rules = rule_set(
        r#"
rules:
  - id: ANY
    message: Everything has a spec
    resource: "*"
    filters:
      - key: spec
        op: exists
  - id: TRIVIAL
    message: Always holds
    resource: Pod
"#,
    );
    let report = Linter::new(rules)
        .include_ok(true)
        .validate(&pods(), &RuleSelection::all());
    assert_eq!(report.results.len(), 6);
    assert!(report.results.iter().all(|r| r.status == Status::Ok));
}

#[test]
fn test_severity_defaults_to_failure() {
    let rules = rule_set(
        r#"
rules:
  - id: NO_HOST_NET
    message: Host network should not be used
    resource: Pod
    filters:
      - key: spec.hostNetwork
        op: absent
"#,
    );
    let report = validate(&pods(), &rules, &[], &[]);
    assert_eq!(
        verdicts(&report.results),
        vec![("NO_HOST_NET", "web2", Status::Failure)]
    );
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

#[test]
fn test_full_rule_set_against_loaded_pods() {
    let report = validate(&pods(), &rule_set(K8S_RULES), &[], &[]);

    assert_eq!(
        verdicts(&report.results),
        vec![
            ("R1", "web1", Status::Failure),
            ("R2", "web2", Status::Warning),
        ]
    );

    // The malformed rule is reported once per Pod, never as OK
    let errors: Vec<(&str, &str)> = report
        .errors
        .iter()
        .map(|e| (e.rule_id.as_str(), e.resource_id.as_str()))
        .collect();
    assert_eq!(errors, vec![("R3", "web1"), ("R3", "web2"), ("R3", "web3")]);
    assert!(report.errors.iter().all(|e| e.message.contains("fuzzy")));
    assert_eq!(report.resources_checked, 3);
    assert_eq!(report.rules_selected, 3);
}

#[test]
fn test_tag_selection_skips_untagged_rules() {
    let rules = rule_set(K8S_RULES);
    let selected: Vec<&str> = select_by_tags(&rules, &["network".to_string()])
        .iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(selected, vec!["R2"]);

    let report = validate(&pods(), &rules, &["network".to_string()], &[]);
    assert_eq!(verdicts(&report.results), vec![("R2", "web2", Status::Warning)]);
    assert!(report.errors.is_empty());
}

#[test]
fn test_tags_then_ids() {
    let rules = rule_set(K8S_RULES);
    let report = validate(
        &pods(),
        &rules,
        &["images".to_string(), "network".to_string()],
        &["R1".to_string()],
    );
    assert_eq!(report.rules_selected, 1);
    assert_eq!(verdicts(&report.results), vec![("R1", "web1", Status::Failure)]);

    let none = validate(&pods(), &rules, &["images".to_string()], &["R2".to_string()]);
    assert_eq!(none.rules_selected, 0);
    assert!(none.results.is_empty());
}

#[test]
fn test_validate_is_deterministic() {
    let rules = rule_set(K8S_RULES);
    let resources: Vec<Resource> = pods().into_iter().cycle().take(300).collect();

    let first = validate(&resources, &rules, &[], &[]);
    let second = validate(&resources, &rules, &[], &[]);
    assert_eq!(first, second);

    let first_json: Vec<String> = first
        .results
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect();
    let second_json: Vec<String> = second
        .results
        .iter()
        .map(|r| serde_json::to_string(r).unwrap())
        .collect();
    assert_eq!(first_json, second_json);
}

// ============================================================================
// FILTER PROPERTIES
// ============================================================================

#[test]
fn test_not_negates_every_filter() {
    let properties = json!({
        "spec": { "replicas": 3, "paused": false, "labels": ["a", "b"] }
    });
    let leaves = [
        json!({ "key": "spec.replicas", "op": "gt", "value": 2 }),
        json!({ "key": "spec.paused", "op": "is-true" }),
        json!({ "key": "spec.labels", "op": "contains", "value": "b" }),
        json!({ "key": "spec.missing", "op": "exists" }),
        json!({ "or": [] }),
        json!({ "and": [] }),
    ];
    for leaf in leaves {
        let plain = assert_ok!(filter(leaf.clone()).evaluate(&properties));
        let negated = assert_ok!(filter(json!({ "not": [leaf] })).evaluate(&properties));
        assert_eq!(negated, !plain);
    }
}

#[test]
fn test_vacuous_combinators() {
    let properties = json!({});
    assert!(assert_ok!(filter(json!({ "and": [] })).evaluate(&properties)));
    assert!(!assert_ok!(filter(json!({ "or": [] })).evaluate(&properties)));
}

#[test]
fn test_absent_path_only_matches_existence_checks() {
    let properties = json!({
        "spec": { "containers": [{ "image": "nginx:1.25" }, { "image": "envoy:1.29" }] }
    });
    let cases = [
        ("eq", json!("nginx")),
        ("ne", json!("nginx")),
        ("contains", json!("nginx")),
        ("not-contains", json!("nginx")),
        ("regex", json!(".*")),
        ("starts-with", json!("nginx")),
        ("ends-with", json!("nginx")),
        ("in", json!(["nginx"])),
        ("lt", json!(1)),
        ("gt", json!(1)),
    ];
    // A missing index, and a projection that misses in every element
    for key in [
        "spec.containers[5].image",
        "spec.containers[*].securityContext",
    ] {
        for (op, value) in &cases {
            let f = filter(json!({ "key": key, "op": op, "value": value }));
            assert!(
                !assert_ok!(f.evaluate(&properties)),
                "operator {} matched absent value at {}",
                op,
                key
            );
        }
        for op in ["exists", "empty", "not-empty", "is-true"] {
            let f = filter(json!({ "key": key, "op": op }));
            assert!(!assert_ok!(f.evaluate(&properties)), "{} at {}", op, key);
        }
        let absent = filter(json!({ "key": key, "op": "absent" }));
        assert!(assert_ok!(absent.evaluate(&properties)));
    }
}

#[test]
fn test_projection_rule_flags_containers_missing_the_key() {
    let rules = rule_set(
        r#"
rules:
  - id: RUN_AS_NON_ROOT
    message: Containers must set runAsNonRoot
    resource: Pod
    filters:
      - key: spec.containers[*].securityContext.runAsNonRoot
        op: not-contains
        value: false
"#,
    );
    let report = validate(&[web1()], &rules, &[], &[]);
    assert_eq!(
        verdicts(&report.results),
        vec![("RUN_AS_NON_ROOT", "web1", Status::Failure)]
    );
}

#[test]
fn test_list_valued_regex_is_reported_not_passed() {
    let rules = rule_set(
        r#"
rules:
  - id: BAD_PATTERN
    message: Image must match
    resource: Pod
    filters:
      - key: spec.containers[0].image
        op: regex
        value: ["^nginx:[0-9]"]
  - id: PINNED
    message: Image tag must be pinned
    resource: Pod
    filters:
      - key: spec.containers[0].image
        op: ends-with
        value: latest
"#,
    );
    let report = Linter::new(rules)
        .include_ok(true)
        .validate(&[web1()], &RuleSelection::all());
    assert_eq!(verdicts(&report.results), vec![("PINNED", "web1", Status::Ok)]);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].rule_id.as_str(), "BAD_PATTERN");
    assert_eq!(report.errors[0].resource_id, "web1");
}

#[test]
fn test_numeric_looking_text_compares_as_text() {
    let properties = json!({ "a": "nan", "b": "NaN", "c": "inf" });
    let holds = |leaf: Value| assert_ok!(filter(leaf).evaluate(&properties));
    assert!(holds(json!({ "key": "a", "op": "eq", "value": "nan" })));
    assert!(!holds(json!({ "key": "b", "op": "ne", "value": "NaN" })));
    assert!(holds(json!({ "key": "c", "op": "in", "value": ["inf"] })));
}

#[test]
fn test_unknown_operator_is_a_configuration_error() {
    let f = filter(json!({ "key": "spec", "op": "fuzzy", "value": 1 }));
    assert!(f.check().is_err());
    assert!(f.evaluate(&json!({ "spec": 1 })).is_err());
}

// ============================================================================
// SEARCH
// ============================================================================

#[test]
fn test_search_reports_resolved_values() {
    let matches = assert_ok!(search(&pods(), "spec.containers[*].image"));
    let found: Vec<(&str, &Value)> = matches
        .iter()
        .map(|m| (m.resource_id.as_str(), &m.value))
        .collect();
    assert_eq!(
        found,
        vec![
            ("web1", &json!(["nginx:latest"])),
            ("web2", &json!(["nginx:1.25"])),
            ("web3", &json!(["nginx:1.25"])),
        ]
    );

    let host = assert_ok!(search(&pods(), "spec.hostNetwork"));
    assert_eq!(host.len(), 1);
    assert_eq!(host[0].resource_id, "web2");
    assert_eq!(host[0].resource_type, "Pod");
    assert_eq!(host[0].filename, Path::new("web2.yaml"));
}
