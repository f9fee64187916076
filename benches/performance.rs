//! Performance benchmarks for config-lint
//!
//! These benchmarks measure the performance of key operations:
//! - Filter evaluation on nested combinators
//! - Rule set validation over growing resource counts
//! - Path search across resources
//! - Loading manifests from disk
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench validation
//! ```
//!
//! ## Expected Performance Characteristics
//!
//! - Validation scales linearly with resources times rules
//! - Resources are evaluated in parallel with rayon
//! - Regex patterns are compiled once when the rule set is parsed

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use config_lint::engine::{FileWalker, Linter, search};
use config_lint::resources::{load_files, loader_for};
use config_lint::rules::{Filter, FilterDefinition, RuleSelection, RuleSet};
use config_lint::{Resource, ResourceFormat};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

const RULES: &str = r#"
type: Kubernetes
rules:
  - id: IMAGE_PINNED
    message: Image tag must be pinned
    resource: Pod
    tags: [images]
    filters:
      - key: spec.containers[*].image
        op: not-contains
        value: nginx:latest
  - id: NO_HOST_NETWORK
    message: Host network should not be used
    severity: WARNING
    resource: Pod
    tags: [network]
    filters:
      - not:
          - key: spec.hostNetwork
            op: is-true
  - id: RESOURCE_LIMITS
    message: Containers need limits
    resource: Pod
    filters:
      - or:
          - key: spec.containers[0].resources.limits.cpu
            op: exists
          - and:
              - key: metadata.labels.tier
                op: eq
                value: batch
              - key: spec.priority
                op: lt
                value: 100
"#;

fn rule_set() -> RuleSet {
    RuleSet::parse(RULES, Path::new("bench.yml")).unwrap()
}

fn pod(i: usize) -> Resource {
    let image = if i % 4 == 0 { "nginx:latest" } else { "nginx:1.25" };
    let tier = if i % 2 == 0 { "web" } else { "batch" };
    Resource::new(
        format!("pod-{}", i),
        "Pod",
        json!({
            "metadata": { "labels": { "tier": tier } },
            "spec": {
                "hostNetwork": i % 5 == 0,
                "priority": i % 200,
                "containers": [
                    { "image": image, "resources": { "limits": { "cpu": "500m" } } },
                    { "image": "busybox:1.36" }
                ]
            }
        }),
        format!("pod-{}.yaml", i),
    )
}

/// Create a temporary directory with Kubernetes manifests
fn create_manifests(count: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for i in 0..count {
        let content = format!(
            "kind: Pod\nmetadata:\n  name: pod-{i}\nspec:\n  containers:\n    - image: nginx:1.{i}\n---\nkind: Service\nmetadata:\n  name: svc-{i}\nspec:\n  type: ClusterIP\n"
        );
        fs::write(temp_dir.path().join(format!("app-{}.yaml", i)), content).unwrap();
    }
    temp_dir
}

// ============================================================================
// Benchmarks
// ============================================================================

fn bench_filter_evaluation(c: &mut Criterion) {
    let definition: FilterDefinition = serde_json::from_value(json!({
        "and": [
            { "key": "spec.containers[*].image", "op": "not-contains", "value": "nginx:latest" },
            { "or": [
                { "key": "metadata.labels.tier", "op": "in", "value": "web,batch" },
                { "key": "spec.priority", "op": "gt", "value": 10 }
            ] },
            { "not": [ { "key": "spec.hostNetwork", "op": "is-true" } ] }
        ]
    }))
    .unwrap();
    let filter = Filter::from(definition);
    let properties = pod(1).properties;

    c.bench_function("filter_evaluation", |b| {
        b.iter(|| black_box(filter.evaluate(black_box(&properties))))
    });
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");
    let linter = Linter::new(rule_set());

    for count in [100, 1_000, 10_000].iter() {
        let resources: Vec<Resource> = (0..*count).map(pod).collect();
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("all_rules", count), count, |b, _| {
            b.iter(|| black_box(linter.validate(&resources, &RuleSelection::all())))
        });

        let by_tag = RuleSelection::new(vec!["network".to_string()], vec![]);
        group.bench_with_input(BenchmarkId::new("tag_selected", count), count, |b, _| {
            b.iter(|| black_box(linter.validate(&resources, &by_tag)))
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let resources: Vec<Resource> = (0..1_000).map(pod).collect();
    c.bench_function("search_projection", |b| {
        b.iter(|| black_box(search(&resources, "spec.containers[*].image").unwrap()))
    });
}

fn bench_loading(c: &mut Criterion) {
    let mut group = c.benchmark_group("loading");
    let format = ResourceFormat::Kubernetes;

    for count in [10, 100].iter() {
        let temp_dir = create_manifests(*count);
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("discover_and_load", count), count, |b, _| {
            b.iter(|| {
                let walker = FileWalker::new(format.default_include(), &[]).unwrap();
                let files = walker.discover(&[temp_dir.path()]).unwrap();
                black_box(load_files(loader_for(format).as_ref(), &files))
            })
        });
    }

    group.finish();
}

criterion_group!(
    engine_benches,
    bench_filter_evaluation,
    bench_validation,
    bench_search,
);

criterion_group!(io_benches, bench_loading,);

criterion_main!(engine_benches, io_benches);
