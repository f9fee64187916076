//! Test utilities for config-lint integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Extract Some value or panic with context
#[macro_export]
macro_rules! assert_some {
    ($expr:expr) => {
        match $expr {
            Some(v) => v,
            None => panic!("assertion failed: expected Some, got None"),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Some(v) => v,
            None => panic!("{}: got None", $msg),
        }
    };
}

/// Kubernetes rule set used across the integration tests
///
/// R1 fails on unpinned images, R2 warns on host networking, R3 carries an
/// unknown operator.
pub const K8S_RULES: &str = r#"
description: Kubernetes baseline
type: Kubernetes
rules:
  - id: R1
    message: Image tag must be pinned
    severity: FAILURE
    resource: Pod
    tags: [images]
    filters:
      - key: spec.containers[0].image
        op: regex
        value: "^nginx:[0-9]"
  - id: R2
    message: Host network should not be used
    severity: WARNING
    resource: Pod
    tags: [network, aws]
    filters:
      - not:
          - key: spec.hostNetwork
            op: is-true
  - id: R3
    message: Uses an operator nobody implements
    severity: FAILURE
    resource: Pod
    tags: []
    filters:
      - key: spec.containers[0].image
        op: fuzzy
        value: nginx
"#;

/// Pod with an unpinned image
pub const POD_LATEST: &str = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web1
spec:
  containers:
    - name: web
      image: nginx:latest
"#;

/// Pod with a pinned image that uses the host network
pub const POD_HOST_NETWORK: &str = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web2
spec:
  hostNetwork: true
  containers:
    - name: web
      image: nginx:1.25
"#;

/// Compliant pod
pub const POD_PINNED: &str = r#"
apiVersion: v1
kind: Pod
metadata:
  name: web3
spec:
  containers:
    - name: web
      image: nginx:1.25
"#;

/// Write `content` to `dir/name`, creating parent directories
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
