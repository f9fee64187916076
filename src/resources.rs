#![forbid(unsafe_code)]

//! Resources and the loaders that produce them
//!
//! Every source format is turned into the same [`Resource`] shape, so the
//! rule engine never needs to know where a resource came from.

pub mod cloudformation;
pub mod kubernetes;
pub mod terraform;
mod yaml;

pub use cloudformation::CloudFormationLoader;
pub use kubernetes::KubernetesLoader;
pub use terraform::TerraformLoader;

use crate::error::LoadError;
use crate::types::ResourceFormat;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// One configuration unit under evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub properties: Value,
    pub filename: PathBuf,
}

impl Resource {
    pub fn new(
        id: impl Into<String>,
        resource_type: impl Into<String>,
        properties: Value,
        filename: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            properties,
            filename: filename.into(),
        }
    }
}

/// Turns one input file into resources
///
/// Loaders are `Send + Sync` so files can be loaded in parallel.
pub trait ResourceLoader: Send + Sync {
    /// Format handled by this loader
    fn format(&self) -> ResourceFormat;

    /// Load every resource defined in `path`
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the file cannot be read or parsed. An error
    /// covers this file only.
    fn load(&self, path: &Path) -> Result<Vec<Resource>, LoadError>;
}

/// Returns the loader for a source format
pub fn loader_for(format: ResourceFormat) -> Box<dyn ResourceLoader> {
    match format {
        ResourceFormat::Kubernetes => Box::new(KubernetesLoader),
        ResourceFormat::Terraform => Box::new(TerraformLoader),
        ResourceFormat::CloudFormation => Box::new(CloudFormationLoader),
    }
}

/// Result of loading a batch of files
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub resources: Vec<Resource>,
    pub errors: Vec<LoadError>,
}

/// Load every file, keeping resources in file order
///
/// A file that fails to load is recorded in `errors` and the remaining files
/// are still loaded.
pub fn load_files(loader: &dyn ResourceLoader, files: &[PathBuf]) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();
    for file in files {
        match loader.load(file) {
            Ok(resources) => {
                tracing::debug!(
                    file = %file.display(),
                    resources = resources.len(),
                    format = %loader.format(),
                    "loaded resources"
                );
                outcome.resources.extend(resources);
            }
            Err(e) => {
                tracing::warn!(file = %file.display(), error = %e, "failed to load file");
                outcome.errors.push(e);
            }
        }
    }
    outcome
}

/// Last path component, used as a fallback resource id
pub(crate) fn file_name_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub(crate) fn read_file(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        file: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_id() {
        assert_eq!(file_name_id(Path::new("deploy/pod.yaml")), "pod.yaml");
    }

    #[test]
    fn test_loader_for_format() {
        for format in [
            ResourceFormat::Kubernetes,
            ResourceFormat::Terraform,
            ResourceFormat::CloudFormation,
        ] {
            assert_eq!(loader_for(format).format(), format);
        }
    }

    #[test]
    fn test_bad_file_does_not_stop_batch() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.yaml");
        let bad = dir.path().join("bad.yaml");
        fs::write(&good, "kind: Pod\nmetadata:\n  name: web1\n").unwrap();
        fs::write(&bad, "kind: [unclosed\n").unwrap();
        let missing = dir.path().join("missing.yaml");

        let outcome = load_files(&KubernetesLoader, &[bad, good, missing]);
        assert_eq!(outcome.resources.len(), 1);
        assert_eq!(outcome.resources[0].id, "web1");
        assert_eq!(outcome.errors.len(), 2);
    }

    #[test]
    fn test_loaders_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ResourceLoader>();
    }
}
