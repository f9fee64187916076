#![forbid(unsafe_code)]

//! Kubernetes manifest loader
//!
//! Each YAML document in a manifest file is one resource. The resource type
//! is the document's `kind`; the id is `metadata.name`, or the file name
//! when the object has no name.

use super::yaml::to_property_tree;
use super::{Resource, ResourceLoader, file_name_id, read_file};
use crate::error::LoadError;
use crate::types::ResourceFormat;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Loads Kubernetes objects from YAML manifests
#[derive(Debug, Clone, Copy, Default)]
pub struct KubernetesLoader;

impl KubernetesLoader {
    /// Parse manifest text; `path` names the origin file
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Yaml` for invalid YAML and `LoadError::MissingField`
    /// for a document without `kind`.
    pub fn parse(&self, content: &str, path: &Path) -> Result<Vec<Resource>, LoadError> {
        let mut resources = Vec::new();

        for document in serde_yaml::Deserializer::from_str(content) {
            let yaml = serde_yaml::Value::deserialize(document).map_err(|e| LoadError::Yaml {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?;
            let properties = to_property_tree(yaml);

            // Empty documents between `---` separators
            if properties.is_null() {
                continue;
            }
            if !properties.is_object() {
                return Err(LoadError::Yaml {
                    file: path.to_path_buf(),
                    message: "expected a mapping at document root".to_string(),
                });
            }

            let kind = properties
                .get("kind")
                .and_then(Value::as_str)
                .filter(|kind| !kind.is_empty())
                .ok_or_else(|| LoadError::MissingField {
                    file: path.to_path_buf(),
                    field: "kind".to_string(),
                })?
                .to_string();

            let id = properties
                .pointer("/metadata/name")
                .and_then(Value::as_str)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| file_name_id(path));

            resources.push(Resource::new(id, kind, properties, path));
        }

        Ok(resources)
    }
}

impl ResourceLoader for KubernetesLoader {
    fn format(&self) -> ResourceFormat {
        ResourceFormat::Kubernetes
    }

    fn load(&self, path: &Path) -> Result<Vec<Resource>, LoadError> {
        let content = read_file(path)?;
        self.parse(&content, path)
    }
}
