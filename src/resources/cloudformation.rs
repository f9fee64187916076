#![forbid(unsafe_code)]

//! CloudFormation template loader
//!
//! Every entry under `Resources` becomes one resource, identified by its
//! logical id. Templates may be YAML (short-form intrinsics included) or JSON.
//! Resources come out sorted by logical id, not in template order.

use super::yaml::to_property_tree;
use super::{Resource, ResourceLoader, read_file};
use crate::error::LoadError;
use crate::types::ResourceFormat;
use serde_json::{Map, Value};
use std::path::Path;

/// Loads resources from CloudFormation templates
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudFormationLoader;

impl CloudFormationLoader {
    /// Parse template text; `path` names the origin file
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Yaml` when the template does not parse and
    /// `LoadError::MissingField` when `Resources` or a resource `Type` is missing.
    pub fn parse(&self, content: &str, path: &Path) -> Result<Vec<Resource>, LoadError> {
        // YAML is a superset of JSON, so one parser covers both template styles
        let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| LoadError::Yaml {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let template = to_property_tree(yaml);

        let Some(entries) = template.get("Resources").and_then(Value::as_object) else {
            return Err(LoadError::MissingField {
                file: path.to_path_buf(),
                field: "Resources".to_string(),
            });
        };

        let mut resources = Vec::with_capacity(entries.len());
        for (logical_id, body) in entries {
            let resource_type = body
                .get("Type")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .ok_or_else(|| LoadError::MissingField {
                    file: path.to_path_buf(),
                    field: format!("Resources.{}.Type", logical_id),
                })?;
            let properties = match body.get("Properties") {
                Some(props @ Value::Object(_)) => props.clone(),
                _ => Value::Object(Map::new()),
            };
            resources.push(Resource::new(
                logical_id.clone(),
                resource_type,
                properties,
                path,
            ));
        }
        Ok(resources)
    }
}

impl ResourceLoader for CloudFormationLoader {
    fn format(&self) -> ResourceFormat {
        ResourceFormat::CloudFormation
    }

    fn load(&self, path: &Path) -> Result<Vec<Resource>, LoadError> {
        let content = read_file(path)?;
        self.parse(&content, path)
    }
}
