#![forbid(unsafe_code)]

//! Terraform plan loader
//!
//! Reads the JSON produced by `terraform show -json <planfile>`. Managed
//! resources are collected from the root module and every nested child
//! module; data sources are skipped.

use super::{Resource, ResourceLoader, file_name_id, read_file};
use crate::error::LoadError;
use crate::types::ResourceFormat;
use serde_json::{Map, Value};
use std::path::Path;

/// Loads resources from Terraform JSON plans
#[derive(Debug, Clone, Copy, Default)]
pub struct TerraformLoader;

impl TerraformLoader {
    /// Parse plan JSON; `path` names the origin file
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Json` for invalid JSON and `LoadError::MissingField`
    /// when no module or resource list is present.
    pub fn parse(&self, content: &str, path: &Path) -> Result<Vec<Resource>, LoadError> {
        let plan: Value = serde_json::from_str(content).map_err(|e| LoadError::Json {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let root_module = plan
            .pointer("/planned_values/root_module")
            .or_else(|| plan.pointer("/values/root_module"));

        let mut resources = Vec::new();
        match (root_module, plan.get("resources")) {
            (Some(module), _) => collect_module(module, path, &mut resources),
            (None, Some(Value::Array(list))) => collect_resources(list, path, &mut resources),
            _ => {
                return Err(LoadError::MissingField {
                    file: path.to_path_buf(),
                    field: "planned_values.root_module".to_string(),
                });
            }
        }
        Ok(resources)
    }
}

fn collect_module(module: &Value, path: &Path, out: &mut Vec<Resource>) {
    if let Some(list) = module.get("resources").and_then(Value::as_array) {
        collect_resources(list, path, out);
    }
    if let Some(children) = module.get("child_modules").and_then(Value::as_array) {
        for child in children {
            collect_module(child, path, out);
        }
    }
}

fn collect_resources(list: &[Value], path: &Path, out: &mut Vec<Resource>) {
    for entry in list {
        if entry.get("mode").and_then(Value::as_str) == Some("data") {
            continue;
        }
        let Some(resource_type) = entry
            .get("type")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
        else {
            tracing::warn!(file = %path.display(), "skipping plan entry without a type");
            continue;
        };

        let id = ["address", "name"]
            .iter()
            .filter_map(|field| entry.get(*field).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| file_name_id(path));

        let properties = match entry.get("values") {
            Some(values @ Value::Object(_)) => values.clone(),
            _ => Value::Object(Map::new()),
        };

        out.push(Resource::new(id, resource_type, properties, path));
    }
}

impl ResourceLoader for TerraformLoader {
    fn format(&self) -> ResourceFormat {
        ResourceFormat::Terraform
    }

    fn load(&self, path: &Path) -> Result<Vec<Resource>, LoadError> {
        let content = read_file(path)?;
        self.parse(&content, path)
    }
}
