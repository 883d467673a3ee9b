//! Project configuration (.jingongo.yml) and conversion payload resolution
//!
//! Everything here is pure data transformation; nothing touches the network.
//!
//! Precedence, lowest to highest:
//!
//! 1. built-in defaults
//! 2. the `model` section of `.jingongo.yml` in the project root
//! 3. explicit overrides passed by the caller
//!
//! Scalar fields override one by one. The `inputs`, `outputs` and `parameters`
//! lists are replaced as a whole by the highest source that defines them.

use crate::api::ConversionRequest;
use crate::error::{JingongoError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

// ============================================================================
// Conversion Defaults
// ============================================================================

/// Project-local configuration file name
pub const PROJECT_CONFIG_FILE: &str = ".jingongo.yml";

pub const DEFAULT_MODEL_NAME: &str = "UntitledModel";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_LANGUAGE: &str = "python";
pub const DEFAULT_COMPONENT_TYPE: &str = "unknown";
pub const DEFAULT_FMI_TYPE: &str = "CoSimulation";

/// FMI type assumed for variables that do not declare one
pub const DEFAULT_VARIABLE_TYPE: &str = "Real";

/// A declared input, output or parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSpec {
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub var_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl VariableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            var_type: None,
            default: None,
        }
    }

    pub fn typed(name: impl Into<String>, var_type: impl Into<String>) -> Self {
        Self {
            var_type: Some(var_type.into()),
            ..Self::new(name)
        }
    }

    pub fn with_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            default: Some(default.into()),
            ..Self::new(name)
        }
    }
}

/// Model settings, either read from `.jingongo.yml` or supplied as overrides
///
/// Every field is optional; unset fields fall through to the next source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default, deserialize_with = "scalar_string")]
    pub model_name: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub version: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub language: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub component_type: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub fmi_type: Option<String>,

    #[serde(default)]
    pub inputs: Option<Vec<VariableSpec>>,

    #[serde(default)]
    pub outputs: Option<Vec<VariableSpec>>,

    #[serde(default)]
    pub parameters: Option<Vec<VariableSpec>>,
}

/// Explicit caller overrides for a conversion
pub type ConversionOptions = ModelConfig;

impl ModelConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model_name(mut self, value: impl Into<String>) -> Self {
        self.model_name = Some(value.into());
        self
    }

    pub fn version(mut self, value: impl Into<String>) -> Self {
        self.version = Some(value.into());
        self
    }

    pub fn description(mut self, value: impl Into<String>) -> Self {
        self.description = Some(value.into());
        self
    }

    pub fn language(mut self, value: impl Into<String>) -> Self {
        self.language = Some(value.into());
        self
    }

    pub fn component_type(mut self, value: impl Into<String>) -> Self {
        self.component_type = Some(value.into());
        self
    }

    pub fn fmi_type(mut self, value: impl Into<String>) -> Self {
        self.fmi_type = Some(value.into());
        self
    }

    pub fn inputs(mut self, inputs: Vec<VariableSpec>) -> Self {
        self.inputs = Some(inputs);
        self
    }

    pub fn outputs(mut self, outputs: Vec<VariableSpec>) -> Self {
        self.outputs = Some(outputs);
        self
    }

    pub fn parameters(mut self, parameters: Vec<VariableSpec>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    /// Layer `higher` on top of `self`; fields set in `higher` win
    pub fn overlay(self, higher: &ModelConfig) -> ModelConfig {
        let higher = higher.clone();
        ModelConfig {
            model_name: higher.model_name.or(self.model_name),
            version: higher.version.or(self.version),
            description: higher.description.or(self.description),
            language: higher.language.or(self.language),
            component_type: higher.component_type.or(self.component_type),
            fmi_type: higher.fmi_type.or(self.fmi_type),
            inputs: higher.inputs.or(self.inputs),
            outputs: higher.outputs.or(self.outputs),
            parameters: higher.parameters.or(self.parameters),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProjectFile {
    #[serde(default)]
    model: Option<ModelConfig>,
}

/// Read the `model` section of `.jingongo.yml` if the project has one
///
/// A file that exists but cannot be read or parsed is a validation error; a
/// file without a `model` section counts as empty.
pub fn load_project_config(project_dir: &Path) -> Result<Option<ModelConfig>> {
    let path = project_dir.join(PROJECT_CONFIG_FILE);
    if !path.is_file() {
        return Ok(None);
    }

    info!(file = %path.display(), "Loading project configuration");
    let content = std::fs::read_to_string(&path).map_err(|e| {
        JingongoError::validation(format!("Cannot read '{}': {}", path.display(), e))
    })?;
    parse_project_config(&content).map_err(|e| {
        JingongoError::validation(format!("Invalid '{}': {}", path.display(), e))
    })
}

fn parse_project_config(
    content: &str,
) -> std::result::Result<Option<ModelConfig>, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(Some(ModelConfig::default()));
    }
    let file: Option<ProjectFile> = serde_yaml::from_str(content)?;
    Ok(Some(file.and_then(|f| f.model).unwrap_or_default()))
}

/// Merge defaults, the project file and explicit overrides into a payload
///
/// The returned request has no `upload_id` yet.
pub fn resolve_request(file: Option<&ModelConfig>, overrides: &ModelConfig) -> ConversionRequest {
    let merged = file.cloned().unwrap_or_default().overlay(overrides);

    ConversionRequest {
        model_name: merged
            .model_name
            .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
        version: merged.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        description: merged.description.unwrap_or_default(),
        language: merged.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        component_type: merged
            .component_type
            .unwrap_or_else(|| DEFAULT_COMPONENT_TYPE.to_string()),
        fmi_type: merged.fmi_type.unwrap_or_else(|| DEFAULT_FMI_TYPE.to_string()),
        input_variables: variable_types(merged.inputs.unwrap_or_default()),
        output_variables: variable_types(merged.outputs.unwrap_or_default()),
        parameters: parameter_defaults(merged.parameters.unwrap_or_default()),
        upload_id: None,
    }
}

fn variable_types(specs: Vec<VariableSpec>) -> BTreeMap<String, String> {
    specs
        .into_iter()
        .map(|v| {
            let ty = v.var_type.unwrap_or_else(|| DEFAULT_VARIABLE_TYPE.to_string());
            (v.name, ty)
        })
        .collect()
}

fn parameter_defaults(specs: Vec<VariableSpec>) -> BTreeMap<String, Value> {
    specs
        .into_iter()
        .map(|p| (p.name, p.default.unwrap_or_else(|| Value::from(0.0))))
        .collect()
}

/// Accept any YAML scalar for text fields (`version: 1.0` is common)
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {}",
            other
        ))),
    }
}
