use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

/// Project configuration loaded from `.kog.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KogConfig {
    /// Path of the OpenAPI document.
    pub input: String,
    /// Directory the generated sources are written under.
    pub output: String,
    pub package_name: String,
    /// Name of the aggregator interface exposing every API group.
    pub root_name: String,
    pub naming: NamingConfig,
}

impl Default for KogConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: "src/main/kotlin".to_string(),
            package_name: "com.example.client".to_string(),
            root_name: "Client".to_string(),
            naming: NamingConfig::default(),
        }
    }
}

impl KogConfig {
    pub fn target(&self) -> TargetConfig {
        TargetConfig {
            package_name: self.package_name.clone(),
            root_name: self.root_name.clone(),
        }
    }
}

/// The part of the configuration the Kotlin generator itself consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetConfig {
    pub package_name: String,
    pub root_name: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        KogConfig::default().target()
    }
}

/// Naming strategy and aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub strategy: NamingStrategy,
    /// Map from resolved operation name (operationId or route-derived) to custom alias.
    pub aliases: IndexMap<String, String>,
}

/// How operation function names are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    #[default]
    UseOperationId,
    UseRouteBased,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".kog.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<KogConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: KogConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# kog configuration
input: openapi.yaml
output: src/main/kotlin
package_name: com.example.client
root_name: Client       # name of the aggregator interface

naming:
  strategy: use_operation_id  # use_operation_id | use_route_based
  aliases: {}
    # createChatCompletion: chat     # operationId -> custom function name
"#
}
