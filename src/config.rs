use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Markers and namespaces driving extraction.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Java package prefix used when a type carries no class directive.
    pub package_prefix: String,
    /// Directive sentinel looked for in type doc comments.
    pub sentinel: String,
    /// Underlying type name marking a type alias as a java enum.
    pub marker: String,
    /// Identifier meaning "ignore this declared name".
    pub discard: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            package_prefix: String::new(),
            sentinel: "//go:hessian".to_string(),
            marker: "JavaEnum".to_string(),
            discard: "_".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Suffix appended to the lower-cased type name to form the
    /// generated file name, next to the source file.
    pub suffix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: "_enum.go".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    Directory { path: PathBuf },
    Glob { pattern: String },
}

impl Config {
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
