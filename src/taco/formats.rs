//! Output formats for parsed files
//!
//! A [`Formatter`] turns a [`File`] into text. The [`FormatRegistry`] holds them by name
//! so the processor and the binary can pick one from a string.
//!
//! - json: the ESTree tree as pretty printed JSON
//! - yaml: the same tree as YAML
//! - treeviz: one line per node, see [`treeviz`]

pub mod treeviz;

pub use treeviz::{to_treeviz_str, to_treeviz_str_with_params, TreevizFormatter};

use crate::taco::ast::File;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub trait Formatter: Send + Sync {
    fn name(&self) -> &str;

    fn serialize(&self, file: &File) -> Result<String, FormatError>;

    fn description(&self) -> &str {
        ""
    }
}

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, file: &File) -> Result<String, FormatError> {
        serde_json::to_string_pretty(file).map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "ESTree tree as JSON"
    }
}

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn serialize(&self, file: &File) -> Result<String, FormatError> {
        serde_yaml::to_string(file).map_err(|e| FormatError::SerializationError(e.to_string()))
    }

    fn description(&self) -> &str {
        "ESTree tree as YAML"
    }
}

/// Formatters by name
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self {
            formatters: HashMap::new(),
        }
    }

    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn serialize(&self, file: &File, format: &str) -> Result<String, FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.serialize(file)
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(JsonFormatter);
        registry.register(YamlFormatter);
        registry.register(TreevizFormatter);
        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taco::parsing::{parse, ParseOptions};

    #[test]
    fn test_defaults() {
        let registry = FormatRegistry::default();
        assert_eq!(registry.list_formats(), vec!["json", "treeviz", "yaml"]);
        assert!(registry.has("treeviz"));
    }

    #[test]
    fn test_serialize_not_found() {
        let file = parse("a\n", &ParseOptions::default()).unwrap();
        let error = FormatRegistry::default().serialize(&file, "xml").unwrap_err();
        assert_eq!(error, FormatError::FormatNotFound("xml".to_string()));
    }

    #[test]
    fn test_json_has_estree_shape() {
        let file = parse("a\n", &ParseOptions::default()).unwrap();
        let json = FormatRegistry::default().serialize(&file, "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["program"]["type"], "Program");
        assert_eq!(value["program"]["body"][0]["expression"]["name"], "a");
    }

    #[test]
    fn test_yaml_mentions_types() {
        let file = parse("a\n", &ParseOptions::default()).unwrap();
        let yaml = FormatRegistry::default().serialize(&file, "yaml").unwrap();
        assert!(yaml.contains("type: Identifier"));
    }
}
