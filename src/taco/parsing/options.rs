//! Parse options
//!
//! Options deserialize from camelCase JSON, so a `.tacorc`-style object can be handed
//! straight to [`ParseOptions`]:
//!
//!     { "sourceType": "script", "plugins": { "pipeline": true } }

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Strict code: `eval` and `arguments` are not assignable
    #[default]
    Module,
    Script,
}

/// Per-invocation plugin switch: a flag or a configuration object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PluginToggle {
    Enabled(bool),
    Config(serde_json::Value),
}

impl PluginToggle {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, PluginToggle::Enabled(false))
    }

    /// Configuration handed to the plugin; `null` for a bare flag
    pub fn config(&self) -> serde_json::Value {
        match self {
            PluginToggle::Enabled(_) => serde_json::Value::Null,
            PluginToggle::Config(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    pub source_type: SourceType,
    /// Recorded on every token as its source file id
    pub source_file: Option<String>,
    pub plugins: BTreeMap<String, PluginToggle>,
    pub allow_yield_outside_generator: bool,
}

impl ParseOptions {
    pub fn with_plugin(mut self, name: &str) -> Self {
        self.plugins
            .insert(name.to_string(), PluginToggle::Enabled(true));
        self
    }

    pub fn script(mut self) -> Self {
        self.source_type = SourceType::Script;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParseOptions::default();
        assert_eq!(options.source_type, SourceType::Module);
        assert!(options.plugins.is_empty());
        assert!(!options.allow_yield_outside_generator);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let options: ParseOptions = serde_json::from_str(
            r#"{
                "sourceType": "script",
                "sourceFile": "main.taco",
                "plugins": { "pipeline": true, "other": { "level": 2 }, "off": false },
                "allowYieldOutsideGenerator": true
            }"#,
        )
        .unwrap();

        assert_eq!(options.source_type, SourceType::Script);
        assert_eq!(options.source_file.as_deref(), Some("main.taco"));
        assert!(options.plugins["pipeline"].is_enabled());
        assert!(!options.plugins["off"].is_enabled());
        assert_eq!(options.plugins["other"].config()["level"], 2);
        assert!(options.allow_yield_outside_generator);
    }
}
