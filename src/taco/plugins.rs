//! Plugins
//!
//!     A plugin is a named bundle of capabilities. On the parsing side it can provide an
//!     [`ExpressionExtension`]: operator table entries plus two parse hooks (keyword-led
//!     expressions and atomic expressions). On the printing side it can provide a
//!     [`PrinterExtension`]: spacing rules and per-token rendering. Every hook defaults
//!     to "no match", so a plugin implements only what it adds.
//!
//!     Plugins live in a [`PluginRegistry`] in registration order, and that order is the
//!     order their hooks run in. Nothing is enabled globally: each parse and each print
//!     picks its plugins from its own options, and naming a plugin the registry does not
//!     know is a configuration error.
//!
//! Built-in plugins
//!
//!     pipeline    `a |> f`, a BinaryExpression at the lowest binding power

pub mod pipeline;

pub use crate::taco::printing::spacing::PrinterExtension;

use crate::taco::ast::Node;
use crate::taco::error::{ConfigurationError, ParseResult};
use crate::taco::parsing::options::PluginToggle;
use crate::taco::parsing::{OperatorDescriptor, Parser};
use crate::taco::token::TokenKind;
use serde_json::Value;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

/// Parsing half of a plugin
pub trait ExpressionExtension {
    /// Entries added to the operator table of the parser session
    fn operators(&self) -> Vec<(TokenKind, OperatorDescriptor)> {
        Vec::new()
    }

    /// Tried before assignment and operator parsing; `None` falls through
    fn parse_keyword_expression(&self, _parser: &mut Parser<'_>) -> ParseResult<Option<Node>> {
        Ok(None)
    }

    /// Tried for tokens no built-in atomic expression starts with
    fn parse_atomic(&self, _parser: &mut Parser<'_>) -> ParseResult<Option<Node>> {
        Ok(None)
    }
}

pub trait Plugin {
    fn name(&self) -> &str;

    /// The parsing half, configured from the plugin's entry in `ParseOptions::plugins`
    fn expression_extension(
        &self,
        _config: &Value,
    ) -> Result<Option<Rc<dyn ExpressionExtension>>, ConfigurationError> {
        Ok(None)
    }

    fn printer_extension(&self) -> Option<Rc<dyn PrinterExtension>> {
        None
    }
}

#[derive(Default, Clone)]
pub struct PluginRegistry {
    plugins: Vec<Rc<dyn Plugin>>,
}

impl PluginRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Rc::new(pipeline::PipelinePlugin));
        registry
    }

    /// Add a plugin; one with the same name is replaced in place
    pub fn register(&mut self, plugin: Rc<dyn Plugin>) {
        match self.plugins.iter().position(|p| p.name() == plugin.name()) {
            Some(index) => self.plugins[index] = plugin,
            None => self.plugins.push(plugin),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Rc<dyn Plugin>> {
        self.plugins.iter().find(|p| p.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    fn check_known<'n>(&self, names: impl IntoIterator<Item = &'n str>) -> Result<(), ConfigurationError> {
        for name in names {
            if self.get(name).is_none() {
                return Err(ConfigurationError::UnknownPlugin(name.to_string()));
            }
        }
        Ok(())
    }

    /// Expression extensions of the enabled plugins, in registration order
    pub fn expression_extensions(
        &self,
        toggles: &BTreeMap<String, PluginToggle>,
    ) -> Result<Vec<Rc<dyn ExpressionExtension>>, ConfigurationError> {
        self.check_known(toggles.keys().map(String::as_str))?;
        let mut extensions = Vec::new();
        for plugin in &self.plugins {
            let Some(toggle) = toggles.get(plugin.name()) else {
                continue;
            };
            if !toggle.is_enabled() {
                continue;
            }
            if let Some(extension) = plugin.expression_extension(&toggle.config())? {
                debug!(plugin = plugin.name(), "enabled expression extension");
                extensions.push(extension);
            }
        }
        Ok(extensions)
    }

    /// Printer extensions of the named plugins, in registration order
    pub fn printer_extensions(
        &self,
        names: &[String],
    ) -> Result<Vec<Rc<dyn PrinterExtension>>, ConfigurationError> {
        self.check_known(names.iter().map(String::as_str))?;
        Ok(self
            .plugins
            .iter()
            .filter(|plugin| names.iter().any(|name| name == plugin.name()))
            .filter_map(|plugin| plugin.printer_extension())
            .collect())
    }
}
