//! Plugins from outside the crate: parse hooks, printer hooks and the registry

use serde_json::json;
use std::rc::Rc;
use tacoscript::taco::error::{ParseResult, SyntaxErrorKind};
use tacoscript::taco::parsing::{Parser, PluginToggle};
use tacoscript::taco::plugins::{ExpressionExtension, Plugin, PluginRegistry, PrinterExtension};
use tacoscript::taco::printing::{print_with_registry, BufferToken};
use tacoscript::taco::testing::{assert_node, parse_err};
use tacoscript::taco::token::TokenKind;
use tacoscript::{
    parse, parse_with_registry, ConfigurationError, Node, NodeKind, ParseError, ParseOptions,
    PrintOptions,
};

/// Reads a bare `pass` as the identifier `pass`
struct PassAsName;

impl ExpressionExtension for PassAsName {
    fn parse_atomic(&self, parser: &mut Parser<'_>) -> ParseResult<Option<Node>> {
        if !parser.at(TokenKind::Pass) {
            return Ok(None);
        }
        let start = parser.start();
        parser.next()?;
        Ok(Some(parser.finish(
            start,
            NodeKind::Identifier {
                name: "pass".to_string(),
            },
        )))
    }
}

struct PassPlugin;

impl Plugin for PassPlugin {
    fn name(&self) -> &str {
        "pass-name"
    }

    fn expression_extension(
        &self,
        _config: &serde_json::Value,
    ) -> Result<Option<Rc<dyn ExpressionExtension>>, ConfigurationError> {
        Ok(Some(Rc::new(PassAsName)))
    }
}

/// Prints names in upper case
struct Shout;

impl PrinterExtension for Shout {
    fn to_code(&self, token: &BufferToken) -> Option<String> {
        if token.kind != TokenKind::Name {
            return None;
        }
        token.text().map(str::to_uppercase)
    }
}

struct ShoutPlugin;

impl Plugin for ShoutPlugin {
    fn name(&self) -> &str {
        "shout"
    }

    fn printer_extension(&self) -> Option<Rc<dyn PrinterExtension>> {
        Some(Rc::new(Shout))
    }
}

fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::with_builtins();
    registry.register(Rc::new(PassPlugin));
    registry.register(Rc::new(ShoutPlugin));
    registry
}

#[test]
fn test_atomic_hook_runs_only_when_enabled() {
    assert_eq!(
        parse_err("pass\n").syntax_kind(),
        Some(SyntaxErrorKind::UnexpectedToken)
    );

    let options = ParseOptions::default().with_plugin("pass-name");
    let file = parse_with_registry("f(pass)\n", &options, &registry()).unwrap();
    assert_node(file.expression(0).unwrap()).child(1, |argument| {
        argument.kind("Identifier").name("pass");
    });
}

#[test]
fn test_plugin_state_is_per_parse() {
    let registry = registry();
    let enabled = ParseOptions::default().with_plugin("pass-name");
    assert!(parse_with_registry("pass\n", &enabled, &registry).is_ok());
    assert!(parse_with_registry("pass\n", &ParseOptions::default(), &registry).is_err());
}

#[test]
fn test_unknown_plugin_is_a_configuration_error() {
    let error = parse("a\n", &ParseOptions::default().with_plugin("nope")).unwrap_err();
    assert_eq!(
        error,
        ParseError::Configuration(ConfigurationError::UnknownPlugin("nope".to_string()))
    );
}

#[test]
fn test_plugin_config_from_options() {
    let mut options = ParseOptions::default();
    options.plugins.insert(
        "pipeline".to_string(),
        PluginToggle::Config(json!({ "proposal": "minimal" })),
    );
    assert!(parse("a |> f\n", &options).is_ok());

    options.plugins.insert(
        "pipeline".to_string(),
        PluginToggle::Config(json!({ "proposal": "fsharp" })),
    );
    assert!(matches!(
        parse("a |> f\n", &options),
        Err(ParseError::Configuration(
            ConfigurationError::InvalidPluginConfig { .. }
        ))
    ));
}

#[test]
fn test_printer_extension_rendering() {
    let source = "a + b\n";
    let file = parse(source, &ParseOptions::default()).unwrap();
    let options = PrintOptions {
        plugins: vec!["shout".to_string()],
        ..PrintOptions::reformat()
    };
    let output = print_with_registry(&file, source, &options, &registry()).unwrap();
    assert_eq!(output.code, "A + B\n");
}

#[test]
fn test_pipeline_round_trip() {
    let source = "x |> f |> g\n";
    let options = ParseOptions::default().with_plugin("pipeline");
    let file = parse(source, &options).unwrap();
    assert_node(file.expression(0).unwrap())
        .kind("BinaryExpression")
        .operator("|>")
        .child(0, |left| {
            left.kind("BinaryExpression");
        });

    let lossless = tacoscript::print(&file, source, &PrintOptions::default()).unwrap();
    assert_eq!(lossless.code, source);
}
