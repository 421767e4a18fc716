//! Parsing module for tacoscript
//!
//! This module provides the processing pipeline from source text to a [`File`]:
//! 1. **Lexing**: the [tokenizer](crate::taco::lexing) produces tokens on demand
//! 2. **Parsing**: recursive descent with precedence climbing builds the tree
//! 3. **Comment attachment**: the [postprocessor](crate::taco::comments) moves comments
//!    from the flat table onto nodes
//!
//! ## Parser Layout
//!
//! - parser.rs: the [`Parser`] session, token plumbing and node construction
//! - expressions.rs: expressions from sequences down to atoms
//! - operators.rs: the operator table
//! - patterns.rs: binding patterns and the shared list parser
//! - literals.rs: literals, templates and arrays
//! - statements.rs: the program and expression statements
//! - options.rs: [`ParseOptions`]
//!
//! ## Extensions
//!
//! Plugins reach into a parse through [`ExpressionExtension`](crate::taco::plugins::ExpressionExtension):
//! operator table entries, a keyword-led expression hook and an atomic expression hook.
//! Each parse resolves its own set from `options.plugins`, so nothing is global.

pub mod expressions;
pub mod literals;
pub mod operators;
pub mod options;
pub mod parser;
pub mod patterns;
pub mod statements;

pub use operators::{OperatorDescriptor, OperatorNode, OperatorTable};
pub use options::{ParseOptions, PluginToggle, SourceType};
pub use parser::{Marker, Parser};

use crate::taco::ast::File;
use crate::taco::comments;
use crate::taco::error::ParseError;
use crate::taco::plugins::PluginRegistry;
use tracing::debug;

/// Parse source text with the built-in plugins available
pub fn parse(source: &str, options: &ParseOptions) -> Result<File, ParseError> {
    parse_with_registry(source, options, &PluginRegistry::with_builtins())
}

/// Parse source text, resolving `options.plugins` against `registry`
pub fn parse_with_registry(
    source: &str,
    options: &ParseOptions,
    registry: &PluginRegistry,
) -> Result<File, ParseError> {
    let extensions = registry.expression_extensions(&options.plugins)?;
    let mut parser = Parser::new(source, options.clone(), extensions);
    let mut program = parser.parse_top_level()?;
    let (logs, indentation) = parser.into_parts();

    comments::attach(&mut program, &logs.comments);
    debug!(
        tokens = logs.tokens.len(),
        elements = logs.elements.len(),
        comments = logs.comments.len(),
        warnings = logs.warnings.len(),
        "parsed source"
    );

    Ok(File {
        program,
        comments: logs.comments,
        tokens: logs.elements,
        indentation,
        warnings: logs.warnings,
    })
}
