//! Testing utilities for tacoscript trees
//!
//! Two tools cover most parser and printer tests:
//!
//! 1. The parse helpers ([`parse_ok`], [`parse_err`], [`parse_expression`]) fail the test
//!    with a rendered error instead of returning a `Result`.
//! 2. [`assert_node`] and [`assert_file`] walk the tree fluently, each step adding to a
//!    context path (`body[0].expression.left`) that shows up in failure messages:
//!
//! ```rust,ignore
//! use tacoscript::taco::testing::{assert_node, parse_expression};
//!
//! let node = parse_expression("a + b * c\n");
//! assert_node(&node)
//!     .kind("BinaryExpression")
//!     .operator("+")
//!     .child(1, |right| {
//!         right.kind("BinaryExpression").operator("*");
//!     });
//! ```
//!
//! Text output is compared with [`TextMatch`] or [`assert_text_eq`], which reports a
//! line-by-line diff.

pub mod assertions;
pub mod matchers;

pub use assertions::{assert_file, assert_node, FileAssertion, NodeAssertion};
pub use matchers::{assert_text_eq, diff_text, TextMatch};

use crate::taco::ast::{File, Node};
use crate::taco::error::ParseError;
use crate::taco::parsing::{parse, ParseOptions};

/// Parse with default options, panicking with the rendered error on failure
pub fn parse_ok(source: &str) -> File {
    parse_ok_with(source, &ParseOptions::default())
}

pub fn parse_ok_with(source: &str, options: &ParseOptions) -> File {
    match parse(source, options) {
        Ok(file) => file,
        Err(error) => panic!(
            "Expected {:?} to parse:\n{}",
            source,
            error.render_with_source(source)
        ),
    }
}

/// Parse with default options, panicking if the parse succeeds
pub fn parse_err(source: &str) -> ParseError {
    parse_err_with(source, &ParseOptions::default())
}

pub fn parse_err_with(source: &str, options: &ParseOptions) -> ParseError {
    match parse(source, options) {
        Ok(file) => panic!(
            "Expected {:?} to fail, but it parsed to {} statements",
            source,
            file.statements().len()
        ),
        Err(error) => error,
    }
}

/// The expression of the first statement
pub fn parse_expression(source: &str) -> Node {
    let file = parse_ok(source);
    match file.expression(0) {
        Some(expression) => expression.clone(),
        None => panic!("Expected {:?} to contain an expression statement", source),
    }
}
