//! # tacoscript
//!
//! Parsing and printing core for tacoscript, an indentation-significant expression
//! language that compiles to javascript.
//!
//! The pipeline is: source text, [tokenizer](taco::lexing), [parser](taco::parsing),
//! [comment attachment](taco::comments) and finally the [printer](taco::printing),
//! which can reproduce the input byte for byte or reformat it.
//!
//! ## Testing
//!
//! Assertion helpers for trees live in the [testing module](taco::testing).

pub mod taco;

pub use taco::ast::{File, Node, NodeKind};
pub use taco::error::{ConfigurationError, ParseError, PrintError, Warning};
pub use taco::parsing::{parse, parse_with_registry, ParseOptions, SourceType};
pub use taco::printing::{print, PrintOptions, PrintOutput};
