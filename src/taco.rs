//! Main module for tacoscript library functionality

pub mod ast;
pub mod comments;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod parsing;
pub mod plugins;
pub mod printing;
pub mod processor;
pub mod testing;
pub mod token;
