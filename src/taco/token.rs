//! Tokens
//!
//!     A [`Token`] is what the tokenizer hands to the parser and what it appends to the
//!     source element log: a kind, an optional value payload, its source range and the id
//!     of the source file it came from.
//!
//!     Tokens are values. Nothing mutates a token once the tokenizer has produced it; when
//!     the parser needs a keyword to act as a name (`a.if`), it builds a new token with
//!     [`Token::as_name`] and leaves the lookahead slot alone.

pub mod kind;
pub mod raw;

pub use kind::TokenKind;

use crate::taco::ast::range::Range;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Payload carried by value tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum TokenValue {
    #[default]
    None,
    Name(String),
    Number(f64),
    String(String),
    Template {
        raw: String,
        cooked: Option<String>,
    },
    Regexp {
        pattern: String,
        flags: String,
    },
    Comment(String),
}

impl TokenValue {
    pub fn is_none(&self) -> bool {
        matches!(self, TokenValue::None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "TokenValue::is_none")]
    pub value: TokenValue,
    #[serde(flatten)]
    pub range: Range,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<Rc<str>>,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, range: Range) -> Self {
        Self {
            kind,
            value,
            range,
            source_file: None,
        }
    }

    pub fn start(&self) -> usize {
        self.range.span.start
    }

    pub fn end(&self) -> usize {
        self.range.span.end
    }

    /// Source text of the token
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.range.span.clone()).unwrap_or("")
    }

    /// A copy of this token re-kinded as a name.
    ///
    /// Used when a keyword appears where only a name makes sense; the original token
    /// stays untouched so a snapshot taken earlier still sees the keyword.
    pub fn as_name(&self) -> Token {
        let name = match &self.value {
            TokenValue::Name(name) => name.clone(),
            _ => self.kind.code().to_string(),
        };
        Token {
            kind: TokenKind::Name,
            value: TokenValue::Name(name),
            range: self.range.clone(),
            source_file: self.source_file.clone(),
        }
    }

    /// Name payload, or the keyword spelling for keyword tokens
    pub fn name(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Name(name) => Some(name),
            _ if self.kind.is_keyword() => Some(self.kind.code()),
            _ => None,
        }
    }
}
