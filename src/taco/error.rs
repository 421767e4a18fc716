//! Error types for parsing and printing
//!
//!     Fatal failures unwind the whole call; there is no partial tree. Syntax errors and
//!     not-implemented placeholders are separate variants so callers can tell invalid
//!     input from input that uses a construct this core leaves to extensions.
//!
//!     [`Warning`]s are collected on the parse result or the print output and never abort.

use crate::taco::ast::range::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyntaxErrorKind {
    UnexpectedToken,
    UnexpectedCharacter,
    InconsistentIndentation,
    UnexpectedIndentation,
    UnclosedGroup,
    InvalidLeftHandSide,
    UnterminatedString,
    UnterminatedTemplate,
    UnterminatedComment,
    UnterminatedRegExp,
    InvalidYield,
    NestingTooDeep,
}

/// A missing or contradictory option, raised before any work is done
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("sourceFileName must be set when generating source maps")]
    MissingSourceFileName,
    #[error("unknown plugin '{0}'")]
    UnknownPlugin(String),
    #[error("invalid configuration for plugin '{name}': {reason}")]
    InvalidPluginConfig { name: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{message} ({position})")]
    Syntax {
        kind: SyntaxErrorKind,
        message: String,
        offset: usize,
        position: Position,
    },
    #[error("Not implemented: {feature} ({position})")]
    NotImplemented {
        feature: String,
        offset: usize,
        position: Position,
    },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    pub fn syntax(
        kind: SyntaxErrorKind,
        message: impl Into<String>,
        offset: usize,
        position: Position,
    ) -> Self {
        ParseError::Syntax {
            kind,
            message: message.into(),
            offset,
            position,
        }
    }

    pub fn not_implemented(feature: impl Into<String>, offset: usize, position: Position) -> Self {
        ParseError::NotImplemented {
            feature: feature.into(),
            offset,
            position,
        }
    }

    /// Kind of a syntax error, `None` for the other variants
    pub fn syntax_kind(&self) -> Option<SyntaxErrorKind> {
        match self {
            ParseError::Syntax { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_not_implemented(&self) -> bool {
        matches!(self, ParseError::NotImplemented { .. })
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            ParseError::Syntax { position, .. } | ParseError::NotImplemented { position, .. } => {
                Some(*position)
            }
            ParseError::Configuration(_) => None,
        }
    }

    /// The error message followed by the numbered source lines around it
    pub fn render_with_source(&self, source: &str) -> String {
        match self.position() {
            Some(position) => format!("{}\n\n{}", self, format_source_context(source, position)),
            None => self.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrintError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Non-fatal diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Warning {
    pub fn new(message: impl Into<String>, position: Option<Position>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(f, "warning: {} ({})", self.message, position),
            None => write!(f, "warning: {}", self.message),
        }
    }
}

/// Format source code context around an error position
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// All lines are numbered for easy reference.
pub fn format_source_context(source: &str, position: Position) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let error_line = position.line.saturating_sub(1);

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();

    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let error = ParseError::syntax(
            SyntaxErrorKind::UnexpectedToken,
            "Unexpected token",
            4,
            Position::new(2, 1),
        );
        assert_eq!(error.to_string(), "Unexpected token (2:1)");
        assert_eq!(error.syntax_kind(), Some(SyntaxErrorKind::UnexpectedToken));
        assert!(!error.is_not_implemented());
    }

    #[test]
    fn test_not_implemented_is_distinct() {
        let error = ParseError::not_implemented("prefix operators", 0, Position::new(1, 0));
        assert!(error.is_not_implemented());
        assert_eq!(error.syntax_kind(), None);
    }

    #[test]
    fn test_configuration_message() {
        let error = PrintError::from(ConfigurationError::MissingSourceFileName);
        assert_eq!(
            error.to_string(),
            "sourceFileName must be set when generating source maps"
        );
    }

    #[test]
    fn test_format_source_context() {
        let source = "line 1\nline 2\nline 3\nerror line\nline 5\nline 6\nline 7";
        let context = format_source_context(source, Position::new(4, 0));

        assert!(context.contains("line 2"));
        assert!(context.contains(">>   4 | error line"));
        assert!(context.contains("line 6"));
        assert!(!context.contains("line 7"));
        assert!(!context.contains("line 1"));
    }
}
