//! The parser session
//!
//!     [`Parser`] owns everything a parse needs: the tokenizer (and through it the scan
//!     state and logs), the options, the session's operator table and the enabled
//!     expression extensions. The grammar is split over several files as `impl Parser`
//!     blocks; this file holds the token plumbing they share and node construction.

use super::operators::OperatorTable;
use super::options::ParseOptions;
use crate::taco::ast::range::{Position, Range};
use crate::taco::ast::{Node, NodeKind};
use crate::taco::error::{ParseError, ParseResult, SyntaxErrorKind};
use crate::taco::lexing::{ScopeFlags, TokenLogs, Tokenizer};
use crate::taco::lexing::IndentUnit;
use crate::taco::plugins::ExpressionExtension;
use crate::taco::token::{Token, TokenKind};
use std::rc::Rc;

/// Deepest expression nesting a parse accepts
pub const MAX_NESTING_DEPTH: usize = 48;

/// Where a node started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub offset: usize,
    pub position: Position,
}

pub struct Parser<'a> {
    pub(crate) tokenizer: Tokenizer<'a>,
    pub(crate) options: ParseOptions,
    pub(crate) operators: OperatorTable,
    pub(crate) extensions: Vec<Rc<dyn ExpressionExtension>>,
    depth: usize,
}

/// Tokens that end an expression without belonging to it
pub(crate) fn is_terminator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Newline
            | TokenKind::Eof
            | TokenKind::Semi
            | TokenKind::Comma
            | TokenKind::Indent
            | TokenKind::Dedent
            | TokenKind::ParenR
            | TokenKind::BracketR
            | TokenKind::BraceR
            | TokenKind::Then
            | TokenKind::Else
    )
}

impl<'a> Parser<'a> {
    pub fn new(
        source: &'a str,
        options: ParseOptions,
        extensions: Vec<Rc<dyn ExpressionExtension>>,
    ) -> Self {
        let file = options.source_file.as_deref().map(Rc::from);
        let mut operators = OperatorTable::builtin();
        for extension in &extensions {
            for (kind, descriptor) in extension.operators() {
                operators.extend(kind, descriptor);
            }
        }
        Self {
            tokenizer: Tokenizer::new(source, file),
            options,
            operators,
            extensions,
            depth: 0,
        }
    }

    pub fn source(&self) -> &'a str {
        self.tokenizer.source()
    }

    pub fn cur(&self) -> &Token {
        self.tokenizer.cur()
    }

    pub fn cur_kind(&self) -> TokenKind {
        self.tokenizer.cur().kind
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.cur_kind() == kind
    }

    pub fn next(&mut self) -> ParseResult<()> {
        self.tokenizer.advance()
    }

    /// Consume the current token if it is `kind`
    pub fn eat(&mut self, kind: TokenKind) -> ParseResult<bool> {
        if self.at(kind) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        if self.eat(kind)? {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Consume a closer, reporting an unclosed group when input ran out
    pub fn expect_close(&mut self, close: TokenKind, open: Marker) -> ParseResult<()> {
        if self.eat(close)? {
            Ok(())
        } else {
            Err(self.unexpected_in_group(close, open))
        }
    }

    pub fn scope(&self) -> ScopeFlags {
        self.tokenizer.state.scope
    }

    pub fn set_scope(&mut self, scope: ScopeFlags) {
        self.tokenizer.state.scope = scope;
    }

    pub fn unexpected(&self) -> ParseError {
        let token = self.cur();
        let (kind, message) = match token.kind {
            TokenKind::Eof => (
                SyntaxErrorKind::UnexpectedToken,
                "Unexpected end of input".to_string(),
            ),
            TokenKind::Indent => (
                SyntaxErrorKind::UnexpectedIndentation,
                "Unexpected indentation".to_string(),
            ),
            TokenKind::Newline => (
                SyntaxErrorKind::UnexpectedToken,
                "Unexpected newline".to_string(),
            ),
            TokenKind::Dedent => (
                SyntaxErrorKind::UnexpectedToken,
                "Unexpected dedent".to_string(),
            ),
            _ => (
                SyntaxErrorKind::UnexpectedToken,
                format!("Unexpected token '{}'", token.text(self.source())),
            ),
        };
        ParseError::syntax(kind, message, token.start(), token.range.start)
    }

    pub fn unexpected_in_group(&self, close: TokenKind, open: Marker) -> ParseError {
        if self.at(TokenKind::Eof) {
            ParseError::syntax(
                SyntaxErrorKind::UnclosedGroup,
                format!("Expected '{}' before end of input", close.code()),
                open.offset,
                open.position,
            )
        } else {
            self.unexpected()
        }
    }

    /// Run `parse` one nesting level deeper, failing past [`MAX_NESTING_DEPTH`]
    pub fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            let token = self.cur();
            return Err(ParseError::syntax(
                SyntaxErrorKind::NestingTooDeep,
                format!("Expression nested deeper than {} levels", MAX_NESTING_DEPTH),
                token.start(),
                token.range.start,
            ));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    pub fn not_implemented(&self, feature: &str) -> ParseError {
        let token = self.cur();
        ParseError::not_implemented(feature, token.start(), token.range.start)
    }

    /// Mark the start of a node at the current token
    pub fn start(&self) -> Marker {
        let token = self.cur();
        Marker {
            offset: token.start(),
            position: token.range.start,
        }
    }

    pub fn start_at(node: &Node) -> Marker {
        Marker {
            offset: node.start(),
            position: node.range.start,
        }
    }

    /// Build a node spanning from `start` to the end of the last consumed token
    pub fn finish(&self, start: Marker, kind: NodeKind) -> Node {
        let state = &self.tokenizer.state;
        let (end, end_position) = if state.last_end >= start.offset {
            (state.last_end, state.last_end_position)
        } else {
            (start.offset, start.position)
        };
        Node::new(kind, Range::new(start.offset..end, start.position, end_position))
    }

    /// Tear the session down into its logs and the indentation unit it found
    pub fn into_parts(self) -> (TokenLogs, Option<IndentUnit>) {
        let unit = self.tokenizer.state.indent_unit.clone();
        (self.tokenizer.into_logs(), unit)
    }
}
