//! Token buffer
//!
//!     The printer does not write text directly. Generators push [`BufferToken`]s and the
//!     buffer takes care of layout as they arrive:
//!
//!     - a newline materializes pending Indent/Dedent markers so the buffer's logical
//!       depth and the emitted structure agree
//!     - the first content token after a newline is preceded by a `Tab(depth)` token
//!     - between two tokens, the [spacing rules](super::spacing) may insert a space
//!
//!     `indent()` and `dedent()` only move the depth counter, except right after a
//!     newline: there the markers already emitted before that newline are rewritten, so
//!     `newline(); indent();` and `indent(); newline();` produce the same output.
//!
//!     In lossless mode the source trivia supplies all whitespace, so the buffer runs
//!     with automatic layout off: no tabs, no markers and no cosmetic spaces.

use super::spacing::{self, PrinterExtension, Spacing};
use crate::taco::ast::range::{is_line_break, Position, Range};
use crate::taco::error::Warning;
use crate::taco::token::TokenKind;
use std::rc::Rc;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum BufferValue {
    None,
    /// Literal text of the token
    Code(String),
    /// Depth of a `Tab`
    Count(usize),
    /// Original position a `MappingMark` maps to
    Mark(Position),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BufferToken {
    pub kind: TokenKind,
    pub value: BufferValue,
    /// Source range the token was generated from
    pub loc: Option<Range>,
    /// Range before any tree transformation; preferred for source maps
    pub orig_loc: Option<Range>,
}

impl BufferToken {
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            value: BufferValue::None,
            loc: None,
            orig_loc: None,
        }
    }

    pub fn code(kind: TokenKind, code: impl Into<String>) -> Self {
        Self {
            value: BufferValue::Code(code.into()),
            ..Self::new(kind)
        }
    }

    pub fn tab(depth: usize) -> Self {
        Self {
            value: BufferValue::Count(depth),
            ..Self::new(TokenKind::Tab)
        }
    }

    pub fn space() -> Self {
        Self::code(TokenKind::Whitespace, " ")
    }

    pub fn mark(position: Position) -> Self {
        Self {
            value: BufferValue::Mark(position),
            ..Self::new(TokenKind::MappingMark)
        }
    }

    pub fn with_loc(mut self, loc: Range) -> Self {
        self.loc = Some(loc);
        self
    }

    pub fn text(&self) -> Option<&str> {
        match &self.value {
            BufferValue::Code(code) => Some(code),
            _ => None,
        }
    }

    /// Number of line breaks the rendered token will contain
    fn line_breaks(&self) -> usize {
        match (&self.value, self.kind) {
            (BufferValue::Code(code), _) => {
                code.replace("\r\n", "\n").chars().filter(|c| is_line_break(*c)).count()
            }
            (_, TokenKind::Newline) => 1,
            _ => 0,
        }
    }
}

/// Shorthand: fixed-spelling tokens by their code, anything else as a name
impl From<&str> for BufferToken {
    fn from(code: &str) -> Self {
        match TokenKind::from_code(code) {
            Some(kind) => BufferToken::new(kind),
            None => BufferToken::code(TokenKind::Name, code),
        }
    }
}

impl From<TokenKind> for BufferToken {
    fn from(kind: TokenKind) -> Self {
        BufferToken::new(kind)
    }
}

fn is_layout(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Tab
            | TokenKind::Newline
            | TokenKind::Whitespace
            | TokenKind::Indent
            | TokenKind::Dedent
    )
}

pub struct TokenBuffer {
    tokens: Vec<BufferToken>,
    depth: usize,
    emitted_depth: usize,
    line: usize,
    compact: bool,
    automatic_layout: bool,
    extensions: Vec<Rc<dyn PrinterExtension>>,
    warnings: Vec<Warning>,
}

impl TokenBuffer {
    pub fn new(compact: bool, extensions: Vec<Rc<dyn PrinterExtension>>) -> Self {
        Self {
            tokens: vec![BufferToken::tab(0)],
            depth: 0,
            emitted_depth: 0,
            line: 1,
            compact,
            automatic_layout: true,
            extensions,
            warnings: Vec::new(),
        }
    }

    /// A buffer that takes whitespace only from the tokens pushed into it
    pub fn verbatim(extensions: Vec<Rc<dyn PrinterExtension>>) -> Self {
        Self {
            automatic_layout: false,
            ..Self::new(true, extensions)
        }
    }

    pub fn tokens(&self) -> &[BufferToken] {
        &self.tokens
    }

    pub fn extensions(&self) -> &[Rc<dyn PrinterExtension>] {
        &self.extensions
    }

    /// 1-based line the next token lands on
    pub fn current_line(&self) -> usize {
        self.line
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_parts(self) -> (Vec<BufferToken>, Vec<Warning>) {
        (self.tokens, self.warnings)
    }

    fn last_index(&self) -> Option<usize> {
        self.tokens
            .iter()
            .rposition(|t| t.kind != TokenKind::MappingMark)
    }

    /// Last token that is not a mapping mark
    pub fn last(&self) -> Option<&BufferToken> {
        self.last_index().map(|i| &self.tokens[i])
    }

    pub fn is_last_kind(&self, kind: TokenKind) -> bool {
        self.last().is_some_and(|t| t.kind == kind)
    }

    pub fn last_is_newline(&self) -> bool {
        self.is_last_kind(TokenKind::Newline)
    }

    pub fn push(&mut self, token: impl Into<BufferToken>) {
        let token = token.into();
        if token.kind == TokenKind::MappingMark {
            if !self.is_redundant_mark(&token) {
                self.tokens.push(token);
            }
            return;
        }

        if self.automatic_layout {
            if token.kind != TokenKind::Newline && self.is_last_kind(TokenKind::LineComment) {
                self.push(TokenKind::Newline);
            }
            if token.kind == TokenKind::Newline {
                self.insert_indent_markers();
            } else if self.last_is_newline() {
                self.tokens.push(BufferToken::tab(self.depth));
            }
            if !self.insert_space(&token, Spacing::Mandatory) && !self.compact {
                self.insert_space(&token, Spacing::Cosmetic);
            }
        }

        self.line += token.line_breaks();
        self.tokens.push(token);
    }

    pub fn push_all<T: Into<BufferToken>>(&mut self, tokens: impl IntoIterator<Item = T>) {
        for token in tokens {
            self.push(token);
        }
    }

    /// Push a newline unless the buffer already ends with one
    pub fn newline(&mut self, force: bool) {
        if force || !self.last_is_newline() {
            self.push(TokenKind::Newline);
        }
    }

    pub fn indent(&mut self) {
        self.depth += 1;
        self.reflow_trailing_newline();
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.reflow_trailing_newline();
    }

    fn reflow_trailing_newline(&mut self) {
        if !self.automatic_layout || !self.last_is_newline() {
            return;
        }
        let Some(index) = self.last_index() else {
            return;
        };
        let newline = self.tokens.remove(index);
        self.insert_indent_markers();
        self.tokens.push(newline);
    }

    fn insert_indent_markers(&mut self) {
        while self.emitted_depth < self.depth {
            self.tokens.push(BufferToken::new(TokenKind::Indent));
            self.emitted_depth += 1;
        }
        while self.emitted_depth > self.depth {
            self.tokens.push(BufferToken::new(TokenKind::Dedent));
            self.emitted_depth -= 1;
        }
    }

    fn is_redundant_mark(&self, mark: &BufferToken) -> bool {
        self.tokens
            .last()
            .is_some_and(|last| last.kind == TokenKind::MappingMark && last.value == mark.value)
    }

    fn insert_space(&mut self, right: &BufferToken, spacing: Spacing) -> bool {
        let Some(left) = self.last() else {
            return false;
        };
        if is_layout(left.kind) || is_layout(right.kind) {
            return false;
        }
        if self.wants_space(left, right, spacing) {
            self.tokens.push(BufferToken::space());
            return true;
        }
        false
    }

    fn wants_space(&self, left: &BufferToken, right: &BufferToken, spacing: Spacing) -> bool {
        if spacing::space_after(spacing, left.kind).is_some_and(|t| t.fires(left, right)) {
            return true;
        }
        if spacing::space_when_after(spacing, right.kind, left.kind)
            .is_some_and(|t| t.fires(left, right))
        {
            return true;
        }
        self.extensions.iter().any(|extension| {
            extension
                .space_after(spacing, left.kind)
                .is_some_and(|t| t.fires(left, right))
                || extension
                    .space_when_after(spacing, right.kind, left.kind)
                    .is_some_and(|t| t.fires(left, right))
        })
    }

    /// End the output with exactly one newline
    pub fn flush(&mut self) {
        if !self.last_is_newline() {
            warn!("last token is not a newline");
            self.warnings
                .push(Warning::new("Last token is not a newline", None));
            self.newline(true);
            return;
        }
        while let Some(last) = self.last_index() {
            let previous = self.tokens[..last].iter().rposition(|t| {
                !matches!(
                    t.kind,
                    TokenKind::Tab | TokenKind::Indent | TokenKind::Dedent | TokenKind::MappingMark
                )
            });
            match previous {
                Some(previous) if self.tokens[previous].kind == TokenKind::Newline => {
                    self.tokens.drain(previous + 1..=last);
                    self.line -= 1;
                }
                _ => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(buffer: &TokenBuffer) -> Vec<TokenKind> {
        buffer.tokens().iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_shorthand_push() {
        let mut buffer = TokenBuffer::new(true, Vec::new());
        buffer.push("foo");
        buffer.push("(");
        buffer.push(")");
        assert_eq!(
            kinds(&buffer),
            vec![
                TokenKind::Tab,
                TokenKind::Name,
                TokenKind::ParenL,
                TokenKind::ParenR
            ]
        );
    }

    fn rendered(buffer: &TokenBuffer) -> Vec<String> {
        buffer
            .tokens()
            .iter()
            .map(|t| match &t.value {
                BufferValue::Code(code) => code.clone(),
                _ => format!("{:?}", t.kind),
            })
            .collect()
    }

    #[test]
    fn test_mandatory_space_survives_compact() {
        let mut buffer = TokenBuffer::new(true, Vec::new());
        buffer.push("if");
        buffer.push("a");
        buffer.push(",");
        buffer.push("b");
        assert_eq!(rendered(&buffer), vec!["Tab", "If", " ", "a", "Comma", "b"]);
    }

    #[test]
    fn test_cosmetic_spaces() {
        let mut buffer = TokenBuffer::new(false, Vec::new());
        buffer.push("a");
        buffer.push(",");
        buffer.push("b");
        buffer.push("+");
        buffer.push("c");
        assert_eq!(
            rendered(&buffer),
            vec!["Tab", "a", "Comma", " ", "b", " ", "Plus", " ", "c"]
        );
    }

    #[test]
    fn test_indent_after_newline_is_rewritten() {
        let mut buffer = TokenBuffer::new(false, Vec::new());
        buffer.push("a");
        buffer.newline(false);
        buffer.indent();
        buffer.push("b");
        buffer.newline(false);
        buffer.dedent();
        assert_eq!(
            kinds(&buffer),
            vec![
                TokenKind::Tab,
                TokenKind::Name,
                TokenKind::Indent,
                TokenKind::Newline,
                TokenKind::Tab,
                TokenKind::Name,
                TokenKind::Dedent,
                TokenKind::Newline,
            ]
        );
        assert_eq!(buffer.tokens()[4].value, BufferValue::Count(1));
        assert_eq!(buffer.current_line(), 3);
    }

    #[test]
    fn test_newline_is_not_doubled() {
        let mut buffer = TokenBuffer::new(false, Vec::new());
        buffer.push("a");
        buffer.newline(false);
        buffer.newline(false);
        assert_eq!(buffer.current_line(), 2);
        buffer.newline(true);
        assert_eq!(buffer.current_line(), 3);
    }

    #[test]
    fn test_flush_adds_missing_newline() {
        let mut buffer = TokenBuffer::new(false, Vec::new());
        buffer.push("a");
        buffer.flush();
        assert!(buffer.last_is_newline());
        assert_eq!(buffer.warnings().len(), 1);
        assert_eq!(buffer.warnings()[0].message, "Last token is not a newline");
    }

    #[test]
    fn test_flush_trims_trailing_newlines() {
        let mut buffer = TokenBuffer::new(false, Vec::new());
        buffer.push("a");
        buffer.newline(true);
        buffer.newline(true);
        buffer.newline(true);
        buffer.flush();
        assert_eq!(kinds(&buffer), vec![TokenKind::Tab, TokenKind::Name, TokenKind::Newline]);
        assert!(buffer.warnings().is_empty());
    }

    #[test]
    fn test_redundant_marks_collapse() {
        let mut buffer = TokenBuffer::new(false, Vec::new());
        buffer.push(BufferToken::mark(Position::new(1, 0)));
        buffer.push(BufferToken::mark(Position::new(1, 0)));
        assert_eq!(buffer.tokens().len(), 2);
    }

    #[test]
    fn test_line_comment_ends_the_line() {
        let mut buffer = TokenBuffer::new(false, Vec::new());
        buffer.push("a");
        buffer.push(BufferToken::code(TokenKind::LineComment, "# note"));
        buffer.push("b");
        assert_eq!(
            rendered(&buffer),
            vec!["Tab", "a", " ", "# note", "Newline", "Tab", "b"]
        );
    }

    #[test]
    fn test_verbatim_buffer_adds_nothing() {
        let mut buffer = TokenBuffer::verbatim(Vec::new());
        buffer.push("a");
        buffer.push("+");
        buffer.push(TokenKind::Newline);
        buffer.push("b");
        assert_eq!(
            kinds(&buffer),
            vec![
                TokenKind::Tab,
                TokenKind::Name,
                TokenKind::Plus,
                TokenKind::Newline,
                TokenKind::Name
            ]
        );
    }
}
