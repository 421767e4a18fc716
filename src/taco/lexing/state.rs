//! Lexer state and snapshots
//!
//!     [`ScanState`] is every scalar and stack the tokenizer and parser mutate while
//!     moving through the input. It is plain data and cheap to clone, which is what a
//!     [`Snapshot`] is: a clone of the scan state plus the lengths the append-only logs had
//!     at that moment.
//!
//! Backtracking
//!
//!     The logs ([`TokenLogs`]) are not cloned. Restoring a snapshot truncates them back to
//!     the recorded lengths, so entries appended during an abandoned speculative parse are
//!     dropped and the logs read as if the attempt never ran.

use super::context::Context;
use super::indentation::IndentUnit;
use crate::taco::ast::comment::Comment;
use crate::taco::ast::range::{Position, Range};
use crate::taco::error::Warning;
use crate::taco::token::{Token, TokenKind, TokenValue};

/// Scope flags the grammar consults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeFlags {
    pub in_function: bool,
    pub in_generator: bool,
    pub in_async: bool,
    pub in_for_header: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Lf,
    CrLf,
    Cr,
}

#[derive(Debug, Clone)]
pub struct ScanState {
    pub pos: usize,
    /// 1-based line of `pos`
    pub line: usize,
    /// Byte offset where the current line starts
    pub line_start: usize,
    /// Current indentation level, in units
    pub indentation: usize,
    pub indent_unit: Option<IndentUnit>,
    /// Set right after a newline token; blank lines are trivia until content shows up
    pub at_line_start: bool,
    pub context: Vec<Context>,
    pub expr_allowed: bool,
    /// Kind of the last significant token scanned (which may be the lookahead)
    pub last_kind: TokenKind,
    pub prev: Token,
    pub cur: Token,
    pub next: Option<Token>,
    /// End of the last consumed token that is not layout
    pub last_end: usize,
    pub last_end_position: Position,
    /// Start offset of a `(` that may open arrow function parameters
    pub potential_lambda_at: Option<usize>,
    pub scope: ScopeFlags,
    pub line_ending: Option<LineEnding>,
    pub mixed_line_endings: bool,
}

impl ScanState {
    pub fn new() -> Self {
        let eof = Token::new(TokenKind::Eof, TokenValue::None, Range::default());
        Self {
            pos: 0,
            line: 1,
            line_start: 0,
            indentation: 0,
            indent_unit: None,
            at_line_start: true,
            context: vec![Context::Statement],
            expr_allowed: true,
            last_kind: TokenKind::Newline,
            prev: eof.clone(),
            cur: eof,
            next: None,
            last_end: 0,
            last_end_position: Position::default(),
            potential_lambda_at: None,
            scope: ScopeFlags::default(),
            line_ending: None,
            mixed_line_endings: false,
        }
    }

    pub fn context_top(&self) -> Context {
        self.context.last().copied().unwrap_or(Context::Statement)
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.pos - self.line_start)
    }
}

impl Default for ScanState {
    fn default() -> Self {
        Self::new()
    }
}

/// Append-only logs filled while scanning
#[derive(Debug, Clone, Default)]
pub struct TokenLogs {
    /// Tokens handed to the parser, layout tokens included
    pub tokens: Vec<Token>,
    /// Every source element in order: significant tokens, layout tokens and trivia
    pub elements: Vec<Token>,
    pub comments: Vec<Comment>,
    pub warnings: Vec<Warning>,
}

/// Saved scan state plus the log lengths at the time it was taken
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub(crate) state: ScanState,
    pub(crate) tokens: usize,
    pub(crate) elements: usize,
    pub(crate) comments: usize,
    pub(crate) warnings: usize,
}

impl TokenLogs {
    pub(crate) fn snapshot(&self, state: &ScanState) -> Snapshot {
        Snapshot {
            state: state.clone(),
            tokens: self.tokens.len(),
            elements: self.elements.len(),
            comments: self.comments.len(),
            warnings: self.warnings.len(),
        }
    }

    pub(crate) fn truncate_to(&mut self, snapshot: &Snapshot) {
        self.tokens.truncate(snapshot.tokens);
        self.elements.truncate(snapshot.elements);
        self.comments.truncate(snapshot.comments);
        self.warnings.truncate(snapshot.warnings);
    }
}
