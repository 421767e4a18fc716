//! Source catch-up for lossless printing
//!
//!     The parser's element log holds every significant token, layout token and piece of
//!     trivia in source order, and together they cover the source text. When the
//!     generator is about to emit a token, the cursor walks forward to the matching log
//!     element and pushes everything in between (whitespace, blank lines, comments) as
//!     verbatim tokens, then the token itself with its source text and location.
//!
//!     Indent and Dedent are zero-width and skipped. A significant element the generator
//!     did not ask for is replayed verbatim, so the output stays byte-identical to the
//!     source even when the walk and the log disagree; the disagreement is traced.

use super::buffer::{BufferToken, TokenBuffer};
use crate::taco::token::{Token, TokenKind};
use tracing::trace;

pub struct CatchUp<'a> {
    source: &'a str,
    elements: &'a [Token],
    index: usize,
    /// Source bytes already pushed
    offset: usize,
}

fn matches_kind(element: TokenKind, expected: TokenKind) -> bool {
    element == expected || (expected == TokenKind::Name && element.is_keyword())
}

fn is_skippable(kind: TokenKind) -> bool {
    kind.is_trivia() || kind.is_indentation()
}

impl<'a> CatchUp<'a> {
    pub fn new(source: &'a str, elements: &'a [Token]) -> Self {
        Self {
            source,
            elements,
            index: 0,
            offset: 0,
        }
    }

    /// Index of the next significant element
    fn next_significant(&self) -> Option<usize> {
        (self.index..self.elements.len()).find(|&i| !is_skippable(self.elements[i].kind))
    }

    /// Whether the next significant element has the given kind
    pub fn at(&self, kind: TokenKind) -> bool {
        self.next_significant()
            .is_some_and(|i| matches_kind(self.elements[i].kind, kind))
    }

    /// Emit the next token of `kind` with everything that precedes it.
    ///
    /// Returns false when the log holds no such token; nothing is pushed then.
    pub fn emit(&mut self, buffer: &mut TokenBuffer, kind: TokenKind) -> bool {
        let found = (self.index..self.elements.len())
            .find(|&i| matches_kind(self.elements[i].kind, kind));
        let Some(found) = found else {
            trace!(?kind, offset = self.offset, "catch-up found no matching token");
            return false;
        };
        while self.index < found {
            let element = &self.elements[self.index];
            if !is_skippable(element.kind) {
                trace!(
                    expected = ?kind,
                    skipped = ?element.kind,
                    offset = element.start(),
                    "catch-up out of step with the tree"
                );
            }
            self.replay(buffer, self.index);
            self.index += 1;
        }
        self.replay(buffer, found);
        self.index = found + 1;
        true
    }

    /// Emit `kind` only if it is the next significant token
    pub fn optional(&mut self, buffer: &mut TokenBuffer, kind: TokenKind) -> bool {
        self.at(kind) && self.emit(buffer, kind)
    }

    /// Replay the rest of the log and any uncovered source text
    pub fn finish(&mut self, buffer: &mut TokenBuffer) {
        while self.index < self.elements.len() {
            self.replay(buffer, self.index);
            self.index += 1;
        }
        self.fill_gap(buffer, self.source.len());
    }

    fn fill_gap(&mut self, buffer: &mut TokenBuffer, until: usize) {
        if until > self.offset {
            if let Some(text) = self.source.get(self.offset..until) {
                buffer.push(BufferToken::code(TokenKind::Whitespace, text));
            }
            self.offset = until;
        }
    }

    fn replay(&mut self, buffer: &mut TokenBuffer, index: usize) {
        let element = &self.elements[index];
        if element.kind.is_indentation() || element.end() <= self.offset {
            return;
        }
        self.fill_gap(buffer, element.start());
        let text = element.text(self.source);
        buffer.push(BufferToken::code(element.kind, text).with_loc(element.range.clone()));
        self.offset = element.end();
    }
}
