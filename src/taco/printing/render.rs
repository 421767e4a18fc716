//! Rendering buffer tokens to text
//!
//! Each token's text is resolved plugin first: the first [`PrinterExtension`] whose
//! `to_code` answers wins, otherwise the built-in [`ToCode`] rendering applies. Layout
//! markers (Indent, Dedent, MappingMark) render as nothing; a `Tab(n)` renders as `n`
//! copies of the indentation text.
//!
//! With a [`SourceMapBuilder`], every token that carries a location gets one mapping at
//! its start and one at its end. The original location (`orig_loc`) is preferred over
//! the current one.

use super::buffer::{BufferToken, BufferValue};
use super::source_map::SourceMapBuilder;
use super::spacing::PrinterExtension;
use crate::taco::ast::range::{is_line_break, Position};
use crate::taco::token::TokenKind;
use std::rc::Rc;

/// Built-in text of a buffer token
pub trait ToCode {
    fn to_code(&self, indent: &str) -> String;
}

impl ToCode for BufferToken {
    fn to_code(&self, indent: &str) -> String {
        match (&self.value, self.kind) {
            (BufferValue::Code(code), _) => code.clone(),
            (BufferValue::Count(depth), TokenKind::Tab) => indent.repeat(*depth),
            (_, TokenKind::Whitespace) => " ".to_string(),
            // synthetic tokens take no room in the output
            (_, TokenKind::Tab)
            | (_, TokenKind::Indent)
            | (_, TokenKind::Dedent)
            | (_, TokenKind::MappingMark)
            | (_, TokenKind::Eof) => String::new(),
            (_, kind) => kind.code().to_string(),
        }
    }
}

/// Generated-side position tracker
#[derive(Debug, Clone, Copy)]
struct Cursor {
    line: usize,
    column: usize,
}

impl Cursor {
    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn advance(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(ch) = chars.next() {
            if !is_line_break(ch) {
                self.column += ch.len_utf8();
            } else if !(ch == '\r' && chars.peek() == Some(&'\n')) {
                self.line += 1;
                self.column = 0;
            }
        }
    }
}

pub fn render(
    tokens: &[BufferToken],
    indent: &str,
    extensions: &[Rc<dyn PrinterExtension>],
    mut map: Option<&mut SourceMapBuilder>,
) -> String {
    let mut out = String::new();
    let mut cursor = Cursor { line: 1, column: 0 };

    for token in tokens {
        if let (Some(map), BufferValue::Mark(original)) = (map.as_deref_mut(), &token.value) {
            map.add_mapping(cursor.position(), *original);
            continue;
        }

        let text = extensions
            .iter()
            .find_map(|extension| extension.to_code(token))
            .unwrap_or_else(|| token.to_code(indent));
        let location = token.orig_loc.as_ref().or(token.loc.as_ref());

        if let (Some(map), Some(location)) = (map.as_deref_mut(), location) {
            map.add_mapping(cursor.position(), location.start);
        }
        cursor.advance(&text);
        out.push_str(&text);
        if let (Some(map), Some(location)) = (map.as_deref_mut(), location) {
            map.add_mapping(cursor.position(), location.end);
        }
    }
    out
}
