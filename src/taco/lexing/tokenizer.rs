//! The tokenizer
//!
//!     [`Tokenizer`] turns source text into tokens on demand and keeps the lookahead
//!     triple (`prev`, `cur`, `next`) the parser works with. Every token it produces,
//!     significant or not, is appended to the element log so the printer can replay the
//!     source exactly.
//!
//! Indentation Handling
//!
//!     A line break in a significant context is not turned into a newline token right
//!     away. The tokenizer first looks ahead to the next line that has content (blank
//!     lines and comment-only lines don't count) and compares its indentation with the
//!     current level:
//!         1. deeper by one unit: emit a zero-width Indent and stay on the line break
//!         2. shallower: emit one zero-width Dedent per level, staying on the line break
//!         3. equal: consume the line break and emit the Newline
//!     So the layout tokens always come right before the newline that reveals them. The
//!     blank lines, comments and leading whitespace after that newline are trivia.
//!
//! Context Sensitivity
//!
//!     Two decisions depend on what came before: whether `/` starts a regular expression
//!     and whether `(`/`[` open a call/member or a group/list. Both read the
//!     `expr_allowed` flag, which is recomputed after every significant token.

use super::context::Context;
use super::escapes::cook;
use super::indentation::IndentUnit;
use super::state::{LineEnding, ScanState, Snapshot, TokenLogs};
use crate::taco::ast::comment::{Comment, CommentKind};
use crate::taco::ast::range::{is_line_break, Position, Range};
use crate::taco::error::{ParseError, ParseResult, SyntaxErrorKind, Warning};
use crate::taco::token::raw::lex_one;
use crate::taco::token::{Token, TokenKind, TokenValue};
use std::rc::Rc;
use tracing::{trace, warn};

/// The next line with content after a line break
struct ContentLine<'s> {
    indent: &'s str,
    offset: usize,
    line: usize,
}

pub struct Tokenizer<'a> {
    source: &'a str,
    file: Option<Rc<str>>,
    pub(crate) state: ScanState,
    pub(crate) logs: TokenLogs,
}

fn line_break_len(text: &str) -> usize {
    if text.starts_with("\r\n") {
        2
    } else {
        text.chars().next().map(char::len_utf8).unwrap_or(0)
    }
}

fn is_inline_whitespace(ch: char) -> bool {
    (ch.is_whitespace() && !is_line_break(ch)) || ch == '\u{feff}'
}

fn parse_number(text: &str) -> f64 {
    let radix = match text.get(..2) {
        Some("0x") | Some("0X") => 16,
        Some("0o") | Some("0O") => 8,
        Some("0b") | Some("0B") => 2,
        _ => return text.parse().unwrap_or(f64::NAN),
    };
    text[2..]
        .chars()
        .filter_map(|ch| ch.to_digit(radix))
        .fold(0.0, |value, digit| value * f64::from(radix) + f64::from(digit))
}

fn token_value(kind: TokenKind, text: &str) -> TokenValue {
    match kind {
        TokenKind::Name => TokenValue::Name(text.to_string()),
        TokenKind::Num => TokenValue::Number(parse_number(text)),
        TokenKind::String => {
            let body = &text[1..text.len() - 1];
            TokenValue::String(cook(body).unwrap_or_else(|| body.to_string()))
        }
        _ => TokenValue::None,
    }
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str, file: Option<Rc<str>>) -> Self {
        Self {
            source,
            file,
            state: ScanState::new(),
            logs: TokenLogs::default(),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Check the first line and load the first token into `cur`
    pub fn start(&mut self) -> ParseResult<()> {
        if let Some(line) = self.next_content_line(0, 1) {
            if !line.indent.is_empty() {
                return Err(ParseError::syntax(
                    SyntaxErrorKind::UnexpectedIndentation,
                    "Unexpected indentation",
                    line.offset,
                    Position::new(line.line, line.indent.len()),
                ));
            }
        }
        self.state.cur = self.read_token()?;
        Ok(())
    }

    pub fn cur(&self) -> &Token {
        &self.state.cur
    }

    pub fn prev(&self) -> &Token {
        &self.state.prev
    }

    /// Shift the lookahead triple by one token
    pub fn advance(&mut self) -> ParseResult<()> {
        let next = match self.state.next.take() {
            Some(token) => token,
            None => self.read_token()?,
        };
        let old = std::mem::replace(&mut self.state.cur, next);
        if !matches!(
            old.kind,
            TokenKind::Indent | TokenKind::Dedent | TokenKind::Newline | TokenKind::Eof
        ) {
            self.state.last_end = old.end();
            self.state.last_end_position = old.range.end;
        }
        self.state.prev = old;
        Ok(())
    }

    /// The token after `cur`, scanned on first use
    pub fn peek(&mut self) -> ParseResult<&Token> {
        let token = match self.state.next.take() {
            Some(token) => token,
            None => self.read_token()?,
        };
        Ok(&*self.state.next.insert(token))
    }

    pub fn snapshot(&self) -> Snapshot {
        trace!(pos = self.state.pos, "tokenizer snapshot");
        self.logs.snapshot(&self.state)
    }

    pub fn restore(&mut self, snapshot: Snapshot) {
        trace!(
            from = self.state.pos,
            to = snapshot.state.pos,
            "tokenizer restore"
        );
        self.logs.truncate_to(&snapshot);
        self.state = snapshot.state;
    }

    pub fn into_logs(self) -> TokenLogs {
        self.logs
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.state.pos..].chars().next()
    }

    fn error(&self, kind: SyntaxErrorKind, message: impl Into<String>) -> ParseError {
        ParseError::syntax(kind, message, self.state.pos, self.state.position())
    }

    fn read_token(&mut self) -> ParseResult<Token> {
        if self.state.context_top() == Context::Template {
            return self.read_template_token();
        }
        self.skip_space()?;

        let start = self.state.pos;
        let start_position = self.state.position();
        let Some(ch) = self.peek_char() else {
            return Ok(self.end_of_input(start, start_position));
        };

        // skip_space leaves line breaks in place only where they are significant
        if is_line_break(ch) {
            return self.read_newline();
        }
        if ch == '/' && self.state.expr_allowed {
            return self.read_regexp();
        }

        match lex_one(&self.source[start..]) {
            Some((kind, len)) => {
                let value = token_value(kind, &self.source[start..start + len]);
                self.advance_to(start + len);
                Ok(self.finish_token(kind, value, start, start_position))
            }
            None if ch == '"' || ch == '\'' => Err(self.error(
                SyntaxErrorKind::UnterminatedString,
                "Unterminated string constant",
            )),
            None => Err(self.error(
                SyntaxErrorKind::UnexpectedCharacter,
                format!("Unexpected character '{}'", ch),
            )),
        }
    }

    fn end_of_input(&mut self, start: usize, start_position: Position) -> Token {
        if self.state.indentation > 0 {
            self.state.indentation -= 1;
            return self.finish_token(TokenKind::Dedent, TokenValue::None, start, start_position);
        }
        let mut eof = Token::new(
            TokenKind::Eof,
            TokenValue::None,
            Range::point(start, start_position),
        );
        eof.source_file = self.file.clone();
        eof
    }

    /// Consume whitespace and comments, logging them as trivia
    fn skip_space(&mut self) -> ParseResult<()> {
        let significant = self.state.context_top().whitespace_significant();
        loop {
            let start = self.state.pos;
            let start_position = self.state.position();
            while let Some(ch) = self.peek_char() {
                if is_inline_whitespace(ch) {
                    self.state.pos += ch.len_utf8();
                } else if is_line_break(ch) && (self.state.at_line_start || !significant) {
                    self.consume_line_break();
                } else {
                    break;
                }
            }
            if self.state.pos > start {
                self.push_trivia(TokenKind::Whitespace, TokenValue::None, start, start_position);
            }

            let rest = &self.source[self.state.pos..];
            if rest.starts_with("#*") {
                self.read_block_comment()?;
            } else if rest.starts_with('#') {
                self.read_line_comment();
            } else {
                break;
            }
        }
        if self.state.pos < self.source.len() {
            self.state.at_line_start = false;
        }
        Ok(())
    }

    fn read_line_comment(&mut self) {
        let start = self.state.pos;
        let start_position = self.state.position();
        let end = self.source[start..]
            .find(is_line_break)
            .map(|i| start + i)
            .unwrap_or(self.source.len());
        let value = self.source[start + 1..end].to_string();
        self.state.pos = end;
        self.push_comment(CommentKind::Line, value, start, start_position);
    }

    fn read_block_comment(&mut self) -> ParseResult<()> {
        let start = self.state.pos;
        let start_position = self.state.position();
        let Some(close) = self.source[start + 2..].find("*#") else {
            return Err(self.error(
                SyntaxErrorKind::UnterminatedComment,
                "Unterminated comment",
            ));
        };
        let body_end = start + 2 + close;
        let value = self.source[start + 2..body_end].to_string();
        self.advance_to(body_end + 2);
        self.push_comment(CommentKind::Block, value, start, start_position);
        Ok(())
    }

    fn push_comment(
        &mut self,
        kind: CommentKind,
        value: String,
        start: usize,
        start_position: Position,
    ) {
        let token_kind = match kind {
            CommentKind::Line => TokenKind::LineComment,
            CommentKind::Block => TokenKind::BlockComment,
        };
        let token = self.push_trivia(
            token_kind,
            TokenValue::Comment(value.clone()),
            start,
            start_position,
        );
        self.logs.comments.push(Comment::new(kind, value, token.range));
    }

    fn push_trivia(
        &mut self,
        kind: TokenKind,
        value: TokenValue,
        start: usize,
        start_position: Position,
    ) -> Token {
        let range = Range::new(start..self.state.pos, start_position, self.state.position());
        let token = Token {
            kind,
            value,
            range,
            source_file: self.file.clone(),
        };
        self.logs.elements.push(token.clone());
        token
    }

    fn finish_token(
        &mut self,
        kind: TokenKind,
        value: TokenValue,
        start: usize,
        start_position: Position,
    ) -> Token {
        let range = Range::new(start..self.state.pos, start_position, self.state.position());
        let token = Token {
            kind,
            value,
            range,
            source_file: self.file.clone(),
        };
        self.logs.tokens.push(token.clone());
        self.logs.elements.push(token.clone());
        self.update_context(kind);
        token
    }

    fn update_context(&mut self, kind: TokenKind) {
        let top = self.state.context_top();
        let closing_template = kind == TokenKind::BackQuote && top == Context::Template;

        match kind {
            TokenKind::ParenL => self.state.context.push(if self.state.expr_allowed {
                Context::ParenExpression
            } else {
                Context::ParenArguments
            }),
            TokenKind::BracketL => self.state.context.push(if self.state.expr_allowed {
                Context::BracketList
            } else {
                Context::BracketMember
            }),
            TokenKind::BraceL => self.state.context.push(Context::Brace),
            TokenKind::DollarBraceL => self.state.context.push(Context::TemplateExpression),
            TokenKind::BackQuote if !closing_template => self.state.context.push(Context::Template),
            TokenKind::BackQuote | TokenKind::ParenR | TokenKind::BracketR | TokenKind::BraceR => {
                if self.state.context.len() > 1 {
                    self.state.context.pop();
                }
            }
            _ => {}
        }

        self.state.expr_allowed = if closing_template {
            false
        } else if kind.is_keyword() && self.state.last_kind == TokenKind::Dot {
            false
        } else {
            kind.allows_expression_after()
        };
        self.state.last_kind = kind;
    }

    /// Move `pos` forward to `end`, keeping line bookkeeping right
    fn advance_to(&mut self, end: usize) {
        while self.state.pos < end {
            match self.peek_char() {
                Some(ch) if is_line_break(ch) => self.consume_line_break(),
                Some(ch) => self.state.pos += ch.len_utf8(),
                None => break,
            }
        }
    }

    fn consume_line_break(&mut self) {
        let rest = &self.source[self.state.pos..];
        let ending = if rest.starts_with("\r\n") {
            LineEnding::CrLf
        } else if rest.starts_with('\r') {
            LineEnding::Cr
        } else {
            LineEnding::Lf
        };
        let position = self.state.position();
        self.state.pos += line_break_len(rest);
        self.state.line += 1;
        self.state.line_start = self.state.pos;
        self.note_line_ending(ending, position);
    }

    fn note_line_ending(&mut self, ending: LineEnding, position: Position) {
        match self.state.line_ending {
            None => self.state.line_ending = Some(ending),
            Some(seen) if seen != ending && !self.state.mixed_line_endings => {
                self.state.mixed_line_endings = true;
                warn!(%position, "mixed line endings");
                self.logs
                    .warnings
                    .push(Warning::new("Mixed line endings", Some(position)));
            }
            Some(_) => {}
        }
    }

    /// Find the next line with content, starting at the beginning of a line
    fn next_content_line(&self, mut offset: usize, mut line: usize) -> Option<ContentLine<'a>> {
        loop {
            let rest = &self.source[offset..];
            let indent_len = rest.len() - rest.trim_start_matches(|c: char| c == ' ' || c == '\t').len();
            let after = offset + indent_len;
            let tail = &self.source[after..];
            match tail.chars().next() {
                None => return None,
                Some(ch) if is_line_break(ch) => {
                    offset = after + line_break_len(tail);
                    line += 1;
                }
                Some('#') if !tail.starts_with("#*") => {
                    let end = after + tail.find(is_line_break)?;
                    offset = end + line_break_len(&self.source[end..]);
                    line += 1;
                }
                Some(_) => {
                    return Some(ContentLine {
                        indent: &self.source[offset..after],
                        offset: after,
                        line,
                    })
                }
            }
        }
    }

    fn indentation_level(&mut self, line: &ContentLine<'_>) -> ParseResult<usize> {
        if line.indent.is_empty() {
            return Ok(0);
        }
        let position = Position::new(line.line, line.indent.len());
        let inconsistent = |message: String| {
            ParseError::syntax(
                SyntaxErrorKind::InconsistentIndentation,
                message,
                line.offset,
                position,
            )
        };
        match &self.state.indent_unit {
            None => {
                let unit = IndentUnit::establish(line.indent).map_err(|_| {
                    inconsistent("Inconsistent indentation: mixed tabs and spaces".to_string())
                })?;
                trace!(unit = %unit.describe(), "indentation unit established");
                self.state.indent_unit = Some(unit);
                Ok(1)
            }
            Some(unit) => unit.level_of(line.indent).map_err(|_| {
                inconsistent(format!(
                    "Inconsistent indentation: expected multiples of {}",
                    unit.describe()
                ))
            }),
        }
    }

    fn read_newline(&mut self) -> ParseResult<Token> {
        let start = self.state.pos;
        let start_position = self.state.position();
        let after_break = start + line_break_len(&self.source[start..]);

        let target = match self.next_content_line(after_break, self.state.line + 1) {
            Some(line) => {
                let level = self.indentation_level(&line)?;
                if level > self.state.indentation + 1 {
                    return Err(ParseError::syntax(
                        SyntaxErrorKind::UnexpectedIndentation,
                        "Unexpected indentation",
                        line.offset,
                        Position::new(line.line, line.indent.len()),
                    ));
                }
                level
            }
            None => 0,
        };

        if target > self.state.indentation {
            self.state.indentation += 1;
            return Ok(self.finish_token(TokenKind::Indent, TokenValue::None, start, start_position));
        }
        if target < self.state.indentation {
            self.state.indentation -= 1;
            return Ok(self.finish_token(TokenKind::Dedent, TokenValue::None, start, start_position));
        }

        self.consume_line_break();
        self.state.at_line_start = true;
        Ok(self.finish_token(TokenKind::Newline, TokenValue::None, start, start_position))
    }

    fn read_regexp(&mut self) -> ParseResult<Token> {
        let start = self.state.pos;
        let start_position = self.state.position();
        let mut in_class = false;
        let mut escaped = false;
        let mut end = None;

        for (i, ch) in self.source[start + 1..].char_indices() {
            if is_line_break(ch) {
                break;
            }
            if escaped {
                escaped = false;
                continue;
            }
            match ch {
                '\\' => escaped = true,
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => {
                    end = Some(start + 1 + i);
                    break;
                }
                _ => {}
            }
        }

        let Some(body_end) = end else {
            return Err(self.error(
                SyntaxErrorKind::UnterminatedRegExp,
                "Unterminated regular expression",
            ));
        };
        let flags_len = self.source[body_end + 1..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .count();
        let pattern = self.source[start + 1..body_end].to_string();
        let flags = self.source[body_end + 1..body_end + 1 + flags_len].to_string();
        self.state.pos = body_end + 1 + flags_len;
        Ok(self.finish_token(
            TokenKind::Regexp,
            TokenValue::Regexp { pattern, flags },
            start,
            start_position,
        ))
    }

    fn read_template_token(&mut self) -> ParseResult<Token> {
        let start = self.state.pos;
        let start_position = self.state.position();
        let rest = &self.source[start..];

        if matches!(
            self.state.last_kind,
            TokenKind::BackQuote | TokenKind::BraceR
        ) {
            let mut chars = rest.char_indices();
            let mut end = None;
            while let Some((i, ch)) = chars.next() {
                match ch {
                    '`' => {
                        end = Some(i);
                        break;
                    }
                    '$' if rest[i + 1..].starts_with('{') => {
                        end = Some(i);
                        break;
                    }
                    '\\' => {
                        chars.next();
                    }
                    _ => {}
                }
            }
            let Some(len) = end else {
                return Err(self.error(
                    SyntaxErrorKind::UnterminatedTemplate,
                    "Unterminated template",
                ));
            };
            let raw = rest[..len].to_string();
            let cooked = cook(&raw);
            self.advance_to(start + len);
            return Ok(self.finish_token(
                TokenKind::Template,
                TokenValue::Template { raw, cooked },
                start,
                start_position,
            ));
        }

        if rest.starts_with('`') {
            self.state.pos += 1;
            Ok(self.finish_token(TokenKind::BackQuote, TokenValue::None, start, start_position))
        } else if rest.starts_with("${") {
            self.state.pos += 2;
            Ok(self.finish_token(
                TokenKind::DollarBraceL,
                TokenValue::None,
                start,
                start_position,
            ))
        } else {
            Err(self.error(
                SyntaxErrorKind::UnterminatedTemplate,
                "Unterminated template",
            ))
        }
    }
}

/// Tokenize a whole source, returning every element including trivia
pub fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    let mut tokenizer = Tokenizer::new(source, None);
    tokenizer.start()?;
    while tokenizer.cur().kind != TokenKind::Eof {
        tokenizer.advance()?;
    }
    Ok(tokenizer.into_logs().elements)
}
