//! Tree to buffer
//!
//!     The generator walks a tree once, pushing the tokens of each node into a
//!     [`TokenBuffer`]. The same walk serves both printing modes:
//!
//!         Lossless    every token goes through the [`CatchUp`] cursor, which replays the
//!                     source trivia in front of it; layout calls are no-ops because the
//!                     replayed whitespace already carries the layout
//!         Reformat    tokens go straight into the buffer, which spaces and indents them;
//!                     attached comments are printed from the nodes
//!
//!     Optional tokens (trailing commas, separators in block lists) exist only in the
//!     source, so they are printed only in lossless mode and only when present.

use super::buffer::{BufferToken, TokenBuffer};
use super::catchup::CatchUp;
use super::options::Dialect;
use crate::taco::ast::{Comment, CommentKind, LiteralValue, Node, NodeKind};
use crate::taco::error::Warning;
use crate::taco::parsing::operators::spellings;
use crate::taco::token::TokenKind;

pub struct Generator<'a> {
    buffer: TokenBuffer,
    catchup: Option<CatchUp<'a>>,
    dialect: Dialect,
}

/// Reformat spelling of a binary or logical operator
pub fn operator_spelling<'o>(
    operator: &'o str,
    raw_operator: Option<&'o str>,
    dialect: &Dialect,
) -> &'o str {
    match operator {
        "===" if dialect.equality_symbols => "==",
        "===" => "is",
        "!==" if dialect.equality_symbols => "!=",
        "!==" => "isnt",
        _ => {
            let options = spellings(operator);
            let source = raw_operator.unwrap_or(operator);
            if options.is_empty() || options.iter().any(|option| *option == source) {
                source
            } else {
                options[0]
            }
        }
    }
}

fn operator_token(spelling: &str) -> BufferToken {
    match TokenKind::from_code(spelling) {
        Some(kind) => BufferToken::new(kind),
        None => BufferToken::code(TokenKind::Name, spelling),
    }
}

fn literal_kind(value: &LiteralValue) -> TokenKind {
    match value {
        LiteralValue::Null => TokenKind::Null,
        LiteralValue::Boolean(true) => TokenKind::True,
        LiteralValue::Boolean(false) => TokenKind::False,
        LiteralValue::Number(_) => TokenKind::Num,
        LiteralValue::String(_) => TokenKind::String,
        LiteralValue::RegExp { .. } => TokenKind::Regexp,
    }
}

fn comment_token(comment: &Comment) -> BufferToken {
    let kind = match comment.kind {
        CommentKind::Line => TokenKind::LineComment,
        CommentKind::Block => TokenKind::BlockComment,
    };
    BufferToken::code(kind, comment.to_source()).with_loc(comment.range.clone())
}

impl<'a> Generator<'a> {
    pub fn lossless(buffer: TokenBuffer, catchup: CatchUp<'a>, dialect: Dialect) -> Self {
        Self {
            buffer,
            catchup: Some(catchup),
            dialect,
        }
    }

    pub fn reformat(buffer: TokenBuffer, dialect: Dialect) -> Self {
        Self {
            buffer,
            catchup: None,
            dialect,
        }
    }

    fn is_lossless(&self) -> bool {
        self.catchup.is_some()
    }

    /// Finish the walk and hand back the buffer contents
    pub fn finish(mut self) -> (Vec<BufferToken>, Vec<Warning>) {
        match self.catchup.as_mut() {
            Some(catchup) => catchup.finish(&mut self.buffer),
            None => self.buffer.flush(),
        }
        self.buffer.into_parts()
    }

    fn token(&mut self, token: impl Into<BufferToken>) {
        let token = token.into();
        if let Some(catchup) = self.catchup.as_mut() {
            if catchup.emit(&mut self.buffer, token.kind) {
                return;
            }
        }
        self.buffer.push(token);
    }

    /// A token that only the source can have; lossless mode prints it when present
    fn optional(&mut self, kind: TokenKind) -> bool {
        match self.catchup.as_mut() {
            Some(catchup) => catchup.optional(&mut self.buffer, kind),
            None => false,
        }
    }

    fn newline(&mut self) {
        if self.is_lossless() {
            self.optional(TokenKind::Newline);
        } else {
            self.buffer.newline(false);
        }
    }

    fn indent(&mut self) {
        if !self.is_lossless() {
            self.buffer.indent();
        }
    }

    fn dedent(&mut self) {
        if !self.is_lossless() {
            self.buffer.dedent();
        }
    }

    fn comments(&mut self, comments: &[Comment]) {
        if self.is_lossless() {
            return;
        }
        for comment in comments {
            self.buffer.push(comment_token(comment));
        }
    }

    pub fn print_file(&mut self, program: &Node) {
        let NodeKind::Program { body } = &program.kind else {
            self.print(program);
            return;
        };

        if !self.is_lossless() {
            for comment in &program.leading_comments {
                self.buffer.push(comment_token(comment));
                self.buffer.newline(false);
            }
        }
        for statement in body {
            while self.optional(TokenKind::Newline) {}
            self.buffer.push(BufferToken::mark(statement.range.start));
            self.print(statement);
            self.newline();
        }
        if !self.is_lossless() {
            for comment in program
                .inner_comments
                .iter()
                .chain(&program.trailing_comments)
            {
                self.buffer.push(comment_token(comment));
                self.buffer.newline(false);
            }
        }
    }

    pub fn print(&mut self, node: &Node) {
        self.comments(&node.leading_comments);
        self.print_kind(node);
        self.comments(&node.inner_comments);
        self.comments(&node.trailing_comments);
    }

    fn print_kind(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Program { .. } => self.print_file(node),
            NodeKind::ExpressionStatement { expression } => self.print(expression),
            NodeKind::Identifier { name } => {
                self.token(BufferToken::code(TokenKind::Name, name).with_loc(node.range.clone()))
            }
            NodeKind::Literal { value, raw } => self.token(
                BufferToken::code(literal_kind(value), raw).with_loc(node.range.clone()),
            ),
            NodeKind::ThisExpression => {
                self.token(BufferToken::new(TokenKind::This).with_loc(node.range.clone()))
            }
            NodeKind::TemplateLiteral {
                quasis,
                expressions,
            } => {
                self.token(TokenKind::BackQuote);
                for (index, quasi) in quasis.iter().enumerate() {
                    self.print(quasi);
                    if let Some(expression) = expressions.get(index) {
                        self.token(TokenKind::DollarBraceL);
                        self.print(expression);
                        self.token(TokenKind::BraceR);
                    }
                }
                self.token(TokenKind::BackQuote);
            }
            NodeKind::TemplateElement { raw, .. } => {
                self.token(BufferToken::code(TokenKind::Template, raw).with_loc(node.range.clone()))
            }
            NodeKind::TaggedTemplateExpression { tag, quasi } => {
                self.print(tag);
                self.print(quasi);
            }
            NodeKind::ArrayExpression { elements, indented }
            | NodeKind::ArrayPattern { elements, indented } => self.print_list(
                TokenKind::BracketL,
                TokenKind::BracketR,
                elements.iter().map(Option::as_ref).collect(),
                *indented,
            ),
            NodeKind::SpreadElement { argument } | NodeKind::RestElement { argument } => {
                self.token(TokenKind::Ellipsis);
                self.print(argument);
            }
            NodeKind::BinaryExpression {
                operator,
                raw_operator,
                left,
                right,
            }
            | NodeKind::LogicalExpression {
                operator,
                raw_operator,
                left,
                right,
            } => {
                self.print(left);
                let spelling = if self.is_lossless() {
                    raw_operator.as_deref().unwrap_or(operator)
                } else {
                    operator_spelling(operator, raw_operator.as_deref(), &self.dialect)
                };
                self.token(operator_token(spelling));
                self.print(right);
            }
            NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            } => {
                self.print(left);
                self.token(operator_token(operator));
                self.print(right);
            }
            NodeKind::SequenceExpression { expressions } => {
                for (index, expression) in expressions.iter().enumerate() {
                    if index > 0 {
                        self.token(TokenKind::Semi);
                    }
                    self.print(expression);
                }
            }
            NodeKind::MemberExpression {
                object,
                property,
                computed,
            } => {
                self.print(object);
                if *computed {
                    self.token(TokenKind::BracketL);
                    self.print(property);
                    self.token(TokenKind::BracketR);
                } else {
                    self.token(TokenKind::Dot);
                    self.print(property);
                }
            }
            NodeKind::CallExpression {
                callee,
                arguments,
                exclamation,
                indented,
            } => {
                self.print(callee);
                if *exclamation {
                    self.print_excl_arguments(arguments, *indented);
                } else {
                    let arguments = arguments.iter().map(Some).collect();
                    self.print_list(TokenKind::ParenL, TokenKind::ParenR, arguments, *indented);
                }
            }
            NodeKind::BindExpression { object, callee } => {
                self.print(object);
                self.token(TokenKind::DoubleColon);
                self.print(callee);
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                self.token(TokenKind::If);
                self.print(test);
                self.token(TokenKind::Then);
                self.print(consequent);
                self.token(TokenKind::Else);
                self.print(alternate);
            }
            NodeKind::YieldExpression { argument, delegate } => {
                self.token(TokenKind::Yield);
                if *delegate {
                    self.token(TokenKind::Star);
                }
                if let Some(argument) = argument {
                    self.print(argument);
                }
            }
            NodeKind::ArrowFunctionExpression { params, body } => {
                let params = params.iter().map(Some).collect();
                self.print_list(TokenKind::ParenL, TokenKind::ParenR, params, false);
                self.token(TokenKind::Arrow);
                self.print(body);
            }
            NodeKind::ParenthesizedExpression { expression } => {
                self.token(TokenKind::ParenL);
                self.print(expression);
                self.token(TokenKind::ParenR);
            }
        }
    }

    fn print_element(&mut self, element: Option<&Node>) {
        match element {
            Some(node) => self.print(node),
            None => self.token(TokenKind::Pass),
        }
    }

    fn print_list(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        elements: Vec<Option<&Node>>,
        indented: bool,
    ) {
        self.token(open);
        if indented {
            self.indent();
            for (index, element) in elements.into_iter().enumerate() {
                if index > 0 {
                    self.optional(TokenKind::Comma);
                }
                self.newline();
                self.print_element(element);
            }
            self.optional(TokenKind::Comma);
            self.dedent();
            self.newline();
        } else {
            for (index, element) in elements.into_iter().enumerate() {
                if index > 0 {
                    self.token(TokenKind::Comma);
                }
                self.print_element(element);
            }
            self.optional(TokenKind::Comma);
        }
        self.token(close);
    }

    fn print_excl_arguments(&mut self, arguments: &[Node], indented: bool) {
        self.token(TokenKind::Excl);
        if indented {
            self.indent();
            for argument in arguments {
                self.newline();
                self.print(argument);
            }
            self.dedent();
            return;
        }
        for (index, argument) in arguments.iter().enumerate() {
            if index > 0 {
                self.token(TokenKind::Comma);
            }
            self.print(argument);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_dialect() {
        let symbols = Dialect {
            equality_symbols: true,
        };
        let words = Dialect {
            equality_symbols: false,
        };
        assert_eq!(operator_spelling("===", Some("is"), &symbols), "==");
        assert_eq!(operator_spelling("===", Some("=="), &words), "is");
        assert_eq!(operator_spelling("!==", None, &words), "isnt");
    }

    #[test]
    fn test_other_operators_keep_source_spelling() {
        let dialect = Dialect::default();
        assert_eq!(operator_spelling("||", None, &dialect), "||");
        assert_eq!(operator_spelling("||", Some("or"), &dialect), "or");
        assert_eq!(operator_spelling("==", None, &dialect), "~=");
        assert_eq!(operator_spelling("&&", Some("and"), &dialect), "and");
        assert_eq!(operator_spelling("==", Some("~="), &dialect), "~=");
        assert_eq!(operator_spelling("+", None, &dialect), "+");
        assert_eq!(operator_spelling("|>", None, &dialect), "|>");
    }
}
