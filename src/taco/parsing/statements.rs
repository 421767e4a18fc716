//! Program structure
//!
//! The statement grammar is limited to expression statements: one logical line each,
//! ended by a newline or the end of input.

use super::parser::Parser;
use crate::taco::ast::range::{Position, Range};
use crate::taco::ast::{Node, NodeKind};
use crate::taco::error::ParseResult;
use crate::taco::token::TokenKind;

impl<'a> Parser<'a> {
    /// Start the tokenizer and parse the whole input into a Program
    pub fn parse_top_level(&mut self) -> ParseResult<Node> {
        self.tokenizer.start()?;
        let mut body = Vec::new();
        loop {
            while self.eat(TokenKind::Newline)? {}
            if self.at(TokenKind::Eof) {
                break;
            }
            body.push(self.parse_expression_statement()?);
        }
        let end = self.tokenizer.state.position();
        Ok(Node::new(
            NodeKind::Program { body },
            Range::new(0..self.source().len(), Position::new(1, 0), end),
        ))
    }

    pub fn parse_expression_statement(&mut self) -> ParseResult<Node> {
        let expression = self.parse_expression()?;
        if !self.eat(TokenKind::Newline)? && !self.at(TokenKind::Eof) {
            return Err(self.unexpected());
        }
        let range = expression.range.clone();
        Ok(Node::new(
            NodeKind::ExpressionStatement {
                expression: Box::new(expression),
            },
            range,
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::taco::error::SyntaxErrorKind;
    use crate::taco::parsing::{parse, ParseOptions};

    #[test]
    fn test_one_statement_per_line() {
        let file = parse("a\n\nb()\n# done\n", &ParseOptions::default()).unwrap();
        assert_eq!(file.statements().len(), 2);
        assert_eq!(file.program.range.span, 0..14);
    }

    #[test]
    fn test_statement_must_end_the_line() {
        let error = parse("a b\n", &ParseOptions::default()).unwrap_err();
        assert_eq!(error.syntax_kind(), Some(SyntaxErrorKind::UnexpectedToken));
    }

    #[test]
    fn test_stray_indentation() {
        let error = parse("a\n  b\n", &ParseOptions::default()).unwrap_err();
        assert_eq!(
            error.syntax_kind(),
            Some(SyntaxErrorKind::UnexpectedIndentation)
        );
    }

    #[test]
    fn test_empty_input() {
        let file = parse("", &ParseOptions::default()).unwrap();
        assert!(file.statements().is_empty());
    }
}
