//! Literals, templates and array literals

use super::parser::Parser;
use super::patterns::ListOptions;
use crate::taco::ast::{LiteralValue, Node, NodeKind};
use crate::taco::error::ParseResult;
use crate::taco::token::{TokenKind, TokenValue};

impl<'a> Parser<'a> {
    pub fn parse_literal(&mut self) -> ParseResult<Node> {
        let token = self.cur().clone();
        let raw = token.text(self.source()).to_string();
        let value = match (token.kind, token.value) {
            (TokenKind::Null, _) => LiteralValue::Null,
            (TokenKind::True, _) => LiteralValue::Boolean(true),
            (TokenKind::False, _) => LiteralValue::Boolean(false),
            (_, TokenValue::Number(number)) => LiteralValue::Number(number),
            (_, TokenValue::String(string)) => LiteralValue::String(string),
            (_, TokenValue::Regexp { pattern, flags }) => LiteralValue::RegExp { pattern, flags },
            _ => return Err(self.unexpected()),
        };
        let start = self.start();
        self.next()?;
        Ok(self.finish(start, NodeKind::Literal { value, raw }))
    }

    /// `` `text ${expression} text` ``
    pub fn parse_template(&mut self) -> ParseResult<Node> {
        let start = self.start();
        self.expect(TokenKind::BackQuote)?;

        let mut quasis = vec![self.parse_template_element()?];
        let mut expressions = Vec::new();
        while self.at(TokenKind::DollarBraceL) {
            let open = self.start();
            self.next()?;
            expressions.push(self.parse_expression()?);
            self.expect_close(TokenKind::BraceR, open)?;
            quasis.push(self.parse_template_element()?);
        }
        self.expect_close(TokenKind::BackQuote, start)?;

        Ok(self.finish(
            start,
            NodeKind::TemplateLiteral {
                quasis,
                expressions,
            },
        ))
    }

    fn parse_template_element(&mut self) -> ParseResult<Node> {
        let TokenValue::Template { raw, cooked } = self.cur().value.clone() else {
            return Err(self.unexpected());
        };
        let start = self.start();
        self.next()?;
        let tail = self.at(TokenKind::BackQuote);
        Ok(self.finish(start, NodeKind::TemplateElement { raw, cooked, tail }))
    }

    /// `[a, pass, ...b]`, inline or as an indented block
    pub fn parse_array_expression(&mut self) -> ParseResult<Node> {
        let start = self.start();
        self.expect(TokenKind::BracketL)?;
        let (elements, indented) = self.parse_list(
            start,
            TokenKind::BracketR,
            ListOptions {
                allow_empty: true,
                allow_trailing_comma: true,
                rest_must_be_last: false,
            },
            Self::parse_argument,
        )?;
        Ok(self.finish(start, NodeKind::ArrayExpression { elements, indented }))
    }
}

#[cfg(test)]
mod tests {
    use crate::taco::ast::{LiteralValue, NodeKind};
    use crate::taco::parsing::{parse, ParseOptions};

    fn kind_of(source: &str) -> NodeKind {
        parse(source, &ParseOptions::default())
            .unwrap()
            .expression(0)
            .unwrap()
            .kind
            .clone()
    }

    #[test]
    fn test_literal_values() {
        let NodeKind::Literal { value, raw } = kind_of("0x1f") else {
            panic!("expected literal");
        };
        assert_eq!(value, LiteralValue::Number(31.0));
        assert_eq!(raw, "0x1f");

        let NodeKind::Literal { value, .. } = kind_of(r#""a\tb""#) else {
            panic!("expected literal");
        };
        assert_eq!(value, LiteralValue::String("a\tb".to_string()));
    }

    #[test]
    fn test_template_elements() {
        let NodeKind::TemplateLiteral {
            quasis,
            expressions,
        } = kind_of("`a${b}c${d}`")
        else {
            panic!("expected template");
        };
        assert_eq!(expressions.len(), 2);
        assert_eq!(quasis.len(), 3);
        let tails: Vec<_> = quasis
            .iter()
            .map(|q| matches!(q.kind, NodeKind::TemplateElement { tail: true, .. }))
            .collect();
        assert_eq!(tails, vec![false, false, true]);
    }

    #[test]
    fn test_array_holes_and_spread() {
        let NodeKind::ArrayExpression { elements, indented } = kind_of("[pass, a, ...b]") else {
            panic!("expected array");
        };
        assert!(!indented);
        assert!(elements[0].is_none());
        assert_eq!(elements[2].as_ref().unwrap().type_name(), "SpreadElement");
    }
}
