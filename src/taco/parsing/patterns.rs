//! Binding patterns and delimited lists
//!
//!     Assignment targets are a bare name, a member expression or an array pattern.
//!     Patterns are reached two ways: directly, for arrow function parameters, and by
//!     converting an already parsed left-hand side once an assignment operator shows up
//!     ([`Parser::to_assignable`]).
//!
//! Lists
//!
//!     Arrays, patterns, call arguments and parameters share one list parser. A list is
//!     either inline (`[a, b]`) or a block, detected by an Indent right after the opener:
//!
//!         [              BracketL Indent
//!           a            Newline Name
//!           b            Newline Name
//!         ]              Dedent Newline BracketR
//!
//!     Inline elements are separated by commas; block elements by commas or newlines.
//!     A block ends with Dedent, Newline and the closer.

use super::parser::{Marker, Parser};
use crate::taco::ast::{Node, NodeKind};
use crate::taco::error::{ParseError, ParseResult, SyntaxErrorKind};
use crate::taco::parsing::SourceType;
use crate::taco::token::TokenKind;

#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// `pass` stands for a hole
    pub allow_empty: bool,
    pub allow_trailing_comma: bool,
    /// A rest or spread element must close the list
    pub rest_must_be_last: bool,
}

fn is_rest(node: &Node) -> bool {
    matches!(
        node.kind,
        NodeKind::RestElement { .. } | NodeKind::SpreadElement { .. }
    )
}

fn invalid_target(node: &Node, message: impl Into<String>) -> ParseError {
    ParseError::syntax(
        SyntaxErrorKind::InvalidLeftHandSide,
        message,
        node.start(),
        node.range.start,
    )
}

impl<'a> Parser<'a> {
    /// Parse list elements after the opener up to and including `close`.
    ///
    /// Returns the elements (`None` for holes) and whether block layout was used.
    pub(crate) fn parse_list(
        &mut self,
        open: Marker,
        close: TokenKind,
        options: ListOptions,
        mut item: impl FnMut(&mut Self) -> ParseResult<Node>,
    ) -> ParseResult<(Vec<Option<Node>>, bool)> {
        let indented = self.eat(TokenKind::Indent)?;
        let end = if indented { TokenKind::Dedent } else { close };
        // in a block the newline after the indent is the first separator
        let mut first = !indented;
        let mut elements = Vec::new();

        loop {
            if self.eat(end)? {
                break;
            }
            if first {
                first = false;
            } else if self.eat(TokenKind::Comma)? {
                if indented {
                    self.eat(TokenKind::Newline)?;
                }
            } else if !(indented && self.eat(TokenKind::Newline)?) {
                return Err(self.unexpected_in_group(close, open));
            }

            if options.allow_empty && self.eat(TokenKind::Pass)? {
                elements.push(None);
                continue;
            }
            if options.allow_trailing_comma && self.eat(end)? {
                break;
            }

            let node = item(self)?;
            let rest = is_rest(&node);
            elements.push(Some(node));
            if rest && options.rest_must_be_last {
                if !self.eat(end)? {
                    return Err(self.unexpected_in_group(close, open));
                }
                break;
            }
        }

        if indented {
            self.expect(TokenKind::Newline)?;
            self.expect_close(close, open)?;
        }
        Ok((elements, indented))
    }

    /// Identifier, or a keyword coerced into one when `allow_keywords` is set
    pub fn parse_identifier(&mut self, allow_keywords: bool) -> ParseResult<Node> {
        let token = if self.at(TokenKind::Name) {
            self.cur().clone()
        } else if allow_keywords && self.cur_kind().is_keyword() {
            self.cur().as_name()
        } else {
            return Err(self.unexpected());
        };
        let start = self.start();
        let name = token.name().unwrap_or_default().to_string();
        self.next()?;
        Ok(self.finish(start, NodeKind::Identifier { name }))
    }

    pub fn parse_binding_atomic(&mut self) -> ParseResult<Node> {
        self.nested(Self::parse_binding_target)
    }

    fn parse_binding_target(&mut self) -> ParseResult<Node> {
        match self.cur_kind() {
            TokenKind::Name => self.parse_identifier(false),
            TokenKind::BracketL => {
                let start = self.start();
                self.next()?;
                let (elements, indented) = self.parse_list(
                    start,
                    TokenKind::BracketR,
                    ListOptions {
                        allow_empty: true,
                        allow_trailing_comma: true,
                        rest_must_be_last: true,
                    },
                    Self::parse_binding_element,
                )?;
                Ok(self.finish(start, NodeKind::ArrayPattern { elements, indented }))
            }
            TokenKind::BraceL => Err(self.not_implemented("object patterns")),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_binding_element(&mut self) -> ParseResult<Node> {
        if self.at(TokenKind::Ellipsis) {
            self.parse_rest()
        } else {
            self.parse_binding_atomic()
        }
    }

    fn parse_rest(&mut self) -> ParseResult<Node> {
        let start = self.start();
        self.expect(TokenKind::Ellipsis)?;
        let argument = self.parse_binding_atomic()?;
        Ok(self.finish(
            start,
            NodeKind::RestElement {
                argument: Box::new(argument),
            },
        ))
    }

    /// Parameters after `(`, up to and including `close`
    pub fn parse_binding_list(&mut self, open: Marker, close: TokenKind) -> ParseResult<Vec<Node>> {
        let (elements, _) = self.parse_list(
            open,
            close,
            ListOptions {
                allow_empty: false,
                allow_trailing_comma: true,
                rest_must_be_last: true,
            },
            Self::parse_binding_element,
        )?;
        Ok(elements.into_iter().flatten().collect())
    }

    /// Check or convert a parsed expression into an assignment target
    pub fn to_assignable(&self, node: Node, operator: TokenKind) -> ParseResult<Node> {
        if node.kind.is_simple_target() {
            self.check_strict_target(&node)?;
            return Ok(node);
        }
        if operator != TokenKind::Eq {
            return Err(invalid_target(&node, "Invalid left-hand side in assignment"));
        }

        match node.kind {
            NodeKind::ArrayPattern { .. } => Ok(node),
            NodeKind::ArrayExpression { elements, indented } => {
                let count = elements.len();
                let mut converted = Vec::with_capacity(count);
                for (index, element) in elements.into_iter().enumerate() {
                    let element = match element {
                        Some(element) => {
                            Some(self.to_assignable_element(element, index + 1 == count)?)
                        }
                        None => None,
                    };
                    converted.push(element);
                }
                Ok(Node::new(
                    NodeKind::ArrayPattern {
                        elements: converted,
                        indented,
                    },
                    node.range,
                ))
            }
            _ => Err(ParseError::syntax(
                SyntaxErrorKind::InvalidLeftHandSide,
                "Invalid left-hand side in assignment",
                node.range.span.start,
                node.range.start,
            )),
        }
    }

    fn to_assignable_element(&self, element: Node, is_last: bool) -> ParseResult<Node> {
        if !matches!(element.kind, NodeKind::SpreadElement { .. }) {
            return self.to_assignable(element, TokenKind::Eq);
        }
        if !is_last {
            return Err(invalid_target(&element, "Rest element must be last element"));
        }
        let range = element.range;
        let NodeKind::SpreadElement { argument } = element.kind else {
            return Err(ParseError::syntax(
                SyntaxErrorKind::InvalidLeftHandSide,
                "Invalid rest element",
                range.span.start,
                range.start,
            ));
        };
        let argument = self.to_assignable(*argument, TokenKind::Eq)?;
        Ok(Node::new(
            NodeKind::RestElement {
                argument: Box::new(argument),
            },
            range,
        ))
    }

    fn check_strict_target(&self, node: &Node) -> ParseResult<()> {
        if self.options.source_type != SourceType::Module {
            return Ok(());
        }
        match node.identifier_name() {
            Some(name @ ("eval" | "arguments")) => Err(invalid_target(
                node,
                format!("Assigning to '{}' in strict mode", name),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::taco::ast::NodeKind;
    use crate::taco::error::SyntaxErrorKind;
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
    fn test_array_becomes_pattern_on_assignment() {
        let NodeKind::AssignmentExpression { left, .. } = kind_of("[a, pass, ...b] = c") else {
            panic!("expected assignment");
        };
        let NodeKind::ArrayPattern { elements, .. } = &left.kind else {
            panic!("expected pattern");
        };
        assert_eq!(elements.len(), 3);
        assert!(elements[1].is_none());
        assert_eq!(elements[2].as_ref().unwrap().type_name(), "RestElement");
    }

    #[test]
    fn test_block_array_layout() {
        let NodeKind::ArrayExpression { elements, indented } = kind_of("[\n  a\n  b,\n  c\n]\n")
        else {
            panic!("expected array");
        };
        assert!(indented);
        assert_eq!(elements.len(), 3);
    }

    #[test]
    fn test_rest_must_be_last() {
        let error = parse("[...a, b] = c\n", &ParseOptions::default()).unwrap_err();
        assert_eq!(
            error.syntax_kind(),
            Some(SyntaxErrorKind::InvalidLeftHandSide)
        );
    }

    #[test]
    fn test_compound_assignment_needs_simple_target() {
        let error = parse("[a] += b\n", &ParseOptions::default()).unwrap_err();
        assert_eq!(
            error.syntax_kind(),
            Some(SyntaxErrorKind::InvalidLeftHandSide)
        );
    }

    #[test]
    fn test_strict_targets() {
        let error = parse("eval = 1\n", &ParseOptions::default()).unwrap_err();
        assert_eq!(
            error.syntax_kind(),
            Some(SyntaxErrorKind::InvalidLeftHandSide)
        );
        assert!(parse("eval = 1\n", &ParseOptions::default().script()).is_ok());
    }

    #[test]
    fn test_keyword_property_name() {
        let NodeKind::MemberExpression { property, .. } = kind_of("a.if") else {
            panic!("expected member");
        };
        assert_eq!(property.identifier_name(), Some("if"));
    }

    #[test]
    fn test_object_patterns_are_not_implemented() {
        let error = parse("({a}) => a\n", &ParseOptions::default()).unwrap_err();
        assert!(error.is_not_implemented());
    }
}
