//! Expression parsing
//!
//!     The functions nest from the most general form down to atomic expressions. Each
//!     level lets the one below it parse and wraps the result when its own construct is
//!     present:
//!
//!         parse_expression                     a; b; c
//!         parse_maybe_keyword_or_assignment    yield, if/then/else, a = b
//!         parse_operators                      precedence climbing over the table
//!         parse_maybe_unary                    prefix operators (not implemented)
//!         parse_expression_subscripts          a.b, a[b], a(b), a! b, a`t`, a::b
//!         parse_atomic                         names, literals, groups, arrays
//!
//!     Binary operators use precedence climbing rather than one function per level.
//!     Assignment is right associative by recursion.

use super::operators::{OperatorNode, OperatorTable};
use super::parser::{is_terminator, Marker, Parser};
use super::patterns::ListOptions;
use crate::taco::ast::{Node, NodeKind};
use crate::taco::error::{ParseError, ParseResult, SyntaxErrorKind};
use crate::taco::lexing::ScopeFlags;
use crate::taco::token::TokenKind;
use tracing::trace;

impl<'a> Parser<'a> {
    /// An expression, or a sequence of expressions separated by `;`
    pub fn parse_expression(&mut self) -> ParseResult<Node> {
        let start = self.start();
        let first = self.parse_maybe_keyword_or_assignment()?;
        if !self.at(TokenKind::Semi) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(TokenKind::Semi)? {
            expressions.push(self.parse_maybe_keyword_or_assignment()?);
        }
        Ok(self.finish(start, NodeKind::SequenceExpression { expressions }))
    }

    pub fn parse_maybe_keyword_or_assignment(&mut self) -> ParseResult<Node> {
        self.nested(Self::parse_keyword_or_assignment)
    }

    fn parse_keyword_or_assignment(&mut self) -> ParseResult<Node> {
        match self.cur_kind() {
            TokenKind::Yield => return self.parse_yield(),
            TokenKind::If => return self.parse_conditional(),
            _ => {}
        }

        let extensions = self.extensions.clone();
        for extension in &extensions {
            if let Some(node) = extension.parse_keyword_expression(self)? {
                return Ok(node);
            }
        }

        let start = self.start();
        if self.at(TokenKind::ParenL) {
            self.tokenizer.state.potential_lambda_at = Some(start.offset);
        }
        let left = self.parse_operators()?;

        let kind = self.cur_kind();
        if !kind.is_assign() {
            return Ok(left);
        }
        let operator = kind.code().to_string();
        let left = self.to_assignable(left, kind)?;
        self.next()?;
        let right = self.parse_maybe_keyword_or_assignment()?;
        Ok(self.finish(
            start,
            NodeKind::AssignmentExpression {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
        ))
    }

    fn parse_yield(&mut self) -> ParseResult<Node> {
        let start = self.start();
        if !self.scope().in_generator && !self.options.allow_yield_outside_generator {
            return Err(ParseError::syntax(
                SyntaxErrorKind::InvalidYield,
                "'yield' is only allowed inside a generator",
                start.offset,
                start.position,
            ));
        }
        self.next()?;
        let delegate = self.eat(TokenKind::Star)?;
        let argument = if !delegate && is_terminator(self.cur_kind()) {
            None
        } else {
            Some(Box::new(self.parse_maybe_keyword_or_assignment()?))
        };
        Ok(self.finish(start, NodeKind::YieldExpression { argument, delegate }))
    }

    /// `if test then consequent else alternate`
    fn parse_conditional(&mut self) -> ParseResult<Node> {
        let start = self.start();
        self.expect(TokenKind::If)?;
        let test = self.parse_maybe_keyword_or_assignment()?;
        self.expect(TokenKind::Then)?;
        let consequent = self.parse_maybe_keyword_or_assignment()?;
        self.expect(TokenKind::Else)?;
        let alternate = self.parse_maybe_keyword_or_assignment()?;
        Ok(self.finish(
            start,
            NodeKind::ConditionalExpression {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
        ))
    }

    fn parse_operators(&mut self) -> ParseResult<Node> {
        let start = self.start();
        let left = self.parse_maybe_unary()?;
        self.parse_operator(left, start, -1)
    }

    /// Precedence climbing: fold operators binding tighter than `min_power` into `left`
    fn parse_operator(
        &mut self,
        mut left: Node,
        start: Marker,
        min_power: i32,
    ) -> ParseResult<Node> {
        loop {
            let kind = self.cur_kind();
            let Some(descriptor) = self.operators.get(kind).cloned() else {
                return Ok(left);
            };
            let suppressed = kind == TokenKind::In && self.scope().in_for_header;
            if suppressed || descriptor.power <= min_power {
                return Ok(left);
            }

            self.next()?;
            let right_start = self.start();
            let right = self.parse_maybe_unary()?;
            let threshold = if descriptor.right_associative {
                descriptor.power - 1
            } else {
                descriptor.power
            };
            // right-associative chains recurse once per operator
            let right = if descriptor.right_associative {
                self.nested(|parser| parser.parse_operator(right, right_start, threshold))?
            } else {
                self.parse_operator(right, right_start, threshold)?
            };

            let operator = descriptor.operator.to_string();
            let raw_operator = OperatorTable::raw_operator(kind, &descriptor);
            let (left_box, right) = (Box::new(left), Box::new(right));
            left = self.finish(
                start,
                match descriptor.node {
                    OperatorNode::Binary => NodeKind::BinaryExpression {
                        operator,
                        raw_operator,
                        left: left_box,
                        right,
                    },
                    OperatorNode::Logical => NodeKind::LogicalExpression {
                        operator,
                        raw_operator,
                        left: left_box,
                        right,
                    },
                },
            );
        }
    }

    fn parse_maybe_unary(&mut self) -> ParseResult<Node> {
        if self.cur_kind().is_prefix() {
            return Err(self.not_implemented("prefix operators"));
        }
        self.parse_expression_subscripts()
    }

    fn parse_expression_subscripts(&mut self) -> ParseResult<Node> {
        let start = self.start();
        let potential_lambda_at = self.tokenizer.state.potential_lambda_at;
        let node = self.parse_atomic()?;

        let is_arrow = matches!(node.kind, NodeKind::ArrowFunctionExpression { .. });
        if is_arrow && potential_lambda_at == Some(start.offset) {
            return Ok(node);
        }
        self.parse_subscripts(node, start, false)
    }

    /// Callee of a bind expression: an atom with member access but no calls
    fn parse_non_call_expression(&mut self) -> ParseResult<Node> {
        let start = self.start();
        let node = self.parse_atomic()?;
        self.parse_subscripts(node, start, true)
    }

    fn parse_subscripts(&mut self, base: Node, start: Marker, no_calls: bool) -> ParseResult<Node> {
        let mut node = base;
        loop {
            node = match self.cur_kind() {
                TokenKind::DoubleColon if !no_calls => {
                    self.next()?;
                    let callee = self.parse_non_call_expression()?;
                    self.finish(
                        start,
                        NodeKind::BindExpression {
                            object: Box::new(node),
                            callee: Box::new(callee),
                        },
                    )
                }
                TokenKind::Dot => {
                    self.next()?;
                    let property = self.parse_identifier(true)?;
                    self.finish(
                        start,
                        NodeKind::MemberExpression {
                            object: Box::new(node),
                            property: Box::new(property),
                            computed: false,
                        },
                    )
                }
                TokenKind::BracketL => {
                    let open = self.start();
                    self.next()?;
                    let property = self.parse_expression()?;
                    self.expect_close(TokenKind::BracketR, open)?;
                    self.finish(
                        start,
                        NodeKind::MemberExpression {
                            object: Box::new(node),
                            property: Box::new(property),
                            computed: true,
                        },
                    )
                }
                TokenKind::ParenL if !no_calls => {
                    let open = self.start();
                    self.next()?;
                    let (arguments, indented) = self.parse_list(
                        open,
                        TokenKind::ParenR,
                        ListOptions {
                            allow_empty: false,
                            allow_trailing_comma: true,
                            rest_must_be_last: false,
                        },
                        Self::parse_argument,
                    )?;
                    self.finish(
                        start,
                        NodeKind::CallExpression {
                            callee: Box::new(node),
                            arguments: arguments.into_iter().flatten().collect(),
                            exclamation: false,
                            indented,
                        },
                    )
                }
                TokenKind::Excl if !no_calls => {
                    self.next()?;
                    let (arguments, indented) = self.parse_excl_arguments()?;
                    self.finish(
                        start,
                        NodeKind::CallExpression {
                            callee: Box::new(node),
                            arguments,
                            exclamation: true,
                            indented,
                        },
                    )
                }
                TokenKind::BackQuote => {
                    let quasi = self.parse_template()?;
                    self.finish(
                        start,
                        NodeKind::TaggedTemplateExpression {
                            tag: Box::new(node),
                            quasi: Box::new(quasi),
                        },
                    )
                }
                _ => return Ok(node),
            };
        }
    }

    /// Arguments of `callee!`: the rest of the line, or an indented block, one per line
    fn parse_excl_arguments(&mut self) -> ParseResult<(Vec<Node>, bool)> {
        if self.eat(TokenKind::Indent)? {
            let mut arguments = Vec::new();
            while !self.eat(TokenKind::Dedent)? {
                self.expect(TokenKind::Newline)?;
                arguments.push(self.parse_argument()?);
            }
            return Ok((arguments, true));
        }
        if is_terminator(self.cur_kind()) {
            return Ok((Vec::new(), false));
        }
        let mut arguments = vec![self.parse_argument()?];
        while self.eat(TokenKind::Comma)? {
            arguments.push(self.parse_argument()?);
        }
        Ok((arguments, false))
    }

    /// A call argument or array element, spread allowed
    pub(crate) fn parse_argument(&mut self) -> ParseResult<Node> {
        if !self.at(TokenKind::Ellipsis) {
            return self.parse_maybe_keyword_or_assignment();
        }
        let start = self.start();
        self.next()?;
        let argument = self.parse_maybe_keyword_or_assignment()?;
        Ok(self.finish(
            start,
            NodeKind::SpreadElement {
                argument: Box::new(argument),
            },
        ))
    }

    pub fn parse_atomic(&mut self) -> ParseResult<Node> {
        let can_be_arrow = self.tokenizer.state.potential_lambda_at == Some(self.cur().start());
        match self.cur_kind() {
            TokenKind::Super => Err(self.not_implemented("super")),
            TokenKind::This => {
                let start = self.start();
                self.next()?;
                Ok(self.finish(start, NodeKind::ThisExpression))
            }
            TokenKind::Name => self.parse_identifier(false),
            TokenKind::Num
            | TokenKind::String
            | TokenKind::Regexp
            | TokenKind::Null
            | TokenKind::True
            | TokenKind::False => self.parse_literal(),
            TokenKind::BackQuote => self.parse_template(),
            TokenKind::BracketL => self.parse_array_expression(),
            TokenKind::ParenL => self.parse_paren_and_distinguish(can_be_arrow),
            TokenKind::BraceL => Err(self.not_implemented("object expressions")),
            _ => {
                let extensions = self.extensions.clone();
                for extension in &extensions {
                    if let Some(node) = extension.parse_atomic(self)? {
                        return Ok(node);
                    }
                }
                Err(self.unexpected())
            }
        }
    }

    /// `( ... )`: arrow function parameters or a parenthesized expression
    fn parse_paren_and_distinguish(&mut self, can_be_arrow: bool) -> ParseResult<Node> {
        let start = self.start();

        if can_be_arrow {
            let snapshot = self.tokenizer.snapshot();
            match self.parse_arrow_params(start) {
                Ok(Some(params)) => return self.parse_arrow_body(start, params),
                Ok(None) | Err(_) => {
                    trace!(offset = start.offset, "not arrow parameters, reparsing as group");
                    self.tokenizer.restore(snapshot);
                }
            }
        }

        self.expect(TokenKind::ParenL)?;
        let expression = self.parse_expression()?;
        self.expect_close(TokenKind::ParenR, start)?;
        Ok(self.finish(
            start,
            NodeKind::ParenthesizedExpression {
                expression: Box::new(expression),
            },
        ))
    }

    /// Speculative half of arrow parsing: `(params)` followed by `=>`
    fn parse_arrow_params(&mut self, open: Marker) -> ParseResult<Option<Vec<Node>>> {
        self.expect(TokenKind::ParenL)?;
        let params = self.parse_binding_list(open, TokenKind::ParenR)?;
        if self.at(TokenKind::Arrow) {
            Ok(Some(params))
        } else {
            Ok(None)
        }
    }

    fn parse_arrow_body(&mut self, start: Marker, params: Vec<Node>) -> ParseResult<Node> {
        self.expect(TokenKind::Arrow)?;
        let outer = self.scope();
        self.set_scope(ScopeFlags {
            in_function: true,
            in_generator: false,
            in_async: false,
            in_for_header: false,
        });
        let body = self.parse_maybe_keyword_or_assignment();
        self.set_scope(outer);
        let body = body?;
        Ok(self.finish(
            start,
            NodeKind::ArrowFunctionExpression {
                params,
                body: Box::new(body),
            },
        ))
    }
}
