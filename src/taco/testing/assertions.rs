//! Fluent assertion API for tree nodes

use super::matchers::TextMatch;
use crate::taco::ast::{File, LiteralValue, Node, NodeKind, Position};

// ============================================================================
// Entry Points
// ============================================================================

/// Create an assertion builder for a parsed file
pub fn assert_file(file: &File) -> FileAssertion<'_> {
    FileAssertion { file }
}

/// Create an assertion builder for any node
pub fn assert_node(node: &Node) -> NodeAssertion<'_> {
    NodeAssertion {
        node,
        context: node.type_name().to_string(),
    }
}

fn summarize(nodes: &[&Node]) -> String {
    nodes
        .iter()
        .map(|node| node.type_name())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// File Assertions
// ============================================================================

pub struct FileAssertion<'a> {
    file: &'a File,
}

impl<'a> FileAssertion<'a> {
    pub fn statement_count(self, expected: usize) -> Self {
        let statements: Vec<&Node> = self.file.statements().iter().collect();
        assert_eq!(
            statements.len(),
            expected,
            "Expected {} statements, found {}: [{}]",
            expected,
            statements.len(),
            summarize(&statements)
        );
        self
    }

    pub fn comment_count(self, expected: usize) -> Self {
        assert_eq!(
            self.file.comments.len(),
            expected,
            "Expected {} comments in the table, found {}",
            expected,
            self.file.comments.len()
        );
        self
    }

    /// Assert on the expression of statement `index`
    pub fn expression<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let node = self.file.expression(index).unwrap_or_else(|| {
            panic!(
                "Statement index {} out of bounds (file has {} statements)",
                index,
                self.file.statements().len()
            )
        });
        assertion(NodeAssertion {
            node,
            context: format!("body[{}].expression", index),
        });
        self
    }

    /// Assert on statement `index` itself
    pub fn statement<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let statements = self.file.statements();
        assert!(
            index < statements.len(),
            "Statement index {} out of bounds (file has {} statements)",
            index,
            statements.len()
        );
        assertion(NodeAssertion {
            node: &statements[index],
            context: format!("body[{}]", index),
        });
        self
    }
}

// ============================================================================
// Node Assertions
// ============================================================================

pub struct NodeAssertion<'a> {
    node: &'a Node,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Assert the ESTree type name
    pub fn kind(self, expected: &str) -> Self {
        assert_eq!(
            self.node.type_name(),
            expected,
            "{}: Expected {}, found {}",
            self.context,
            expected,
            self.node.type_name()
        );
        self
    }

    pub fn name(self, expected: &str) -> Self {
        match self.node.identifier_name() {
            Some(name) => TextMatch::Exact(expected.to_string()).assert(name, &self.context),
            None => panic!(
                "{}: Expected Identifier '{}', found {}",
                self.context,
                expected,
                self.node.type_name()
            ),
        }
        self
    }

    /// Assert the normalized operator of a binary, logical or assignment node
    pub fn operator(self, expected: &str) -> Self {
        let operator = match &self.node.kind {
            NodeKind::BinaryExpression { operator, .. }
            | NodeKind::LogicalExpression { operator, .. }
            | NodeKind::AssignmentExpression { operator, .. } => operator,
            _ => panic!(
                "{}: Expected an operator node, found {}",
                self.context,
                self.node.type_name()
            ),
        };
        assert_eq!(
            operator, expected,
            "{}: Expected operator '{}', found '{}'",
            self.context, expected, operator
        );
        self
    }

    /// Assert the operator spelling recorded from the source
    pub fn raw_operator(self, expected: Option<&str>) -> Self {
        let raw = match &self.node.kind {
            NodeKind::BinaryExpression { raw_operator, .. }
            | NodeKind::LogicalExpression { raw_operator, .. } => raw_operator.as_deref(),
            _ => panic!(
                "{}: Expected a binary or logical node, found {}",
                self.context,
                self.node.type_name()
            ),
        };
        assert_eq!(
            raw, expected,
            "{}: Expected raw operator {:?}, found {:?}",
            self.context, expected, raw
        );
        self
    }

    /// Assert the raw source of a Literal
    pub fn raw(self, expected: &str) -> Self {
        match &self.node.kind {
            NodeKind::Literal { raw, .. } => {
                TextMatch::Exact(expected.to_string()).assert(raw, &self.context)
            }
            _ => panic!(
                "{}: Expected Literal, found {}",
                self.context,
                self.node.type_name()
            ),
        }
        self
    }

    pub fn number(self, expected: f64) -> Self {
        match &self.node.kind {
            NodeKind::Literal {
                value: LiteralValue::Number(value),
                ..
            } => assert_eq!(
                *value, expected,
                "{}: Expected number {}, found {}",
                self.context, expected, value
            ),
            _ => panic!(
                "{}: Expected numeric Literal, found {:?}",
                self.context, self.node.kind
            ),
        }
        self
    }

    pub fn string(self, expected: &str) -> Self {
        match &self.node.kind {
            NodeKind::Literal {
                value: LiteralValue::String(value),
                ..
            } => TextMatch::Exact(expected.to_string()).assert(value, &self.context),
            _ => panic!(
                "{}: Expected string Literal, found {:?}",
                self.context, self.node.kind
            ),
        }
        self
    }

    pub fn child_count(self, expected: usize) -> Self {
        let children = self.node.children();
        assert_eq!(
            children.len(),
            expected,
            "{}: Expected {} children, found {}: [{}]",
            self.context,
            expected,
            children.len(),
            summarize(&children)
        );
        self
    }

    /// Assert on child `index` in source order
    pub fn child<F>(self, index: usize, assertion: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let children = self.node.children();
        assert!(
            index < children.len(),
            "{}: Child index {} out of bounds ({} has {} children)",
            self.context,
            index,
            self.node.type_name(),
            children.len()
        );
        let child = children[index];
        assertion(NodeAssertion {
            node: child,
            context: format!("{}[{}]", self.context, index),
        });
        self
    }

    /// Assert the source text the node covers
    pub fn source(self, source: &str, expected: TextMatch) -> Self {
        let text = source.get(self.node.start()..self.node.end()).unwrap_or("");
        expected.assert(text, &self.context);
        self
    }

    pub fn starts_at(self, line: usize, column: usize) -> Self {
        let expected = Position::new(line, column);
        assert_eq!(
            self.node.range.start, expected,
            "{}: Expected start {}, found {}",
            self.context, expected, self.node.range.start
        );
        self
    }

    pub fn span(self, start: usize, end: usize) -> Self {
        assert_eq!(
            self.node.range.span,
            start..end,
            "{}: Expected span {}..{}, found {:?}",
            self.context,
            start,
            end,
            self.node.range.span
        );
        self
    }

    pub fn leading_comments(self, expected: usize) -> Self {
        let actual = self.node.leading_comments.len();
        self.comment_list("leading", actual, expected)
    }

    pub fn inner_comments(self, expected: usize) -> Self {
        let actual = self.node.inner_comments.len();
        self.comment_list("inner", actual, expected)
    }

    pub fn trailing_comments(self, expected: usize) -> Self {
        let actual = self.node.trailing_comments.len();
        self.comment_list("trailing", actual, expected)
    }

    fn comment_list(self, list: &str, actual: usize, expected: usize) -> Self {
        assert_eq!(
            actual, expected,
            "{}: Expected {} {} comments, found {}",
            self.context, expected, list, actual
        );
        self
    }
}
