//! Tree nodes
//!
//!     Every node is a [`Node`]: a [`NodeKind`] carrying the kind-specific children, the
//!     node's source range and its three comment lists. The kind set is closed, so code
//!     that walks the tree (comment attachment, printing, snapshots) matches exhaustively.
//!
//!     Serialized, a node is the familiar ESTree record: a `type` tag, kind fields, the
//!     byte span with line/column positions, and `leadingComments`, `innerComments` and
//!     `trailingComments` when present.

use super::comment::Comment;
use super::range::Range;
use serde::{Deserialize, Serialize};

fn is_false(value: &bool) -> bool {
    !*value
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(flatten)]
    pub range: Range,
    #[serde(
        rename = "leadingComments",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub leading_comments: Vec<Comment>,
    #[serde(rename = "innerComments", default, skip_serializing_if = "Vec::is_empty")]
    pub inner_comments: Vec<Comment>,
    #[serde(
        rename = "trailingComments",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub trailing_comments: Vec<Comment>,
}

/// Value of a `Literal` node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    RegExp { pattern: String, flags: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Program {
        body: Vec<Node>,
    },
    ExpressionStatement {
        expression: Box<Node>,
    },
    Identifier {
        name: String,
    },
    Literal {
        value: LiteralValue,
        raw: String,
    },
    ThisExpression,
    TemplateLiteral {
        quasis: Vec<Node>,
        expressions: Vec<Node>,
    },
    TemplateElement {
        raw: String,
        cooked: Option<String>,
        tail: bool,
    },
    TaggedTemplateExpression {
        tag: Box<Node>,
        quasi: Box<Node>,
    },
    ArrayExpression {
        elements: Vec<Option<Node>>,
        #[serde(default, skip_serializing_if = "is_false")]
        indented: bool,
    },
    SpreadElement {
        argument: Box<Node>,
    },
    BinaryExpression {
        operator: String,
        #[serde(
            rename = "rawOperator",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        raw_operator: Option<String>,
        left: Box<Node>,
        right: Box<Node>,
    },
    LogicalExpression {
        operator: String,
        #[serde(
            rename = "rawOperator",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        raw_operator: Option<String>,
        left: Box<Node>,
        right: Box<Node>,
    },
    AssignmentExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    SequenceExpression {
        expressions: Vec<Node>,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
    },
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
        #[serde(default, skip_serializing_if = "is_false")]
        exclamation: bool,
        #[serde(default, skip_serializing_if = "is_false")]
        indented: bool,
    },
    BindExpression {
        object: Box<Node>,
        callee: Box<Node>,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    YieldExpression {
        argument: Option<Box<Node>>,
        delegate: bool,
    },
    ArrowFunctionExpression {
        params: Vec<Node>,
        body: Box<Node>,
    },
    ParenthesizedExpression {
        expression: Box<Node>,
    },
    ArrayPattern {
        elements: Vec<Option<Node>>,
        #[serde(default, skip_serializing_if = "is_false")]
        indented: bool,
    },
    RestElement {
        argument: Box<Node>,
    },
}

impl NodeKind {
    /// The ESTree `type` tag
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "Program",
            NodeKind::ExpressionStatement { .. } => "ExpressionStatement",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::Literal { .. } => "Literal",
            NodeKind::ThisExpression => "ThisExpression",
            NodeKind::TemplateLiteral { .. } => "TemplateLiteral",
            NodeKind::TemplateElement { .. } => "TemplateElement",
            NodeKind::TaggedTemplateExpression { .. } => "TaggedTemplateExpression",
            NodeKind::ArrayExpression { .. } => "ArrayExpression",
            NodeKind::SpreadElement { .. } => "SpreadElement",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::AssignmentExpression { .. } => "AssignmentExpression",
            NodeKind::SequenceExpression { .. } => "SequenceExpression",
            NodeKind::MemberExpression { .. } => "MemberExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::BindExpression { .. } => "BindExpression",
            NodeKind::ConditionalExpression { .. } => "ConditionalExpression",
            NodeKind::YieldExpression { .. } => "YieldExpression",
            NodeKind::ArrowFunctionExpression { .. } => "ArrowFunctionExpression",
            NodeKind::ParenthesizedExpression { .. } => "ParenthesizedExpression",
            NodeKind::ArrayPattern { .. } => "ArrayPattern",
            NodeKind::RestElement { .. } => "RestElement",
        }
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<&Node> {
        match self {
            NodeKind::Program { body } => body.iter().collect(),
            NodeKind::SequenceExpression { expressions } => expressions.iter().collect(),
            NodeKind::ExpressionStatement { expression }
            | NodeKind::ParenthesizedExpression { expression } => vec![&**expression],
            NodeKind::SpreadElement { argument } | NodeKind::RestElement { argument } => {
                vec![&**argument]
            }
            NodeKind::Identifier { .. }
            | NodeKind::Literal { .. }
            | NodeKind::ThisExpression
            | NodeKind::TemplateElement { .. } => Vec::new(),
            NodeKind::TemplateLiteral {
                quasis,
                expressions,
            } => interleave(quasis.iter(), expressions.iter()),
            NodeKind::TaggedTemplateExpression { tag, quasi } => vec![&**tag, &**quasi],
            NodeKind::ArrayExpression { elements, .. } | NodeKind::ArrayPattern { elements, .. } => {
                elements.iter().flatten().collect()
            }
            NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. }
            | NodeKind::AssignmentExpression { left, right, .. } => vec![&**left, &**right],
            NodeKind::MemberExpression {
                object, property, ..
            } => vec![&**object, &**property],
            NodeKind::CallExpression {
                callee, arguments, ..
            } => std::iter::once(&**callee).chain(arguments.iter()).collect(),
            NodeKind::BindExpression { object, callee } => vec![&**object, &**callee],
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => vec![&**test, &**consequent, &**alternate],
            NodeKind::YieldExpression { argument, .. } => argument.iter().map(|a| &**a).collect(),
            NodeKind::ArrowFunctionExpression { params, body } => {
                params.iter().chain(std::iter::once(&**body)).collect()
            }
        }
    }

    /// Direct children in source order, mutably
    pub fn children_mut(&mut self) -> Vec<&mut Node> {
        match self {
            NodeKind::Program { body } => body.iter_mut().collect(),
            NodeKind::SequenceExpression { expressions } => expressions.iter_mut().collect(),
            NodeKind::ExpressionStatement { expression }
            | NodeKind::ParenthesizedExpression { expression } => vec![&mut **expression],
            NodeKind::SpreadElement { argument } | NodeKind::RestElement { argument } => {
                vec![&mut **argument]
            }
            NodeKind::Identifier { .. }
            | NodeKind::Literal { .. }
            | NodeKind::ThisExpression
            | NodeKind::TemplateElement { .. } => Vec::new(),
            NodeKind::TemplateLiteral {
                quasis,
                expressions,
            } => interleave(quasis.iter_mut(), expressions.iter_mut()),
            NodeKind::TaggedTemplateExpression { tag, quasi } => vec![&mut **tag, &mut **quasi],
            NodeKind::ArrayExpression { elements, .. } | NodeKind::ArrayPattern { elements, .. } => {
                elements.iter_mut().flatten().collect()
            }
            NodeKind::BinaryExpression { left, right, .. }
            | NodeKind::LogicalExpression { left, right, .. }
            | NodeKind::AssignmentExpression { left, right, .. } => vec![&mut **left, &mut **right],
            NodeKind::MemberExpression {
                object, property, ..
            } => vec![&mut **object, &mut **property],
            NodeKind::CallExpression {
                callee, arguments, ..
            } => std::iter::once(&mut **callee)
                .chain(arguments.iter_mut())
                .collect(),
            NodeKind::BindExpression { object, callee } => vec![&mut **object, &mut **callee],
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => vec![&mut **test, &mut **consequent, &mut **alternate],
            NodeKind::YieldExpression { argument, .. } => {
                argument.iter_mut().map(|a| &mut **a).collect()
            }
            NodeKind::ArrowFunctionExpression { params, body } => params
                .iter_mut()
                .chain(std::iter::once(&mut **body))
                .collect(),
        }
    }

    /// Whether a simple assignment (`+=` and friends) may target this node
    pub fn is_simple_target(&self) -> bool {
        matches!(
            self,
            NodeKind::Identifier { .. } | NodeKind::MemberExpression { .. }
        )
    }
}

fn interleave<T>(first: impl Iterator<Item = T>, second: impl Iterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    let mut second = second.peekable();
    for item in first {
        out.push(item);
        if let Some(next) = second.next() {
            out.push(next);
        }
    }
    out.extend(second);
    out
}

impl Node {
    pub fn new(kind: NodeKind, range: Range) -> Self {
        Self {
            kind,
            range,
            leading_comments: Vec::new(),
            inner_comments: Vec::new(),
            trailing_comments: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn start(&self) -> usize {
        self.range.span.start
    }

    pub fn end(&self) -> usize {
        self.range.span.end
    }

    pub fn children(&self) -> Vec<&Node> {
        self.kind.children()
    }

    pub fn children_mut(&mut self) -> Vec<&mut Node> {
        self.kind.children_mut()
    }

    /// Pre-order walk over this node and all descendants
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Number of comments attached to this node and its descendants
    pub fn attached_comment_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |node| {
            count += node.leading_comments.len()
                + node.inner_comments.len()
                + node.trailing_comments.len();
        });
        count
    }

    /// Name of an Identifier node
    pub fn identifier_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taco::ast::range::Position;

    fn ident(name: &str, start: usize) -> Node {
        let end = start + name.len();
        Node::new(
            NodeKind::Identifier {
                name: name.to_string(),
            },
            Range::new(start..end, Position::new(1, start), Position::new(1, end)),
        )
    }

    #[test]
    fn test_children_in_source_order() {
        let call = NodeKind::CallExpression {
            callee: Box::new(ident("f", 0)),
            arguments: vec![ident("a", 2), ident("b", 5)],
            exclamation: false,
            indented: false,
        };
        let names: Vec<_> = call
            .children()
            .iter()
            .filter_map(|n| n.identifier_name())
            .collect();
        assert_eq!(names, vec!["f", "a", "b"]);
    }

    #[test]
    fn test_array_holes_are_skipped() {
        let array = NodeKind::ArrayExpression {
            elements: vec![None, Some(ident("a", 7))],
            indented: false,
        };
        assert_eq!(array.children().len(), 1);
    }

    #[test]
    fn test_template_children_interleave() {
        let element = |start: usize| {
            Node::new(
                NodeKind::TemplateElement {
                    raw: String::new(),
                    cooked: Some(String::new()),
                    tail: false,
                },
                Range::point(start, Position::new(1, start)),
            )
        };
        let template = NodeKind::TemplateLiteral {
            quasis: vec![element(1), element(6)],
            expressions: vec![ident("x", 3)],
        };
        let types: Vec<_> = template.children().iter().map(|n| n.type_name()).collect();
        assert_eq!(types, vec!["TemplateElement", "Identifier", "TemplateElement"]);
    }

    #[test]
    fn test_serializes_estree_shape() {
        let node = ident("foo", 0);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Identifier");
        assert_eq!(json["name"], "foo");
        assert_eq!(json["span"]["end"], 3);
        assert!(json.get("leadingComments").is_none());
    }
}
