//! AST Snapshot - a normalized intermediate representation of the tree
//!
//! The snapshot captures node types, a short label and a few attributes per node so
//! that presentation formats (treeviz today) never walk [`Node`] themselves.

use super::node::{LiteralValue, Node, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstSnapshot {
    /// The type of node (e.g., "Identifier", "CallExpression")
    pub node_type: String,

    /// The primary label of the node
    pub label: String,

    /// Additional attributes specific to the node type
    pub attributes: BTreeMap<String, String>,

    /// Child nodes in source order
    pub children: Vec<AstSnapshot>,

    /// 1-based line the node starts on
    pub line: usize,
}

impl AstSnapshot {
    pub fn new(node_type: impl Into<String>, label: impl Into<String>, line: usize) -> Self {
        Self {
            node_type: node_type.into(),
            label: label.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            line,
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<AstSnapshot>) -> Self {
        self.children.extend(children);
        self
    }
}

fn label(node: &Node) -> String {
    match &node.kind {
        NodeKind::Program { body } => format!("{} statements", body.len()),
        NodeKind::Identifier { name } => name.clone(),
        NodeKind::Literal { raw, .. } => raw.clone(),
        NodeKind::TemplateElement { raw, .. } => raw.clone(),
        NodeKind::BinaryExpression {
            operator,
            raw_operator,
            ..
        }
        | NodeKind::LogicalExpression {
            operator,
            raw_operator,
            ..
        } => raw_operator.clone().unwrap_or_else(|| operator.clone()),
        NodeKind::AssignmentExpression { operator, .. } => operator.clone(),
        NodeKind::MemberExpression { computed, .. } => {
            if *computed { "[]" } else { "." }.to_string()
        }
        NodeKind::CallExpression {
            arguments,
            exclamation,
            ..
        } => format!(
            "{}{} args",
            if *exclamation { "! " } else { "" },
            arguments.len()
        ),
        NodeKind::ArrayExpression { elements, .. } | NodeKind::ArrayPattern { elements, .. } => {
            format!("{} items", elements.len())
        }
        NodeKind::SequenceExpression { expressions } => format!("{} items", expressions.len()),
        NodeKind::YieldExpression { delegate, .. } => {
            if *delegate { "yield*" } else { "yield" }.to_string()
        }
        NodeKind::ArrowFunctionExpression { params, .. } => format!("{} params", params.len()),
        _ => String::new(),
    }
}

/// Create a snapshot of a node and all its descendants
pub fn snapshot_node(node: &Node) -> AstSnapshot {
    let mut snapshot = AstSnapshot::new(node.type_name(), label(node), node.range.start.line);

    if let NodeKind::Literal { value, .. } = &node.kind {
        let kind = match value {
            LiteralValue::Null => "null",
            LiteralValue::Boolean(_) => "boolean",
            LiteralValue::Number(_) => "number",
            LiteralValue::String(_) => "string",
            LiteralValue::RegExp { .. } => "regexp",
        };
        snapshot = snapshot.with_attribute("kind", kind);
    }
    let comments = node.leading_comments.len()
        + node.inner_comments.len()
        + node.trailing_comments.len();
    if comments > 0 {
        snapshot = snapshot.with_attribute("comments", comments.to_string());
    }

    snapshot.with_children(node.children().into_iter().map(snapshot_node).collect())
}
