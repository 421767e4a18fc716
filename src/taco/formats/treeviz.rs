//! Treeviz formatter for tacoscript trees
//!
//! Treeviz is a visual representation of the tree, one line per node, with an icon for
//! the node kind and a short label:
//!
//!     ⧉ 1 statements
//!     └─ ¶
//!       └─ ≔ =
//!         ├─ ◦ a
//!         └─ ƒ 1 args
//!           ├─ ◦ f
//!           └─ ◦ b
//!
//! Icons
//!
//!     Program: ⧉
//!     ExpressionStatement: ¶
//!     Identifier: ◦
//!     Literal: ℓ
//!     ThisExpression: ⊙
//!     TemplateLiteral: ≋
//!     TemplateElement: ∙
//!     TaggedTemplateExpression: ⌗
//!     ArrayExpression: ☰
//!     ArrayPattern: ☷
//!     SpreadElement, RestElement: …
//!     BinaryExpression: ±
//!     LogicalExpression: ∨
//!     AssignmentExpression: ≔
//!     SequenceExpression: ⋯
//!     MemberExpression: →
//!     CallExpression: ƒ
//!     BindExpression: ∷
//!     ConditionalExpression: ⑂
//!     YieldExpression: ⇡
//!     ArrowFunctionExpression: λ
//!     ParenthesizedExpression: ◌
//!
//! With the `show-linum` parameter every line starts with the node's source line.

use super::{FormatError, Formatter};
use crate::taco::ast::{snapshot_node, AstSnapshot, File};
use std::collections::HashMap;

const LABEL_WIDTH: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated: String = s.chars().take(max_chars).collect();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

/// Get icon for a node type
fn get_icon(node_type: &str) -> &'static str {
    match node_type {
        "Program" => "⧉",
        "ExpressionStatement" => "¶",
        "Identifier" => "◦",
        "Literal" => "ℓ",
        "ThisExpression" => "⊙",
        "TemplateLiteral" => "≋",
        "TemplateElement" => "∙",
        "TaggedTemplateExpression" => "⌗",
        "ArrayExpression" => "☰",
        "ArrayPattern" => "☷",
        "SpreadElement" | "RestElement" => "…",
        "BinaryExpression" => "±",
        "LogicalExpression" => "∨",
        "AssignmentExpression" => "≔",
        "SequenceExpression" => "⋯",
        "MemberExpression" => "→",
        "CallExpression" => "ƒ",
        "BindExpression" => "∷",
        "ConditionalExpression" => "⑂",
        "YieldExpression" => "⇡",
        "ArrowFunctionExpression" => "λ",
        "ParenthesizedExpression" => "◌",
        _ => "○",
    }
}

fn node_line(snapshot: &AstSnapshot, prefix: &str, connector: &str, show_linum: bool) -> String {
    let icon = get_icon(&snapshot.node_type);
    let linum = if show_linum {
        format!("{:02} ", snapshot.line)
    } else {
        String::new()
    };
    let text = format!(
        "{}{}{}{} {}",
        linum,
        prefix,
        connector,
        icon,
        truncate(&snapshot.label, LABEL_WIDTH)
    );
    format!("{}\n", text.trim_end())
}

fn format_snapshot(
    snapshot: &AstSnapshot,
    prefix: &str,
    child_index: usize,
    child_count: usize,
    show_linum: bool,
) -> String {
    let is_last = child_index == child_count - 1;
    let connector = if is_last { "└─ " } else { "├─ " };
    let mut output = node_line(snapshot, prefix, connector, show_linum);

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    let count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        output += &format_snapshot(child, &child_prefix, i, count, show_linum);
    }
    output
}

fn format_root(snapshot: &AstSnapshot, show_linum: bool) -> String {
    let mut output = node_line(snapshot, "", "", show_linum);
    let count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        output += &format_snapshot(child, "", i, count, show_linum);
    }
    output
}

pub fn to_treeviz_str(file: &File) -> String {
    to_treeviz_str_with_params(file, &HashMap::new())
}

/// Render with formatter parameters; `show-linum` is the only one read
pub fn to_treeviz_str_with_params(file: &File, params: &HashMap<String, String>) -> String {
    let show_linum = params
        .get("show-linum")
        .map(|v| v != "false")
        .unwrap_or(false);
    format_root(&snapshot_node(&file.program), show_linum)
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, file: &File) -> Result<String, FormatError> {
        Ok(to_treeviz_str(file))
    }

    fn description(&self) -> &str {
        "Visual tree with one line per node"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taco::parsing::{parse, ParseOptions};

    fn treeviz(source: &str) -> String {
        to_treeviz_str(&parse(source, &ParseOptions::default()).unwrap())
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long label", 6), "a long...");
    }

    #[test]
    fn test_assignment_tree() {
        insta::assert_snapshot!(treeviz("a = f(b)\n").trim_end(), @r"
        ⧉ 1 statements
        └─ ¶
          └─ ≔ =
            ├─ ◦ a
            └─ ƒ 1 args
              ├─ ◦ f
              └─ ◦ b
        ");
    }

    #[test]
    fn test_sibling_statements() {
        insta::assert_snapshot!(treeviz("x + 1\n'hi'\n").trim_end(), @r"
        ⧉ 2 statements
        ├─ ¶
        │ └─ ± +
        │   ├─ ◦ x
        │   └─ ℓ 1
        └─ ¶
          └─ ℓ 'hi'
        ");
    }

    #[test]
    fn test_show_linum() {
        let file = parse("a\nb\n", &ParseOptions::default()).unwrap();
        let params = HashMap::from([("show-linum".to_string(), "true".to_string())]);
        let output = to_treeviz_str_with_params(&file, &params);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "01 ⧉ 2 statements");
        assert_eq!(lines[3], "02 └─ ¶");
    }

    #[test]
    fn test_unknown_type_icon() {
        assert_eq!(get_icon("Unknown"), "○");
    }
}
