//! Comment attachment
//!
//!     The tokenizer collects comments into one flat table in source order. After the
//!     parse, [`attach`] hands each of them to exactly one node, walking the tree depth
//!     first. At each node the comments that sit between its children (inside the node,
//!     outside every child) form the node's manifest, and are queued in order:
//!
//!     - reaching a child with a non-empty queue classifies the queue onto that child,
//!       then the child is processed with the comments inside its own extent
//!     - comments left over after the last child become trailing comments of that child,
//!       or are classified onto the node itself when it has no children
//!
//!     A statement's extent runs to the end of its last line, so `foo() # note` keeps its
//!     comment; leftovers at statement level trail the statement itself.
//!
//! Classification
//!
//!     Comments starting before the node are leading. Of the rest, everything before the
//!     first line comment that starts on or after the node's end line is inner; from that
//!     comment on they are trailing. At the Program root every remaining comment is inner.

use crate::taco::ast::{Comment, Node, NodeKind};
use std::iter::Peekable;
use tracing::debug;

/// Distribute `comments` (in source order) over the tree rooted at `root`
pub fn attach(root: &mut Node, comments: &[Comment]) {
    if comments.is_empty() {
        return;
    }
    traverse(root, comments.to_vec());
    debug!(
        comments = comments.len(),
        attached = root.attached_comment_count(),
        "attached comments"
    );
}

fn is_statement(node: &Node) -> bool {
    matches!(node.kind, NodeKind::ExpressionStatement { .. })
}

/// Take comments from `pending` while `belongs` holds
fn take_while_belongs<I: Iterator<Item = Comment>>(
    pending: &mut Peekable<I>,
    belongs: impl Fn(&Comment) -> bool,
) -> Vec<Comment> {
    let mut taken = Vec::new();
    while let Some(comment) = pending.next_if(|c| belongs(c)) {
        taken.push(comment);
    }
    taken
}

fn traverse(node: &mut Node, comments: Vec<Comment>) {
    let mut pending = comments.into_iter().peekable();
    let mut queue: Vec<Comment> = Vec::new();
    let mut last_child = None;

    for (index, child) in node.children_mut().into_iter().enumerate() {
        let child_start = child.start();
        queue.extend(take_while_belongs(&mut pending, |c| c.start() < child_start));

        let child_end = child.end();
        let end_line = child.range.end.line;
        let statement = is_statement(child);
        let inside = take_while_belongs(&mut pending, |c| {
            c.start() < child_end || (statement && c.range.start.line == end_line)
        });

        if !queue.is_empty() {
            classify(child, std::mem::take(&mut queue));
        }
        if !inside.is_empty() {
            traverse(child, inside);
        }
        last_child = Some(index);
    }

    queue.extend(pending);
    if queue.is_empty() {
        return;
    }
    if is_statement(node) {
        node.trailing_comments.extend(queue);
        return;
    }
    match last_child {
        Some(index) => {
            if let Some(child) = node.children_mut().into_iter().nth(index) {
                child.trailing_comments.extend(queue);
            }
        }
        None => classify(node, queue),
    }
}

/// Split queued comments into the node's leading, inner and trailing lists
fn classify(node: &mut Node, comments: Vec<Comment>) {
    let start = node.start();
    let first_inner = comments
        .iter()
        .position(|c| c.start() >= start)
        .unwrap_or(comments.len());

    let first_trailing = if matches!(node.kind, NodeKind::Program { .. }) {
        comments.len()
    } else {
        let end_line = node.range.end.line;
        comments[first_inner..]
            .iter()
            .position(|c| c.is_line() && c.range.start.line >= end_line)
            .map(|i| first_inner + i)
            .unwrap_or(comments.len())
    };

    let mut comments = comments;
    let trailing = comments.split_off(first_trailing);
    let inner = comments.split_off(first_inner);
    node.leading_comments.extend(comments);
    node.inner_comments.extend(inner);
    node.trailing_comments.extend(trailing);
}

#[cfg(test)]
mod tests {
    use crate::taco::ast::NodeKind;
    use crate::taco::parsing::{parse, ParseOptions};

    fn parse_ok(source: &str) -> crate::taco::ast::File {
        parse(source, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn test_leading_comment_on_statement() {
        let file = parse_ok("# note\nfoo()\n");
        let statement = &file.statements()[0];
        assert_eq!(statement.leading_comments.len(), 1);
        assert_eq!(statement.leading_comments[0].value, " note");
    }

    #[test]
    fn test_same_line_comment_trails_statement() {
        let file = parse_ok("foo() # note\nbar()\n");
        let statements = file.statements();
        assert_eq!(statements[0].trailing_comments.len(), 1);
        assert!(statements[1].leading_comments.is_empty());
        assert_eq!(file.expression(0).unwrap().attached_comment_count(), 0);
    }

    #[test]
    fn test_comment_only_file_is_inner() {
        let file = parse_ok("# a\n#* b *#\n");
        assert_eq!(file.program.inner_comments.len(), 2);
        assert!(file.program.leading_comments.is_empty());
    }

    #[test]
    fn test_final_comment_trails_last_statement() {
        let file = parse_ok("a\nb\n# end\n");
        assert_eq!(file.statements()[1].trailing_comments.len(), 1);
    }

    #[test]
    fn test_comment_between_arguments_leads_next() {
        let file = parse_ok("f(\n  a\n  # about b\n  b\n)\n");
        let NodeKind::CallExpression { arguments, .. } = &file.expression(0).unwrap().kind else {
            panic!("expected call");
        };
        assert_eq!(arguments[1].leading_comments.len(), 1);
        assert!(arguments[0].trailing_comments.is_empty());
    }

    #[test]
    fn test_every_comment_attached_once() {
        let file = parse_ok("# one\na = [ #* two *# b, c] # three\n# four\nd\n# five\n");
        assert_eq!(file.comments.len(), 5);
        assert_eq!(file.program.attached_comment_count(), 5);
    }
}
