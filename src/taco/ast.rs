//! Abstract syntax tree
//!
//!     The tree follows ESTree naming. [`File`] is what a parse returns: the
//!     [`Program`](NodeKind::Program) root plus everything the printer needs to reproduce
//!     the source (the comment table, the full token and trivia log, the indentation unit).
//!
//!     Only the tree and the comment table are part of the serialized shape; the token log
//!     is a printing aid and is skipped.

pub mod comment;
pub mod node;
pub mod range;
pub mod snapshot;

pub use comment::{Comment, CommentKind};
pub use node::{LiteralValue, Node, NodeKind};
pub use range::{Position, Range, SourceLocation};
pub use snapshot::{snapshot_node, AstSnapshot};

use crate::taco::error::Warning;
use crate::taco::lexing::IndentUnit;
use crate::taco::token::Token;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub program: Node,
    pub comments: Vec<Comment>,
    /// Significant tokens, layout tokens and trivia in source order
    #[serde(skip)]
    pub tokens: Vec<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indentation: Option<IndentUnit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl File {
    /// Statements of the program body
    pub fn statements(&self) -> &[Node] {
        match &self.program.kind {
            NodeKind::Program { body } => body,
            _ => &[],
        }
    }

    /// Expression of the statement at `index`
    pub fn expression(&self, index: usize) -> Option<&Node> {
        match &self.statements().get(index)?.kind {
            NodeKind::ExpressionStatement { expression } => Some(expression),
            _ => None,
        }
    }

    /// Whether the token log needed for lossless printing is present
    pub fn has_tokens(&self) -> bool {
        !self.tokens.is_empty()
    }
}
