//! Lexical context stack
//!
//!     Brackets push a context and their closers pop it. The context decides two things:
//!     whether newlines and indentation are significant, and whether template text is
//!     being read.
//!
//!     `(` and `[` are ambiguous. After a token that can end an expression they open call
//!     arguments or a computed member; anywhere else they open a grouping or a list.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Context {
    /// File level
    Statement,
    /// `(` grouping, arrow parameters
    ParenExpression,
    /// `(` call arguments
    ParenArguments,
    /// `[` array literal or pattern
    BracketList,
    /// `[` computed member access
    BracketMember,
    Brace,
    /// Between backquotes
    Template,
    /// Inside `${ }`
    TemplateExpression,
}

impl Context {
    /// Whether newlines produce layout tokens in this context
    pub fn whitespace_significant(self) -> bool {
        !matches!(
            self,
            Context::ParenExpression | Context::BracketMember | Context::TemplateExpression
        )
    }
}
