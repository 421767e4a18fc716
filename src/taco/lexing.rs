//! Lexing
//!
//!     The lexer is pull based: the parser asks for one token at a time and the
//!     [`Tokenizer`] scans just enough input to produce it. This is what lets the lexical
//!     state (the context stack, the `expr_allowed` flag, the indentation level) follow the
//!     parse, and what makes snapshot/restore cheap.
//!
//! Layout
//!
//!     Tacoscript is indentation significant. Instead of emitting a token per indentation
//!     change at the start of a line, the tokenizer inserts zero-width Indent and Dedent
//!     tokens immediately before the newline that reveals the change:
//!
//!         f!                 Name Excl
//!           a                Indent Newline Name
//!           b                Newline Name
//!         g                  Dedent Newline Name
//!
//!     The first indented line fixes the [`IndentUnit`]; every later line must be indented
//!     by an exact multiple of it.
//!
//! Logs
//!
//!     Alongside the tokens, the tokenizer keeps append-only logs ([`TokenLogs`]): the
//!     significant tokens, every source element including whitespace and comments, the
//!     comment table and warnings. The printer replays the element log for lossless
//!     output. A [`Snapshot`] records the log lengths so a failed speculative parse can
//!     roll them back.
//!
//! File Layout
//!
//!     - context.rs: the lexical context stack entries
//!     - escapes.rs: string and template escape cooking
//!     - indentation.rs: the indentation unit
//!     - state.rs: scan state, logs, snapshots
//!     - tokenizer.rs: the scanner itself

pub mod context;
pub mod escapes;
pub mod indentation;
pub mod state;
pub mod tokenizer;

pub use context::Context;
pub use indentation::IndentUnit;
pub use state::{ScanState, ScopeFlags, Snapshot, TokenLogs};
pub use tokenizer::{tokenize, Tokenizer};
