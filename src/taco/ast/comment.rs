//! Comments
//!
//! Every comment the tokenizer sees lands once in the file's comment table, in source
//! order. After attachment the same comment is also referenced from exactly one node.

use super::range::Range;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentKind {
    /// `# text` up to the end of the line
    #[serde(rename = "CommentLine")]
    Line,
    /// `#* text *#`, may span lines
    #[serde(rename = "CommentBlock")]
    Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "type")]
    pub kind: CommentKind,
    /// Text without the comment markers
    pub value: String,
    #[serde(flatten)]
    pub range: Range,
}

impl Comment {
    pub fn new(kind: CommentKind, value: impl Into<String>, range: Range) -> Self {
        Self {
            kind,
            value: value.into(),
            range,
        }
    }

    pub fn start(&self) -> usize {
        self.range.span.start
    }

    pub fn is_line(&self) -> bool {
        self.kind == CommentKind::Line
    }

    /// Source form of the comment
    pub fn to_source(&self) -> String {
        match self.kind {
            CommentKind::Line => format!("#{}", self.value),
            CommentKind::Block => format!("#*{}*#", self.value),
        }
    }
}
