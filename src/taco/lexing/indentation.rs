//! Indentation unit
//!
//!     The first indented line of a file fixes the unit: one whitespace character and how
//!     many times it repeats (`"  "` is two spaces, `"\t"` one tab). Every later line must
//!     be indented by an exact multiple of that unit, character for character.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndentUnit {
    pub character: char,
    pub repeat: usize,
}

/// Why a line's leading whitespace does not fit the unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndentMismatch {
    /// Mixed characters in the very first indentation
    MixedCharacters,
    /// Wrong character, or a length that is not a multiple of the unit
    NotAMultiple,
}

impl IndentUnit {
    /// Derive the unit from the first indented line's leading whitespace
    pub fn establish(whitespace: &str) -> Result<IndentUnit, IndentMismatch> {
        let mut chars = whitespace.chars();
        let character = chars.next().ok_or(IndentMismatch::NotAMultiple)?;
        if !matches!(character, ' ' | '\t') || chars.any(|c| c != character) {
            return Err(IndentMismatch::MixedCharacters);
        }
        Ok(IndentUnit {
            character,
            repeat: whitespace.chars().count(),
        })
    }

    /// Nesting level of a line indented by `whitespace`
    pub fn level_of(&self, whitespace: &str) -> Result<usize, IndentMismatch> {
        let mut count = 0;
        for ch in whitespace.chars() {
            if ch != self.character {
                return Err(IndentMismatch::NotAMultiple);
            }
            count += 1;
        }
        if count % self.repeat != 0 {
            return Err(IndentMismatch::NotAMultiple);
        }
        Ok(count / self.repeat)
    }

    /// The unit as text, e.g. two spaces
    pub fn text(&self) -> String {
        std::iter::repeat(self.character).take(self.repeat).collect()
    }

    pub fn describe(&self) -> String {
        let name = if self.character == '\t' { "tab" } else { "space" };
        let plural = if self.repeat == 1 { "" } else { "s" };
        format!("{} {}{}", self.repeat, name, plural)
    }
}
