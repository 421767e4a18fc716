//! Spacing rules
//!
//!     When a token is pushed, the buffer decides whether a space goes between it and the
//!     previous token. Two rule sets exist:
//!
//!         Mandatory   spaces the output cannot do without (`if a`, never `ifa`)
//!         Cosmetic    spaces for readability (`a + b`, `f(a, b)`); dropped when compact
//!
//!     Each set has two kinds of rule. A "space after" rule is keyed on the left token's
//!     kind. A "space when after" rule is keyed on the right token's kind and looked up by
//!     the left token's kind or, failing that, its keyword-ness. For a set, the built-in
//!     rules run first and then each [`PrinterExtension`] in registration order; the first
//!     rule that fires wins. The cosmetic set is consulted only when no mandatory rule fired.

use super::buffer::BufferToken;
use crate::taco::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    Mandatory,
    Cosmetic,
}

/// Outcome of a rule lookup
#[derive(Clone, Copy)]
pub enum SpacingTest {
    Always,
    When(fn(&BufferToken, &BufferToken) -> bool),
}

impl SpacingTest {
    pub fn fires(&self, left: &BufferToken, right: &BufferToken) -> bool {
        match self {
            SpacingTest::Always => true,
            SpacingTest::When(test) => test(left, right),
        }
    }
}

impl std::fmt::Debug for SpacingTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpacingTest::Always => write!(f, "Always"),
            SpacingTest::When(_) => write!(f, "When(..)"),
        }
    }
}

/// Printer half of a plugin. Every hook defaults to "no match".
pub trait PrinterExtension {
    fn space_after(&self, _spacing: Spacing, _left: TokenKind) -> Option<SpacingTest> {
        None
    }

    fn space_when_after(
        &self,
        _spacing: Spacing,
        _right: TokenKind,
        _left: TokenKind,
    ) -> Option<SpacingTest> {
        None
    }

    /// Source text for a token, overriding the built-in rendering
    fn to_code(&self, _token: &BufferToken) -> Option<String> {
        None
    }
}

/// Names, numbers and keywords: two of these in a row need a space
pub fn is_word_like(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Name | TokenKind::Num) || kind.is_keyword()
}

pub fn is_binary_operator(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        LogicalOr
            | LogicalAnd
            | BitOr
            | BitXor
            | BitAnd
            | Equality
            | Inequality
            | LooseEquality
            | LooseInequality
            | Lt
            | Gt
            | LtEq
            | GtEq
            | LShift
            | RShift
            | URShift
            | Plus
            | Minus
            | Star
            | Slash
            | Modulo
            | StarStar
    )
}

fn not_before_delegate(_left: &BufferToken, right: &BufferToken) -> bool {
    right.kind != TokenKind::Star
}

fn not_before_closer(_left: &BufferToken, right: &BufferToken) -> bool {
    !matches!(
        right.kind,
        TokenKind::ParenR | TokenKind::BracketR | TokenKind::BraceR | TokenKind::Comma
    )
}

/// Built-in rules keyed on the left token
pub fn space_after(spacing: Spacing, left: TokenKind) -> Option<SpacingTest> {
    use TokenKind::*;
    match spacing {
        Spacing::Mandatory => None,
        Spacing::Cosmetic => match left {
            Comma | Semi | Arrow | BlockComment => Some(SpacingTest::Always),
            Excl => Some(SpacingTest::When(not_before_closer)),
            Yield => Some(SpacingTest::When(not_before_delegate)),
            Then | Else | If | In | Instanceof | And | Or | Is | Isnt => Some(SpacingTest::Always),
            kind if kind.is_assign() || is_binary_operator(kind) => Some(SpacingTest::Always),
            _ => None,
        },
    }
}

/// Built-in rules keyed on the right token, looked up for the left token
pub fn space_when_after(spacing: Spacing, right: TokenKind, left: TokenKind) -> Option<SpacingTest> {
    use TokenKind::*;
    match spacing {
        // a word straight after a regexp would read as its flags
        Spacing::Mandatory => (is_word_like(right) && (is_word_like(left) || left == Regexp))
            .then_some(SpacingTest::Always),
        Spacing::Cosmetic => match right {
            LineComment | BlockComment | Arrow | Then | Else => Some(SpacingTest::Always),
            Star if left == Yield => None,
            kind if kind.is_assign() || is_binary_operator(kind) => Some(SpacingTest::Always),
            In | Instanceof | And | Or | Is | Isnt if !left.is_keyword() => {
                Some(SpacingTest::Always)
            }
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fires(spacing: Spacing, left: TokenKind, right: TokenKind) -> bool {
        let l = BufferToken::new(left);
        let r = BufferToken::new(right);
        space_after(spacing, left).is_some_and(|t| t.fires(&l, &r))
            || space_when_after(spacing, right, left).is_some_and(|t| t.fires(&l, &r))
    }

    #[test]
    fn test_keyword_then_name_is_mandatory() {
        assert!(fires(Spacing::Mandatory, TokenKind::Then, TokenKind::Name));
        assert!(fires(Spacing::Mandatory, TokenKind::Name, TokenKind::Or));
        assert!(!fires(Spacing::Mandatory, TokenKind::Name, TokenKind::Plus));
    }

    #[test]
    fn test_word_after_regexp_is_mandatory() {
        assert!(fires(Spacing::Mandatory, TokenKind::Regexp, TokenKind::In));
        assert!(fires(Spacing::Mandatory, TokenKind::Regexp, TokenKind::Name));
        assert!(!fires(Spacing::Mandatory, TokenKind::Regexp, TokenKind::ParenR));
    }

    #[test]
    fn test_punctuation_has_no_mandatory_space() {
        assert!(!fires(Spacing::Mandatory, TokenKind::ParenR, TokenKind::Comma));
        assert!(!fires(Spacing::Mandatory, TokenKind::Comma, TokenKind::ParenL));
    }

    #[test]
    fn test_cosmetic_rules() {
        assert!(fires(Spacing::Cosmetic, TokenKind::Comma, TokenKind::Name));
        assert!(fires(Spacing::Cosmetic, TokenKind::Name, TokenKind::Plus));
        assert!(fires(Spacing::Cosmetic, TokenKind::Excl, TokenKind::Name));
        assert!(!fires(Spacing::Cosmetic, TokenKind::Excl, TokenKind::ParenR));
        assert!(!fires(Spacing::Cosmetic, TokenKind::Yield, TokenKind::Star));
        assert!(!fires(Spacing::Cosmetic, TokenKind::ParenL, TokenKind::Name));
    }
}
