//! Token kinds shared by the tokenizer and the printer
//!
//!     One closed enum covers every token the tokenizer can produce (significant tokens,
//!     layout tokens and trivia) plus the two structural kinds only the printer's token
//!     buffer uses (`Tab` and `MappingMark`).
//!
//!     Fixed-spelling kinds know their own source text through [`TokenKind::code`], which
//!     is what the printer renders when a token carries no value.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    // Layout and trivia
    Eof,
    Indent,
    Dedent,
    Newline,
    Whitespace,
    LineComment,
    BlockComment,

    // Printer-only structure
    Tab,
    MappingMark,

    // Values
    Name,
    Num,
    String,
    Regexp,
    Template,

    // Punctuation
    ParenL,
    ParenR,
    BracketL,
    BracketR,
    BraceL,
    BraceR,
    Comma,
    Semi,
    Dot,
    Ellipsis,
    DoubleColon,
    Excl,
    BackQuote,
    DollarBraceL,
    Arrow,

    // Assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    ModuloEq,
    StarStarEq,
    LShiftEq,
    RShiftEq,
    URShiftEq,
    BitOrEq,
    BitXorEq,
    BitAndEq,

    // Binary and prefix operators
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Equality,
    Inequality,
    LooseEquality,
    LooseInequality,
    Lt,
    Gt,
    LtEq,
    GtEq,
    LShift,
    RShift,
    URShift,
    Plus,
    Minus,
    Star,
    Slash,
    Modulo,
    StarStar,
    Tilde,
    Pipeline,

    // Keywords
    This,
    Super,
    Null,
    True,
    False,
    Pass,
    Yield,
    If,
    Then,
    Else,
    In,
    Instanceof,
    And,
    Or,
    Is,
    Isnt,
    Not,
    Typeof,
    Void,
    Delete,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("this", TokenKind::This),
    ("super", TokenKind::Super),
    ("null", TokenKind::Null),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("pass", TokenKind::Pass),
    ("yield", TokenKind::Yield),
    ("if", TokenKind::If),
    ("then", TokenKind::Then),
    ("else", TokenKind::Else),
    ("in", TokenKind::In),
    ("instanceof", TokenKind::Instanceof),
    ("and", TokenKind::And),
    ("or", TokenKind::Or),
    ("is", TokenKind::Is),
    ("isnt", TokenKind::Isnt),
    ("not", TokenKind::Not),
    ("typeof", TokenKind::Typeof),
    ("void", TokenKind::Void),
    ("delete", TokenKind::Delete),
];

impl TokenKind {
    /// Keyword kind for a word, if it is reserved
    pub fn keyword(word: &str) -> Option<TokenKind> {
        KEYWORDS
            .iter()
            .find(|(text, _)| *text == word)
            .map(|(_, kind)| *kind)
    }

    /// Kind whose fixed spelling is `code`, for punctuation, operators and keywords
    pub fn from_code(code: &str) -> Option<TokenKind> {
        if let Some(kind) = Self::keyword(code) {
            return Some(kind);
        }
        use TokenKind::*;
        let kind = match code {
            "\n" => Newline,
            "(" => ParenL,
            ")" => ParenR,
            "[" => BracketL,
            "]" => BracketR,
            "{" => BraceL,
            "}" => BraceR,
            "," => Comma,
            ";" => Semi,
            "." => Dot,
            "..." => Ellipsis,
            "::" => DoubleColon,
            "!" => Excl,
            "`" => BackQuote,
            "${" => DollarBraceL,
            "=>" => Arrow,
            "=" => Eq,
            "+=" => PlusEq,
            "-=" => MinusEq,
            "*=" => StarEq,
            "/=" => SlashEq,
            "%=" => ModuloEq,
            "**=" => StarStarEq,
            "<<=" => LShiftEq,
            ">>=" => RShiftEq,
            ">>>=" => URShiftEq,
            "|=" => BitOrEq,
            "^=" => BitXorEq,
            "&=" => BitAndEq,
            "||" => LogicalOr,
            "&&" => LogicalAnd,
            "|" => BitOr,
            "^" => BitXor,
            "&" => BitAnd,
            "==" => Equality,
            "!=" => Inequality,
            "~=" => LooseEquality,
            "!~=" => LooseInequality,
            "<" => Lt,
            ">" => Gt,
            "<=" => LtEq,
            ">=" => GtEq,
            "<<" => LShift,
            ">>" => RShift,
            ">>>" => URShift,
            "+" => Plus,
            "-" => Minus,
            "*" => Star,
            "/" => Slash,
            "%" => Modulo,
            "**" => StarStar,
            "~" => Tilde,
            "|>" => Pipeline,
            _ => return None,
        };
        Some(kind)
    }

    /// Fixed source text of the kind; empty for kinds whose text lives in the token value
    pub fn code(self) -> &'static str {
        use TokenKind::*;
        if let Some((text, _)) = KEYWORDS.iter().find(|(_, kind)| *kind == self) {
            return text;
        }
        match self {
            Newline => "\n",
            ParenL => "(",
            ParenR => ")",
            BracketL => "[",
            BracketR => "]",
            BraceL => "{",
            BraceR => "}",
            Comma => ",",
            Semi => ";",
            Dot => ".",
            Ellipsis => "...",
            DoubleColon => "::",
            Excl => "!",
            BackQuote => "`",
            DollarBraceL => "${",
            Arrow => "=>",
            Eq => "=",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            ModuloEq => "%=",
            StarStarEq => "**=",
            LShiftEq => "<<=",
            RShiftEq => ">>=",
            URShiftEq => ">>>=",
            BitOrEq => "|=",
            BitXorEq => "^=",
            BitAndEq => "&=",
            LogicalOr => "||",
            LogicalAnd => "&&",
            BitOr => "|",
            BitXor => "^",
            BitAnd => "&",
            Equality => "==",
            Inequality => "!=",
            LooseEquality => "~=",
            LooseInequality => "!~=",
            Lt => "<",
            Gt => ">",
            LtEq => "<=",
            GtEq => ">=",
            LShift => "<<",
            RShift => ">>",
            URShift => ">>>",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Modulo => "%",
            StarStar => "**",
            Tilde => "~",
            Pipeline => "|>",
            _ => "",
        }
    }

    pub fn is_keyword(self) -> bool {
        KEYWORDS.iter().any(|(_, kind)| *kind == self)
    }

    /// Whitespace and comments: logged, never handed to the parser
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    /// Zero-width indentation markers
    pub fn is_indentation(self) -> bool {
        matches!(self, TokenKind::Indent | TokenKind::Dedent)
    }

    /// Tokens the printer treats as layout rather than content
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            TokenKind::Tab
                | TokenKind::Indent
                | TokenKind::Dedent
                | TokenKind::Newline
                | TokenKind::Whitespace
                | TokenKind::MappingMark
                | TokenKind::Eof
        )
    }

    pub fn is_assign(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Eq | PlusEq
                | MinusEq
                | StarEq
                | SlashEq
                | ModuloEq
                | StarStarEq
                | LShiftEq
                | RShiftEq
                | URShiftEq
                | BitOrEq
                | BitXorEq
                | BitAndEq
        )
    }

    /// Tokens that start a prefix operation
    pub fn is_prefix(self) -> bool {
        use TokenKind::*;
        matches!(self, Not | Typeof | Void | Delete | Tilde | Plus | Minus)
    }

    /// Whether an expression may start right after this token.
    ///
    /// Drives the `(`/`[` context decision and regular expression detection.
    pub fn allows_expression_after(self) -> bool {
        use TokenKind::*;
        !matches!(
            self,
            Name | Num
                | String
                | Regexp
                | ParenR
                | BracketR
                | BraceR
                | This
                | Super
                | Null
                | True
                | False
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(TokenKind::keyword("isnt"), Some(TokenKind::Isnt));
        assert_eq!(TokenKind::keyword("foo"), None);
        assert!(TokenKind::Pass.is_keyword());
        assert!(!TokenKind::Name.is_keyword());
    }

    #[test]
    fn test_code_and_from_code_agree() {
        for kind in [
            TokenKind::ParenL,
            TokenKind::URShiftEq,
            TokenKind::LooseInequality,
            TokenKind::Pipeline,
            TokenKind::Instanceof,
            TokenKind::DollarBraceL,
        ] {
            assert_eq!(TokenKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(TokenKind::Name.code(), "");
    }

    #[test]
    fn test_operator_classes() {
        assert!(TokenKind::StarStarEq.is_assign());
        assert!(!TokenKind::Equality.is_assign());
        assert!(TokenKind::Not.is_prefix());
        assert!(TokenKind::Minus.is_prefix());
        assert!(!TokenKind::Name.allows_expression_after());
        assert!(TokenKind::Excl.allows_expression_after());
    }
}
