//! Logos definitions for the context-free part of the lexical grammar
//!
//! The tokenizer handles everything that depends on state by hand (indentation,
//! newlines, comments, template text and regular expressions) and asks this lexer for a
//! single token at the current offset otherwise. Words come back as [`RawToken::Word`]
//! and are split into keywords and names by [`TokenKind::keyword`].
use super::kind::TokenKind;
use logos::Logos;

#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum RawToken {
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Word,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"0[oO][0-7]+")]
    #[regex(r"0[bB][01]+")]
    Number,

    #[regex(r#""([^"\\\r\n]|\\[^\r\n]|\\\r?\n)*""#)]
    #[regex(r#"'([^'\\\r\n]|\\[^\r\n]|\\\r?\n)*'"#)]
    String,

    #[token("(")]
    ParenL,
    #[token(")")]
    ParenR,
    #[token("[")]
    BracketL,
    #[token("]")]
    BracketR,
    #[token("{")]
    BraceL,
    #[token("}")]
    BraceR,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,
    #[token("::")]
    DoubleColon,
    #[token("!")]
    Excl,
    #[token("`")]
    BackQuote,
    #[token("=>")]
    Arrow,

    #[token("=")]
    Eq,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    ModuloEq,
    #[token("**=")]
    StarStarEq,
    #[token("<<=")]
    LShiftEq,
    #[token(">>=")]
    RShiftEq,
    #[token(">>>=")]
    URShiftEq,
    #[token("|=")]
    BitOrEq,
    #[token("^=")]
    BitXorEq,
    #[token("&=")]
    BitAndEq,

    #[token("||")]
    LogicalOr,
    #[token("&&")]
    LogicalAnd,
    #[token("|")]
    BitOr,
    #[token("^")]
    BitXor,
    #[token("&")]
    BitAnd,
    #[token("==")]
    Equality,
    #[token("!=")]
    Inequality,
    #[token("~=")]
    LooseEquality,
    #[token("!~=")]
    LooseInequality,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<<")]
    LShift,
    #[token(">>")]
    RShift,
    #[token(">>>")]
    URShift,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Modulo,
    #[token("**")]
    StarStar,
    #[token("~")]
    Tilde,
    #[token("|>")]
    Pipeline,
}

impl RawToken {
    /// Token kind for a raw match; `text` is only consulted for words
    pub fn kind(self, text: &str) -> TokenKind {
        match self {
            RawToken::Word => TokenKind::keyword(text).unwrap_or(TokenKind::Name),
            RawToken::Number => TokenKind::Num,
            RawToken::String => TokenKind::String,
            RawToken::ParenL => TokenKind::ParenL,
            RawToken::ParenR => TokenKind::ParenR,
            RawToken::BracketL => TokenKind::BracketL,
            RawToken::BracketR => TokenKind::BracketR,
            RawToken::BraceL => TokenKind::BraceL,
            RawToken::BraceR => TokenKind::BraceR,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semi => TokenKind::Semi,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Ellipsis => TokenKind::Ellipsis,
            RawToken::DoubleColon => TokenKind::DoubleColon,
            RawToken::Excl => TokenKind::Excl,
            RawToken::BackQuote => TokenKind::BackQuote,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::Eq => TokenKind::Eq,
            RawToken::PlusEq => TokenKind::PlusEq,
            RawToken::MinusEq => TokenKind::MinusEq,
            RawToken::StarEq => TokenKind::StarEq,
            RawToken::SlashEq => TokenKind::SlashEq,
            RawToken::ModuloEq => TokenKind::ModuloEq,
            RawToken::StarStarEq => TokenKind::StarStarEq,
            RawToken::LShiftEq => TokenKind::LShiftEq,
            RawToken::RShiftEq => TokenKind::RShiftEq,
            RawToken::URShiftEq => TokenKind::URShiftEq,
            RawToken::BitOrEq => TokenKind::BitOrEq,
            RawToken::BitXorEq => TokenKind::BitXorEq,
            RawToken::BitAndEq => TokenKind::BitAndEq,
            RawToken::LogicalOr => TokenKind::LogicalOr,
            RawToken::LogicalAnd => TokenKind::LogicalAnd,
            RawToken::BitOr => TokenKind::BitOr,
            RawToken::BitXor => TokenKind::BitXor,
            RawToken::BitAnd => TokenKind::BitAnd,
            RawToken::Equality => TokenKind::Equality,
            RawToken::Inequality => TokenKind::Inequality,
            RawToken::LooseEquality => TokenKind::LooseEquality,
            RawToken::LooseInequality => TokenKind::LooseInequality,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::LShift => TokenKind::LShift,
            RawToken::RShift => TokenKind::RShift,
            RawToken::URShift => TokenKind::URShift,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Minus => TokenKind::Minus,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Modulo => TokenKind::Modulo,
            RawToken::StarStar => TokenKind::StarStar,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::Pipeline => TokenKind::Pipeline,
        }
    }
}

/// Lex one token at the start of `input`, returning its kind and byte length.
///
/// `None` means the input does not start with any context-free token.
pub fn lex_one(input: &str) -> Option<(TokenKind, usize)> {
    let mut lexer = RawToken::lexer(input);
    match lexer.next() {
        Some(Ok(raw)) => {
            let span = lexer.span();
            if span.start != 0 {
                return None;
            }
            Some((raw.kind(lexer.slice()), span.end))
        }
        _ => None,
    }
}
