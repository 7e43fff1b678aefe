use logos::Logos;
use strum_macros::EnumIter;
pub use self::TokenKind::*;

/// Structural tokens for a command line.
///
/// pathkv's REPL grammar is a flat `verb arg arg ...` shape, not a
/// nested expression language, so there is no benefit in teaching
/// logos one token per keyword the way a SQL tokenizer would: a
/// `#[token("get")]` variant would just race the generic `Word`
/// pattern on every other identifier. Keyword recognition happens one
/// layer up, in the command parser, by matching on `Word` text.
#[allow(non_camel_case_types)]
#[derive(Logos, EnumIter, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Error,

    EOI,

    #[regex(r"[ \t\r\f]+", logos::skip)]
    Whitespace,

    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    #[regex(r"[\n]+")]
    Newline,

    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r#"'([^'\\]|\\.)*'"#)]
    QuotedString,

    #[regex(r"[^\s]+")]
    Word,
}

impl TokenKind {
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}
