//! Line tokenizer used by the REPL and one-shot command parser.

pub mod token_kind;
pub mod tokenizer;

pub use token_kind::TokenKind;
pub use tokenizer::{tokenize_line, Token, Tokenizer};
