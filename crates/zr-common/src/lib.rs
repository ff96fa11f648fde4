//! Shared types for the Zirconium (Zr) front end: byte-offset spans, the
//! lexical token model, and the static grammar tables the lexer and parser
//! both read from.

pub mod grammar;
pub mod span;
pub mod token;

pub use span::{LineIndex, Span};
pub use token::{OptionPrefix, Quote, Token, TokenFlags, TokenKind};
