//! Tokenizer for Zirconium (Zr).
//!
//! Splits source text into a stream of [`Token`](zr_common::Token)s over a
//! byte-oriented [`TextStream`]. The lexer never fails outright: malformed
//! input (an unterminated string, a stray `$`) degrades into a token flagged
//! or shaped so the parser can recover (see the module docs on
//! `zr_parser::parser` for how those are turned into diagnostics).

pub mod cursor;
pub mod lexer;

pub use cursor::TextStream;
pub use lexer::{Lexer, LexerOptions};
