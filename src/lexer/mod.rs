//! Lexical analysis module for the compiler.
//!
//! Turns GLHF source text into a flat token stream. It handles:
//!
//! - Tokenization of source code using anchored regex patterns
//! - Recognition of keywords, identifiers, literals, and operators
//! - Line and column tracking, including whether a token starts a new line
//! - Comments and whitespace handling

pub mod lexer;
pub mod tokens;
