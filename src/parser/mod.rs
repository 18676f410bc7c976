//! Parser module for building the parsed tree.
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`Program`](crate::ast::ast::Program). It uses a Pratt parser for
//! expressions with proper operator precedence and handles:
//!
//! - Statement parsing (assignments, functions, both `for` forms, calls)
//! - Expression parsing (binary ops, conditionals, calls, subscripts, literals)
//! - Type parsing for parameter and return annotations
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.
//! Infix operators never begin a new line, so a line break ends an expression.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
