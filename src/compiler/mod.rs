//! JavaScript code generation.
//!
//! This module turns an analyzed (and usually optimized) program into
//! JavaScript source text. It handles:
//!
//! - Naming every user entity as `<name>_<n>` on first encounter
//! - Rendering builtins as their JavaScript counterparts
//! - Emitting statements as indented lines and expressions as inline text

pub mod compiler;
pub mod expr;
pub mod stmt;
