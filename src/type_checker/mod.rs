//! Type checking and semantic analysis module.
//!
//! This module turns the parsed tree into a typed tree while:
//!
//! - Resolving every name to an entity through a chain of scopes
//! - Declaring variables on first assignment and rejecting shadowing
//! - Checking operator, call, return and loop rules
//! - Seeding the standard library into the root scope
//!
//! Analysis is fail-fast: the first violation is returned as an [`Error`](crate::errors::errors::Error).

pub mod context;
pub mod entities;
pub mod stdlib;
pub mod type_checker;
pub mod typed_ast;
