//! Tree rewriting between analysis and code generation.
//!
//! A single bottom-up pass over the typed tree that folds constants,
//! applies algebraic identities and drops statements that provably do
//! nothing. Running it twice gives the same tree as running it once.

pub mod optimizer;

#[cfg(test)]
mod tests;
