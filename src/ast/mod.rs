/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the parsed tree
///
/// Submodules:
/// - ast: The `Stmt`/`Expr` sum types, operators and the program root
/// - expressions: Definitions for the expression node structs
/// - statements: Definitions for the statement node structs
/// - types: Static types and the annotations that spell them
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
