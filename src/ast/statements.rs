use crate::Span;

use super::{
    ast::{BinaryOp, Expr, Stmt},
    types::TypeAnnotation,
};

/// Assignment Statement
///
/// Covers both declaration and reassignment, which share one surface syntax.
/// `operator` is set for compound forms such as `x += 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentStmt {
    pub target: Expr,
    pub operator: Option<BinaryOp>,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_annotation: Option<TypeAnnotation>,
    pub span: Span,
}

/// Function Declaration Statement
///
/// `Function name(params) -> type ... end name`. The closing name is kept so
/// the analyzer can check it against the opening one.
#[derive(Debug, Clone, PartialEq)]
pub struct FnDeclStmt {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeAnnotation>,
    pub body: Vec<Stmt>,
    pub end_name: String,
    pub end_span: Span,
    pub span: Span,
}

/// `for (init, update) body end test`
#[derive(Debug, Clone, PartialEq)]
pub struct RangeForStmt {
    pub init: Box<AssignmentStmt>,
    pub update: Box<AssignmentStmt>,
    pub body: Vec<Stmt>,
    pub test: Expr,
    pub span: Span,
}

/// `for variable in collection body end for`
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionForStmt {
    pub variable: String,
    pub variable_span: Span,
    pub collection: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    pub span: Span,
}
