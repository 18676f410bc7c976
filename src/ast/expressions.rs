use crate::Span;

use super::ast::{BinaryOp, Expr, UnaryOp};

// LITERALS

/// Number Expression
/// Keeps the raw source text; the analyzer decides between int and float.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberExpr {
    pub value: String,
    pub span: Span,
}

impl NumberExpr {
    pub fn is_float(&self) -> bool {
        self.value.contains(['.', 'e', 'E'])
    }
}

/// String Expression
#[derive(Debug, Clone, PartialEq)]
pub struct StringExpr {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanExpr {
    pub value: bool,
    pub span: Span,
}

/// Symbol Expression
/// Represents an identifier in the AST. This includes functions.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

// COMPLEX

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: BinaryOp,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub operator: UnaryOp,
    pub right_expr: Box<Expr>,
    pub span: Span,
}

/// `test ? consequent : alternate`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    pub test: Box<Expr>,
    pub consequent: Box<Expr>,
    pub alternate: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptExpr {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
    pub span: Span,
}

/// `object.property`, only meaningful as the callee of a method call.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub property: String,
    pub property_span: Span,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

/// `<<key: value, ...>>`
#[derive(Debug, Clone, PartialEq)]
pub struct DictExpr {
    pub entries: Vec<(Expr, Expr)>,
    pub span: Span,
}
