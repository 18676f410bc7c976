use std::fmt::Display;

use crate::{lexer::tokens::TokenKind, Span};

use super::{
    expressions::{
        ArrayExpr, BinaryExpr, BooleanExpr, CallExpr, ConditionalExpr, DictExpr, MemberExpr,
        NumberExpr, PrefixExpr, StringExpr, SubscriptExpr, SymbolExpr,
    },
    statements::{
        AssignmentStmt, BreakStmt, CollectionForStmt, FnDeclStmt, RangeForStmt, ReturnStmt,
    },
};

/// The root of a parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// Statement
///
/// Every statement form the parser can produce. Each variant wraps a node
/// struct that carries its own span.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assignment(AssignmentStmt),
    FnDecl(FnDeclStmt),
    RangeFor(RangeForStmt),
    CollectionFor(CollectionForStmt),
    Return(ReturnStmt),
    Break(BreakStmt),
    Call(CallExpr),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Assignment(stmt) => &stmt.span,
            Stmt::FnDecl(stmt) => &stmt.span,
            Stmt::RangeFor(stmt) => &stmt.span,
            Stmt::CollectionFor(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Break(stmt) => &stmt.span,
            Stmt::Call(expr) => &expr.span,
        }
    }
}

/// Expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(NumberExpr),
    String(StringExpr),
    Boolean(BooleanExpr),
    Symbol(SymbolExpr),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Conditional(ConditionalExpr),
    Call(CallExpr),
    Subscript(SubscriptExpr),
    Member(MemberExpr),
    Array(ArrayExpr),
    Dict(DictExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Number(expr) => &expr.span,
            Expr::String(expr) => &expr.span,
            Expr::Boolean(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Conditional(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::Subscript(expr) => &expr.span,
            Expr::Member(expr) => &expr.span,
            Expr::Array(expr) => &expr.span,
            Expr::Dict(expr) => &expr.span,
        }
    }
}

/// Binary operators, grouped the way the analyzer checks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Equals,
    NotEquals,
    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<BinaryOp> {
        Some(match kind {
            TokenKind::Or => BinaryOp::Or,
            TokenKind::And => BinaryOp::And,
            TokenKind::Equals => BinaryOp::Equals,
            TokenKind::NotEquals => BinaryOp::NotEquals,
            TokenKind::Less => BinaryOp::Less,
            TokenKind::LessEquals => BinaryOp::LessEquals,
            TokenKind::Greater => BinaryOp::Greater,
            TokenKind::GreaterEquals => BinaryOp::GreaterEquals,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Dash => BinaryOp::Subtract,
            TokenKind::Star => BinaryOp::Multiply,
            TokenKind::Slash => BinaryOp::Divide,
            TokenKind::Percent => BinaryOp::Modulo,
            TokenKind::StarStar => BinaryOp::Power,
            _ => return None,
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEquals => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEquals => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "**",
        }
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::Or | BinaryOp::And)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Equals | BinaryOp::NotEquals)
    }

    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            BinaryOp::Less | BinaryOp::LessEquals | BinaryOp::Greater | BinaryOp::GreaterEquals
        )
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
