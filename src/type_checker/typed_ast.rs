//! Typed tree definitions.
//!
//! This module contains the tree produced by the analyzer. Names have been
//! resolved to entities and every expression carries its static type. The
//! optimizer rewrites this tree and the code generator reads it.
//!
//! Unlike the parsed tree it carries no spans: nothing after analysis reports
//! errors.

use num::BigInt;

use crate::ast::{
    ast::{BinaryOp, UnaryOp},
    types::Type,
};

use super::entities::{EntityArena, EntityId};

#[derive(Debug, Clone, PartialEq)]
pub struct TypedProgram {
    pub statements: Vec<TypedStmt>,
    pub entities: EntityArena,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedStmt {
    /// First assignment to a name.
    VarDecl {
        variable: EntityId,
        initializer: TypedExpr,
    },
    Assignment {
        target: TypedExpr,
        source: TypedExpr,
    },
    FnDecl {
        function: EntityId,
        parameters: Vec<EntityId>,
        body: Vec<TypedStmt>,
    },
    RangeFor {
        init: Box<TypedStmt>,
        update: Box<TypedStmt>,
        test: TypedExpr,
        body: Vec<TypedStmt>,
    },
    CollectionFor {
        variable: EntityId,
        collection: TypedExpr,
        body: Vec<TypedStmt>,
    },
    Return(Option<TypedExpr>),
    Break,
    Call {
        callee: TypedExpr,
        arguments: Vec<TypedExpr>,
    },
    Print(Vec<TypedExpr>),
    /// In-place mutation of an array or dictionary.
    Method {
        object: TypedExpr,
        method: Method,
        arguments: Vec<TypedExpr>,
    },
}

/// Collection methods, resolved against the receiver's type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `xs.add(value)`
    ArrayAdd,
    /// `xs.insert(index, value)`
    ArrayInsert,
    /// `xs.delete(index)`
    ArrayDelete,
    /// `d.set(key, value)`
    DictSet,
    /// `d.delete(key)`
    DictDelete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(BigInt),
    Float(f64),
    String(String),
    Bool(bool),
}

impl LiteralValue {
    pub fn ty(&self) -> Type {
        match self {
            LiteralValue::Int(_) => Type::Int,
            LiteralValue::Float(_) => Type::Float,
            LiteralValue::String(_) => Type::String,
            LiteralValue::Bool(_) => Type::Bool,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedExpr {
    Literal(LiteralValue),
    Variable {
        entity: EntityId,
        ty: Type,
    },
    Binary {
        left: Box<TypedExpr>,
        operator: BinaryOp,
        right: Box<TypedExpr>,
        ty: Type,
    },
    Unary {
        operator: UnaryOp,
        operand: Box<TypedExpr>,
        ty: Type,
    },
    Conditional {
        test: Box<TypedExpr>,
        consequent: Box<TypedExpr>,
        alternate: Box<TypedExpr>,
        ty: Type,
    },
    Call {
        callee: Box<TypedExpr>,
        arguments: Vec<TypedExpr>,
        ty: Type,
    },
    Subscript {
        array: Box<TypedExpr>,
        index: Box<TypedExpr>,
        ty: Type,
    },
    Array {
        elements: Vec<TypedExpr>,
        ty: Type,
    },
    Dict {
        entries: Vec<(TypedExpr, TypedExpr)>,
        ty: Type,
    },
}

impl TypedExpr {
    pub fn literal(value: LiteralValue) -> TypedExpr {
        TypedExpr::Literal(value)
    }

    pub fn int(value: i64) -> TypedExpr {
        TypedExpr::Literal(LiteralValue::Int(BigInt::from(value)))
    }

    pub fn float(value: f64) -> TypedExpr {
        TypedExpr::Literal(LiteralValue::Float(value))
    }

    pub fn bool(value: bool) -> TypedExpr {
        TypedExpr::Literal(LiteralValue::Bool(value))
    }

    pub fn ty(&self) -> Type {
        match self {
            TypedExpr::Literal(value) => value.ty(),
            TypedExpr::Variable { ty, .. }
            | TypedExpr::Binary { ty, .. }
            | TypedExpr::Unary { ty, .. }
            | TypedExpr::Conditional { ty, .. }
            | TypedExpr::Call { ty, .. }
            | TypedExpr::Subscript { ty, .. }
            | TypedExpr::Array { ty, .. }
            | TypedExpr::Dict { ty, .. } => ty.clone(),
        }
    }

    /// The entity this expression names, if it is a bare variable reference.
    pub fn entity(&self) -> Option<EntityId> {
        match self {
            TypedExpr::Variable { entity, .. } => Some(*entity),
            _ => None,
        }
    }
}
