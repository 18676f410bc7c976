//! Type system definitions.
//!
//! The language has a small closed set of static types. Annotations in the
//! source are parsed straight into [`Type`] values; the analyzer then attaches
//! one to every expression it checks.

use std::fmt::Display;

use crate::Span;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Float,
    String,
    Bool,
    Void,
    Any,
    Array(Box<Type>),
    /// Keys and values share one base type.
    Dict(Box<Type>),
    Function(Vec<Type>, Box<Type>),
}

impl Type {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float | Type::Any)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Bool | Type::Any)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Int | Type::Any)
    }

    pub fn is_numeric_or_string(&self) -> bool {
        self.is_numeric() || matches!(self, Type::String)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Type::Array(_) | Type::Any)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Type::Array(_) | Type::Dict(_) | Type::Any)
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function(..) | Type::Any)
    }

    /// Whether a value of type `source` may be stored where `self` is expected.
    pub fn accepts(&self, source: &Type) -> bool {
        match (self, source) {
            (Type::Any, _) | (_, Type::Any) => true,
            (Type::Array(target), Type::Array(source)) => target.accepts(source),
            (Type::Dict(target), Type::Dict(source)) => target.accepts(source),
            (target, source) => target == source,
        }
    }

    /// The common type of two operands, if they have one. `any` gives way to
    /// the other side.
    pub fn unify(&self, other: &Type) -> Option<Type> {
        match (self, other) {
            (Type::Any, other) => Some(other.clone()),
            (this, Type::Any) => Some(this.clone()),
            (Type::Array(left), Type::Array(right)) => {
                Some(Type::Array(Box::new(left.unify(right)?)))
            }
            (Type::Dict(left), Type::Dict(right)) => {
                Some(Type::Dict(Box::new(left.unify(right)?)))
            }
            (this, other) if this == other => Some(this.clone()),
            _ => None,
        }
    }

    /// Element type seen by a collection-for loop variable.
    pub fn element_type(&self) -> Option<Type> {
        match self {
            Type::Array(base) => Some(*base.clone()),
            Type::Dict(base) => Some(Type::Array(base.clone())),
            Type::Any => Some(Type::Any),
            _ => None,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::String => write!(f, "string"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::Any => write!(f, "any"),
            Type::Array(base) => write!(f, "[{}]", base),
            Type::Dict(base) => write!(f, "<<{}>>", base),
            Type::Function(parameters, return_type) => {
                let parameters = parameters
                    .iter()
                    .map(|parameter| parameter.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({}) -> {}", parameters, return_type)
            }
        }
    }
}

/// A type written in the source, e.g. the `[int]` in `Function f(x: [int])`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub ty: Type,
    pub span: Span,
}
