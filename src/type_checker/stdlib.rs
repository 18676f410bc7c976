//! The standard library every program starts with.
//!
//! Builtins are seeded fresh into the root scope of each analysis. Their
//! signatures drive type checking; [`Builtin::target`] gives the JavaScript
//! the generator writes in their place.

use crate::ast::types::Type;

use super::{
    context::Context,
    entities::{Entity, EntityArena},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Pi,
    Tau,
    Print,
    Sin,
    Cos,
    Exp,
    Ln,
    Hypot,
    Bytes,
    Codepoints,
    Wait,
}

impl Builtin {
    pub const ALL: [Builtin; 11] = [
        Builtin::Pi,
        Builtin::Tau,
        Builtin::Print,
        Builtin::Sin,
        Builtin::Cos,
        Builtin::Exp,
        Builtin::Ln,
        Builtin::Hypot,
        Builtin::Bytes,
        Builtin::Codepoints,
        Builtin::Wait,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Pi => "pi",
            Builtin::Tau => "tau",
            Builtin::Print => "print",
            Builtin::Sin => "sin",
            Builtin::Cos => "cos",
            Builtin::Exp => "exp",
            Builtin::Ln => "ln",
            Builtin::Hypot => "hypot",
            Builtin::Bytes => "bytes",
            Builtin::Codepoints => "codepoints",
            Builtin::Wait => "wait",
        }
    }

    pub fn target(&self) -> &'static str {
        match self {
            Builtin::Pi => "Math.PI",
            Builtin::Tau => "(2 * Math.PI)",
            Builtin::Print => "console.log",
            Builtin::Sin => "Math.sin",
            Builtin::Cos => "Math.cos",
            Builtin::Exp => "Math.exp",
            Builtin::Ln => "Math.log",
            Builtin::Hypot => "Math.hypot",
            Builtin::Bytes => "((s) => [...new TextEncoder().encode(s)])",
            Builtin::Codepoints => "((s) => [...s].map((c) => c.codePointAt(0)))",
            // Blocks the calling thread
            Builtin::Wait => {
                "((seconds) => Atomics.wait(new Int32Array(new SharedArrayBuffer(4)), 0, 0, seconds * 1000))"
            }
        }
    }

    fn entity(&self) -> Entity {
        let unary_float = || Type::Function(vec![Type::Float], Box::new(Type::Float));
        let string_to_ints = || {
            Type::Function(
                vec![Type::String],
                Box::new(Type::Array(Box::new(Type::Int))),
            )
        };

        match self {
            Builtin::Pi | Builtin::Tau => Entity::Variable {
                name: String::from(self.name()),
                read_only: true,
                ty: Type::Float,
                builtin: Some(*self),
            },
            Builtin::Print => Entity::Function {
                name: String::from(self.name()),
                ty: Type::Function(vec![], Box::new(Type::Void)),
                is_var_args: true,
                builtin: Some(*self),
            },
            Builtin::Sin | Builtin::Cos | Builtin::Exp | Builtin::Ln => Entity::Function {
                name: String::from(self.name()),
                ty: unary_float(),
                is_var_args: false,
                builtin: Some(*self),
            },
            Builtin::Hypot => Entity::Function {
                name: String::from(self.name()),
                ty: Type::Function(vec![Type::Float, Type::Float], Box::new(Type::Float)),
                is_var_args: false,
                builtin: Some(*self),
            },
            Builtin::Bytes | Builtin::Codepoints => Entity::Function {
                name: String::from(self.name()),
                ty: string_to_ints(),
                is_var_args: false,
                builtin: Some(*self),
            },
            Builtin::Wait => Entity::Function {
                name: String::from(self.name()),
                ty: Type::Function(vec![Type::Int], Box::new(Type::Void)),
                is_var_args: false,
                builtin: Some(*self),
            },
        }
    }
}

/// Adds every builtin to `entities` and binds it in `context`.
pub fn seed(entities: &mut EntityArena, context: &mut Context) {
    for builtin in Builtin::ALL {
        let id = entities.add(builtin.entity());
        context.declare(builtin.name(), id);
    }
}
