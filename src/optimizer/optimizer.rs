use num::{BigInt, One, ToPrimitive, Zero};
use tracing::trace;

use crate::{
    ast::{
        ast::{BinaryOp, UnaryOp},
        types::Type,
    },
    type_checker::{
        entities::EntityId,
        typed_ast::{LiteralValue, TypedExpr, TypedProgram, TypedStmt},
    },
};

/// Largest integer exponent folded at compile time.
const MAX_FOLDED_EXPONENT: u32 = u16::MAX as u32;

/// Simplifies a typed program. Children are rewritten before their parent,
/// so any subtree made only of literals collapses in one pass.
#[tracing::instrument(skip_all)]
pub fn optimize(program: TypedProgram) -> TypedProgram {
    let TypedProgram {
        statements,
        entities,
    } = program;

    let before = statements.len();
    let statements = optimize_block(statements);
    tracing::debug!(before, after = statements.len(), "optimized");

    TypedProgram {
        statements,
        entities,
    }
}

pub fn optimize_block(statements: Vec<TypedStmt>) -> Vec<TypedStmt> {
    statements.into_iter().filter_map(optimize_stmt).collect()
}

/// Returns `None` when the statement can be dropped.
pub fn optimize_stmt(stmt: TypedStmt) -> Option<TypedStmt> {
    match stmt {
        TypedStmt::Assignment { .. } => {
            let stmt = optimize_assignment(stmt);
            if is_self_assignment(&stmt) {
                trace!("removed self-assignment");
                None
            } else {
                Some(stmt)
            }
        }
        TypedStmt::VarDecl { .. } => Some(optimize_assignment(stmt)),
        TypedStmt::FnDecl {
            function,
            parameters,
            body,
        } => Some(TypedStmt::FnDecl {
            function,
            parameters,
            body: optimize_block(body),
        }),
        TypedStmt::RangeFor {
            init,
            update,
            test,
            body,
        } => {
            // The header keeps its assignments even when they are no-ops
            let init = optimize_assignment(*init);
            let update = optimize_assignment(*update);
            let test = optimize_expr(test);

            if is_dead_loop(&init, &test) {
                trace!("removed dead loop");
                // An outer loop variable still receives its start value
                return match init {
                    TypedStmt::Assignment { .. } => Some(init),
                    _ => None,
                };
            }

            Some(TypedStmt::RangeFor {
                init: Box::new(init),
                update: Box::new(update),
                test,
                body: optimize_block(body),
            })
        }
        TypedStmt::CollectionFor {
            variable,
            collection,
            body,
        } => Some(TypedStmt::CollectionFor {
            variable,
            collection: optimize_expr(collection),
            body: optimize_block(body),
        }),
        TypedStmt::Return(value) => Some(TypedStmt::Return(value.map(optimize_expr))),
        TypedStmt::Break => Some(TypedStmt::Break),
        TypedStmt::Call { callee, arguments } => Some(TypedStmt::Call {
            callee: optimize_expr(callee),
            arguments: optimize_exprs(arguments),
        }),
        TypedStmt::Print(arguments) => Some(TypedStmt::Print(optimize_exprs(arguments))),
        TypedStmt::Method {
            object,
            method,
            arguments,
        } => Some(TypedStmt::Method {
            object: optimize_expr(object),
            method,
            arguments: optimize_exprs(arguments),
        }),
    }
}

/// Rewrites the expressions of a declaration or assignment without dropping it.
fn optimize_assignment(stmt: TypedStmt) -> TypedStmt {
    match stmt {
        TypedStmt::VarDecl {
            variable,
            initializer,
        } => TypedStmt::VarDecl {
            variable,
            initializer: optimize_expr(initializer),
        },
        TypedStmt::Assignment { target, source } => TypedStmt::Assignment {
            target: optimize_expr(target),
            source: optimize_expr(source),
        },
        other => other,
    }
}

fn is_self_assignment(stmt: &TypedStmt) -> bool {
    match stmt {
        TypedStmt::Assignment { target, source } => {
            target.entity().is_some() && target.entity() == source.entity()
        }
        _ => false,
    }
}

/// The loop variable bound by a range-for header and its literal start, if any.
fn loop_start(init: &TypedStmt) -> Option<(EntityId, &BigInt)> {
    match init {
        TypedStmt::VarDecl {
            variable,
            initializer: TypedExpr::Literal(LiteralValue::Int(start)),
        } => Some((*variable, start)),
        TypedStmt::Assignment {
            target,
            source: TypedExpr::Literal(LiteralValue::Int(start)),
        } => Some((target.entity()?, start)),
        _ => None,
    }
}

/// A range-for whose test fails before the first iteration.
fn is_dead_loop(init: &TypedStmt, test: &TypedExpr) -> bool {
    if let TypedExpr::Literal(LiteralValue::Bool(false)) = test {
        return true;
    }

    let Some((variable, start)) = loop_start(init) else {
        return false;
    };

    match test {
        TypedExpr::Binary {
            left,
            operator,
            right,
            ..
        } => match (left.entity(), right.as_ref()) {
            (Some(entity), TypedExpr::Literal(LiteralValue::Int(end))) if entity == variable => {
                match operator {
                    BinaryOp::Less => start >= end,
                    BinaryOp::LessEquals => start > end,
                    _ => false,
                }
            }
            _ => false,
        },
        _ => false,
    }
}

fn optimize_exprs(exprs: Vec<TypedExpr>) -> Vec<TypedExpr> {
    exprs.into_iter().map(optimize_expr).collect()
}

pub fn optimize_expr(expr: TypedExpr) -> TypedExpr {
    match expr {
        TypedExpr::Literal(_) | TypedExpr::Variable { .. } => expr,
        TypedExpr::Binary {
            left,
            operator,
            right,
            ty,
        } => simplify_binary(optimize_expr(*left), operator, optimize_expr(*right), ty),
        TypedExpr::Unary {
            operator,
            operand,
            ty,
        } => {
            let operand = optimize_expr(*operand);
            match (operator, operand) {
                (UnaryOp::Negate, TypedExpr::Literal(LiteralValue::Int(value))) => {
                    TypedExpr::Literal(LiteralValue::Int(-value))
                }
                (UnaryOp::Negate, TypedExpr::Literal(LiteralValue::Float(value))) => {
                    TypedExpr::float(-value)
                }
                (UnaryOp::Not, TypedExpr::Literal(LiteralValue::Bool(value))) => {
                    TypedExpr::bool(!value)
                }
                (operator, operand) => TypedExpr::Unary {
                    operator,
                    operand: Box::new(operand),
                    ty,
                },
            }
        }
        TypedExpr::Conditional {
            test,
            consequent,
            alternate,
            ty,
        } => {
            let test = optimize_expr(*test);
            let consequent = optimize_expr(*consequent);
            let alternate = optimize_expr(*alternate);

            match test {
                TypedExpr::Literal(LiteralValue::Bool(true)) => consequent,
                TypedExpr::Literal(LiteralValue::Bool(false)) => alternate,
                test => TypedExpr::Conditional {
                    test: Box::new(test),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                    ty,
                },
            }
        }
        TypedExpr::Call {
            callee,
            arguments,
            ty,
        } => TypedExpr::Call {
            callee: Box::new(optimize_expr(*callee)),
            arguments: optimize_exprs(arguments),
            ty,
        },
        TypedExpr::Subscript { array, index, ty } => TypedExpr::Subscript {
            array: Box::new(optimize_expr(*array)),
            index: Box::new(optimize_expr(*index)),
            ty,
        },
        TypedExpr::Array { elements, ty } => TypedExpr::Array {
            elements: optimize_exprs(elements),
            ty,
        },
        TypedExpr::Dict { entries, ty } => TypedExpr::Dict {
            entries: entries
                .into_iter()
                .map(|(key, value)| (optimize_expr(key), optimize_expr(value)))
                .collect(),
            ty,
        },
    }
}

/// Operands are already optimized.
fn simplify_binary(left: TypedExpr, operator: BinaryOp, right: TypedExpr, ty: Type) -> TypedExpr {
    let folded = match (&left, &right) {
        (TypedExpr::Literal(LiteralValue::Int(a)), TypedExpr::Literal(LiteralValue::Int(b))) => {
            fold_int(operator, a, b)
        }
        (
            TypedExpr::Literal(LiteralValue::Float(a)),
            TypedExpr::Literal(LiteralValue::Float(b)),
        ) => fold_float(operator, *a, *b),
        _ => None,
    };
    if let Some(folded) = folded {
        trace!(%operator, "folded constant");
        return folded;
    }

    match operator {
        BinaryOp::And if is_bool(&left, true) => return right,
        BinaryOp::And if is_bool(&right, true) => return left,
        BinaryOp::Or if is_bool(&left, false) => return right,
        BinaryOp::Or if is_bool(&right, false) => return left,
        _ => {}
    }

    match operator {
        BinaryOp::Add if is_zero(&right) && is_number_typed(&left) => left,
        BinaryOp::Add if is_zero(&left) && is_number_typed(&right) => right,
        BinaryOp::Subtract if is_zero(&right) && is_number_typed(&left) => left,
        BinaryOp::Subtract if is_zero(&left) && is_number_typed(&right) => TypedExpr::Unary {
            operator: UnaryOp::Negate,
            operand: Box::new(right),
            ty,
        },
        BinaryOp::Multiply if is_one(&right) && is_number_typed(&left) => left,
        BinaryOp::Multiply if is_one(&left) && is_number_typed(&right) => right,
        BinaryOp::Multiply if is_zero(&right) && is_number_typed(&left) => right,
        BinaryOp::Multiply if is_zero(&left) && is_number_typed(&right) => left,
        // Division always yields a float
        BinaryOp::Divide if is_one(&right) && left.ty() == ty => left,
        BinaryOp::Divide if is_zero(&left) && is_number_typed(&right) => TypedExpr::float(0.0),
        BinaryOp::Power if is_zero(&right) && is_number_typed(&left) => match right {
            TypedExpr::Literal(LiteralValue::Float(_)) => TypedExpr::float(1.0),
            _ => TypedExpr::int(1),
        },
        BinaryOp::Power if is_one(&left) && is_number_typed(&right) => left,
        _ => TypedExpr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            ty,
        },
    }
}

fn fold_int(operator: BinaryOp, a: &BigInt, b: &BigInt) -> Option<TypedExpr> {
    let int = |value: BigInt| Some(TypedExpr::Literal(LiteralValue::Int(value)));

    match operator {
        BinaryOp::Add => int(a + b),
        BinaryOp::Subtract => int(a - b),
        BinaryOp::Multiply => int(a * b),
        BinaryOp::Divide => Some(TypedExpr::float(a.to_f64()? / b.to_f64()?)),
        // Remainder takes the sign of the dividend, as in the target
        BinaryOp::Modulo if !b.is_zero() => int(a % b),
        BinaryOp::Power => {
            let exponent = b.to_u32().filter(|exponent| *exponent <= MAX_FOLDED_EXPONENT)?;
            int(a.pow(exponent))
        }
        BinaryOp::Less => Some(TypedExpr::bool(a < b)),
        BinaryOp::LessEquals => Some(TypedExpr::bool(a <= b)),
        BinaryOp::Greater => Some(TypedExpr::bool(a > b)),
        BinaryOp::GreaterEquals => Some(TypedExpr::bool(a >= b)),
        BinaryOp::Equals => Some(TypedExpr::bool(a == b)),
        BinaryOp::NotEquals => Some(TypedExpr::bool(a != b)),
        _ => None,
    }
}

fn fold_float(operator: BinaryOp, a: f64, b: f64) -> Option<TypedExpr> {
    match operator {
        BinaryOp::Add => Some(TypedExpr::float(a + b)),
        BinaryOp::Subtract => Some(TypedExpr::float(a - b)),
        BinaryOp::Multiply => Some(TypedExpr::float(a * b)),
        BinaryOp::Divide => Some(TypedExpr::float(a / b)),
        BinaryOp::Modulo => Some(TypedExpr::float(a % b)),
        BinaryOp::Power => Some(TypedExpr::float(a.powf(b))),
        BinaryOp::Less => Some(TypedExpr::bool(a < b)),
        BinaryOp::LessEquals => Some(TypedExpr::bool(a <= b)),
        BinaryOp::Greater => Some(TypedExpr::bool(a > b)),
        BinaryOp::GreaterEquals => Some(TypedExpr::bool(a >= b)),
        BinaryOp::Equals => Some(TypedExpr::bool(a == b)),
        BinaryOp::NotEquals => Some(TypedExpr::bool(a != b)),
        _ => None,
    }
}

fn is_bool(expr: &TypedExpr, expected: bool) -> bool {
    matches!(expr, TypedExpr::Literal(LiteralValue::Bool(value)) if *value == expected)
}

fn is_zero(expr: &TypedExpr) -> bool {
    match expr {
        TypedExpr::Literal(LiteralValue::Int(value)) => value.is_zero(),
        TypedExpr::Literal(LiteralValue::Float(value)) => *value == 0.0,
        _ => false,
    }
}

fn is_one(expr: &TypedExpr) -> bool {
    match expr {
        TypedExpr::Literal(LiteralValue::Int(value)) => value.is_one(),
        TypedExpr::Literal(LiteralValue::Float(value)) => *value == 1.0,
        _ => false,
    }
}

/// Identities only hold for numbers; strings and `any` values keep their operators.
fn is_number_typed(expr: &TypedExpr) -> bool {
    matches!(expr.ty(), Type::Int | Type::Float)
}
