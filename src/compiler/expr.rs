use num::Signed;

use crate::{
    ast::ast::BinaryOp,
    type_checker::typed_ast::{LiteralValue, TypedExpr},
};

use super::compiler::Compiler;

/// Renders `expression` as inline JavaScript.
///
/// Compound expressions are fully parenthesized so the output never depends
/// on JavaScript's precedence table.
pub fn gen_expression(compiler: &mut Compiler, expression: &TypedExpr) -> String {
    match expression {
        TypedExpr::Literal(value) => gen_literal(value),
        TypedExpr::Variable { entity, .. } => compiler.name_of(*entity),
        TypedExpr::Binary {
            left,
            operator,
            right,
            ..
        } => {
            let mut left_text = gen_expression(compiler, left);
            let right_text = gen_expression(compiler, right);

            // JavaScript rejects a unary expression as the base of `**`
            if *operator == BinaryOp::Power && needs_base_parens(left) {
                left_text = format!("({})", left_text);
            }

            format!("({} {} {})", left_text, binary_operator(*operator), right_text)
        }
        TypedExpr::Unary {
            operator, operand, ..
        } => {
            let operand = gen_expression(compiler, operand);
            format!("{}({})", operator.symbol(), operand)
        }
        TypedExpr::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => {
            let test = gen_expression(compiler, test);
            let consequent = gen_expression(compiler, consequent);
            let alternate = gen_expression(compiler, alternate);
            format!("(({}) ? ({}) : ({}))", test, consequent, alternate)
        }
        TypedExpr::Call {
            callee, arguments, ..
        } => {
            let callee = gen_expression(compiler, callee);
            let arguments = gen_list(compiler, arguments);
            format!("{}({})", callee, arguments)
        }
        TypedExpr::Subscript { array, index, .. } => {
            let array = gen_expression(compiler, array);
            let index = gen_expression(compiler, index);
            format!("{}[{}]", array, index)
        }
        TypedExpr::Array { elements, .. } => format!("[{}]", gen_list(compiler, elements)),
        TypedExpr::Dict { entries, .. } => {
            let entries = entries
                .iter()
                .map(|(key, value)| {
                    let key = gen_expression(compiler, key);
                    let value = gen_expression(compiler, value);
                    format!("[{}, {}]", key, value)
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("new Map([{}])", entries)
        }
    }
}

fn gen_list(compiler: &mut Compiler, expressions: &[TypedExpr]) -> String {
    expressions
        .iter()
        .map(|expression| gen_expression(compiler, expression))
        .collect::<Vec<_>>()
        .join(", ")
}

fn needs_base_parens(base: &TypedExpr) -> bool {
    match base {
        TypedExpr::Unary { .. } => true,
        TypedExpr::Literal(LiteralValue::Int(value)) => value.is_negative(),
        TypedExpr::Literal(LiteralValue::Float(value)) => value.is_sign_negative(),
        _ => false,
    }
}

pub fn binary_operator(operator: BinaryOp) -> &'static str {
    match operator {
        BinaryOp::Equals => "===",
        BinaryOp::NotEquals => "!==",
        other => other.symbol(),
    }
}

pub fn gen_literal(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Int(value) => value.to_string(),
        LiteralValue::Float(value) => gen_float(*value),
        LiteralValue::String(value) => quote(value),
        LiteralValue::Bool(value) => value.to_string(),
    }
}

fn gen_float(value: f64) -> String {
    if value.is_nan() {
        String::from("NaN")
    } else if value.is_infinite() {
        String::from(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        value.to_string()
    }
}

/// A double-quoted JavaScript string literal.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');

    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                quoted.push_str(&format!("\\x{:02x}", c as u32))
            }
            '\u{2028}' => quoted.push_str("\\u2028"),
            '\u{2029}' => quoted.push_str("\\u2029"),
            c => quoted.push(c),
        }
    }

    quoted.push('"');
    quoted
}
