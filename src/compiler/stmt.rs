use num::{BigInt, One};

use crate::{
    ast::{ast::BinaryOp, types::Type},
    type_checker::typed_ast::{LiteralValue, Method, TypedExpr, TypedStmt},
};

use super::{compiler::Compiler, expr::gen_expression};

pub fn gen_statement(compiler: &mut Compiler, statement: &TypedStmt) {
    match statement {
        TypedStmt::VarDecl { .. } | TypedStmt::Assignment { .. } => {
            let line = gen_assignment(compiler, statement);
            compiler.emit(format!("{};", line));
        }
        TypedStmt::FnDecl {
            function,
            parameters,
            body,
        } => {
            let name = compiler.name_of(*function);
            let parameters = parameters
                .iter()
                .map(|parameter| compiler.name_of(*parameter))
                .collect::<Vec<_>>()
                .join(", ");

            compiler.emit(format!("function {}({}) {{", name, parameters));
            compiler.gen_block(body);
            compiler.emit(String::from("}"));
        }
        TypedStmt::RangeFor {
            init,
            update,
            test,
            body,
        } => {
            let init = gen_assignment(compiler, init);
            let test = gen_expression(compiler, test);
            let update = gen_update(compiler, update);

            compiler.emit(format!("for ({}; {}; {}) {{", init, test, update));
            compiler.gen_block(body);
            compiler.emit(String::from("}"));
        }
        TypedStmt::CollectionFor {
            variable,
            collection,
            body,
        } => {
            let variable = compiler.name_of(*variable);
            let mut iterated = gen_expression(compiler, collection);
            if let Type::Dict(_) = collection.ty() {
                iterated = format!("{}.entries()", iterated);
            }

            compiler.emit(format!("for (let {} of {}) {{", variable, iterated));
            compiler.gen_block(body);
            compiler.emit(String::from("}"));
        }
        TypedStmt::Return(None) => compiler.emit(String::from("return;")),
        TypedStmt::Return(Some(value)) => {
            let value = gen_expression(compiler, value);
            compiler.emit(format!("return {};", value));
        }
        TypedStmt::Break => compiler.emit(String::from("break;")),
        TypedStmt::Call { callee, arguments } => {
            let callee = gen_expression(compiler, callee);
            let arguments = gen_arguments(compiler, arguments);
            compiler.emit(format!("{}({});", callee, arguments));
        }
        TypedStmt::Print(arguments) => {
            let arguments = gen_arguments(compiler, arguments);
            compiler.emit(format!("console.log({});", arguments));
        }
        TypedStmt::Method {
            object,
            method,
            arguments,
        } => {
            let object = gen_expression(compiler, object);
            let arguments = arguments
                .iter()
                .map(|argument| gen_expression(compiler, argument))
                .collect::<Vec<_>>();
            let call = match (method, arguments.as_slice()) {
                (Method::ArrayAdd, [value]) => format!("push({})", value),
                (Method::ArrayInsert, [index, value]) => format!("splice({}, 0, {})", index, value),
                (Method::ArrayDelete, [index]) => format!("splice({}, 1)", index),
                (Method::DictSet, [key, value]) => format!("set({}, {})", key, value),
                (Method::DictDelete, [key]) => format!("delete({})", key),
                _ => unreachable!("method arity is checked by the analyzer"),
            };
            compiler.emit(format!("{}.{};", object, call));
        }
    }
}

/// A declaration or assignment without its terminating semicolon.
fn gen_assignment(compiler: &mut Compiler, statement: &TypedStmt) -> String {
    match statement {
        TypedStmt::VarDecl {
            variable,
            initializer,
        } => {
            let name = compiler.name_of(*variable);
            let value = gen_expression(compiler, initializer);
            format!("let {} = {}", name, value)
        }
        TypedStmt::Assignment { target, source } => {
            let target = gen_expression(compiler, target);
            let source = gen_expression(compiler, source);
            format!("{} = {}", target, source)
        }
        other => unreachable!("loop header holds a non-assignment: {:?}", other),
    }
}

/// Loop updates stepping a variable by one collapse to `++` / `--`.
fn gen_update(compiler: &mut Compiler, update: &TypedStmt) -> String {
    if let TypedStmt::Assignment {
        target: TypedExpr::Variable { entity, .. },
        source:
            TypedExpr::Binary {
                left,
                operator,
                right,
                ..
            },
    } = update
    {
        let steps_by_one = left.entity() == Some(*entity)
            && matches!(right.as_ref(), TypedExpr::Literal(LiteralValue::Int(value)) if *value == BigInt::one());

        if steps_by_one {
            match operator {
                BinaryOp::Add => return format!("{}++", compiler.name_of(*entity)),
                BinaryOp::Subtract => return format!("{}--", compiler.name_of(*entity)),
                _ => {}
            }
        }
    }

    gen_assignment(compiler, update)
}

fn gen_arguments(compiler: &mut Compiler, arguments: &[TypedExpr]) -> String {
    arguments
        .iter()
        .map(|argument| gen_expression(compiler, argument))
        .collect::<Vec<_>>()
        .join(", ")
}
