//! Unit tests for the parser module.

use std::rc::Rc;

use indoc::indoc;

use super::parser::parse;
use crate::{
    ast::{
        ast::{BinaryOp, Expr, Program, Stmt, UnaryOp},
        types::Type,
    },
    errors::errors::{Error, ErrorKind},
    lexer::lexer::tokenize,
};

fn parse_source(source: &str) -> Result<Program, Error> {
    let file = Rc::new(String::from("test.gg"));
    let tokens = tokenize(source, Rc::clone(&file))?;
    parse(tokens, file)
}

fn assignment_value(program: &Program, index: usize) -> &Expr {
    match &program.body[index] {
        Stmt::Assignment(assignment) => &assignment.value,
        other => panic!("expected an assignment, found {:?}", other),
    }
}

#[test]
fn test_parse_assignment() {
    let program = parse_source("x = 42").unwrap();

    let Stmt::Assignment(assignment) = &program.body[0] else {
        panic!("expected an assignment");
    };
    assert!(matches!(&assignment.target, Expr::Symbol(symbol) if symbol.value == "x"));
    assert_eq!(assignment.operator, None);
    assert!(matches!(&assignment.value, Expr::Number(number) if number.value == "42"));
}

#[test]
fn test_parse_compound_assignment() {
    let program = parse_source("x += 1\ny %= 2").unwrap();

    let Stmt::Assignment(first) = &program.body[0] else {
        panic!("expected an assignment");
    };
    let Stmt::Assignment(second) = &program.body[1] else {
        panic!("expected an assignment");
    };
    assert_eq!(first.operator, Some(BinaryOp::Add));
    assert_eq!(second.operator, Some(BinaryOp::Modulo));
}

#[test]
fn test_parse_precedence() {
    let program = parse_source("x = 1 + 2 * 3").unwrap();

    let Expr::Binary(sum) = assignment_value(&program, 0) else {
        panic!("expected a binary expression");
    };
    assert_eq!(sum.operator, BinaryOp::Add);
    assert!(matches!(sum.right.as_ref(), Expr::Binary(product) if product.operator == BinaryOp::Multiply));
}

#[test]
fn test_parse_exponent_is_right_associative() {
    let program = parse_source("x = 2 ** 3 ** 2").unwrap();

    let Expr::Binary(power) = assignment_value(&program, 0) else {
        panic!("expected a binary expression");
    };
    assert!(matches!(power.left.as_ref(), Expr::Number(_)));
    assert!(matches!(power.right.as_ref(), Expr::Binary(inner) if inner.operator == BinaryOp::Power));
}

#[test]
fn test_parse_negation_binds_looser_than_exponent() {
    let program = parse_source("x = -2 ** 2").unwrap();

    let Expr::Prefix(prefix) = assignment_value(&program, 0) else {
        panic!("expected a prefix expression");
    };
    assert_eq!(prefix.operator, UnaryOp::Negate);
    assert!(matches!(prefix.right_expr.as_ref(), Expr::Binary(_)));
}

#[test]
fn test_parse_logical_precedence() {
    let program = parse_source("x = a || b && c").unwrap();

    let Expr::Binary(or) = assignment_value(&program, 0) else {
        panic!("expected a binary expression");
    };
    assert_eq!(or.operator, BinaryOp::Or);
    assert!(matches!(or.right.as_ref(), Expr::Binary(and) if and.operator == BinaryOp::And));
}

#[test]
fn test_parse_conditional() {
    let program = parse_source("x = a < b ? 1 : 2").unwrap();

    let Expr::Conditional(conditional) = assignment_value(&program, 0) else {
        panic!("expected a conditional");
    };
    assert!(matches!(conditional.test.as_ref(), Expr::Binary(test) if test.operator == BinaryOp::Less));
}

#[test]
fn test_parse_literals() {
    let program = parse_source(indoc! {r#"
        a = [1, 2, 3]
        d = <<"k": 1, "j": 2>>
        e = []
        b = true
        s = 'hi'
    "#})
    .unwrap();

    assert!(matches!(assignment_value(&program, 0), Expr::Array(array) if array.elements.len() == 3));
    assert!(matches!(assignment_value(&program, 1), Expr::Dict(dict) if dict.entries.len() == 2));
    assert!(matches!(assignment_value(&program, 2), Expr::Array(array) if array.elements.is_empty()));
    assert!(matches!(assignment_value(&program, 3), Expr::Boolean(boolean) if boolean.value));
    assert!(matches!(assignment_value(&program, 4), Expr::String(string) if string.value == "hi"));
}

#[test]
fn test_parse_call_and_subscript() {
    let program = parse_source("print(a[0], f(1)(2))\na[1] = 3").unwrap();

    let Stmt::Call(call) = &program.body[0] else {
        panic!("expected a call statement");
    };
    assert_eq!(call.arguments.len(), 2);
    assert!(matches!(&call.arguments[0], Expr::Subscript(_)));
    assert!(matches!(&call.arguments[1], Expr::Call(inner) if matches!(inner.callee.as_ref(), Expr::Call(_))));

    let Stmt::Assignment(assignment) = &program.body[1] else {
        panic!("expected an assignment");
    };
    assert!(matches!(&assignment.target, Expr::Subscript(_)));
}

#[test]
fn test_parse_method_calls() {
    let program = parse_source(indoc! {r#"
        array_1 = ["hello", "goodbye"]
        array_1.add("2")
        array_1.insert(1, "hi")
        array_1.delete(2)
    "#})
    .unwrap();

    let methods: Vec<(&str, usize)> = program.body[1..]
        .iter()
        .map(|stmt| match stmt {
            Stmt::Call(call) => match call.callee.as_ref() {
                Expr::Member(member) => {
                    assert!(matches!(member.object.as_ref(), Expr::Symbol(symbol) if symbol.value == "array_1"));
                    (member.property.as_str(), call.arguments.len())
                }
                other => panic!("expected a member callee, found {:?}", other),
            },
            other => panic!("expected a call statement, found {:?}", other),
        })
        .collect();

    assert_eq!(methods, vec![("add", 1), ("insert", 2), ("delete", 1)]);
}

#[test]
fn test_member_binds_like_a_call() {
    let program = parse_source("xs[0].add(1)").unwrap();

    let Stmt::Call(call) = &program.body[0] else {
        panic!("expected a call statement");
    };
    let Expr::Member(member) = call.callee.as_ref() else {
        panic!("expected a member callee");
    };
    assert!(matches!(member.object.as_ref(), Expr::Subscript(_)));
    assert_eq!(member.property_span.start.column, 7);
}

#[test]
fn test_bare_member_path_is_rejected() {
    let error = parse_source("Function load()\n  File.parent.start_menu\nend load").unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::Syntax);

    let error = parse_source("xs.1").unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::Syntax);
}

#[test]
fn test_parse_function_declaration() {
    let program = parse_source(indoc! {"
        Function add(a: int, b) -> [float]
          return a + b
        end add
    "})
    .unwrap();

    let Stmt::FnDecl(function) = &program.body[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(function.name, "add");
    assert_eq!(function.end_name, "add");
    assert_eq!(function.parameters.len(), 2);
    assert_eq!(
        function.parameters[0].type_annotation.as_ref().map(|a| a.ty.clone()),
        Some(Type::Int)
    );
    assert!(function.parameters[1].type_annotation.is_none());
    assert_eq!(
        function.return_type.as_ref().map(|a| a.ty.clone()),
        Some(Type::Array(Box::new(Type::Float)))
    );
    assert!(matches!(&function.body[0], Stmt::Return(ret) if ret.value.is_some()));
}

#[test]
fn test_parse_bare_return() {
    let program = parse_source(indoc! {"
        Function f()
          return
          x = 1
        end f
    "})
    .unwrap();

    let Stmt::FnDecl(function) = &program.body[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(function.body.len(), 2);
    assert!(matches!(&function.body[0], Stmt::Return(ret) if ret.value.is_none()));
}

#[test]
fn test_parse_range_for() {
    let program = parse_source(indoc! {"
        for (i = 0, i += 1)
          print(i)
        end i < 10
    "})
    .unwrap();

    let Stmt::RangeFor(range) = &program.body[0] else {
        panic!("expected a range-for");
    };
    assert_eq!(range.update.operator, Some(BinaryOp::Add));
    assert_eq!(range.body.len(), 1);
    assert!(matches!(&range.test, Expr::Binary(test) if test.operator == BinaryOp::Less));
}

#[test]
fn test_parse_collection_for() {
    let program = parse_source(indoc! {"
        for x in [1, 2]
          print(x)
          break
        end for
    "})
    .unwrap();

    let Stmt::CollectionFor(each) = &program.body[0] else {
        panic!("expected a collection-for");
    };
    assert_eq!(each.variable, "x");
    assert_eq!(each.body.len(), 2);
    assert!(matches!(&each.body[1], Stmt::Break(_)));
}

#[test]
fn test_newline_ends_expression() {
    let program = parse_source("x = a\n-1 + f(2)").unwrap_err();
    assert_eq!(program.get_kind(), ErrorKind::Syntax);

    let program = parse_source("x = a\ny = -1").unwrap();
    assert_eq!(program.body.len(), 2);
}

#[test]
fn test_non_call_expression_statement_is_rejected() {
    let error = parse_source("1 + 2").unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::Syntax);
}

#[test]
fn test_invalid_assignment_target() {
    let error = parse_source("f(1) = 2").unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::Syntax);
    assert_eq!(error.get_position().column, 1);
}

#[test]
fn test_unclosed_block() {
    let error = parse_source("Function f()\n  x = 1\n").unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::Syntax);
}

#[test]
fn test_unknown_type_name() {
    let error = parse_source("Function f(x: number)\nend f").unwrap_err();
    assert_eq!(error.get_kind(), ErrorKind::Syntax);
}

#[test]
fn test_empty_program() {
    let program = parse_source("// nothing here\n").unwrap();
    assert!(program.body.is_empty());
}
