//! Unit tests for the optimizer.

use std::rc::Rc;

use indoc::indoc;

use super::optimizer::{optimize, optimize_expr};
use crate::{
    ast::{
        ast::{BinaryOp, UnaryOp},
        types::Type,
    },
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::{
        entities::EntityId,
        type_checker::analyze,
        typed_ast::{LiteralValue, TypedExpr, TypedProgram, TypedStmt},
    },
};

fn analyze_source(source: &str) -> TypedProgram {
    let file = Rc::new(String::from("test.gg"));
    let tokens = tokenize(source, Rc::clone(&file)).unwrap();
    let program = parse(tokens, file).unwrap();
    analyze(&program).unwrap()
}

fn optimize_source(source: &str) -> TypedProgram {
    optimize(analyze_source(source))
}

/// Optimized initializer of the last statement, which must be a declaration.
fn last_initializer(source: &str) -> TypedExpr {
    let program = optimize_source(source);
    match program.statements.last() {
        Some(TypedStmt::VarDecl { initializer, .. }) => initializer.clone(),
        other => panic!("expected a declaration, found {:?}", other),
    }
}

fn first_variable(program: &TypedProgram) -> EntityId {
    match &program.statements[0] {
        TypedStmt::VarDecl { variable, .. } => *variable,
        other => panic!("expected a declaration, found {:?}", other),
    }
}

fn binary(left: TypedExpr, operator: BinaryOp, right: TypedExpr, ty: Type) -> TypedExpr {
    TypedExpr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        ty,
    }
}

#[test]
fn test_integer_folding_is_exact() {
    assert_eq!(last_initializer("x = 5 + 8"), TypedExpr::int(13));
    assert_eq!(last_initializer("x = 5 - 8"), TypedExpr::int(-3));
    assert_eq!(last_initializer("x = 5 * 8"), TypedExpr::int(40));
    assert_eq!(last_initializer("x = 5 ** 8"), TypedExpr::int(390625));
    assert_eq!(last_initializer("x = 5 % 8"), TypedExpr::int(5));
    assert_eq!(last_initializer("x = -7 % 2"), TypedExpr::int(-1));
    assert_eq!(
        last_initializer("x = 99999999999999999999 + 1"),
        TypedExpr::literal(LiteralValue::Int("100000000000000000000".parse().unwrap()))
    );
}

#[test]
fn test_division_folds_to_float() {
    assert_eq!(last_initializer("x = 5 / 8"), TypedExpr::float(0.625));
    assert_eq!(last_initializer("x = 1.0 / 4.0"), TypedExpr::float(0.25));
}

#[test]
fn test_float_folding() {
    assert_eq!(last_initializer("x = 2.5 * 2.0"), TypedExpr::float(5.0));
    assert_eq!(last_initializer("x = 2.0 ** 3.0"), TypedExpr::float(8.0));
    assert_eq!(last_initializer("x = 1.5 - 0.5"), TypedExpr::float(1.0));
}

#[test]
fn test_comparison_folding() {
    assert_eq!(last_initializer("x = 1 < 2"), TypedExpr::bool(true));
    assert_eq!(last_initializer("x = 3 <= 2"), TypedExpr::bool(false));
    assert_eq!(last_initializer("x = 2.0 == 2.0"), TypedExpr::bool(true));
    assert_eq!(last_initializer("x = 4 != 4"), TypedExpr::bool(false));
    assert_eq!(last_initializer("x = 1 + 1 > 1"), TypedExpr::bool(true));
}

#[test]
fn test_nested_constants_collapse_in_one_pass() {
    assert_eq!(last_initializer("x = (1 + 2) * (3 + 4) - 1"), TypedExpr::int(20));
    assert_eq!(last_initializer("x = -(2 + 3)"), TypedExpr::int(-5));
    assert_eq!(last_initializer("x = -2.5"), TypedExpr::float(-2.5));
    assert_eq!(last_initializer("x = !(1 < 2)"), TypedExpr::bool(false));
}

#[test]
fn test_unsafe_integer_folds_are_skipped() {
    assert!(matches!(
        last_initializer("x = 5 % 0"),
        TypedExpr::Binary { operator: BinaryOp::Modulo, .. }
    ));
    assert!(matches!(
        last_initializer("x = 2 ** -1"),
        TypedExpr::Binary { operator: BinaryOp::Power, .. }
    ));
}

#[test]
fn test_additive_identities() {
    let program = optimize_source("y = 3\nx = y + 0\nz = 0 + y\nw = y - 0");
    let y = first_variable(&program);

    for statement in &program.statements[1..] {
        let TypedStmt::VarDecl { initializer, .. } = statement else {
            panic!("expected a declaration");
        };
        assert_eq!(initializer.entity(), Some(y));
    }
}

#[test]
fn test_zero_minus_x_negates() {
    let program = optimize_source("y = 3.5\nx = 0.0 - y");
    let y = first_variable(&program);

    let TypedStmt::VarDecl { initializer, .. } = &program.statements[1] else {
        panic!("expected a declaration");
    };
    let TypedExpr::Unary { operator, operand, ty } = initializer else {
        panic!("expected a negation, found {:?}", initializer);
    };
    assert_eq!(*operator, UnaryOp::Negate);
    assert_eq!(operand.entity(), Some(y));
    assert_eq!(ty, &Type::Float);
}

#[test]
fn test_multiplicative_identities() {
    let source = indoc! {"
        y = 7
        a = y * 1
        b = 1 * y
        c = y * 0
        d = 0 * y
        e = y / 1
        f = 0 / y
        g = y ** 0
        h = 1 ** y
    "};
    let program = optimize_source(source);
    let y = first_variable(&program);

    let initializers: Vec<&TypedExpr> = program.statements[1..]
        .iter()
        .map(|statement| match statement {
            TypedStmt::VarDecl { initializer, .. } => initializer,
            other => panic!("expected a declaration, found {:?}", other),
        })
        .collect();

    assert_eq!(initializers[0].entity(), Some(y));
    assert_eq!(initializers[1].entity(), Some(y));
    assert_eq!(initializers[2], &TypedExpr::int(0));
    assert_eq!(initializers[3], &TypedExpr::int(0));
    // Integer division is a float, so neither side can stand in for it
    assert!(matches!(
        initializers[4],
        TypedExpr::Binary { operator: BinaryOp::Divide, ty: Type::Float, .. }
    ));
    assert_eq!(initializers[5], &TypedExpr::float(0.0));
    assert_eq!(initializers[6], &TypedExpr::int(1));
    assert_eq!(initializers[7], &TypedExpr::int(1));

    assert_eq!(last_initializer("y = 2.0\nx = y ** 0.0"), TypedExpr::float(1.0));

    let program = optimize_source("y = 2.5\nx = y / 1.0");
    let y = first_variable(&program);
    let TypedStmt::VarDecl { initializer, .. } = &program.statements[1] else {
        panic!("expected a declaration");
    };
    assert_eq!(initializer.entity(), Some(y));
    assert_eq!(initializer.ty(), Type::Float);
    assert_eq!(last_initializer("y = 2.5\nz = 0.0 / y"), TypedExpr::float(0.0));
}

#[test]
fn test_identities_skip_untyped_operands() {
    let program = optimize_source("Function f(a)\n  return a + 0\nend f");

    let TypedStmt::FnDecl { body, .. } = &program.statements[0] else {
        panic!("expected a function declaration");
    };
    assert!(matches!(
        &body[0],
        TypedStmt::Return(Some(TypedExpr::Binary { operator: BinaryOp::Add, .. }))
    ));
}

#[test]
fn test_logical_simplification() {
    let program = optimize_source(indoc! {"
        b = 1 < 2
        c = true && b
        d = b && true
        e = false || b
        f = b || false
    "});

    let TypedStmt::VarDecl { initializer, .. } = &program.statements[0] else {
        panic!("expected a declaration");
    };
    assert_eq!(initializer, &TypedExpr::bool(true));

    let b = first_variable(&program);
    for statement in &program.statements[1..] {
        let TypedStmt::VarDecl { initializer, .. } = statement else {
            panic!("expected a declaration");
        };
        assert_eq!(initializer.entity(), Some(b));
    }

    let variable = TypedExpr::Variable {
        entity: EntityId(42),
        ty: Type::Bool,
    };
    let expr = binary(TypedExpr::bool(true), BinaryOp::And, variable.clone(), Type::Bool);
    assert_eq!(optimize_expr(expr), variable);

    let expr = binary(variable.clone(), BinaryOp::Or, TypedExpr::bool(false), Type::Bool);
    assert_eq!(optimize_expr(expr), variable);

    let expr = binary(variable.clone(), BinaryOp::And, TypedExpr::bool(false), Type::Bool);
    assert!(matches!(optimize_expr(expr), TypedExpr::Binary { .. }));
}

#[test]
fn test_conditional_with_literal_test() {
    assert_eq!(last_initializer("x = true ? 1 : 2"), TypedExpr::int(1));
    assert_eq!(last_initializer("x = 2 < 1 ? 1 : 2 + 2"), TypedExpr::int(4));
}

#[test]
fn test_self_assignment_is_removed() {
    let program = optimize_source("x = 1\nx = x\nx = x + 0\nx = x * 1");
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn test_self_assignment_and_return_fold() {
    let program = optimize_source(indoc! {"
        Function f(x)
          x = x
          return (1 + 1)
        end f
    "});

    let TypedStmt::FnDecl { body, .. } = &program.statements[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(body, &vec![TypedStmt::Return(Some(TypedExpr::int(2)))]);
}

#[test]
fn test_dead_range_loop_is_removed() {
    let program = optimize_source(indoc! {"
        for (i = 3, i += 1)
          print(i)
        end i < 2
    "});
    assert!(program.statements.is_empty());

    let program = optimize_source("for (i = 0, i += 1)\nend false");
    assert!(program.statements.is_empty());

    let program = optimize_source("for (i = 5, i += 1)\nend i < 5");
    assert!(program.statements.is_empty());

    let program = optimize_source("for (i = 3, i += 1)\n  print(i)\nend i <= 3");
    assert_eq!(program.statements.len(), 1);

    // Assigning an outer variable survives the loop
    let program = optimize_source(indoc! {"
        i = 0
        for (i = 3, i += 1)
        end i < 2
        print(i)
    "});
    let i = first_variable(&program);
    assert_eq!(program.statements.len(), 3);
    assert!(matches!(
        &program.statements[1],
        TypedStmt::Assignment { target, source }
            if target.entity() == Some(i) && source == &TypedExpr::int(3)
    ));
    assert!(matches!(&program.statements[2], TypedStmt::Print(_)));

    let program = optimize_source("i = 0\nfor (i = 0, i += 1)\nend false");
    assert!(matches!(&program.statements[1], TypedStmt::Assignment { .. }));

    let program = optimize_source("for (i = 0, i += 1)\n  print(i)\nend i < 1 + 9");
    let TypedStmt::RangeFor { test, .. } = &program.statements[0] else {
        panic!("expected a range-for");
    };
    assert!(matches!(test, TypedExpr::Binary { right, .. } if right.as_ref() == &TypedExpr::int(10)));
}

#[test]
fn test_recurses_into_nested_structures() {
    let program = optimize_source(indoc! {r#"
        a = [1 + 1, 2 * 3]
        d = <<"k" + "": "v">>
        x = a[0 + 1]
        print(sin(1.0 + 1.0))
        for e in [0 + 1]
          print(e * 1)
        end for
    "#});

    let TypedStmt::VarDecl { initializer, .. } = &program.statements[0] else {
        panic!("expected a declaration");
    };
    assert!(matches!(
        initializer,
        TypedExpr::Array { elements, .. } if elements == &vec![TypedExpr::int(2), TypedExpr::int(6)]
    ));

    let TypedStmt::VarDecl { initializer, .. } = &program.statements[2] else {
        panic!("expected a declaration");
    };
    assert!(matches!(
        initializer,
        TypedExpr::Subscript { index, .. } if index.as_ref() == &TypedExpr::int(1)
    ));

    let TypedStmt::Print(arguments) = &program.statements[3] else {
        panic!("expected a print");
    };
    assert!(matches!(
        &arguments[0],
        TypedExpr::Call { arguments, .. } if arguments == &vec![TypedExpr::float(2.0)]
    ));

    let TypedStmt::CollectionFor { collection, body, .. } = &program.statements[4] else {
        panic!("expected a collection-for");
    };
    assert!(matches!(collection, TypedExpr::Array { elements, .. } if elements == &vec![TypedExpr::int(1)]));
    assert!(matches!(&body[0], TypedStmt::Print(arguments) if matches!(&arguments[0], TypedExpr::Variable { .. })));
}

#[test]
fn test_optimize_is_idempotent() {
    let sources = [
        "x = 5 + 8\ny = x * 1 + 0\nz = 0 - y",
        "b = 1 < 2\nc = !b && true || false ? 1 : 0 ** 2",
        "Function f(x: int) -> int\n  x = x\n  return x ** 0 + f(x - 0)\nend f",
        "for (i = 3, i += 1)\nend i < 2\nfor (j = 0, j += 1 * 1)\n  k = j / 1\nend j < 2 + 2",
        "a = [-(1), 2 ** 70, 5 % 0]\nfor v in a\n  print(v, -v, 0.0 / 0.5)\nend for",
    ];

    for source in sources {
        let once = optimize_source(source);
        let twice = optimize(once.clone());
        assert_eq!(once, twice, "not idempotent for {:?}", source);
    }
}
