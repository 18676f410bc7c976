use num::BigInt;
use tracing::trace;

use crate::{
    ast::{
        ast::{BinaryOp, Expr, Program, Stmt, UnaryOp},
        expressions::{CallExpr, MemberExpr, NumberExpr, SubscriptExpr, SymbolExpr},
        statements::{AssignmentStmt, CollectionForStmt, FnDeclStmt, RangeForStmt, ReturnStmt},
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    context::Context,
    entities::{Entity, EntityArena, EntityId},
    stdlib::{self, Builtin},
    typed_ast::{LiteralValue, Method, TypedExpr, TypedProgram, TypedStmt},
};

/// Walks a parsed program once, resolving names and checking types.
///
/// The analyzer owns the entity arena; scopes are threaded through the
/// visit functions as [`Context`] values that borrow their parent.
#[derive(Debug, Default)]
pub struct TypeChecker {
    entities: EntityArena,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            entities: EntityArena::new(),
        }
    }

    fn entity(&self, id: EntityId) -> &Entity {
        self.entities.get(id)
    }

    fn declare(&mut self, context: &mut Context, entity: Entity) -> EntityId {
        let name = String::from(entity.name());
        let id = self.entities.add(entity);
        trace!(%name, %id, "declared");
        context.declare(&name, id);
        id
    }

    pub fn check_block(&mut self, body: &[Stmt], context: &mut Context) -> Result<Vec<TypedStmt>, Error> {
        body.iter()
            .map(|stmt| self.check_stmt(stmt, context))
            .collect()
    }

    pub fn check_stmt(&mut self, stmt: &Stmt, context: &mut Context) -> Result<TypedStmt, Error> {
        match stmt {
            Stmt::Assignment(assignment) => self.check_assignment(assignment, context),
            Stmt::FnDecl(function) => self.check_fn_decl(function, context),
            Stmt::RangeFor(range) => self.check_range_for(range, context),
            Stmt::CollectionFor(each) => self.check_collection_for(each, context),
            Stmt::Return(ret) => self.check_return(ret, context),
            Stmt::Break(brk) => {
                if context.in_loop() {
                    Ok(TypedStmt::Break)
                } else {
                    Err(Error::new(ErrorImpl::BreakOutsideLoop, brk.span.start.clone()))
                }
            }
            Stmt::Call(call) => {
                if let Expr::Member(member) = call.callee.as_ref() {
                    return self.check_method(call, member, context);
                }

                let (callee, arguments, _) = self.check_call(call, context)?;

                let is_print = callee
                    .entity()
                    .and_then(|id| self.entity(id).builtin())
                    == Some(Builtin::Print);

                if is_print {
                    Ok(TypedStmt::Print(arguments))
                } else {
                    Ok(TypedStmt::Call { callee, arguments })
                }
            }
        }
    }

    fn check_assignment(
        &mut self,
        assignment: &AssignmentStmt,
        context: &mut Context,
    ) -> Result<TypedStmt, Error> {
        if let Some(operator) = assignment.operator {
            return self.check_compound_assignment(assignment, operator, context);
        }

        let source = self.check_expr(&assignment.value, context)?;
        let value_position = &assignment.value.get_span().start;
        expect_value(&source, value_position)?;

        let target = match &assignment.target {
            Expr::Symbol(symbol) => match context.lookup(&symbol.value) {
                None => {
                    let variable =
                        self.declare(context, Entity::variable(&symbol.value, source.ty()));
                    return Ok(TypedStmt::VarDecl {
                        variable,
                        initializer: source,
                    });
                }
                Some(id) => self.writable_variable(id, symbol)?,
            },
            Expr::Subscript(subscript) => self.check_subscript(subscript, context)?,
            other => return Err(not_assignable(other)),
        };

        check_assignable(&target.ty(), &source, value_position)?;
        Ok(TypedStmt::Assignment { target, source })
    }

    /// `x op= e` becomes `x = x op e`.
    fn check_compound_assignment(
        &mut self,
        assignment: &AssignmentStmt,
        operator: BinaryOp,
        context: &mut Context,
    ) -> Result<TypedStmt, Error> {
        let target = match &assignment.target {
            Expr::Symbol(symbol) => {
                let id = context.lookup(&symbol.value).ok_or_else(|| {
                    Error::new(
                        ErrorImpl::NotDeclared {
                            name: symbol.value.clone(),
                        },
                        symbol.span.start.clone(),
                    )
                })?;
                self.writable_variable(id, symbol)?
            }
            Expr::Subscript(subscript) => self.check_subscript(subscript, context)?,
            other => return Err(not_assignable(other)),
        };

        let value = self.check_expr(&assignment.value, context)?;
        let value_position = &assignment.value.get_span().start;

        let source = check_binary(
            operator,
            target.clone(),
            value,
            &assignment.target.get_span().start,
            value_position,
        )?;

        check_assignable(&target.ty(), &source, value_position)?;
        Ok(TypedStmt::Assignment { target, source })
    }

    fn writable_variable(&self, id: EntityId, symbol: &SymbolExpr) -> Result<TypedExpr, Error> {
        let entity = self.entity(id);
        if !entity.is_writable() {
            return Err(Error::new(
                ErrorImpl::NotAssignable {
                    name: symbol.value.clone(),
                },
                symbol.span.start.clone(),
            ));
        }

        Ok(TypedExpr::Variable {
            entity: id,
            ty: entity.ty().clone(),
        })
    }

    fn check_fn_decl(&mut self, function: &FnDeclStmt, context: &mut Context) -> Result<TypedStmt, Error> {
        if function.end_name != function.name {
            return Err(Error::new(
                ErrorImpl::MismatchedBlockName {
                    opened: function.name.clone(),
                    closed: function.end_name.clone(),
                },
                function.end_span.start.clone(),
            ));
        }

        context.must_not_already_be_declared(&function.name, &function.span.start)?;

        let parameter_types: Vec<Type> = function
            .parameters
            .iter()
            .map(|parameter| {
                parameter
                    .type_annotation
                    .as_ref()
                    .map(|annotation| annotation.ty.clone())
                    .unwrap_or(Type::Any)
            })
            .collect();
        let return_type = function
            .return_type
            .as_ref()
            .map(|annotation| annotation.ty.clone())
            .unwrap_or(Type::Any);

        // Registered before the body so the function can call itself
        let id = self.declare(
            context,
            Entity::function(&function.name, parameter_types.clone(), return_type),
        );

        let mut inner = context.function_scope(id);

        let mut parameters = vec![];
        for (parameter, ty) in function.parameters.iter().zip(parameter_types) {
            inner.must_not_already_be_declared(&parameter.name, &parameter.span.start)?;
            parameters.push(self.declare(&mut inner, Entity::variable(&parameter.name, ty)));
        }

        let body = self.check_block(&function.body, &mut inner)?;

        Ok(TypedStmt::FnDecl {
            function: id,
            parameters,
            body,
        })
    }

    fn check_range_for(&mut self, range: &RangeForStmt, context: &mut Context) -> Result<TypedStmt, Error> {
        let mut inner = context.loop_scope();

        let init = self.check_assignment(&range.init, &mut inner)?;
        let loop_variable_type = match &init {
            TypedStmt::VarDecl { initializer, .. } => initializer.ty(),
            TypedStmt::Assignment { target, .. } => target.ty(),
            _ => Type::Any,
        };
        if !loop_variable_type.is_numeric() {
            return Err(Error::new(
                ErrorImpl::ExpectedNumber {
                    found: loop_variable_type.to_string(),
                },
                range.init.value.get_span().start.clone(),
            ));
        }

        // The update clause cannot declare
        if let Expr::Symbol(symbol) = &range.update.target {
            if inner.lookup(&symbol.value).is_none() {
                return Err(Error::new(
                    ErrorImpl::NotDeclared {
                        name: symbol.value.clone(),
                    },
                    symbol.span.start.clone(),
                ));
            }
        }
        let update = self.check_assignment(&range.update, &mut inner)?;
        let update_type = match &update {
            TypedStmt::Assignment { source, .. } => source.ty(),
            _ => Type::Any,
        };
        if !update_type.is_numeric() {
            return Err(Error::new(
                ErrorImpl::ExpectedNumber {
                    found: update_type.to_string(),
                },
                range.update.value.get_span().start.clone(),
            ));
        }

        let test = self.check_expr(&range.test, &mut inner)?;
        expect_category(&test, Type::is_boolean, &range.test.get_span().start, |found| {
            ErrorImpl::ExpectedBoolean { found }
        })?;

        let body = self.check_block(&range.body, &mut inner)?;

        Ok(TypedStmt::RangeFor {
            init: Box::new(init),
            update: Box::new(update),
            test,
            body,
        })
    }

    fn check_collection_for(
        &mut self,
        each: &CollectionForStmt,
        context: &mut Context,
    ) -> Result<TypedStmt, Error> {
        let collection = self.check_expr(&each.collection, context)?;
        let Some(element_type) = collection.ty().element_type() else {
            return Err(Error::new(
                ErrorImpl::ExpectedArrayOrDictionary {
                    found: collection.ty().to_string(),
                },
                each.collection.get_span().start.clone(),
            ));
        };

        let mut inner = context.loop_scope();
        inner.must_not_already_be_declared(&each.variable, &each.variable_span.start)?;
        let variable = self.declare(&mut inner, Entity::variable(&each.variable, element_type));

        let body = self.check_block(&each.body, &mut inner)?;

        Ok(TypedStmt::CollectionFor {
            variable,
            collection,
            body,
        })
    }

    fn check_return(&mut self, ret: &ReturnStmt, context: &mut Context) -> Result<TypedStmt, Error> {
        let Some(function) = context.function() else {
            return Err(Error::new(ErrorImpl::ReturnOutsideFunction, ret.span.start.clone()));
        };

        let expected = match self.entity(function).ty() {
            Type::Function(_, return_type) => *return_type.clone(),
            _ => Type::Any,
        };

        let Some(value) = &ret.value else {
            return match expected {
                Type::Void | Type::Any => Ok(TypedStmt::Return(None)),
                expected => Err(Error::new(
                    ErrorImpl::MissingReturnValue {
                        expected: expected.to_string(),
                    },
                    ret.span.start.clone(),
                )),
            };
        };

        let position = &value.get_span().start;
        let value = self.check_expr(value, context)?;
        expect_value(&value, position)?;

        if expected == Type::Void || !expected.accepts(&value.ty()) {
            return Err(Error::new(
                ErrorImpl::ReturnTypeMismatch {
                    expected: expected.to_string(),
                    received: value.ty().to_string(),
                },
                position.clone(),
            ));
        }

        Ok(TypedStmt::Return(Some(value)))
    }

    pub fn check_expr(&mut self, expr: &Expr, context: &mut Context) -> Result<TypedExpr, Error> {
        match expr {
            Expr::Number(number) => check_number(number),
            Expr::String(string) => Ok(TypedExpr::literal(LiteralValue::String(string.value.clone()))),
            Expr::Boolean(boolean) => Ok(TypedExpr::bool(boolean.value)),
            Expr::Symbol(symbol) => {
                let id = context.lookup(&symbol.value).ok_or_else(|| {
                    Error::new(
                        ErrorImpl::NotDeclared {
                            name: symbol.value.clone(),
                        },
                        symbol.span.start.clone(),
                    )
                })?;

                Ok(TypedExpr::Variable {
                    entity: id,
                    ty: self.entity(id).ty().clone(),
                })
            }
            Expr::Binary(binary) => {
                let left = self.check_expr(&binary.left, context)?;
                let right = self.check_expr(&binary.right, context)?;

                check_binary(
                    binary.operator,
                    left,
                    right,
                    &binary.left.get_span().start,
                    &binary.right.get_span().start,
                )
            }
            Expr::Prefix(prefix) => {
                let operand = self.check_expr(&prefix.right_expr, context)?;
                let position = &prefix.right_expr.get_span().start;

                let ty = match prefix.operator {
                    UnaryOp::Negate => {
                        expect_category(&operand, Type::is_numeric, position, |found| {
                            ErrorImpl::ExpectedNumber { found }
                        })?;
                        operand.ty()
                    }
                    UnaryOp::Not => {
                        expect_category(&operand, Type::is_boolean, position, |found| {
                            ErrorImpl::ExpectedBoolean { found }
                        })?;
                        Type::Bool
                    }
                };

                Ok(TypedExpr::Unary {
                    operator: prefix.operator,
                    operand: Box::new(operand),
                    ty,
                })
            }
            Expr::Conditional(conditional) => {
                let test = self.check_expr(&conditional.test, context)?;
                expect_category(&test, Type::is_boolean, &conditional.test.get_span().start, |found| {
                    ErrorImpl::ExpectedBoolean { found }
                })?;

                let consequent = self.check_expr(&conditional.consequent, context)?;
                let alternate = self.check_expr(&conditional.alternate, context)?;
                let ty = unify(&consequent, &alternate, &conditional.alternate.get_span().start)?;

                Ok(TypedExpr::Conditional {
                    test: Box::new(test),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                    ty,
                })
            }
            Expr::Call(call) => {
                let (callee, arguments, ty) = self.check_call(call, context)?;

                Ok(TypedExpr::Call {
                    callee: Box::new(callee),
                    arguments,
                    ty,
                })
            }
            Expr::Subscript(subscript) => self.check_subscript(subscript, context),
            Expr::Member(member) => {
                self.check_expr(&member.object, context)?;
                Err(Error::new(
                    ErrorImpl::MethodAsValue {
                        name: member.property.clone(),
                    },
                    member.property_span.start.clone(),
                ))
            }
            Expr::Array(array) => {
                let mut ty = Type::Any;
                let mut elements = vec![];

                for element in &array.elements {
                    let position = &element.get_span().start;
                    let element = self.check_expr(element, context)?;
                    expect_value(&element, position)?;
                    ty = unify_types(&ty, &element.ty(), position)?;
                    elements.push(element);
                }

                Ok(TypedExpr::Array {
                    elements,
                    ty: Type::Array(Box::new(ty)),
                })
            }
            Expr::Dict(dict) => {
                let mut ty = Type::Any;
                let mut entries = vec![];

                for (key, value) in &dict.entries {
                    let key_position = &key.get_span().start;
                    let value_position = &value.get_span().start;
                    let key = self.check_expr(key, context)?;
                    let value = self.check_expr(value, context)?;

                    expect_value(&key, key_position)?;
                    expect_value(&value, value_position)?;
                    ty = unify_types(&ty, &key.ty(), key_position)?;
                    ty = unify_types(&ty, &value.ty(), value_position)?;

                    entries.push((key, value));
                }

                Ok(TypedExpr::Dict {
                    entries,
                    ty: Type::Dict(Box::new(ty)),
                })
            }
        }
    }

    fn check_subscript(&mut self, subscript: &SubscriptExpr, context: &mut Context) -> Result<TypedExpr, Error> {
        let array = self.check_expr(&subscript.array, context)?;
        expect_category(&array, Type::is_array, &subscript.array.get_span().start, |found| {
            ErrorImpl::ExpectedArray { found }
        })?;

        let index = self.check_expr(&subscript.index, context)?;
        expect_category(&index, Type::is_integer, &subscript.index.get_span().start, |found| {
            ErrorImpl::ExpectedInteger { found }
        })?;

        let ty = match array.ty() {
            Type::Array(base) => *base,
            _ => Type::Any,
        };

        Ok(TypedExpr::Subscript {
            array: Box::new(array),
            index: Box::new(index),
            ty,
        })
    }

    /// Returns the checked callee, the checked arguments and the result type.
    fn check_call(
        &mut self,
        call: &CallExpr,
        context: &mut Context,
    ) -> Result<(TypedExpr, Vec<TypedExpr>, Type), Error> {
        let callee = self.check_expr(&call.callee, context)?;
        expect_category(&callee, Type::is_function, &call.callee.get_span().start, |found| {
            ErrorImpl::ExpectedFunction { found }
        })?;

        let mut arguments = vec![];
        for argument in &call.arguments {
            arguments.push(self.check_expr(argument, context)?);
        }

        let Type::Function(parameters, return_type) = callee.ty() else {
            // Calling something typed `any`
            return Ok((callee, arguments, Type::Any));
        };

        let is_var_args = callee
            .entity()
            .map(|id| self.entity(id).is_var_args())
            .unwrap_or(false);

        check_arguments(&parameters, &arguments, call, is_var_args)?;

        Ok((callee, arguments, *return_type))
    }

    /// `object.method(arguments)` used as a statement.
    fn check_method(
        &mut self,
        call: &CallExpr,
        member: &MemberExpr,
        context: &mut Context,
    ) -> Result<TypedStmt, Error> {
        let object = self.check_expr(&member.object, context)?;
        let object_position = &member.object.get_span().start;
        let object_type = object.ty();
        let found = || object_type.to_string();

        let method = match (member.property.as_str(), &object_type) {
            ("add", Type::Array(_) | Type::Any) => Method::ArrayAdd,
            ("insert", Type::Array(_) | Type::Any) => Method::ArrayInsert,
            ("delete", Type::Array(_)) => Method::ArrayDelete,
            ("set", Type::Dict(_) | Type::Any) => Method::DictSet,
            ("delete", Type::Dict(_)) => Method::DictDelete,
            ("add" | "insert", _) => {
                return Err(Error::new(
                    ErrorImpl::ExpectedArray { found: found() },
                    object_position.clone(),
                ))
            }
            ("set", _) => {
                return Err(Error::new(
                    ErrorImpl::ExpectedDictionary { found: found() },
                    object_position.clone(),
                ))
            }
            ("delete", _) => {
                return Err(Error::new(
                    ErrorImpl::ExpectedArrayOrDictionary { found: found() },
                    object_position.clone(),
                ))
            }
            (name, _) => {
                return Err(Error::new(
                    ErrorImpl::UnknownMethod {
                        name: String::from(name),
                        ty: found(),
                    },
                    member.property_span.start.clone(),
                ))
            }
        };

        let base = match &object_type {
            Type::Array(base) | Type::Dict(base) => *base.clone(),
            _ => Type::Any,
        };
        let parameters = match method {
            Method::ArrayAdd => vec![base],
            Method::ArrayInsert => vec![Type::Int, base],
            Method::ArrayDelete => vec![Type::Int],
            Method::DictSet => vec![base.clone(), base],
            Method::DictDelete => vec![base],
        };

        let mut arguments = vec![];
        for argument in &call.arguments {
            arguments.push(self.check_expr(argument, context)?);
        }
        check_arguments(&parameters, &arguments, call, false)?;

        trace!(?method, "checked method call");
        Ok(TypedStmt::Method {
            object,
            method,
            arguments,
        })
    }
}

/// Arity (skipped for variadic callees) and per-argument assignability.
fn check_arguments(
    parameters: &[Type],
    arguments: &[TypedExpr],
    call: &CallExpr,
    is_var_args: bool,
) -> Result<(), Error> {
    if !is_var_args {
        if arguments.len() > parameters.len() {
            return Err(Error::new(
                ErrorImpl::UnexpectedArguments {
                    expected: parameters.len(),
                    received: arguments.len(),
                },
                call.arguments[parameters.len()].get_span().start.clone(),
            ));
        } else if arguments.len() < parameters.len() {
            return Err(Error::new(
                ErrorImpl::MissingArguments {
                    expected: parameters.len(),
                    received: arguments.len(),
                },
                call.span.end.clone(),
            ));
        }
    }

    for ((parameter, argument), source) in parameters.iter().zip(arguments).zip(&call.arguments) {
        if !parameter.accepts(&argument.ty()) || argument.ty() == Type::Void {
            return Err(Error::new(
                ErrorImpl::ArgumentTypeMatchError {
                    expected: parameter.to_string(),
                    received: argument.ty().to_string(),
                },
                source.get_span().start.clone(),
            ));
        }
    }

    Ok(())
}

fn check_number(number: &NumberExpr) -> Result<TypedExpr, Error> {
    let parse_error = || {
        Error::new(
            ErrorImpl::NumberParseError {
                token: number.value.clone(),
            },
            number.span.start.clone(),
        )
    };

    if number.is_float() {
        let value = number.value.parse::<f64>().map_err(|_| parse_error())?;
        Ok(TypedExpr::float(value))
    } else {
        let value = number.value.parse::<BigInt>().map_err(|_| parse_error())?;
        Ok(TypedExpr::literal(LiteralValue::Int(value)))
    }
}

/// Applies the operator family rules, then requires both sides to share a type.
fn check_binary(
    operator: BinaryOp,
    left: TypedExpr,
    right: TypedExpr,
    left_position: &Position,
    right_position: &Position,
) -> Result<TypedExpr, Error> {
    for (operand, position) in [(&left, left_position), (&right, right_position)] {
        if operator.is_logical() {
            expect_category(operand, Type::is_boolean, position, |found| {
                ErrorImpl::ExpectedBoolean { found }
            })?;
        } else if operator.is_ordering() || operator == BinaryOp::Add {
            expect_category(operand, Type::is_numeric_or_string, position, |found| {
                ErrorImpl::ExpectedNumberOrString { found }
            })?;
        } else if !operator.is_equality() {
            expect_category(operand, Type::is_numeric, position, |found| {
                ErrorImpl::ExpectedNumber { found }
            })?;
        }
    }

    let operand_type = unify(&left, &right, right_position)?;

    let ty = if operator.is_logical() || operator.is_equality() || operator.is_ordering() {
        Type::Bool
    } else if operator == BinaryOp::Divide {
        Type::Float
    } else {
        operand_type
    };

    Ok(TypedExpr::Binary {
        left: Box::new(left),
        operator,
        right: Box::new(right),
        ty,
    })
}

fn expect_category(
    expr: &TypedExpr,
    accepts: fn(&Type) -> bool,
    position: &Position,
    error: fn(String) -> ErrorImpl,
) -> Result<(), Error> {
    let ty = expr.ty();
    if accepts(&ty) {
        Ok(())
    } else {
        Err(Error::new(error(ty.to_string()), position.clone()))
    }
}

fn expect_value(expr: &TypedExpr, position: &Position) -> Result<(), Error> {
    if expr.ty() == Type::Void {
        Err(Error::new(ErrorImpl::ExpectedValue, position.clone()))
    } else {
        Ok(())
    }
}

fn unify(left: &TypedExpr, right: &TypedExpr, position: &Position) -> Result<Type, Error> {
    unify_types(&left.ty(), &right.ty(), position)
}

fn unify_types(left: &Type, right: &Type, position: &Position) -> Result<Type, Error> {
    left.unify(right).ok_or_else(|| {
        Error::new(
            ErrorImpl::OperandTypeMismatch {
                left: left.to_string(),
                right: right.to_string(),
            },
            position.clone(),
        )
    })
}

fn check_assignable(target: &Type, source: &TypedExpr, position: &Position) -> Result<(), Error> {
    if target.accepts(&source.ty()) {
        Ok(())
    } else {
        Err(Error::new(
            ErrorImpl::TypeMatchError {
                expected: target.to_string(),
                received: source.ty().to_string(),
            },
            position.clone(),
        ))
    }
}

fn not_assignable(target: &Expr) -> Error {
    Error::new(
        ErrorImpl::NotAssignable {
            name: String::from("this expression"),
        },
        target.get_span().start.clone(),
    )
}

/// Checks a parsed program and produces the typed tree.
///
/// A fresh standard library is seeded for every call; the first rule
/// violation aborts the whole analysis.
#[tracing::instrument(skip_all)]
pub fn analyze(program: &Program) -> Result<TypedProgram, Error> {
    let mut type_checker = TypeChecker::new();

    let mut stdlib_context = Context::root();
    stdlib::seed(&mut type_checker.entities, &mut stdlib_context);

    let mut context = stdlib_context.child();
    let statements = type_checker.check_block(&program.body, &mut context)?;

    tracing::debug!(
        statements = statements.len(),
        entities = type_checker.entities.len(),
        "analyzed"
    );

    Ok(TypedProgram {
        statements,
        entities: type_checker.entities,
    })
}
