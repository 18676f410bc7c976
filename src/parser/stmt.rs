use crate::{
    ast::{
        ast::{BinaryOp, Expr, Stmt},
        statements::{
            AssignmentStmt, BreakStmt, CollectionForStmt, FnDeclStmt, Parameter, RangeForStmt,
            ReturnStmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
    Span,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(stmt_fn) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return stmt_fn(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    if is_assignment_operator(parser.current_token_kind()) {
        return Ok(Stmt::Assignment(parse_assignment(parser, expr)?));
    }

    match expr {
        Expr::Call(call) => Ok(Stmt::Call(call)),
        _ => Err(parser.unexpected("expected an assignment or a call")),
    }
}

fn is_assignment_operator(kind: TokenKind) -> bool {
    kind == TokenKind::Assignment || kind.compound_operator().is_some()
}

/// Parses the operator and value of `target = value` or a compound form.
fn parse_assignment(parser: &mut Parser, target: Expr) -> Result<AssignmentStmt, Error> {
    if !matches!(target, Expr::Symbol(_) | Expr::Subscript(_)) {
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("only names and subscripts can be assigned to"),
            },
            target.get_span().start.clone(),
        ));
    }

    let operator_token = parser.advance().clone();
    let operator = operator_token
        .kind
        .compound_operator()
        .and_then(BinaryOp::from_token);

    let value = parse_expr(parser, BindingPower::Default)?;

    Ok(AssignmentStmt {
        span: Span {
            start: target.get_span().start.clone(),
            end: value.get_span().end.clone(),
        },
        target,
        operator,
        value,
    })
}

fn parse_assignment_stmt(parser: &mut Parser) -> Result<AssignmentStmt, Error> {
    let target = parse_expr(parser, BindingPower::Default)?;
    if !is_assignment_operator(parser.current_token_kind()) {
        return Err(parser.unexpected("expected an assignment"));
    }

    parse_assignment(parser, target)
}

/// Parses statements until `end`, consuming the `end` keyword.
fn parse_block(parser: &mut Parser) -> Result<Vec<Stmt>, Error> {
    let mut body = vec![];

    while parser.current_token_kind() != TokenKind::End {
        if !parser.has_tokens() {
            return Err(parser.unexpected("expected `end` to close the block"));
        }
        body.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::End)?;
    Ok(body)
}

pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    // Function name(a: int, b) -> int ... end name
    let start = parser.advance().span.start.clone();
    let name = parser.expect(TokenKind::Identifier)?.value;

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];

    while parser.current_token_kind() != TokenKind::CloseParen {
        let token = parser.expect(TokenKind::Identifier)?;

        let type_annotation = if parser.current_token_kind() == TokenKind::Colon {
            parser.advance();
            Some(parse_type(parser)?)
        } else {
            None
        };

        parameters.push(Parameter {
            name: token.value,
            span: Span {
                start: token.span.start,
                end: parser.get_previous_end(),
            },
            type_annotation,
        });

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseParen {
            return Err(parser.unexpected("expected `,` between parameters"));
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let return_type = if parser.current_token_kind() == TokenKind::Arrow {
        parser.advance();
        Some(parse_type(parser)?)
    } else {
        None
    };

    let body = parse_block(parser)?;

    let error = parser.unexpected("expected the function name after `end`");
    let end_token = parser.expect_error(TokenKind::Identifier, Some(error))?;

    Ok(Stmt::FnDecl(FnDeclStmt {
        name,
        parameters,
        return_type,
        body,
        end_name: end_token.value,
        end_span: end_token.span.clone(),
        span: Span {
            start,
            end: end_token.span.end,
        },
    }))
}

pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    if parser.current_token_kind() == TokenKind::OpenParen {
        // for (i = 0, i += 1) ... end i < 10
        parser.advance();
        let init = parse_assignment_stmt(parser)?;
        parser.expect(TokenKind::Comma)?;
        let update = parse_assignment_stmt(parser)?;
        parser.expect(TokenKind::CloseParen)?;

        let body = parse_block(parser)?;
        let test = parse_expr(parser, BindingPower::Default)?;

        return Ok(Stmt::RangeFor(RangeForStmt {
            span: Span {
                start,
                end: test.get_span().end.clone(),
            },
            init: Box::new(init),
            update: Box::new(update),
            body,
            test,
        }));
    }

    // for x in collection ... end for
    let variable = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::In)?;
    let collection = parse_expr(parser, BindingPower::Default)?;
    let body = parse_block(parser)?;
    let end = parser.expect(TokenKind::For)?;

    Ok(Stmt::CollectionFor(CollectionForStmt {
        variable: variable.value,
        variable_span: variable.span,
        collection,
        body,
        span: Span {
            start,
            end: end.span.end,
        },
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();

    // A value must start on the same line as `return`
    let next = parser.current_token();
    let has_value = !next.newline_before && !next.is_one_of_many(&[TokenKind::End, TokenKind::EOF]);

    let value = if has_value {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let end = value
        .as_ref()
        .map(|value| value.get_span().end.clone())
        .unwrap_or_else(|| token.span.end.clone());

    Ok(Stmt::Return(ReturnStmt {
        value,
        span: Span {
            start: token.span.start,
            end,
        },
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let span = parser.advance().span.clone();
    Ok(Stmt::Break(BreakStmt { span }))
}
