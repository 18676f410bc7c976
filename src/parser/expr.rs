use crate::{
    ast::{
        ast::{BinaryOp, Expr, UnaryOp},
        expressions::{
            ArrayExpr, BinaryExpr, BooleanExpr, CallExpr, ConditionalExpr, DictExpr, MemberExpr,
            NumberExpr, PrefixExpr, StringExpr, SubscriptExpr, SymbolExpr,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud_fn) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: parser.current_token().value.clone(),
            },
            parser.get_position(),
        ));
    };

    let mut left = nud_fn(parser)?;

    // While the next operator binds tighter than `bp` and sits on the same line, keep extending lhs
    loop {
        let token = parser.current_token();
        if token.newline_before {
            break;
        }

        let token_bp = *parser
            .get_bp_lookup()
            .get(&token.kind)
            .unwrap_or(&BindingPower::Default);
        if token_bp <= bp {
            break;
        }

        let Some(led_fn) = parser.get_led_lookup().get(&token.kind).copied() else {
            break;
        };

        left = led_fn(parser, left, token_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();

    match token.kind {
        TokenKind::Number => Ok(Expr::Number(NumberExpr {
            value: token.value,
            span: token.span,
        })),
        TokenKind::Identifier => Ok(Expr::Symbol(SymbolExpr {
            value: token.value,
            span: token.span,
        })),
        TokenKind::String => Ok(Expr::String(StringExpr {
            value: token.value,
            span: token.span,
        })),
        TokenKind::True | TokenKind::False => Ok(Expr::Boolean(BooleanExpr {
            value: token.kind == TokenKind::True,
            span: token.span,
        })),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken { token: token.value },
            token.span.start,
        )),
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let Some(operator) = BinaryOp::from_token(operator_token.kind) else {
        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                token: operator_token.value,
            },
            operator_token.span.start,
        ));
    };

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone(),
        },
        left: Box::new(left),
        operator,
        right: Box::new(right),
    }))
}

/// `**` groups to the right, so its right operand is parsed one level lower.
pub fn parse_exponent_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parse_binary_expr(parser, left, BindingPower::Unary)
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let operator = match operator_token.kind {
        TokenKind::Not => UnaryOp::Not,
        _ => UnaryOp::Negate,
    };
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: Span {
            start: operator_token.span.start,
            end: rhs.get_span().end.clone(),
        },
        operator,
        right_expr: Box::new(rhs),
    }))
}

pub fn parse_conditional_expr(
    parser: &mut Parser,
    test: Expr,
    _bp: BindingPower,
) -> Result<Expr, Error> {
    parser.advance();
    let consequent = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Colon)?;
    let alternate = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Conditional(ConditionalExpr {
        span: Span {
            start: test.get_span().start.clone(),
            end: alternate.get_span().end.clone(),
        },
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// Parses `expr (, expr)*` up to and including `closing`. A trailing comma is allowed.
fn parse_expr_list(parser: &mut Parser, closing: TokenKind) -> Result<Vec<Expr>, Error> {
    let mut items = vec![];

    while parser.current_token_kind() != closing {
        items.push(parse_expr(parser, BindingPower::Default)?);

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != closing {
            return Err(parser.unexpected("expected `,` between items"));
        }
    }

    parser.expect(closing)?;
    Ok(items)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let arguments = parse_expr_list(parser, TokenKind::CloseParen)?;

    Ok(Expr::Call(CallExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: parser.get_previous_end(),
        },
        callee: Box::new(left),
        arguments,
    }))
}

pub fn parse_subscript_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let index = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Expr::Subscript(SubscriptExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: parser.get_previous_end(),
        },
        array: Box::new(left),
        index: Box::new(index),
    }))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.advance();
    let property = parser.expect(TokenKind::Identifier)?;

    Ok(Expr::Member(MemberExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: property.span.end.clone(),
        },
        object: Box::new(left),
        property: property.value,
        property_span: property.span,
    }))
}

pub fn parse_array_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.advance().span.start.clone();
    let elements = parse_expr_list(parser, TokenKind::CloseBracket)?;

    Ok(Expr::Array(ArrayExpr {
        elements,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}

pub fn parse_dict_expr(parser: &mut Parser) -> Result<Expr, Error> {
    // <<key: value, key: value>>
    let start = parser.advance().span.start.clone();

    let mut entries = vec![];

    while parser.current_token_kind() != TokenKind::CloseDict {
        let key = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Colon)?;
        let value = parse_expr(parser, BindingPower::Default)?;

        entries.push((key, value));

        if parser.current_token_kind() == TokenKind::Comma {
            parser.advance();
        } else if parser.current_token_kind() != TokenKind::CloseDict {
            return Err(parser.unexpected("expected `,` between entries"));
        }
    }

    parser.expect(TokenKind::CloseDict)?;

    Ok(Expr::Dict(DictExpr {
        entries,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    }))
}
