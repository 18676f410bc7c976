//! Type parsing implementation.
//!
//! This module handles parsing of type annotations. It supports:
//!
//! - Basic types (`int`, `float`, `string`, `bool`, `void`, `any`)
//! - Array types (`[T]`)
//! - Dictionary types (`<<T>>`)

use std::collections::HashMap;

use crate::{
    ast::types::{Type, TypeAnnotation},
    errors::errors::Error,
    lexer::tokens::TokenKind,
    Span,
};

use super::parser::Parser;

/// Type alias for type handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for the type lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::OpenBracket, parse_array_type);
    parser.type_nud(TokenKind::OpenDict, parse_dict_type);
}

fn parse_type_inner(parser: &mut Parser) -> Result<Type, Error> {
    let kind = parser.current_token_kind();
    let Some(handler) = parser.get_type_nud_lookup().get(&kind).copied() else {
        return Err(parser.unexpected("expected a type"));
    };

    handler(parser)
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeAnnotation, Error> {
    let start = parser.get_position();
    let ty = parse_type_inner(parser)?;

    Ok(TypeAnnotation {
        ty,
        span: Span {
            start,
            end: parser.get_previous_end(),
        },
    })
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<Type, Error> {
    let ty = match parser.current_token().value.as_str() {
        "int" => Type::Int,
        "float" => Type::Float,
        "string" => Type::String,
        "bool" => Type::Bool,
        "void" => Type::Void,
        "any" => Type::Any,
        _ => return Err(parser.unexpected("unknown type name")),
    };

    parser.advance();
    Ok(ty)
}

pub fn parse_array_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.advance();
    let base = parse_type_inner(parser)?;
    parser.expect(TokenKind::CloseBracket)?;

    Ok(Type::Array(Box::new(base)))
}

pub fn parse_dict_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.advance();
    let base = parse_type_inner(parser)?;
    parser.expect(TokenKind::CloseDict)?;

    Ok(Type::Dict(Box::new(base)))
}
