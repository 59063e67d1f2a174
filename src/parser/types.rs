//! Type parsing implementation.
//!
//! This module handles parsing of the types written at declaration sites.
//! It supports:
//!
//! - Named types (built-in primitives, named records, typedefs)
//! - Aggregates, with one or more bracket groups of dimensions
//! - Record types declared inline
//!
//! Similar to expression parsing, it uses NUD/LED handlers with
//! binding powers. Names are resolved against the registry as they are
//! read; an unknown name is reported and yields `Type::Error`.

use std::collections::HashMap;

use crate::{
    ast::types::{AggregateType, Dimension, Literals, RecordType, Type},
    errors::{
        errors::{Error, ErrorImpl},
        suggest::did_you_mean,
    },
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<Type, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, Type, BindingPower) -> Result<Type, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::Record, parse_record_type);
    parser.type_led(TokenKind::OpenBracket, BindingPower::Call, parse_aggregate_type);
}

pub fn parse_symbol_type(parser: &mut Parser) -> Result<Type, Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    if let Some(ty) = parser.registry.lookup(&token.value) {
        return Ok(ty.clone());
    }

    let suggestion = did_you_mean(&token.value, parser.registry.names());
    parser.report(Error::new(
        ErrorImpl::UnknownType {
            type_: token.value.clone(),
            suggestion,
        },
        token.span.clone(),
    ));
    Ok(Type::Error)
}

/// `record [name] { type field; ... }`
///
/// A named record is registered as soon as its closing brace is read.
pub fn parse_record_type(parser: &mut Parser) -> Result<Type, Error> {
    parser.expect(TokenKind::Record)?;

    let name = if parser.current_token_kind() == TokenKind::Identifier {
        Some(parser.advance().clone())
    } else {
        None
    };

    parser.expect(TokenKind::OpenCurly)?;

    let mut fields: Vec<(String, Type)> = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        let field_type = parse_type(parser, BindingPower::Default)?;
        let field = parser.expect(TokenKind::Identifier)?;
        parser.expect(TokenKind::Semicolon)?;

        if field_type.is_void() {
            parser.report(Error::new(
                ErrorImpl::VoidVariable {
                    variable: field.value.clone(),
                },
                field.span.clone(),
            ));
        }

        if fields.iter().any(|(existing, _)| *existing == field.value) {
            parser.report(Error::new(
                ErrorImpl::FieldAlreadyDeclared {
                    field: field.value.clone(),
                },
                field.span,
            ));
            continue;
        }

        fields.push((field.value, field_type));
    }

    parser.expect(TokenKind::CloseCurly)?;

    let record = Type::Record(RecordType {
        name: name.as_ref().map(|token| token.value.clone()),
        fields,
    });

    if let Some(name) = name {
        if let Err(error) = parser
            .registry
            .declare_type(&name.value, record.clone(), &name.span)
        {
            parser.report(error);
        }
    }

    Ok(record)
}

/// Reads every bracket group following an element type. `int[5][3]` and
/// `int[5,3]` give the same aggregate.
///
/// A slot holds a size, a key type name, or nothing. An empty slot is only
/// accepted alone in its group and declares an unbounded int-keyed dimension.
pub fn parse_aggregate_type(
    parser: &mut Parser,
    left: Type,
    _bp: BindingPower,
) -> Result<Type, Error> {
    let mut dimensions = Vec::new();

    while parser.current_token_kind() == TokenKind::OpenBracket {
        parser.advance();

        if parser.current_token_kind() == TokenKind::CloseBracket {
            parser.advance();
            dimensions.push(Dimension::unbounded());
            continue;
        }

        loop {
            dimensions.push(parse_dimension(parser)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
                continue;
            }

            parser.expect(TokenKind::CloseBracket)?;
            break;
        }
    }

    if left.is_error() {
        return Ok(Type::Error);
    }

    Ok(Type::Aggregate(AggregateType::new(left, dimensions)))
}

fn parse_dimension(parser: &mut Parser) -> Result<Dimension, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.advance().clone();
            match token.value.parse::<u32>() {
                Ok(size) => Ok(Dimension::sized(size)),
                Err(_) => Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.text },
                    token.span,
                )),
            }
        }
        TokenKind::Identifier => {
            let token = parser.advance().clone();
            match parser.registry.lookup(&token.value) {
                Some(Type::Primitive(key)) if *key != Literals::Void => {
                    Ok(Dimension::keyed(key.clone()))
                }
                Some(_) => Err(Error::new(ErrorImpl::DimensionExpected, token.span)),
                None => {
                    let suggestion = did_you_mean(&token.value, parser.registry.names());
                    parser.report(Error::new(
                        ErrorImpl::UnknownType {
                            type_: token.value.clone(),
                            suggestion,
                        },
                        token.span,
                    ));
                    Ok(Dimension::unbounded())
                }
            }
        }
        _ => {
            let token = parser.current_token();
            Err(Error::new(ErrorImpl::DimensionExpected, token.span.clone()))
        }
    }
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<Type, Error> {
    parser.enter_nesting()?;
    let ty = parse_pratt_type(parser, bp);
    parser.exit_nesting();
    ty
}

fn parse_pratt_type(parser: &mut Parser, bp: BindingPower) -> Result<Type, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_type_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected("type")),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while let Some(current_bp) = parser
        .get_type_bp_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        if current_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        let led = match parser.get_type_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected("type")),
        };

        left = led(parser, left, current_bp)?;
    }

    Ok(left)
}
