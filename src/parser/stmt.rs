use log::debug;

use crate::{
    ast::{
        ast::{Expr, ExprWrapper, Stmt, StmtWrapper},
        statements::{
            BlockStmt, BreakStmt, ContinueStmt, ExpressionStmt, FnDeclStmt, ForeachStmt, IfStmt,
            ReturnStmt, TypeDeclStmt, VarDeclStmt, WhileStmt,
        },
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    parser::{expr::parse_expr, lookups::BindingPower},
    type_checker::scope::FunctionSignature,
};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    parser.enter_nesting()?;
    let stmt = parse_nested_stmt(parser);
    parser.exit_nesting();
    stmt
}

fn parse_nested_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let kind = parser.current_token_kind();
    if let Some(handler) = parser.get_stmt_lookup().get(&kind).copied() {
        return handler(parser);
    }

    if starts_declaration(parser) {
        return parse_declaration_stmt(parser);
    }

    let expr = parse_expr(parser, BindingPower::Default)?;

    parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(ExpressionStmt {
        span: expr.get_span().clone(),
        expression: expr,
    }))
}

/// An identifier starts a declaration when it names a type, or when
/// another identifier follows it (`foo x;` with `foo` unknown).
fn starts_declaration(parser: &Parser) -> bool {
    let token = parser.current_token();
    if token.kind != TokenKind::Identifier || parser.peek_kind() == TokenKind::OpenParen {
        return false;
    }

    parser.registry.lookup(&token.value).is_some() || parser.peek_kind() == TokenKind::Identifier
}

/// Parses statements until `}` (inside a block) or end of file.
///
/// A statement that fails with a syntax error is reported and skipped up to
/// the next statement boundary. With `DiagnosticMode::FirstError` parsing
/// stops after the statement that produced the first diagnostic.
pub fn parse_block_body(parser: &mut Parser, in_block: bool) -> Vec<StmtWrapper> {
    let mut body = Vec::new();

    while parser.has_tokens() && !parser.should_stop() {
        if in_block && parser.current_token_kind() == TokenKind::CloseCurly {
            break;
        }

        match parse_stmt(parser) {
            Ok(stmt) => body.push(stmt),
            Err(error) => {
                parser.report(error);
                synchronize(parser, in_block);
            }
        }
    }

    body
}

/// Skips to the next statement boundary: past a `;`, or up to the `}` that
/// closes the current block. A stray `}` at top level is skipped.
fn synchronize(parser: &mut Parser, in_block: bool) {
    loop {
        match parser.current_token_kind() {
            TokenKind::EOF => break,
            TokenKind::Semicolon => {
                parser.advance();
                break;
            }
            TokenKind::CloseCurly if in_block => break,
            TokenKind::CloseCurly => {
                parser.advance();
                break;
            }
            _ => {
                parser.advance();
            }
        }
    }
}

pub fn parse_block_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    Ok(StmtWrapper::new(parse_block(parser)?))
}

fn parse_block(parser: &mut Parser) -> Result<BlockStmt, Error> {
    let start = parser.expect(TokenKind::OpenCurly)?;

    parser.scopes.push_scope();
    let body = parse_block_body(parser, true);
    parser.scopes.pop_scope();

    let end = parser.expect(TokenKind::CloseCurly)?;

    Ok(BlockStmt {
        body,
        id: parser.advance_id(),
        span: start.span.to(&end.span),
    })
}

/// The body of a control-flow statement, in its own scope.
fn parse_scoped_body(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    parser.scopes.push_scope();
    let body = parse_stmt(parser);
    parser.scopes.pop_scope();
    body
}

/// `type name [= value];`, `type name(params) { ... }`,
/// `record name { ... };` or `record { ... } name;`
pub fn parse_declaration_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.current_token().clone();
    let ty = parse_type(parser, BindingPower::Default)?;

    if start.kind == TokenKind::Record && parser.current_token_kind() == TokenKind::Semicolon {
        let end = parser.advance().clone();
        if let Type::Record(record) = &ty {
            if let Some(name) = &record.name {
                return Ok(StmtWrapper::new(TypeDeclStmt {
                    name: name.clone(),
                    declared: ty.clone(),
                    span: start.span.to(&end.span),
                }));
            }
        }

        return Err(Error::new(
            ErrorImpl::UnexpectedToken {
                expected: String::from("identifier"),
                found: end.describe(),
            },
            end.span,
        ));
    }

    let name = parser.expect(TokenKind::Identifier)?;

    if parser.current_token_kind() == TokenKind::OpenParen {
        return parse_fn_decl(parser, start, ty, name);
    }

    parse_var_decl(parser, start, ty, name)
}

/// Reports a variable named after a registered type. Returns whether the
/// name may be declared.
fn check_not_type_name(parser: &mut Parser, name: &Token) -> bool {
    if parser.registry.lookup(&name.value).is_none() {
        return true;
    }

    parser.report(Error::new(
        ErrorImpl::TypeNameAsVariable {
            name: name.value.clone(),
        },
        name.span.clone(),
    ));
    false
}

fn parse_var_decl(
    parser: &mut Parser,
    start: Token,
    ty: Type,
    name: Token,
) -> Result<StmtWrapper, Error> {
    let valid_name = check_not_type_name(parser, &name);
    let var_type = if ty.is_void() {
        parser.report(Error::new(
            ErrorImpl::VoidVariable {
                variable: name.value.clone(),
            },
            name.span.clone(),
        ));
        Type::Error
    } else {
        ty
    };

    if valid_name {
        if let Err(error) = parser
            .scopes
            .declare(&name.value, var_type.clone(), name.span.clone())
        {
            parser.report(error);
        }
    }

    let assigned_value = if parser.current_token_kind() == TokenKind::Assignment {
        parser.advance();
        let value = parse_expr(parser, BindingPower::Default)?;
        let received = value.get_type();

        if !parser.registry.is_assignable(&received, &var_type) {
            parser.report(Error::new(
                ErrorImpl::TypeMatchError {
                    target: name.value.clone(),
                    expected: var_type.to_string(),
                    received: received.to_string(),
                },
                value.get_span().clone(),
            ));
        }

        Some(value)
    } else {
        None
    };

    let end = parser.expect(TokenKind::Semicolon)?;

    Ok(StmtWrapper::new(VarDeclStmt {
        identifier: name.value,
        var_type,
        assigned_value,
        span: start.span.to(&end.span),
    }))
}

/// `typedef type name;`
pub fn parse_typedef_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.expect(TokenKind::Typedef)?;
    let declared = parse_type(parser, BindingPower::Default)?;
    let name = parser.expect(TokenKind::Identifier)?;
    let end = parser.expect(TokenKind::Semicolon)?;

    if let Err(error) = parser
        .registry
        .declare_type(&name.value, declared.clone(), &name.span)
    {
        parser.report(error);
    }

    Ok(StmtWrapper::new(TypeDeclStmt {
        name: name.value,
        declared,
        span: start.span.to(&end.span),
    }))
}

/// `type name(type param, ...) { ... }`
///
/// The function is visible from its own body onward. Parameters share the
/// body's scope.
fn parse_fn_decl(
    parser: &mut Parser,
    start: Token,
    return_type: Type,
    name: Token,
) -> Result<StmtWrapper, Error> {
    if parser.current_function.is_some() || parser.scopes.depth() > 1 {
        parser.report(Error::new(ErrorImpl::NestedFunction, name.span.clone()));
    }

    parser.expect(TokenKind::OpenParen)?;

    let mut parameters: Vec<(String, Type, Token)> = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            let ty = parse_type(parser, BindingPower::Default)?;
            let parameter = parser.expect(TokenKind::Identifier)?;
            check_not_type_name(parser, &parameter);
            if ty.is_void() {
                parser.report(Error::new(
                    ErrorImpl::VoidVariable {
                        variable: parameter.value.clone(),
                    },
                    parameter.span.clone(),
                ));
            }
            parameters.push((parameter.value.clone(), ty, parameter));

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
                continue;
            }
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let signature = FunctionSignature {
        name: name.value.clone(),
        return_type: return_type.clone(),
        parameters: parameters
            .iter()
            .map(|(parameter, ty, _)| (parameter.clone(), ty.clone()))
            .collect(),
        span: name.span.clone(),
    };
    if let Err(error) = parser.scopes.declare_function(signature.clone()) {
        parser.report(error);
    }
    debug!("declared function {}", name.value);

    let open = parser.expect(TokenKind::OpenCurly)?;

    parser.scopes.push_scope();
    for (parameter, ty, token) in &parameters {
        if let Err(error) = parser
            .scopes
            .declare(parameter, ty.clone(), token.span.clone())
        {
            parser.report(error);
        }
    }

    let enclosing_function = parser.current_function.replace(return_type.clone());
    let enclosing_loops = std::mem::take(&mut parser.loop_depth);
    let body = parse_block_body(parser, true);
    parser.current_function = enclosing_function;
    parser.loop_depth = enclosing_loops;
    parser.scopes.pop_scope();

    let end = parser.expect(TokenKind::CloseCurly)?;

    Ok(StmtWrapper::new(FnDeclStmt {
        identifier: name.value,
        parameters: signature.parameters,
        return_type,
        body: BlockStmt {
            body,
            id: parser.advance_id(),
            span: open.span.to(&end.span),
        },
        span: start.span.to(&end.span),
    }))
}

/// `( condition )`, which must be boolean.
fn parse_condition(parser: &mut Parser, keyword: &str) -> Result<ExprWrapper, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    let ty = condition.get_type();
    if !ty.is_error() && !ty.is_boolean() {
        parser.report(Error::new(
            ErrorImpl::ConditionNotBoolean {
                keyword: keyword.to_string(),
            },
            condition.get_span().clone(),
        ));
    }

    Ok(condition)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.expect(TokenKind::If)?;

    let condition = parse_condition(parser, "if")?;
    let then_body = parse_scoped_body(parser)?;

    let else_body = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_scoped_body(parser)?)
    } else {
        None
    };

    let end = match &else_body {
        Some(body) => body.get_span().clone(),
        None => then_body.get_span().clone(),
    };

    Ok(StmtWrapper::new(IfStmt {
        condition,
        then_body,
        else_body,
        span: start.span.to(&end),
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.expect(TokenKind::While)?;

    let condition = parse_condition(parser, "while")?;

    parser.loop_depth += 1;
    let body = parse_scoped_body(parser);
    parser.loop_depth -= 1;
    let body = body?;

    Ok(StmtWrapper::new(WhileStmt {
        span: start.span.to(body.get_span()),
        condition,
        body,
    }))
}

/// `foreach key, ..., value in aggregate body`
///
/// The n-th variable takes the n-th dimension's key type; one variable past
/// the last dimension takes the element type.
pub fn parse_foreach_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.expect(TokenKind::Foreach)?;

    let mut names = vec![parser.expect(TokenKind::Identifier)?];
    while parser.current_token_kind() == TokenKind::Comma {
        parser.advance();
        names.push(parser.expect(TokenKind::Identifier)?);
    }

    parser.expect(TokenKind::In)?;
    let aggregate = parse_expr(parser, BindingPower::Default)?;

    let types: Vec<Type> = match aggregate.get_type() {
        Type::Aggregate(aggregate_type) => {
            if names.len() > aggregate_type.arity() + 1 {
                parser.report(Error::new(
                    ErrorImpl::TooManyForeachKeys,
                    names[aggregate_type.arity() + 1].span.clone(),
                ));
            }

            (0..names.len())
                .map(|position| match aggregate_type.dimensions.get(position) {
                    Some(dimension) => Type::Primitive(dimension.key.clone()),
                    None if position == aggregate_type.arity() => {
                        (*aggregate_type.element).clone()
                    }
                    None => Type::Error,
                })
                .collect()
        }
        Type::Error => vec![Type::Error; names.len()],
        Type::Primitive(_) | Type::Record(_) => {
            parser.report(Error::new(
                ErrorImpl::AggregateExpected,
                aggregate.get_span().clone(),
            ));
            vec![Type::Error; names.len()]
        }
    };

    parser.scopes.push_scope();
    for (name, ty) in names.iter().zip(types.iter()) {
        if !check_not_type_name(parser, name) {
            continue;
        }
        if let Err(error) = parser
            .scopes
            .declare(&name.value, ty.clone(), name.span.clone())
        {
            parser.report(error);
        }
    }

    parser.loop_depth += 1;
    let body = parse_stmt(parser);
    parser.loop_depth -= 1;
    parser.scopes.pop_scope();
    let body = body?;

    Ok(StmtWrapper::new(ForeachStmt {
        variables: names
            .into_iter()
            .map(|name| name.value)
            .zip(types)
            .collect(),
        aggregate,
        span: start.span.to(body.get_span()),
        body,
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let start = parser.expect(TokenKind::Return)?;

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    let end = parser.expect(TokenKind::Semicolon)?;
    let span = start.span.to(&end.span);

    match parser.current_function.clone() {
        None => parser.report(Error::new(ErrorImpl::ReturnOutsideFunction, span.clone())),
        Some(expected) => {
            let received = match &value {
                Some(value) => value.get_type(),
                None => Type::void(),
            };

            let matches = if expected.is_void() || received.is_void() {
                expected.is_void() && received.is_void()
            } else {
                parser.registry.is_assignable(&received, &expected)
            };

            if !matches {
                parser.report(Error::new(
                    ErrorImpl::ReturnTypeMismatch {
                        expected: expected.to_string(),
                        received: received.to_string(),
                    },
                    span.clone(),
                ));
            }
        }
    }

    Ok(StmtWrapper::new(ReturnStmt { value, span }))
}

fn check_in_loop(parser: &mut Parser, keyword: &Token) {
    if parser.loop_depth == 0 {
        parser.report(Error::new(
            ErrorImpl::OutsideLoop {
                keyword: keyword.text.clone(),
            },
            keyword.span.clone(),
        ));
    }
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let keyword = parser.expect(TokenKind::Break)?;
    let end = parser.expect(TokenKind::Semicolon)?;
    check_in_loop(parser, &keyword);

    Ok(StmtWrapper::new(BreakStmt {
        span: keyword.span.to(&end.span),
    }))
}

pub fn parse_continue_stmt(parser: &mut Parser) -> Result<StmtWrapper, Error> {
    let keyword = parser.expect(TokenKind::Continue)?;
    let end = parser.expect(TokenKind::Semicolon)?;
    check_in_loop(parser, &keyword);

    Ok(StmtWrapper::new(ContinueStmt {
        span: keyword.span.to(&end.span),
    }))
}
