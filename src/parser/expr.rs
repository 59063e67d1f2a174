use log::trace;

use crate::{
    ast::{
        ast::{Expr, ExprWrapper},
        expressions::{
            AssignmentExpr, BinaryExpr, BooleanExpr, CallExpr, CompositeReferenceExpr, FloatExpr,
            IntExpr, PrefixExpr, StringExpr, VariableReferenceExpr,
        },
        types::{Literals, Type},
    },
    errors::{
        errors::{Error, ErrorImpl},
        suggest::did_you_mean,
    },
    lexer::tokens::{Token, TokenKind},
};

use super::{
    lookups::BindingPower,
    parser::Parser,
    reference::{parse_reference_chain, ReferenceResolver},
};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<ExprWrapper, Error> {
    parser.enter_nesting()?;
    let expr = parse_pratt_expr(parser, bp);
    parser.exit_nesting();
    expr
}

fn parse_pratt_expr(parser: &mut Parser, bp: BindingPower) -> Result<ExprWrapper, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(parser.unexpected("expression")),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    while let Some(current_bp) = parser
        .get_bp_lookup()
        .get(&parser.current_token_kind())
        .copied()
    {
        if current_bp <= bp {
            break;
        }

        let token_kind = parser.current_token_kind();
        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => return Err(parser.unexpected("expression")),
        };

        left = led(parser, left, current_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.advance().clone();
            let invalid = || {
                Error::new(
                    ErrorImpl::NumberParseError {
                        token: token.text.clone(),
                    },
                    token.span.clone(),
                )
            };

            if token.value.contains('.') {
                let value = token.value.parse::<f64>().map_err(|_| invalid())?;
                Ok(ExprWrapper::new(FloatExpr {
                    value,
                    span: token.span.clone(),
                }))
            } else {
                let value = token.value.parse::<i64>().map_err(|_| invalid())?;
                Ok(ExprWrapper::new(IntExpr {
                    value,
                    span: token.span.clone(),
                }))
            }
        }
        TokenKind::String => {
            let token = parser.advance().clone();
            Ok(ExprWrapper::new(StringExpr {
                value: token.value,
                span: token.span,
            }))
        }
        TokenKind::True | TokenKind::False => {
            let token = parser.advance().clone();
            Ok(ExprWrapper::new(BooleanExpr {
                value: token.kind == TokenKind::True,
                span: token.span,
            }))
        }
        _ => Err(parser.unexpected("expression")),
    }
}

/// A bare identifier is a call when followed by `(`, otherwise a variable
/// reference with an optional accessor chain.
pub fn parse_identifier_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    if parser.peek_kind() == TokenKind::OpenParen {
        return parse_call_expr(parser);
    }

    let token = parser.expect(TokenKind::Identifier)?;

    let base_type = match parser.scopes.lookup(&token.value) {
        Some(entry) => entry.ty.clone(),
        None => {
            let suggestion = did_you_mean(&token.value, parser.scopes.visible_names());
            parser.report(Error::new(
                ErrorImpl::VariableNotDeclared {
                    variable: token.value.clone(),
                    suggestion,
                },
                token.span.clone(),
            ));
            Type::Error
        }
    };

    let resolver = ReferenceResolver::new(&token.value, base_type, token.span);
    parse_reference_chain(parser, resolver)
}

/// Static result type of a binary operator, or `None` if the operands do
/// not fit it.
fn binary_result_type(operator: TokenKind, left: &Type, right: &Type) -> Option<Type> {
    let is_string = |ty: &Type| matches!(ty, Type::Primitive(Literals::String | Literals::Buffer));
    let numeric = || {
        if *left == Type::int() && *right == Type::int() {
            Type::int()
        } else {
            Type::float()
        }
    };

    match operator {
        TokenKind::Plus if is_string(left) || is_string(right) => {
            let printable = |ty: &Type| matches!(ty, Type::Primitive(_)) && !ty.is_void();
            (printable(left) && printable(right)).then(Type::string)
        }
        TokenKind::Plus | TokenKind::Dash | TokenKind::Star | TokenKind::Slash => {
            (left.is_numeric() && right.is_numeric()).then(numeric)
        }
        TokenKind::Percent => (*left == Type::int() && *right == Type::int()).then(Type::int),
        TokenKind::Equals | TokenKind::NotEquals => {
            let comparable = (left.is_numeric() && right.is_numeric())
                || (matches!(left, Type::Primitive(_)) && left.same_structure(right));
            comparable.then(Type::boolean)
        }
        TokenKind::Less | TokenKind::LessEquals | TokenKind::Greater | TokenKind::GreaterEquals => {
            let ordered = (left.is_numeric() && right.is_numeric())
                || (is_string(left) && is_string(right));
            ordered.then(Type::boolean)
        }
        TokenKind::And | TokenKind::Or => {
            (left.is_boolean() && right.is_boolean()).then(Type::boolean)
        }
        _ => None,
    }
}

pub fn parse_binary_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();

    let right = parse_expr(parser, bp)?;
    let span = left.get_span().to(right.get_span());

    let (left_type, right_type) = (left.get_type(), right.get_type());
    let ty = if left_type.is_error() || right_type.is_error() {
        Type::Error
    } else {
        match binary_result_type(operator_token.kind, &left_type, &right_type) {
            Some(ty) => ty,
            None => {
                parser.report(Error::new(
                    ErrorImpl::InvalidOperands {
                        operator: operator_token.text.clone(),
                        left: left_type.to_string(),
                        right: right_type.to_string(),
                    },
                    span.clone(),
                ));
                Type::Error
            }
        }
    };

    Ok(ExprWrapper::new(BinaryExpr {
        left,
        operator: operator_token,
        right,
        ty,
        span,
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Unary)?;
    let span = operator_token.span.to(rhs.get_span());

    let operand = rhs.get_type();
    let valid = match operator_token.kind {
        TokenKind::Dash => operand.is_numeric(),
        _ => operand.is_boolean(),
    };

    let ty = if operand.is_error() || valid {
        operand
    } else {
        parser.report(Error::new(
            ErrorImpl::InvalidOperand {
                operator: operator_token.text.clone(),
                operand: operand.to_string(),
            },
            span.clone(),
        ));
        Type::Error
    };

    Ok(ExprWrapper::new(PrefixExpr {
        operator: operator_token,
        right_expr: rhs,
        ty,
        span,
    }))
}

/// Name used for an assignment target in messages.
fn target_name(assignee: &ExprWrapper) -> String {
    if let Some(reference) = assignee.downcast_ref::<VariableReferenceExpr>() {
        return reference.name.clone();
    }
    if let Some(reference) = assignee.downcast_ref::<CompositeReferenceExpr>() {
        return reference.name.clone();
    }
    String::from("expression")
}

/// Whether `value` may be combined into `target` with a compound operator.
fn compound_assignable(operator: &Token, target: &Type, value: &Type) -> bool {
    match (operator.kind, target) {
        (TokenKind::PlusEquals, Type::Primitive(Literals::String | Literals::Buffer)) => {
            matches!(value, Type::Primitive(_)) && !value.is_void()
        }
        _ => target.is_numeric() && value.is_compatible_with(target),
    }
}

pub fn parse_assignment_expr(
    parser: &mut Parser,
    left: ExprWrapper,
    bp: BindingPower,
) -> Result<ExprWrapper, Error> {
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, bp)?;
    let span = left.get_span().to(rhs.get_span());

    if !left.get_expr_type().is_reference() {
        parser.report(Error::new(
            ErrorImpl::InvalidAssignmentTarget,
            left.get_span().clone(),
        ));
    } else {
        let (target, value) = (left.get_type(), rhs.get_type());
        let valid = target.is_error()
            || value.is_error()
            || match operator_token.kind {
                TokenKind::Assignment => parser.registry.is_assignable(&value, &target),
                _ => compound_assignable(&operator_token, &target, &value),
            };

        if !valid {
            parser.report(Error::new(
                ErrorImpl::TypeMatchError {
                    target: target_name(&left),
                    expected: target.to_string(),
                    received: value.to_string(),
                },
                rhs.get_span().clone(),
            ));
        }
    }

    Ok(ExprWrapper::new(AssignmentExpr {
        assignee: left,
        operator: operator_token,
        value: rhs,
        span,
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

/// `name(arg, ...)`, checked against the declared signature.
pub fn parse_call_expr(parser: &mut Parser) -> Result<ExprWrapper, Error> {
    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::OpenParen)?;

    let mut arguments = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            arguments.push(parse_expr(parser, BindingPower::Default)?);

            if parser.current_token_kind() == TokenKind::Comma {
                parser.advance();
                continue;
            }
            break;
        }
    }

    let close = parser.expect(TokenKind::CloseParen)?;
    let span = name.span.to(&close.span);

    let signature = match parser.scopes.lookup_function(&name.value) {
        Some(signature) => signature.clone(),
        None => {
            parser.report(Error::new(
                ErrorImpl::FunctionNotDeclared {
                    function: name.value.clone(),
                },
                name.span.clone(),
            ));
            return Ok(ExprWrapper::new(CallExpr {
                name: name.value,
                arguments,
                ty: Type::Error,
                span,
            }));
        }
    };

    trace!("call to {} with {} arguments", signature.name, arguments.len());

    if signature.parameters.len() != arguments.len() {
        parser.report(Error::new(
            ErrorImpl::ArgumentCount {
                function: name.value.clone(),
                expected: signature.parameters.len(),
                received: arguments.len(),
            },
            span.clone(),
        ));
    } else {
        for (index, (argument, (_, parameter))) in
            arguments.iter().zip(signature.parameters.iter()).enumerate()
        {
            let received = argument.get_type();
            if !parser.registry.is_assignable(&received, parameter) {
                parser.report(Error::new(
                    ErrorImpl::ArgumentTypeMatchError {
                        function: name.value.clone(),
                        index: index + 1,
                        expected: parameter.to_string(),
                        received: received.to_string(),
                    },
                    argument.get_span().clone(),
                ));
            }
        }
    }

    Ok(ExprWrapper::new(CallExpr {
        name: name.value,
        arguments,
        ty: signature.return_type,
        span,
    }))
}
