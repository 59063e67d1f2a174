//! Resolution of variable references.
//!
//! A reference is a declared identifier followed by any chain of bracket
//! groups and `.field` steps. Each step is validated against the static
//! type reached so far, strictly left to right:
//!
//! - a bracket group consumes one aggregate dimension per key, and every
//!   key must have exactly the dimension's key type
//! - a field step requires a record and a field of that name
//!
//! Messages name the path walked so far, with `[]` standing for each
//! consumed dimension (`x[]` is "inside one level of x"). The first
//! failing step poisons the chain: later steps are still parsed but no
//! longer checked, and the reference takes `Type::Error`.

use log::trace;

use crate::{
    ast::{
        ast::{Expr, ExprWrapper},
        expressions::{Accessor, CompositeReferenceExpr, VariableReferenceExpr},
        types::Type,
    },
    errors::{
        errors::{Error, ErrorImpl},
        suggest::did_you_mean,
    },
    lexer::tokens::TokenKind,
    Span,
};

use super::{expr::parse_expr, lookups::BindingPower, parser::Parser};

#[derive(Debug)]
pub struct ReferenceResolver {
    name: String,
    base_type: Type,
    /// Rendered path for messages: `x`, `x[]`, `r.a[]`...
    path: String,
    current: Type,
    accessors: Vec<Accessor>,
    /// Set once a field step succeeds.
    composite: bool,
    poisoned: bool,
    span: Span,
}

impl ReferenceResolver {
    /// Starts a chain at a declared variable. An `Error` base (an undeclared
    /// name, already reported) starts poisoned.
    pub fn new(name: &str, base_type: Type, span: Span) -> Self {
        ReferenceResolver {
            name: name.to_string(),
            path: name.to_string(),
            poisoned: base_type.is_error(),
            current: base_type.clone(),
            base_type,
            accessors: Vec::new(),
            composite: false,
            span,
        }
    }

    /// Validates one accessor against the current type and steps past it.
    ///
    /// `syntax` covers all of the accessor's source text, including the `.`
    /// of a field step. The accessor is kept in the chain either way.
    pub fn resolve(&mut self, accessor: Accessor, syntax: &Span) -> Result<(), Error> {
        self.span = self.span.to(syntax);

        let result = if self.poisoned {
            Ok(())
        } else {
            match &accessor {
                Accessor::Index { keys, span } => self.resolve_index(keys, span),
                Accessor::Field { name, span } => self.resolve_field(name, span, syntax),
            }
        };

        self.accessors.push(accessor);
        if result.is_err() {
            self.poison();
        }
        result
    }

    /// A `.` with no field name after it. Reports the more basic problem
    /// when the current type is not a record at all.
    pub fn resolve_missing_field(&mut self, dot: &Span) -> Result<(), Error> {
        self.span = self.span.to(dot);
        if self.poisoned {
            return Ok(());
        }

        let error = match &self.current {
            Type::Record(_) => ErrorImpl::FieldNameExpected,
            Type::Error => return Ok(()),
            Type::Primitive(_) | Type::Aggregate(_) => ErrorImpl::RecordExpected,
        };

        self.poison();
        Err(Error::new(error, dot.clone()))
    }

    fn resolve_index(&mut self, keys: &[ExprWrapper], group: &Span) -> Result<(), Error> {
        let aggregate = match &self.current {
            Type::Aggregate(aggregate) => aggregate.clone(),
            Type::Error => return Ok(()),
            Type::Primitive(_) | Type::Record(_) => {
                return Err(Error::new(
                    ErrorImpl::CannotIndex {
                        path: self.path.clone(),
                    },
                    group.clone(),
                ))
            }
        };

        if keys.is_empty() {
            return Err(Error::new(
                ErrorImpl::IndexExpected {
                    path: self.path.clone(),
                },
                group.clone(),
            ));
        }

        for (position, key) in keys.iter().enumerate() {
            let dimension = match aggregate.dimensions.get(position) {
                Some(dimension) => dimension,
                None => {
                    let excess = key.get_span().to(keys[keys.len() - 1].get_span());
                    return Err(Error::new(
                        ErrorImpl::TooManyKeys {
                            path: self.path.clone(),
                        },
                        excess,
                    ));
                }
            };

            let expected = Type::Primitive(dimension.key.clone());
            let received = key.get_type();
            if !received.same_structure(&expected) {
                return Err(Error::new(
                    ErrorImpl::WrongIndexType {
                        path: format!("{}{}", self.path, "[]".repeat(position)),
                        expected: expected.to_string(),
                        received: received.to_string(),
                    },
                    key.get_span().clone(),
                ));
            }
        }

        self.path.push_str(&"[]".repeat(keys.len()));
        self.current = aggregate.consume(keys.len());
        trace!("{} resolved to {}", self.path, self.current);
        Ok(())
    }

    fn resolve_field(&mut self, name: &str, field: &Span, syntax: &Span) -> Result<(), Error> {
        let record = match &self.current {
            Type::Record(record) => record,
            Type::Error => return Ok(()),
            Type::Primitive(_) | Type::Aggregate(_) => {
                return Err(Error::new(ErrorImpl::RecordExpected, syntax.clone()))
            }
        };

        let field_type = match record.field(name) {
            Some(field_type) => field_type.clone(),
            None => {
                return Err(Error::new(
                    ErrorImpl::InvalidFieldName {
                        field: name.to_string(),
                        suggestion: did_you_mean(name, record.field_names()),
                    },
                    field.clone(),
                ))
            }
        };

        self.path.push('.');
        self.path.push_str(name);
        self.current = field_type;
        self.composite = true;
        trace!("{} resolved to {}", self.path, self.current);
        Ok(())
    }

    fn poison(&mut self) {
        self.poisoned = true;
        self.current = Type::Error;
    }

    /// Builds the reference node. A chain that stepped into a record field
    /// is a composite reference; anything else is a variable reference with
    /// its keys flattened in source order.
    pub fn finish(self) -> ExprWrapper {
        let ty = self.current;

        if self.composite {
            return ExprWrapper::new(CompositeReferenceExpr {
                name: self.name,
                base_type: self.base_type,
                accessors: self.accessors,
                ty,
                span: self.span,
            });
        }

        let indices = self
            .accessors
            .into_iter()
            .flat_map(|accessor| match accessor {
                Accessor::Index { keys, .. } => keys,
                Accessor::Field { .. } => Vec::new(),
            })
            .collect();

        ExprWrapper::new(VariableReferenceExpr {
            name: self.name,
            base_type: self.base_type,
            indices,
            ty,
            span: self.span,
        })
    }
}

/// Parses the accessor chain after a resolved identifier, feeding each step
/// to the resolver. The chain ends at the first token that is neither `[`
/// nor `.`, or after a `.` with no field name.
///
/// Only syntax errors propagate; reference errors are reported in place.
pub fn parse_reference_chain(
    parser: &mut Parser,
    mut resolver: ReferenceResolver,
) -> Result<ExprWrapper, Error> {
    loop {
        match parser.current_token_kind() {
            TokenKind::OpenBracket => {
                let open = parser.advance().clone();
                let mut keys = Vec::new();

                if parser.current_token_kind() != TokenKind::CloseBracket {
                    loop {
                        keys.push(parse_expr(parser, BindingPower::Default)?);

                        if parser.current_token_kind() == TokenKind::Comma {
                            parser.advance();
                            continue;
                        }
                        break;
                    }
                }

                let close = parser.expect(TokenKind::CloseBracket)?;
                let group = open.span.to(&close.span);
                let accessor = Accessor::Index {
                    keys,
                    span: group.clone(),
                };

                if let Err(error) = resolver.resolve(accessor, &group) {
                    parser.report(error);
                }
            }
            TokenKind::Dot => {
                let dot = parser.advance().clone();

                if parser.current_token_kind() != TokenKind::Identifier {
                    if let Err(error) = resolver.resolve_missing_field(&dot.span) {
                        parser.report(error);
                    }
                    break;
                }

                let field = parser.advance().clone();
                let syntax = dot.span.to(&field.span);
                let accessor = Accessor::Field {
                    name: field.value,
                    span: field.span,
                };

                if let Err(error) = resolver.resolve(accessor, &syntax) {
                    parser.report(error);
                }
            }
            _ => break,
        }
    }

    Ok(resolver.finish())
}
