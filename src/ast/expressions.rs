use std::any::Any;

use crate::{lexer::tokens::Token, Span};

use super::{
    ast::{Expr, ExprType, ExprWrapper},
    types::Type,
};

// LITERALS

/// Integer Expression
#[derive(Debug, Clone)]
pub struct IntExpr {
    pub value: i64,
    pub span: Span,
}

impl Expr for IntExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Int
    }
    fn get_type(&self) -> Type {
        Type::int()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Float Expression
#[derive(Debug, Clone)]
pub struct FloatExpr {
    pub value: f64,
    pub span: Span,
}

impl Expr for FloatExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Float
    }
    fn get_type(&self) -> Type {
        Type::float()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// String Expression
/// Holds the literal with escapes already resolved.
#[derive(Debug, Clone)]
pub struct StringExpr {
    pub value: String,
    pub span: Span,
}

impl Expr for StringExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::String
    }
    fn get_type(&self) -> Type {
        Type::string()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

#[derive(Debug, Clone)]
pub struct BooleanExpr {
    pub value: bool,
    pub span: Span,
}

impl Expr for BooleanExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Boolean
    }
    fn get_type(&self) -> Type {
        Type::boolean()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

// COMPLEX

/// Binary Expression
/// Represents a binary operation in the AST.
#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub left: ExprWrapper,
    pub operator: Token,
    pub right: ExprWrapper,
    pub ty: Type,
    pub span: Span,
}

impl Expr for BinaryExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Binary
    }
    fn get_type(&self) -> Type {
        self.ty.clone()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Prefix Expression
/// Unary `-` or `!`.
#[derive(Debug, Clone)]
pub struct PrefixExpr {
    pub operator: Token,
    pub right_expr: ExprWrapper,
    pub ty: Type,
    pub span: Span,
}

impl Expr for PrefixExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Prefix
    }
    fn get_type(&self) -> Type {
        self.ty.clone()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Assignment Expression
/// `=` or one of the compound operators. The assignee is always a reference.
#[derive(Debug, Clone)]
pub struct AssignmentExpr {
    pub assignee: ExprWrapper,
    pub operator: Token,
    pub value: ExprWrapper,
    pub span: Span,
}

impl Expr for AssignmentExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Assignment
    }
    fn get_type(&self) -> Type {
        self.assignee.get_type()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// Call Expression
/// A call to a top-level function; `ty` is its declared return type.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub name: String,
    pub arguments: Vec<ExprWrapper>,
    pub ty: Type,
    pub span: Span,
}

impl Expr for CallExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::Call
    }
    fn get_type(&self) -> Type {
        self.ty.clone()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

// REFERENCES

/// One step of a reference chain, resolved left to right.
#[derive(Debug, Clone)]
pub enum Accessor {
    /// A bracket group `[k1, k2, ...]`. `span` covers the brackets.
    Index { keys: Vec<ExprWrapper>, span: Span },
    /// `.name`. `span` covers the field name only.
    Field { name: String, span: Span },
}

impl Accessor {
    pub fn get_span(&self) -> &Span {
        match self {
            Accessor::Index { span, .. } | Accessor::Field { span, .. } => span,
        }
    }
}

/// A declared variable, optionally indexed through aggregate dimensions.
///
/// `indices` holds every key in source order; `x[0][1]` and `x[0,1]` give
/// the same two keys.
#[derive(Debug, Clone)]
pub struct VariableReferenceExpr {
    pub name: String,
    /// Declared type of the variable.
    pub base_type: Type,
    pub indices: Vec<ExprWrapper>,
    /// Type left after all indices are applied.
    pub ty: Type,
    pub span: Span,
}

impl Expr for VariableReferenceExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::VariableReference
    }
    fn get_type(&self) -> Type {
        self.ty.clone()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}

/// A reference chain that steps into at least one record field.
#[derive(Debug, Clone)]
pub struct CompositeReferenceExpr {
    pub name: String,
    pub base_type: Type,
    pub accessors: Vec<Accessor>,
    pub ty: Type,
    pub span: Span,
}

impl CompositeReferenceExpr {
    /// The last field stepped into.
    pub fn field(&self) -> Option<&str> {
        self.accessors.iter().rev().find_map(|accessor| match accessor {
            Accessor::Field { name, .. } => Some(name.as_str()),
            Accessor::Index { .. } => None,
        })
    }
}

impl Expr for CompositeReferenceExpr {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn get_expr_type(&self) -> ExprType {
        ExprType::CompositeReference
    }
    fn get_type(&self) -> Type {
        self.ty.clone()
    }
    fn clone_wrapper(&self) -> ExprWrapper {
        ExprWrapper::new(self.clone())
    }
    fn get_span(&self) -> &Span {
        &self.span
    }
}
