//! Unit tests for the type registry and scope table.

use std::rc::Rc;

use super::{
    registry::TypeRegistry,
    scope::{FunctionSignature, ScopeTable},
};
use crate::{
    ast::types::{AggregateType, Dimension, Literals, Type},
    Position, Span,
};

fn span(line: u32) -> Span {
    Span::new(
        Position::new(line, 1),
        Position::new(line, 3),
        Rc::new("test.ash".to_string()),
    )
}

#[test]
fn test_registry_has_builtin_catalog() {
    let registry = TypeRegistry::new();

    assert_eq!(registry.lookup("int"), Some(&Type::int()));
    assert_eq!(registry.lookup("string"), Some(&Type::string()));
    assert_eq!(
        registry.lookup("item"),
        Some(&Type::Primitive(Literals::Enumerated("item".to_string())))
    );
    assert_eq!(registry.lookup("widget"), None);
}

#[test]
fn test_registry_declare_type() {
    let mut registry = TypeRegistry::new();
    let row = Type::Aggregate(AggregateType::new(Type::int(), vec![Dimension::sized(5)]));

    assert!(registry.declare_type("row", row.clone(), &span(1)).is_ok());
    assert_eq!(registry.lookup("row"), Some(&row));

    let error = registry.declare_type("row", Type::int(), &span(2)).unwrap_err();
    assert_eq!(error.get_message(), "Type 'row' is already defined");
    assert_eq!(registry.lookup("row"), Some(&row));
}

#[test]
fn test_registry_builtin_names_are_taken() {
    let mut registry = TypeRegistry::new();

    assert!(registry.declare_type("int", Type::string(), &span(1)).is_err());
    assert!(!registry.declare_primitive("int"));
    assert!(registry.declare_primitive("outfit"));
    assert_eq!(
        registry.lookup("outfit"),
        Some(&Type::Primitive(Literals::Enumerated("outfit".to_string())))
    );
}

#[test]
fn test_registry_is_assignable() {
    let registry = TypeRegistry::new();

    assert!(registry.is_assignable(&Type::int(), &Type::float()));
    assert!(!registry.is_assignable(&Type::string(), &Type::int()));
}

#[test]
fn test_scope_lookup_falls_back_to_enclosing() {
    let mut scopes = ScopeTable::new();
    scopes.declare("x", Type::int(), span(1)).unwrap();

    scopes.push_scope();
    scopes.declare("y", Type::string(), span(2)).unwrap();

    assert_eq!(scopes.lookup("x").map(|entry| &entry.ty), Some(&Type::int()));
    assert_eq!(scopes.lookup("y").map(|entry| &entry.ty), Some(&Type::string()));

    scopes.pop_scope();
    assert!(scopes.lookup("y").is_none());
}

#[test]
fn test_scope_shadowing_is_restored() {
    let mut scopes = ScopeTable::new();
    scopes.declare("x", Type::int(), span(1)).unwrap();

    scopes.push_scope();
    scopes.declare("x", Type::string(), span(2)).unwrap();
    assert_eq!(scopes.lookup("x").map(|entry| &entry.ty), Some(&Type::string()));
    assert_eq!(scopes.lookup("x").map(|entry| entry.span.start.line), Some(2));

    scopes.pop_scope();
    assert_eq!(scopes.lookup("x").map(|entry| &entry.ty), Some(&Type::int()));
}

#[test]
fn test_duplicate_declaration_keeps_original() {
    let mut scopes = ScopeTable::new();
    scopes.declare("x", Type::int(), span(1)).unwrap();

    let error = scopes.declare("x", Type::string(), span(2)).unwrap_err();
    assert_eq!(error.get_message(), "Variable 'x' is already defined");
    assert_eq!(error.get_span().start.line, 2);

    let entry = scopes.lookup("x").unwrap();
    assert_eq!(entry.ty, Type::int());
    assert_eq!(entry.span.start.line, 1);
}

#[test]
fn test_global_scope_is_never_popped() {
    let mut scopes = ScopeTable::new();
    scopes.declare("x", Type::int(), span(1)).unwrap();

    assert!(scopes.pop_scope().is_none());
    assert_eq!(scopes.depth(), 1);
    assert!(scopes.lookup("x").is_some());
}

#[test]
fn test_visible_names() {
    let mut scopes = ScopeTable::new();
    scopes.declare("outer", Type::int(), span(1)).unwrap();
    scopes.push_scope();
    scopes.declare("inner", Type::int(), span(2)).unwrap();

    let mut names = scopes.visible_names();
    names.sort();
    assert_eq!(names, vec!["inner", "outer"]);
}

#[test]
fn test_function_table() {
    let mut scopes = ScopeTable::new();
    let signature = FunctionSignature {
        name: "double".to_string(),
        return_type: Type::int(),
        parameters: vec![("n".to_string(), Type::int())],
        span: span(1),
    };

    assert!(scopes.declare_function(signature.clone()).is_ok());
    assert_eq!(scopes.lookup_function("double"), Some(&signature));

    let error = scopes.declare_function(signature).unwrap_err();
    assert_eq!(error.get_message(), "Function 'double' is already defined");
}
