//! Unit tests for error types, the diagnostics sink and suggestions.

use std::rc::Rc;

use crate::errors::diagnostics::{DiagnosticMode, Diagnostics};
use crate::errors::errors::{Error, ErrorCategory, ErrorImpl, ErrorTip};
use crate::errors::suggest::{did_you_mean, suggest};
use crate::{Position, Span};

fn span(column: u32) -> Span {
    Span::new(
        Position::new(1, column),
        Position::new(1, column),
        Rc::new("test.ash".to_string()),
    )
}

#[test]
fn test_error_creation() {
    let error = Error::new(ErrorImpl::InvalidCharacter { token: "@".to_string() }, span(10));

    assert_eq!(error.get_error_name(), "InvalidCharacter");
    assert_eq!(error.get_category(), ErrorCategory::Lex);
    assert_eq!(error.get_message(), "Invalid character '@'");
}

#[test]
fn test_error_span() {
    let error = Error::new(ErrorImpl::RecordExpected, span(42));

    assert_eq!(error.get_span().start, Position::new(1, 42));
    assert_eq!(error.to_string(), "1-42: Record expected");
}

#[test]
fn test_unexpected_token_message() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            expected: "]".to_string(),
            found: "end of file".to_string(),
        },
        span(1),
    );

    assert_eq!(error.get_message(), "Expected ], found end of file");
    assert_eq!(error.get_category(), ErrorCategory::Syntax);
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_missing_semicolon_tip() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            expected: ";".to_string(),
            found: "x".to_string(),
        },
        span(1),
    );

    assert_eq!(error.get_tip().to_string(), "did you miss a semicolon?");
}

#[test]
fn test_reference_messages() {
    let cases = vec![
        (ErrorImpl::CannotIndex { path: "x".to_string() }, "Variable 'x' cannot be indexed"),
        (ErrorImpl::TooManyKeys { path: "x".to_string() }, "Too many keys for 'x'"),
        (ErrorImpl::IndexExpected { path: "x".to_string() }, "Index for 'x' expected"),
        (
            ErrorImpl::WrongIndexType {
                path: "x[]".to_string(),
                expected: "int".to_string(),
                received: "string".to_string(),
            },
            "Index for 'x[]' has wrong data type (expected int, got string)",
        ),
        (ErrorImpl::RecordExpected, "Record expected"),
        (ErrorImpl::FieldNameExpected, "Field name expected"),
        (
            ErrorImpl::InvalidFieldName {
                field: "b".to_string(),
                suggestion: None,
            },
            "Invalid field name 'b'",
        ),
    ];

    for (error_impl, message) in cases {
        let error = Error::new(error_impl, span(1));
        assert_eq!(error.get_message(), message);
        assert_eq!(error.get_category(), ErrorCategory::Reference);
    }
}

#[test]
fn test_declaration_category() {
    let error = Error::new(
        ErrorImpl::VariableAlreadyDeclared { variable: "x".to_string() },
        span(1),
    );

    assert_eq!(error.get_category(), ErrorCategory::Declaration);
    assert_eq!(error.get_message(), "Variable 'x' is already defined");
}

#[test]
fn test_suggestion_tip_is_not_part_of_message() {
    let error = Error::new(
        ErrorImpl::InvalidFieldName {
            field: "nmae".to_string(),
            suggestion: Some("did you mean `name`?".to_string()),
        },
        span(1),
    );

    assert_eq!(error.get_message(), "Invalid field name 'nmae'");
    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "did you mean `name`?"),
        ErrorTip::None => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_collect_all_keeps_every_error() {
    let mut diagnostics = Diagnostics::new(DiagnosticMode::CollectAll);
    diagnostics.report(Error::new(ErrorImpl::RecordExpected, span(1)));
    diagnostics.report(Error::new(ErrorImpl::FieldNameExpected, span(5)));

    assert_eq!(diagnostics.len(), 2);
    assert!(!diagnostics.should_stop());
    let names: Vec<&str> = diagnostics.iter().map(|error| error.get_error_name()).collect();
    assert_eq!(names, vec!["RecordExpected", "FieldNameExpected"]);
}

#[test]
fn test_first_error_keeps_only_the_first() {
    let mut diagnostics = Diagnostics::new(DiagnosticMode::FirstError);
    assert!(!diagnostics.should_stop());

    diagnostics.report(Error::new(ErrorImpl::RecordExpected, span(1)));
    diagnostics.report(Error::new(ErrorImpl::FieldNameExpected, span(5)));

    assert!(diagnostics.should_stop());
    let errors = diagnostics.into_errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].get_message(), "Record expected");
}

#[test]
fn test_suggest_orders_by_distance() {
    let candidates = ["count", "amount", "cant", "zebra"];
    assert_eq!(suggest("cont", candidates), vec!["cant", "count"]);
    assert!(suggest("", candidates).is_empty());
}

#[test]
fn test_did_you_mean() {
    assert_eq!(
        did_you_mean("nmae", ["name", "age"]),
        Some("did you mean `name`?".to_string())
    );
    assert_eq!(did_you_mean("zzzzzz", ["name", "age"]), None);
}
