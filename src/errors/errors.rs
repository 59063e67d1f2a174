use std::fmt::Display;

use thiserror::Error;

use crate::Span;

/// A located front-end error. Every error is recoverable; the parser records
/// it and carries on.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    span: Span,
}

/// Which stage of the front end produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed token, reported by the parser when it meets it
    Lex,
    /// Required token or structure absent
    Syntax,
    /// Duplicate identifier, unknown type name
    Declaration,
    /// Invalid variable reference or accessor chain
    Reference,
    /// Operand, argument, assignment or condition of the wrong type
    Type,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, span: Span) -> Self {
        Error {
            internal_error: error_impl,
            span,
        }
    }

    pub fn get_span(&self) -> &Span {
        &self.span
    }

    /// The user-visible message, e.g. `Too many keys for 'x'`.
    pub fn get_message(&self) -> String {
        self.internal_error.to_string()
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnterminatedString { .. } => "UnterminatedString",
            ErrorImpl::InvalidCharacter { .. } => "InvalidCharacter",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::DimensionExpected => "DimensionExpected",
            ErrorImpl::TooDeeplyNested { .. } => "TooDeeplyNested",
            ErrorImpl::VariableAlreadyDeclared { .. } => "VariableAlreadyDeclared",
            ErrorImpl::TypeAlreadyDeclared { .. } => "TypeAlreadyDeclared",
            ErrorImpl::FieldAlreadyDeclared { .. } => "FieldAlreadyDeclared",
            ErrorImpl::FunctionAlreadyDeclared { .. } => "FunctionAlreadyDeclared",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::VoidVariable { .. } => "VoidVariable",
            ErrorImpl::TypeNameAsVariable { .. } => "TypeNameAsVariable",
            ErrorImpl::NestedFunction => "NestedFunction",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::FunctionNotDeclared { .. } => "FunctionNotDeclared",
            ErrorImpl::CannotIndex { .. } => "CannotIndex",
            ErrorImpl::TooManyKeys { .. } => "TooManyKeys",
            ErrorImpl::IndexExpected { .. } => "IndexExpected",
            ErrorImpl::WrongIndexType { .. } => "WrongIndexType",
            ErrorImpl::RecordExpected => "RecordExpected",
            ErrorImpl::FieldNameExpected => "FieldNameExpected",
            ErrorImpl::InvalidFieldName { .. } => "InvalidFieldName",
            ErrorImpl::ArgumentCount { .. } => "ArgumentCount",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::InvalidOperands { .. } => "InvalidOperands",
            ErrorImpl::InvalidOperand { .. } => "InvalidOperand",
            ErrorImpl::ConditionNotBoolean { .. } => "ConditionNotBoolean",
            ErrorImpl::AggregateExpected => "AggregateExpected",
            ErrorImpl::TooManyForeachKeys => "TooManyForeachKeys",
            ErrorImpl::ReturnTypeMismatch { .. } => "ReturnTypeMismatch",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::OutsideLoop { .. } => "OutsideLoop",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
        }
    }

    pub fn get_category(&self) -> ErrorCategory {
        match &self.internal_error {
            ErrorImpl::UnterminatedString { .. } | ErrorImpl::InvalidCharacter { .. } => {
                ErrorCategory::Lex
            }
            ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::NumberParseError { .. }
            | ErrorImpl::DimensionExpected
            | ErrorImpl::TooDeeplyNested { .. } => ErrorCategory::Syntax,
            ErrorImpl::VariableAlreadyDeclared { .. }
            | ErrorImpl::TypeAlreadyDeclared { .. }
            | ErrorImpl::FieldAlreadyDeclared { .. }
            | ErrorImpl::FunctionAlreadyDeclared { .. }
            | ErrorImpl::UnknownType { .. }
            | ErrorImpl::VoidVariable { .. }
            | ErrorImpl::TypeNameAsVariable { .. }
            | ErrorImpl::NestedFunction => ErrorCategory::Declaration,
            ErrorImpl::VariableNotDeclared { .. }
            | ErrorImpl::FunctionNotDeclared { .. }
            | ErrorImpl::CannotIndex { .. }
            | ErrorImpl::TooManyKeys { .. }
            | ErrorImpl::IndexExpected { .. }
            | ErrorImpl::WrongIndexType { .. }
            | ErrorImpl::RecordExpected
            | ErrorImpl::FieldNameExpected
            | ErrorImpl::InvalidFieldName { .. } => ErrorCategory::Reference,
            ErrorImpl::ArgumentCount { .. }
            | ErrorImpl::ArgumentTypeMatchError { .. }
            | ErrorImpl::TypeMatchError { .. }
            | ErrorImpl::InvalidOperands { .. }
            | ErrorImpl::InvalidOperand { .. }
            | ErrorImpl::ConditionNotBoolean { .. }
            | ErrorImpl::AggregateExpected
            | ErrorImpl::TooManyForeachKeys
            | ErrorImpl::ReturnTypeMismatch { .. }
            | ErrorImpl::ReturnOutsideFunction
            | ErrorImpl::OutsideLoop { .. }
            | ErrorImpl::InvalidAssignmentTarget => ErrorCategory::Type,
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnexpectedToken { expected, .. } if expected == ";" => {
                ErrorTip::Suggestion(String::from("did you miss a semicolon?"))
            }
            ErrorImpl::VariableNotDeclared {
                suggestion: Some(suggestion),
                ..
            }
            | ErrorImpl::UnknownType {
                suggestion: Some(suggestion),
                ..
            }
            | ErrorImpl::InvalidFieldName {
                suggestion: Some(suggestion),
                ..
            } => ErrorTip::Suggestion(suggestion.clone()),
            ErrorImpl::VoidVariable { .. } => {
                ErrorTip::Suggestion(String::from("void is only valid as a function return type"))
            }
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.span.start, self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("No closing {quote} found")]
    UnterminatedString { quote: char },
    #[error("Invalid character '{token}'")]
    InvalidCharacter { token: String },
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("Invalid number '{token}'")]
    NumberParseError { token: String },
    #[error("Dimension expected")]
    DimensionExpected,
    #[error("Too deeply nested (limit {limit})")]
    TooDeeplyNested { limit: usize },

    #[error("Variable '{variable}' is already defined")]
    VariableAlreadyDeclared { variable: String },
    #[error("Type '{type_}' is already defined")]
    TypeAlreadyDeclared { type_: String },
    #[error("Field '{field}' is already defined")]
    FieldAlreadyDeclared { field: String },
    #[error("Function '{function}' is already defined")]
    FunctionAlreadyDeclared { function: String },
    #[error("Unknown type '{type_}'")]
    UnknownType {
        type_: String,
        suggestion: Option<String>,
    },
    #[error("Variable '{variable}' cannot be void")]
    VoidVariable { variable: String },
    #[error("Type name '{name}' cannot be used as a variable name")]
    TypeNameAsVariable { name: String },
    #[error("Functions may only be declared at top level")]
    NestedFunction,

    #[error("Unknown variable '{variable}'")]
    VariableNotDeclared {
        variable: String,
        suggestion: Option<String>,
    },
    #[error("Function '{function}' undefined")]
    FunctionNotDeclared { function: String },
    #[error("Variable '{path}' cannot be indexed")]
    CannotIndex { path: String },
    #[error("Too many keys for '{path}'")]
    TooManyKeys { path: String },
    #[error("Index for '{path}' expected")]
    IndexExpected { path: String },
    #[error("Index for '{path}' has wrong data type (expected {expected}, got {received})")]
    WrongIndexType {
        path: String,
        expected: String,
        received: String,
    },
    #[error("Record expected")]
    RecordExpected,
    #[error("Field name expected")]
    FieldNameExpected,
    #[error("Invalid field name '{field}'")]
    InvalidFieldName {
        field: String,
        suggestion: Option<String>,
    },

    #[error("Function '{function}' expects {expected} arguments, got {received}")]
    ArgumentCount {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("Argument {index} of '{function}' has wrong data type (expected {expected}, got {received})")]
    ArgumentTypeMatchError {
        function: String,
        index: usize,
        expected: String,
        received: String,
    },
    #[error("Cannot store {received} in {target} of type {expected}")]
    TypeMatchError {
        target: String,
        expected: String,
        received: String,
    },
    #[error("Cannot apply operator {operator} to {left} and {right}")]
    InvalidOperands {
        operator: String,
        left: String,
        right: String,
    },
    #[error("Cannot apply operator {operator} to {operand}")]
    InvalidOperand { operator: String, operand: String },
    #[error("'{keyword}' requires a boolean condition")]
    ConditionNotBoolean { keyword: String },
    #[error("Aggregate reference expected")]
    AggregateExpected,
    #[error("Too many key variables specified")]
    TooManyForeachKeys,
    #[error("Cannot return {received} from a function returning {expected}")]
    ReturnTypeMismatch { expected: String, received: String },
    #[error("Return outside of function")]
    ReturnOutsideFunction,
    #[error("'{keyword}' outside of loop")]
    OutsideLoop { keyword: String },
    #[error("Invalid assignment target")]
    InvalidAssignmentTarget,
}
