//! Utility macros for the front end.
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a lexer handler for fixed punctuation
//!
//! These macros reduce boilerplate in the lexer pattern table.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's value (escapes resolved for strings)
/// * `$text` - The exact source text of the token
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Number, "42".to_string(), "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $text:expr, $span:expr) => {
        Token {
            kind: $kind,
            value: $value,
            text: $text,
            span: $span,
        }
    };
}

/// Creates a lexer handler for a fixed piece of punctuation.
///
/// The generated handler records the token with its inclusive span and
/// advances the lexer past it.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^\\+").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+"),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut Lexer, _regex: &Regex| {
            let start = lexer.cursor_position();
            let end = lexer.advance_n($value.len());
            let span = lexer.span(start, end);
            lexer.push(MK_TOKEN!(
                $kind,
                String::from($value),
                String::from($value),
                span
            ));
        }
    };
}
