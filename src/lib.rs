#![allow(clippy::module_inception)]

use std::{fmt::Display, rc::Rc};

use crate::{
    errors::errors::{Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::{parse_with_options, ParseOptions, ParseResult},
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

/// A 1-based line/column location in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

/// Rendered as `line-col`, the form tooling expects.
impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.line, self.column)
    }
}

/// An inclusive source range. `end` is the position of the last character.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
    pub file: Rc<String>,
}

impl Span {
    pub fn new(start: Position, end: Position, file: Rc<String>) -> Self {
        Span { start, end, file }
    }

    /// Span covering `self` through the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
            file: Rc::clone(&self.file),
        }
    }
}

/// Tokenizes and parses one compilation unit.
pub fn parse_source(source: &str, options: ParseOptions) -> ParseResult {
    let tokens = tokenize(source, Rc::clone(&options.file));
    let (_, result) = parse_with_options(tokens, options);
    result
}

pub fn get_line(source: &str, line: u32) -> Option<&str> {
    source
        .split('\n')
        .nth(line.saturating_sub(1) as usize)
        .map(|text| text.trim_end_matches('\r'))
}

/// Renders an error with its source line and an underline of its span.
///
/// ```text
/// Error: Too many keys for 'x'
/// -> script.ash:1-14
///   |
/// 1 | int[5] x; x[0,1];
///   |              ^
/// ```
pub fn format_error(error: &Error, source: &str) -> String {
    let span = error.get_span();
    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_message()));
    } else {
        out.push_str(&format!(
            "Error: {} ({})\n",
            error.get_message(),
            error.get_tip()
        ));
    }
    out.push_str(&format!("-> {}:{}\n", span.file, span.start));

    let line_text = match get_line(source, span.start.line) {
        Some(text) => text,
        None => return out,
    };

    let line_string = span.start.line.to_string();
    let padding = line_string.len() + 2;
    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(line_text);

    out.push_str(&format!("{:>padding$}\n", "|"));
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let start_column = span.start.column as usize;
    let end_column = if span.end.line == span.start.line {
        (span.end.column as usize).max(start_column)
    } else {
        line_text.chars().count().max(start_column)
    };
    let offset = start_column.saturating_sub(removed_whitespace + 1);
    let carets = end_column - start_column + 1;

    out.push_str(&format!(
        "{:>padding$} {}{}\n",
        "|",
        " ".repeat(offset),
        "^".repeat(carets)
    ));
    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (string.chars().skip(start).collect(), start)
}
