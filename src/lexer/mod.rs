//! Lexical analysis module for the front end.
//!
//! This module contains the lexer (tokenizer) that converts source text
//! into a stream of located tokens for parsing. It handles:
//!
//! - Tokenization of source text using regex patterns
//! - Recognition of keywords, identifiers, literals, and punctuation
//! - 1-based line/column tracking of every token's first and last character
//! - Comments and whitespace handling
//!
//! Malformed input never stops the lexer; it emits a best-effort token and
//! leaves the report to the parser.

pub mod lexer;
pub mod tokens;
