//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a validated Abstract Syntax Tree. It uses a Pratt parser for
//! expressions with proper operator precedence and handles:
//!
//! - Statement parsing (declarations, functions, control flow)
//! - Expression parsing (operators, calls, literals, variable references)
//! - Type parsing for declarations
//! - Error recovery and reporting
//!
//! Checking happens during the parse: every name is resolved against the
//! scope table and type registry as soon as it is read, and every node
//! carries its static type.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod reference;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
