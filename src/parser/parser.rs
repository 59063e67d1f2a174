//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the parse entry points.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing and specialized functions for statement parsing.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence
//! - Type parsing handlers
//!
//! Besides the token cursor the parser owns everything one parse needs to
//! validate as it goes: the type registry, the scope table and the
//! diagnostics sink.

use std::{collections::HashMap, rc::Rc};

use log::{debug, trace};

use crate::{
    ast::{statements::BlockStmt, types::Type},
    errors::{
        diagnostics::{DiagnosticMode, Diagnostics},
        errors::{Error, ErrorImpl},
    },
    lexer::tokens::{Token, TokenKind},
    type_checker::{registry::TypeRegistry, scope::ScopeTable},
    Position, Span,
};

use super::{
    lookups::{
        create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup,
        StmtHandler, StmtLookup,
    },
    stmt::parse_block_body,
    types::{
        create_token_type_lookups, TypeBPLookup, TypeLEDHandler, TypeLEDLookup, TypeNUDHandler,
        TypeNUDLookup,
    },
};

/// How deep statements, expressions and types may nest before the parse
/// gives up with a single diagnostic.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Configuration for one parse.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Name used in spans and rendered diagnostics.
    pub file: Rc<String>,
    pub mode: DiagnosticMode,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            file: Rc::new(String::from("shell")),
            mode: DiagnosticMode::CollectAll,
        }
    }
}

/// The outcome of a parse. A tree is always produced, even alongside
/// diagnostics.
#[derive(Debug)]
pub struct ParseResult {
    pub tree: BlockStmt,
    pub diagnostics: Vec<Error>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The list of tokens to parse, always terminated by `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
    /// Lookup table for type null denotation handlers
    type_nud_lookup: TypeNUDLookup,
    /// Lookup table for type left denotation handlers
    type_led_lookup: TypeLEDLookup,
    /// Lookup table for type binding powers
    type_binding_power_lookup: TypeBPLookup,
    /// Counter for generating unique block IDs
    current_id: i32,
    pub registry: TypeRegistry,
    pub scopes: ScopeTable,
    diagnostics: Diagnostics,
    /// Return type of the function whose body is being parsed
    pub current_function: Option<Type>,
    /// Number of enclosing `while`/`foreach` bodies
    pub loop_depth: usize,
    /// Statements, expressions and types currently open
    nesting: usize,
    /// Set once nesting overflows; no further diagnostics are kept
    halted: bool,
}

impl Parser {
    /// Creates a parser with a fresh registry and scope table.
    pub fn new(tokens: Vec<Token>, options: ParseOptions) -> Self {
        Self::with_environment(tokens, options, TypeRegistry::new(), ScopeTable::new())
    }

    /// Creates a parser that continues from the declarations of earlier
    /// units, as an interactive shell does.
    pub fn with_environment(
        mut tokens: Vec<Token>,
        options: ParseOptions,
        registry: TypeRegistry,
        scopes: ScopeTable,
    ) -> Self {
        let terminated = tokens
            .last()
            .is_some_and(|token| token.kind == TokenKind::EOF);
        if !terminated {
            let end = tokens
                .last()
                .map(|token| token.span.end)
                .unwrap_or(Position::new(1, 1));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                text: String::new(),
                span: Span::new(end, end, Rc::clone(&options.file)),
            });
        }

        let mut parser = Parser {
            tokens,
            pos: 0,
            file: options.file,
            stmt_lookup: HashMap::new(),
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
            type_nud_lookup: HashMap::new(),
            type_led_lookup: HashMap::new(),
            type_binding_power_lookup: HashMap::new(),
            current_id: 1024, // Give some space for reserved ids
            registry,
            scopes,
            diagnostics: Diagnostics::new(options.mode),
            current_function: None,
            loop_depth: 0,
            nesting: 0,
            halted: false,
        };
        create_token_lookups(&mut parser);
        create_token_type_lookups(&mut parser);
        parser
    }

    /// Hands back the registry and scope table for use by a later unit.
    pub fn into_environment(self) -> (TypeRegistry, ScopeTable) {
        (self.registry, self.scopes)
    }

    /// Returns the current token without advancing. Past the end this is
    /// the `EOF` token.
    pub fn current_token(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Kind of the token after the current one.
    pub fn peek_kind(&self) -> TokenKind {
        let last = self.tokens.len() - 1;
        self.tokens[(self.pos + 1).min(last)].kind
    }

    /// Advances to the next token and returns the previous token.
    /// The cursor never moves past `EOF`.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.tokens[index].kind != TokenKind::EOF {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Builds the error for a current token that cannot start or continue
    /// the production being parsed. Malformed tokens the lexer let through
    /// are reported as what they are.
    pub fn unexpected(&self, expected: &str) -> Error {
        let token = self.current_token();
        let error = match token.kind {
            TokenKind::Unknown => ErrorImpl::InvalidCharacter {
                token: token.text.clone(),
            },
            TokenKind::UnterminatedString => ErrorImpl::UnterminatedString {
                quote: token.text.chars().next().unwrap_or('"'),
            },
            _ => ErrorImpl::UnexpectedToken {
                expected: expected.to_string(),
                found: token.describe(),
            },
        };

        Error::new(error, token.span.clone())
    }

    /// Expects a token of the specified kind.
    ///
    /// Returns the token and advances past it, or an
    /// `Expected <kind>, found <token>` error without advancing.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        if self.current_token_kind() != expected_kind {
            return Err(self.unexpected(expected_kind.describe()));
        }

        Ok(self.advance().clone())
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Records a recoverable error.
    pub fn report(&mut self, error: Error) {
        if self.halted {
            trace!("dropping diagnostic after nesting overflow: {}", error);
            return;
        }
        self.diagnostics.report(error);
    }

    /// True once a `FirstError` parse has its error, or once nesting
    /// overflowed.
    pub fn should_stop(&self) -> bool {
        self.halted || self.diagnostics.should_stop()
    }

    /// Opens one level of statement, expression or type nesting.
    ///
    /// Past `MAX_NESTING_DEPTH` the error is reported at the current token
    /// and the parse halts; the caller unwinds with the returned error.
    /// Every `Ok` must be paired with `exit_nesting`.
    pub fn enter_nesting(&mut self) -> Result<(), Error> {
        if self.nesting >= MAX_NESTING_DEPTH {
            let error = Error::new(
                ErrorImpl::TooDeeplyNested {
                    limit: MAX_NESTING_DEPTH,
                },
                self.current_token().span.clone(),
            );
            self.report(error.clone());
            self.halted = true;
            return Err(error);
        }

        self.nesting += 1;
        Ok(())
    }

    pub fn exit_nesting(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Returns a reference to the binding power lookup table.
    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Returns a reference to the type binding power lookup table.
    pub fn get_type_bp_lookup(&self) -> &TypeBPLookup {
        &self.type_binding_power_lookup
    }

    /// Returns a reference to the type NUD lookup table.
    pub fn get_type_nud_lookup(&self) -> &TypeNUDLookup {
        &self.type_nud_lookup
    }

    /// Returns a reference to the type LED lookup table.
    pub fn get_type_led_lookup(&self) -> &TypeLEDLookup {
        &self.type_led_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    /// Registers a type left denotation handler.
    pub fn type_led(
        &mut self,
        kind: TokenKind,
        binding_power: BindingPower,
        led_fn: TypeLEDHandler,
    ) {
        self.type_binding_power_lookup.insert(kind, binding_power);
        self.type_led_lookup.insert(kind, led_fn);
    }

    /// Registers a type null denotation handler.
    pub fn type_nud(&mut self, kind: TokenKind, nud_fn: TypeNUDHandler) {
        self.type_nud_lookup.insert(kind, nud_fn);
    }

    /// Advances the internal ID counter and returns the previous value.
    pub fn advance_id(&mut self) -> i32 {
        let id = self.current_id;
        self.current_id += 1;
        id
    }

    /// Parses every remaining statement into the top-level block.
    pub fn parse_unit(&mut self) -> ParseResult {
        let start = Position::new(1, 1);
        let body = parse_block_body(self, false);
        let end = self.current_token().span.end;

        let mode = self.diagnostics.mode();
        let diagnostics =
            std::mem::replace(&mut self.diagnostics, Diagnostics::new(mode)).into_errors();
        debug!(
            "parsed {} with {} statements and {} diagnostics",
            self.file,
            body.len(),
            diagnostics.len()
        );

        ParseResult {
            tree: BlockStmt {
                body,
                id: 0,
                span: Span::new(start, end, Rc::clone(&self.file)),
            },
            diagnostics,
        }
    }
}

/// Parses a stream of tokens into an Abstract Syntax Tree.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes all lookup tables, and parses all statements until EOF.
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance (with state after parsing)
/// - The root BlockStmt together with every diagnostic
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Parser, ParseResult) {
    parse_with_options(
        tokens,
        ParseOptions {
            file,
            ..ParseOptions::default()
        },
    )
}

pub fn parse_with_options(tokens: Vec<Token>, options: ParseOptions) -> (Parser, ParseResult) {
    let mut parser = Parser::new(tokens, options);
    let result = parser.parse_unit();
    (parser, result)
}
