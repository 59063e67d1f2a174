use std::{collections::VecDeque, rc::Rc};

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::{Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

fn pattern(regex: &str, handler: RegexHandler) -> RegexPattern {
    RegexPattern {
        regex: Regex::new(regex).expect("lexer pattern must compile"),
        handler,
    }
}

lazy_static! {
    // Tried in order; the first pattern matching at the cursor wins, so
    // longer punctuation precedes its prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("^[0-9]+(\\.[0-9]+)?", number_handler),
        pattern("^\\s+", skip_handler),
        pattern("^\"((?:[^\"\\\\\\n]|\\\\.)*)(\"?)", string_handler),
        pattern("^'((?:[^'\\\\\\n]|\\\\.)*)('?)", string_handler),
        pattern("^/\\*(?s:.*?)(\\*/|\\z)", skip_handler),
        pattern("^//[^\\n]*", skip_handler),
        pattern("^#[^\\n]*", skip_handler),
        pattern("^\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern("^\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern("^\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("^\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern("^!=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=")),
        pattern("^!", MK_DEFAULT_HANDLER!(TokenKind::Not, "!")),
        pattern("^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern("^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern("^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern("^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("^\\|\\|", MK_DEFAULT_HANDLER!(TokenKind::Or, "||")),
        pattern("^&&", MK_DEFAULT_HANDLER!(TokenKind::And, "&&")),
        pattern("^\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern("^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern("^\\+=", MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=")),
        pattern("^-=", MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=")),
        pattern("^\\*=", MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=")),
        pattern("^/=", MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=")),
        pattern("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
    ];
}

/// Single forward pass over one compilation unit.
///
/// The lexer never fails: malformed input becomes an `Unknown` or
/// `UnterminatedString` token and the parser decides what to report.
/// Iteration ends after exactly one `EOF` token.
pub struct Lexer {
    pending: VecDeque<Token>,
    source: String,
    /// Byte offset into `source`
    pos: usize,
    line: u32,
    column: u32,
    file: Rc<String>,
    finished: bool,
}

impl Lexer {
    pub fn new(source: &str, file: Rc<String>) -> Lexer {
        Lexer {
            pending: VecDeque::new(),
            source: source.to_string(),
            pos: 0,
            line: 1,
            column: 1,
            file,
            finished: false,
        }
    }

    /// Consumes `n` bytes and returns the position of the last character consumed.
    pub fn advance_n(&mut self, n: usize) -> Position {
        let end = (self.pos + n).min(self.source.len());
        let mut last = self.cursor_position();

        for ch in self.source[self.pos..end].chars() {
            last = self.cursor_position();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }

        self.pos = end;
        last
    }

    pub fn push(&mut self, token: Token) {
        self.pending.push_back(token);
    }

    pub fn cursor_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    pub fn span(&self, start: Position, end: Position) -> Span {
        Span::new(start, end, Rc::clone(&self.file))
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn lex_next(&mut self) {
        for pattern in PATTERNS.iter() {
            if pattern.regex.is_match(self.remainder()) {
                (pattern.handler)(self, &pattern.regex);
                return;
            }
        }

        // Nothing matched: hand the parser a single-character token to complain about
        let ch = match self.remainder().chars().next() {
            Some(ch) => ch,
            None => return,
        };
        let start = self.cursor_position();
        let end = self.advance_n(ch.len_utf8());
        let span = self.span(start, end);
        self.push(MK_TOKEN!(TokenKind::Unknown, ch.to_string(), ch.to_string(), span));
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }

            if self.finished {
                return None;
            }

            if self.at_eof() {
                self.finished = true;
                let position = self.cursor_position();
                let span = self.span(position, position);
                return Some(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), String::new(), span));
            }

            self.lex_next();
        }
    }
}

fn matched_text(lexer: &Lexer, regex: &Regex) -> String {
    regex
        .find(lexer.remainder())
        .map(|found| found.as_str().to_string())
        .unwrap_or_default()
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = matched_text(lexer, regex);

    let start = lexer.cursor_position();
    let end = lexer.advance_n(matched.len());
    let span = lexer.span(start, end);
    lexer.push(MK_TOKEN!(TokenKind::Number, matched.clone(), matched, span));
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = matched_text(lexer, regex);
    lexer.advance_n(matched.len());
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let (text, body, terminated) = match regex.captures(lexer.remainder()) {
        Some(captures) => (
            captures[0].to_string(),
            captures[1].to_string(),
            !captures[2].is_empty(),
        ),
        None => return,
    };

    let start = lexer.cursor_position();
    let end = lexer.advance_n(text.len());
    let span = lexer.span(start, end);

    let kind = if terminated {
        TokenKind::String
    } else {
        TokenKind::UnterminatedString
    };

    lexer.push(MK_TOKEN!(kind, resolve_escapes(&body), text, span));
}

fn resolve_escapes(literal: &str) -> String {
    let mut result = String::new();
    let mut chars = literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => {
                result.push('\n');
                chars.next();
            }
            Some('t') => {
                result.push('\t');
                chars.next();
            }
            Some('r') => {
                result.push('\r');
                chars.next();
            }
            Some('\\') => {
                result.push('\\');
                chars.next();
            }
            Some('"') => {
                result.push('"');
                chars.next();
            }
            Some('\'') => {
                result.push('\'');
                chars.next();
            }
            Some('0') => {
                result.push('\0');
                chars.next();
            }
            Some('x') => {
                chars.next();
                let mut hex = String::new();

                for _ in 0..2 {
                    match chars.peek() {
                        Some(ch) if ch.is_ascii_hexdigit() => {
                            hex.push(*ch);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
            }
            // Unknown escape or lone trailing backslash: keep it as written
            _ => result.push(ch),
        }
    }

    result
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = matched_text(lexer, regex);

    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    let start = lexer.cursor_position();
    let end = lexer.advance_n(value.len());
    let span = lexer.span(start, end);
    lexer.push(MK_TOKEN!(kind, value.clone(), value, span));
}

/// Tokenizes a whole compilation unit. The last token is always `EOF`.
pub fn tokenize(source: &str, file: Rc<String>) -> Vec<Token> {
    let tokens: Vec<Token> = Lexer::new(source, file).collect();
    debug!("tokenized {} tokens", tokens.len());
    tokens
}
