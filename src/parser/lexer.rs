/// Lexer for Yezu
///
/// Classifies raw lexemes from the scanner into typed tokens. The
/// classification never fails: anything unrecognized becomes an
/// `Illegal` token and is reported by the caller.

use crate::parser::scanner::{Position, Scanner};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

lazy_static! {
    static ref INTEGER: Regex = Regex::new(r"^-?[0-9]+$").unwrap();
    static ref FLOAT: Regex = Regex::new(r"^-?[0-9]+\.[0-9]+$").unwrap();
    static ref STRING: Regex = Regex::new(r#"^"[^"]*"$"#).unwrap();
    static ref CHARACTER: Regex = Regex::new(r"^'[^']'$").unwrap();
    static ref WORD: Regex = Regex::new(r#"^[^"']+$"#).unwrap();
    pub static ref KEYWORDS: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("fun", TokenKind::Fun);
        map.insert("end", TokenKind::End);
        map.insert("if", TokenKind::If);
        map.insert("then", TokenKind::Then);
        map.insert("elif", TokenKind::Elif);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("do", TokenKind::Do);
        map
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Comment,
    Word,

    Integer,
    Float,
    Boolean,
    String,
    Character,

    Fun,
    End,
    If,
    Then,
    Elif,
    Else,
    While,
    Do,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Comment => "COMMENT",
            TokenKind::Word => "WORD",
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::String => "STRING",
            TokenKind::Character => "CHARACTER",
            TokenKind::Fun => "FUN",
            TokenKind::End => "END",
            TokenKind::If => "IF",
            TokenKind::Then => "THEN",
            TokenKind::Elif => "ELIF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::Do => "DO",
        };
        write!(f, "{}", name)
    }
}

/// Decoded payload of a token
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
    Character(char),
    /// Identifier, comment or illegal text
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            // Debug keeps the fractional part of whole floats
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Character(c) => write!(f, "'{}'", c),
            Value::String(text) | Value::Text(text) => write!(f, "'{}'", text),
        }
    }
}

/// A classified lexeme
///
/// `value` is `None` exactly for control keywords; for every other kind
/// it holds the matching `Value` variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub pos: Position,
    pub kind: TokenKind,
    pub value: Option<Value>,
}

impl Token {
    fn new(pos: Position, kind: TokenKind, value: Option<Value>) -> Self {
        Token { pos, kind, value }
    }

    fn illegal(pos: Position, raw: &str) -> Self {
        Token::new(pos, TokenKind::Illegal, Some(Value::Text(raw.to_string())))
    }

    /// Text payload of a word, comment or illegal token
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(Value::Text(text)) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "Token({}, {}, {})", self.pos, self.kind, value),
            None => write!(f, "Token({}, {})", self.pos, self.kind),
        }
    }
}

/// Classify one raw lexeme. First matching rule wins.
pub fn tokenize(pos: Position, raw: &str) -> Token {
    if INTEGER.is_match(raw) {
        return match raw.parse::<i64>() {
            Ok(n) => Token::new(pos, TokenKind::Integer, Some(Value::Integer(n))),
            Err(_) => Token::illegal(pos, raw),
        };
    }

    if FLOAT.is_match(raw) {
        return match raw.parse::<f64>() {
            Ok(x) if x.is_finite() => Token::new(pos, TokenKind::Float, Some(Value::Float(x))),
            _ => Token::illegal(pos, raw),
        };
    }

    if raw == "true" || raw == "false" {
        return Token::new(pos, TokenKind::Boolean, Some(Value::Boolean(raw == "true")));
    }

    if STRING.is_match(raw) {
        let inner = &raw[1..raw.len() - 1];
        return Token::new(pos, TokenKind::String, Some(Value::String(inner.to_string())));
    }

    if CHARACTER.is_match(raw) {
        if let Some(c) = raw[1..].chars().next() {
            return Token::new(pos, TokenKind::Character, Some(Value::Character(c)));
        }
    }

    if let Some(kind) = KEYWORDS.get(raw) {
        return Token::new(pos, *kind, None);
    }

    if let Some(comment) = raw.strip_prefix(';') {
        return Token::new(pos, TokenKind::Comment, Some(Value::Text(comment.to_string())));
    }

    if WORD.is_match(raw) {
        return Token::new(pos, TokenKind::Word, Some(Value::Text(raw.to_string())));
    }

    Token::illegal(pos, raw)
}

/// Lazy token stream over a source string
pub struct Lexer<'src> {
    scanner: Scanner<'src>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str, path: &str) -> Self {
        Lexer {
            scanner: Scanner::new(source, path),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.scanner.next().map(|(pos, raw)| tokenize(pos, &raw))
    }
}

/// Drop comment tokens from a token stream
pub fn without_comments<I>(tokens: I) -> impl Iterator<Item = Token>
where
    I: IntoIterator<Item = Token>,
{
    tokens
        .into_iter()
        .filter(|token| token.kind != TokenKind::Comment)
}
