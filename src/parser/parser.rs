/// Recursive descent parser for Yezu

use crate::ast::{Case, Function, If, Instruction, Literal, Program, While};
use crate::parser::lexer::{Token, TokenKind, Value};
use crate::parser::scanner::Position;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Lexeme that matches no token shape
    #[error("{pos}: illegal token {text:?}")]
    Illegal { pos: Position, text: String },

    /// Token that cannot start the rule being parsed
    #[error("{pos}: unexpected token {found} in {context}")]
    UnexpectedToken {
        pos: Position,
        found: TokenKind,
        context: &'static str,
    },

    /// Required token absent; `found` is `None` at end of input
    #[error("{pos}: expected {}, found {}", kinds(.expected), found_text(.found))]
    MissingExpected {
        pos: Position,
        expected: Vec<TokenKind>,
        found: Option<TokenKind>,
    },

    #[error("{pos}: function '{name}' already defined at {previous}")]
    DuplicateDefinition {
        pos: Position,
        name: String,
        previous: Position,
    },
}

fn kinds(expected: &[TokenKind]) -> String {
    expected
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

fn found_text(found: &Option<TokenKind>) -> String {
    match found {
        Some(kind) => kind.to_string(),
        None => "end of input".to_string(),
    }
}

impl ParseError {
    pub fn position(&self) -> &Position {
        match self {
            ParseError::Illegal { pos, .. }
            | ParseError::UnexpectedToken { pos, .. }
            | ParseError::MissingExpected { pos, .. }
            | ParseError::DuplicateDefinition { pos, .. } => pos,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParseError::Illegal { .. } => "LexicalIllegal",
            ParseError::UnexpectedToken { .. } => "SyntaxUnexpectedToken",
            ParseError::MissingExpected { .. } => "SyntaxMissingExpected",
            ParseError::DuplicateDefinition { .. } => "DuplicateDefinition",
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Keywords that close or split a block
const BLOCK_KEYWORDS: [TokenKind; 5] = [
    TokenKind::Then,
    TokenKind::Elif,
    TokenKind::Else,
    TokenKind::End,
    TokenKind::Do,
];

/// Single-lookahead parser over a comment-free token stream
pub struct Parser<I: Iterator<Item = Token>> {
    tokens: I,
    current: Option<Token>,
    /// Position of the last consumed token, reported at end of input
    last: Position,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    pub fn new(tokens: impl IntoIterator<IntoIter = I>, path: &str) -> Self {
        let mut tokens = tokens.into_iter();
        let current = tokens.next();
        Parser {
            tokens,
            current,
            last: Position::new(path.into(), 1, 0),
        }
    }

    pub fn parse(&mut self) -> ParseResult<Program> {
        let mut program = Program::new();

        while let Some(token) = &self.current {
            if token.kind == TokenKind::Fun {
                let function = self.parse_function()?;
                if let Some(previous) = program.function(&function.name) {
                    return Err(ParseError::DuplicateDefinition {
                        pos: function.pos,
                        name: function.name,
                        previous: previous.pos.clone(),
                    });
                }
                program.functions.push(function);
            } else {
                program.body.push(self.parse_instruction()?);
            }
        }

        Ok(program)
    }

    fn parse_function(&mut self) -> ParseResult<Function> {
        let fun = self.expect(&[TokenKind::Fun])?;
        let name = self.expect(&[TokenKind::Word])?;
        let name = match name.value {
            Some(Value::Text(text)) => text,
            _ => String::new(),
        };
        let body = self.collect(&[TokenKind::End])?;
        self.expect(&[TokenKind::End])?;

        Ok(Function {
            pos: fun.pos,
            name,
            body,
        })
    }

    fn parse_instruction(&mut self) -> ParseResult<Instruction> {
        match self.current.as_ref().map(|token| token.kind) {
            Some(TokenKind::If) => return self.parse_if().map(Instruction::If),
            Some(TokenKind::While) => return self.parse_while().map(Instruction::While),
            _ => {}
        }

        let Some(token) = self.advance() else {
            return Err(self.missing(&[TokenKind::Word]));
        };
        let pos = token.pos;

        match (token.kind, token.value) {
            (TokenKind::Word, Some(Value::Text(name))) => Ok(Instruction::Word { pos, name }),
            (TokenKind::Illegal, value) => Err(ParseError::Illegal {
                pos,
                text: match value {
                    Some(Value::Text(text)) => text,
                    _ => String::new(),
                },
            }),
            (TokenKind::Integer, Some(Value::Integer(n))) => Ok(Instruction::Push {
                pos,
                value: Literal::Int(n),
            }),
            (TokenKind::Float, Some(Value::Float(x))) => Ok(Instruction::Push {
                pos,
                value: Literal::Float(x),
            }),
            (TokenKind::Boolean, Some(Value::Boolean(b))) => Ok(Instruction::Push {
                pos,
                value: Literal::Bool(b),
            }),
            (TokenKind::String, Some(Value::String(s))) => Ok(Instruction::Push {
                pos,
                value: Literal::Str(s),
            }),
            (TokenKind::Character, Some(Value::Character(c))) => Ok(Instruction::Push {
                pos,
                value: Literal::Char(c),
            }),
            (found, _) => Err(ParseError::UnexpectedToken {
                pos,
                found,
                context: "instruction",
            }),
        }
    }

    fn parse_if(&mut self) -> ParseResult<If> {
        let start = self.expect(&[TokenKind::If])?;
        let mut cases = Vec::new();

        loop {
            let condition = self.collect(&[TokenKind::Then])?;
            self.expect(&[TokenKind::Then])?;
            let body = self.collect(&[TokenKind::Elif, TokenKind::Else, TokenKind::End])?;
            cases.push(Case {
                condition: Some(condition),
                body,
            });

            let next = self.expect(&[TokenKind::Elif, TokenKind::Else, TokenKind::End])?;
            match next.kind {
                TokenKind::Elif => continue,
                TokenKind::Else => {
                    let body = self.collect(&[TokenKind::End])?;
                    self.expect(&[TokenKind::End])?;
                    cases.push(Case {
                        condition: None,
                        body,
                    });
                    break;
                }
                _ => break,
            }
        }

        Ok(If {
            pos: start.pos,
            cases,
        })
    }

    fn parse_while(&mut self) -> ParseResult<While> {
        let start = self.expect(&[TokenKind::While])?;
        let condition = self.collect(&[TokenKind::Do])?;
        self.expect(&[TokenKind::Do])?;
        let body = self.collect(&[TokenKind::End])?;
        self.expect(&[TokenKind::End])?;

        Ok(While {
            pos: start.pos,
            condition,
            body,
        })
    }

    // Helper methods

    /// Parse instructions until one of `stop` is current or input ends.
    /// Block keywords also stop collection so the caller's `expect`
    /// reports what was missing.
    fn collect(&mut self, stop: &[TokenKind]) -> ParseResult<Vec<Instruction>> {
        let mut instructions = Vec::new();
        while let Some(token) = &self.current {
            if stop.contains(&token.kind) || BLOCK_KEYWORDS.contains(&token.kind) {
                break;
            }
            instructions.push(self.parse_instruction()?);
        }
        Ok(instructions)
    }

    /// Consume the current token if its kind is one of `kinds`
    fn expect(&mut self, kinds: &[TokenKind]) -> ParseResult<Token> {
        if self
            .current
            .as_ref()
            .is_some_and(|token| kinds.contains(&token.kind))
        {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.missing(kinds))
    }

    fn missing(&self, expected: &[TokenKind]) -> ParseError {
        match &self.current {
            Some(token) => ParseError::MissingExpected {
                pos: token.pos.clone(),
                expected: expected.to_vec(),
                found: Some(token.kind),
            },
            None => ParseError::MissingExpected {
                pos: self.last.clone(),
                expected: expected.to_vec(),
                found: None,
            },
        }
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.current.take()?;
        self.current = self.tokens.next();
        self.last = token.pos.clone();
        Some(token)
    }
}
