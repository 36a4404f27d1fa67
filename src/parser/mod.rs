/// Parser for Yezu
///
/// Scanner, lexer and hand-written recursive descent parser for Yezu
/// source code.

mod lexer;
mod parser;
mod scanner;

pub use lexer::{KEYWORDS, Lexer, Token, TokenKind, Value, tokenize, without_comments};
pub use parser::{ParseError, ParseResult, Parser};
pub use scanner::{Position, Scanner};
