/// Source text to verified program tree
///
/// Each stage stops at its first failure and hands back a typed error;
/// printing and exit codes are the caller's business.

use crate::ast::Program;
use crate::error::{Error, Result};
use crate::parser::{Lexer, ParseError, Parser, Token, TokenKind, without_comments};
use crate::typechecker::{CheckReport, TypeChecker};
use log::debug;

/// A program that passed every stage
#[derive(Debug, Clone, PartialEq)]
pub struct Checked {
    pub program: Program,
    pub report: CheckReport,
}

/// Tokens of `source` in order, comments included
pub fn tokens(source: &str, path: &str) -> Vec<Token> {
    Lexer::new(source, path).collect()
}

/// Lex and parse `source`. All illegal tokens are reported at once
/// before parsing starts.
pub fn parse_source(source: &str, path: &str) -> Result<Program> {
    let tokens: Vec<Token> = without_comments(Lexer::new(source, path)).collect();
    debug!("{}: {} tokens", path, tokens.len());

    let illegal: Vec<ParseError> = tokens
        .iter()
        .filter(|token| token.kind == TokenKind::Illegal)
        .map(|token| ParseError::Illegal {
            pos: token.pos.clone(),
            text: token.text().unwrap_or_default().to_string(),
        })
        .collect();
    if !illegal.is_empty() {
        return Err(Error::Lexical(illegal));
    }

    let program = Parser::new(tokens, path).parse()?;
    debug!(
        "{}: {} functions, {} top-level instructions",
        path,
        program.functions.len(),
        program.body.len()
    );
    Ok(program)
}

/// Type check an already parsed program with the builtin words
pub fn check_program(program: &Program) -> Result<CheckReport> {
    let mut checker = TypeChecker::new();
    Ok(checker.check_program(program)?)
}

/// Run the whole front end over `source`
pub fn check_source(source: &str, path: &str) -> Result<Checked> {
    let program = parse_source(source, path)?;
    let report = check_program(&program)?;
    Ok(Checked { program, report })
}
