use crate::parser::{ParseError, Position};
use crate::typechecker::TypeError;
use std::fmt;

/// First failure of a pipeline run
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Every illegal token in the source, reported together
    #[error("{}", Illegal(.0))]
    Lexical(Vec<ParseError>),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Type(#[from] TypeError),
}

struct Illegal<'a>(&'a [ParseError]);

impl fmt::Display for Illegal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl Error {
    /// Position of the (first) failure
    pub fn position(&self) -> Option<&Position> {
        match self {
            Error::Lexical(errors) => errors.first().map(ParseError::position),
            Error::Parse(error) => Some(error.position()),
            Error::Type(error) => Some(error.position()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Error::Lexical(_) => "LexicalIllegal",
            Error::Parse(error) => error.name(),
            Error::Type(error) => error.name(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
