/**
Error types for type checking

Every error carries the position of the instruction or control
structure that failed.
*/

use crate::ast::types::{DataType, Signature, StackType, Type};
use crate::parser::Position;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TypeError {
    #[error("{pos}: unknown word '{name}'")]
    UnknownWord { pos: Position, name: String },

    #[error("{pos}: stack underflow in '{word}': requires {required}, found {available}")]
    StackUnderflow {
        pos: Position,
        word: String,
        required: usize,
        available: usize,
    },

    /// Concrete type on the stack conflicts with the required one
    #[error("{pos}: type mismatch in {context}: expected {expected}, found {actual}")]
    TypeMismatch {
        pos: Position,
        expected: Type,
        actual: DataType,
        context: String,
    },

    #[error("{pos}: divergent branches: {expected} vs {actual}")]
    DivergentBranches {
        pos: Position,
        expected: StackType,
        actual: StackType,
    },

    #[error("{pos}: loop effect changes stack shape: {before} becomes {after}")]
    LoopEffectMismatch {
        pos: Position,
        before: StackType,
        after: StackType,
    },

    /// Produced generic that no consumed value bound
    #[error("{pos}: '{word}' produces unresolved generic {name}")]
    UnresolvedGeneric {
        pos: Position,
        word: String,
        name: String,
    },

    #[error("{pos}: cannot infer signature of recursive function '{name}'")]
    RecursiveFunction { pos: Position, name: String },

    #[error("{pos}: function '{name}' declared as {declared} but its body has effect {inferred}")]
    SignatureMismatch {
        pos: Position,
        name: String,
        declared: Signature,
        inferred: Signature,
    },
}

impl TypeError {
    pub fn position(&self) -> &Position {
        match self {
            TypeError::UnknownWord { pos, .. }
            | TypeError::StackUnderflow { pos, .. }
            | TypeError::TypeMismatch { pos, .. }
            | TypeError::DivergentBranches { pos, .. }
            | TypeError::LoopEffectMismatch { pos, .. }
            | TypeError::UnresolvedGeneric { pos, .. }
            | TypeError::RecursiveFunction { pos, .. }
            | TypeError::SignatureMismatch { pos, .. } => pos,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TypeError::UnknownWord { .. } => "UnknownWord",
            TypeError::StackUnderflow { .. } => "StackUnderflow",
            TypeError::TypeMismatch { .. } => "TypeMismatch",
            TypeError::DivergentBranches { .. } => "DivergentBranches",
            TypeError::LoopEffectMismatch { .. } => "LoopEffectMismatch",
            TypeError::UnresolvedGeneric { .. } => "UnresolvedGeneric",
            TypeError::RecursiveFunction { .. } => "RecursiveFunction",
            TypeError::SignatureMismatch { .. } => "SignatureMismatch",
        }
    }
}

/// Result type for type checking operations
pub type TypeResult<T> = Result<T, TypeError>;
