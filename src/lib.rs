/// Yezu - A small concatenative language
///
/// This crate implements the Yezu front end, including:
/// - Scanner and lexer with position tracking
/// - Recursive descent parser producing the program tree
/// - Stack effect type checker with generic builtins

pub mod ast;
pub mod error;
pub mod frontend;
pub mod parser;
pub mod typechecker;

pub use ast::types::{DataType, Signature, StackType, Type};
pub use ast::{Function, Instruction, Literal, Program};
pub use error::{Error, Result};
pub use frontend::{Checked, check_program, check_source, parse_source, tokens};
