/// Abstract Syntax Tree definitions for Yezu
///
/// This module defines the program tree built by the parser and read by
/// the type checker. `Display` prints a tree back as canonical source.

pub mod types;

use crate::parser::Position;
use std::fmt;
use types::DataType;

/// A complete Yezu program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Function definitions in source order, names unique
    pub functions: Vec<Function>,
    /// Top-level instructions
    pub body: Vec<Instruction>,
}

impl Program {
    pub fn new() -> Self {
        Program {
            functions: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

/// Function definition: `fun <name> <body> end`
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub pos: Position,
    pub name: String,
    pub body: Vec<Instruction>,
}

/// Literal values that can be pushed
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Char(char),
}

impl Literal {
    pub fn data_type(&self) -> DataType {
        match self {
            Literal::Int(_) => DataType::Int,
            Literal::Float(_) => DataType::Float,
            Literal::Bool(_) => DataType::Bool,
            Literal::Str(_) => DataType::Str,
            Literal::Char(_) => DataType::Char,
        }
    }
}

/// A single instruction in a body
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Push a literal
    Push { pos: Position, value: Literal },

    /// Invoke a builtin or user function
    Word { pos: Position, name: String },

    If(If),

    While(While),
}

impl Instruction {
    pub fn pos(&self) -> &Position {
        match self {
            Instruction::Push { pos, .. } | Instruction::Word { pos, .. } => pos,
            Instruction::If(node) => &node.pos,
            Instruction::While(node) => &node.pos,
        }
    }
}

/// `if c then b (elif c then b)* (else b)? end`
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub pos: Position,
    /// Cases in source order; only the last may lack a condition
    pub cases: Vec<Case>,
}

impl If {
    /// True if the last case is an `else` arm
    pub fn has_else(&self) -> bool {
        self.cases.last().is_some_and(|case| case.condition.is_none())
    }
}

/// One arm of an `If`
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    /// `None` for the `else` arm
    pub condition: Option<Vec<Instruction>>,
    pub body: Vec<Instruction>,
}

/// `while c do b end`
#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub pos: Position,
    pub condition: Vec<Instruction>,
    pub body: Vec<Instruction>,
}

fn write_seq(f: &mut fmt::Formatter<'_>, instructions: &[Instruction]) -> fmt::Result {
    for instruction in instructions {
        write!(f, " {}", instruction)?;
    }
    Ok(())
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            // Keep a fractional part so the text lexes as FLOAT again
            Literal::Float(x) if x.fract() == 0.0 => write!(f, "{:.1}", x),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Str(s) => write!(f, "\"{}\"", s),
            Literal::Char(c) => write!(f, "'{}'", c),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Push { value, .. } => write!(f, "{}", value),
            Instruction::Word { name, .. } => write!(f, "{}", name),
            Instruction::If(node) => {
                for (i, case) in node.cases.iter().enumerate() {
                    match &case.condition {
                        Some(condition) => {
                            write!(f, "{}", if i == 0 { "if" } else { " elif" })?;
                            write_seq(f, condition)?;
                            write!(f, " then")?;
                        }
                        None => write!(f, " else")?,
                    }
                    write_seq(f, &case.body)?;
                }
                write!(f, " end")
            }
            Instruction::While(node) => {
                write!(f, "while")?;
                write_seq(f, &node.condition)?;
                write!(f, " do")?;
                write_seq(f, &node.body)?;
                write!(f, " end")
            }
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fun {}", self.name)?;
        write_seq(f, &self.body)?;
        write!(f, " end")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for function in &self.functions {
            writeln!(f, "{}", function)?;
        }
        let mut first = true;
        for instruction in &self.body {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", instruction)?;
            first = false;
        }
        if !self.body.is_empty() {
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn pos() -> Position {
        Position::new(Rc::from("test.yz"), 1, 0)
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::Int(-42).to_string(), "-42");
        assert_eq!(Literal::Float(1.0).to_string(), "1.0");
        assert_eq!(Literal::Float(2.75).to_string(), "2.75");
        assert_eq!(Literal::Bool(false).to_string(), "false");
        assert_eq!(Literal::Str("hi there".to_string()).to_string(), "\"hi there\"");
        assert_eq!(Literal::Char('x').to_string(), "'x'");
    }

    #[test]
    fn test_if_display() {
        let word = |name: &str| Instruction::Word {
            pos: pos(),
            name: name.to_string(),
        };
        let push = |n| Instruction::Push {
            pos: pos(),
            value: Literal::Int(n),
        };
        let node = Instruction::If(If {
            pos: pos(),
            cases: vec![
                Case {
                    condition: Some(vec![word("c")]),
                    body: vec![push(1)],
                },
                Case {
                    condition: Some(vec![word("d")]),
                    body: vec![push(2)],
                },
                Case {
                    condition: None,
                    body: vec![push(3)],
                },
            ],
        });
        assert_eq!(node.to_string(), "if c then 1 elif d then 2 else 3 end");
    }

    #[test]
    fn test_program_lookup() {
        let program = Program {
            functions: vec![Function {
                pos: pos(),
                name: "square".to_string(),
                body: vec![],
            }],
            body: vec![],
        };
        assert!(program.function("square").is_some());
        assert!(program.function("cube").is_none());
        assert_eq!(program.to_string(), "fun square end\n");
    }
}
