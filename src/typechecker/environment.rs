/**
Symbol table for the type checker

Maps word names to signatures. Seeded with the builtin words; user
functions are added as their signatures are inferred.
*/

use crate::ast::types::{DataType, Signature, Type};
use std::collections::HashMap;

pub struct Environment {
    words: HashMap<String, Signature>,
}

impl Environment {
    /// Environment containing only the builtins
    pub fn new() -> Self {
        let mut env = Environment {
            words: HashMap::new(),
        };
        env.add_builtins();
        env
    }

    fn add_builtins(&mut self) {
        use DataType::{Bool, Int};

        let t = || Type::generic("T");
        let a = || Type::generic("A");
        let b = || Type::generic("B");

        // Arithmetic
        for op in ["+", "-", "*", "/", "%"] {
            self.add_word(op, Signature::concrete(&[Int, Int], &[Int]));
        }

        // Comparison
        for op in ["=", ">", "<"] {
            self.add_word(op, Signature::concrete(&[Int, Int], &[Bool]));
        }

        // Boolean
        self.add_word("not", Signature::concrete(&[Bool], &[Bool]));
        for op in ["and", "or"] {
            self.add_word(op, Signature::concrete(&[Bool, Bool], &[Bool]));
        }

        // Output
        self.add_word("println", Signature::new(vec![t()], vec![]));
        self.add_word("print", Signature::new(vec![t()], vec![]));

        // Stack shuffling
        self.add_word("drop", Signature::new(vec![t()], vec![]));
        self.add_word("dup", Signature::new(vec![t()], vec![t(), t()]));
        self.add_word("swap", Signature::new(vec![a(), b()], vec![b(), a()]));
        self.add_word("over", Signature::new(vec![a(), b()], vec![a(), b(), a()]));
    }

    pub fn add_word(&mut self, name: impl Into<String>, signature: Signature) {
        self.words.insert(name.into(), signature);
    }

    pub fn lookup_word(&self, name: &str) -> Option<&Signature> {
        self.words.get(name)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_signatures() {
        let env = Environment::new();

        assert_eq!(env.lookup_word("+").map(Signature::shape), Some((2, 1)));
        assert_eq!(env.lookup_word("<").map(Signature::shape), Some((2, 1)));
        assert_eq!(env.lookup_word("dup").map(Signature::shape), Some((1, 2)));
        assert_eq!(env.lookup_word("drop").map(Signature::shape), Some((1, 0)));
        assert_eq!(env.lookup_word("println").map(Signature::shape), Some((1, 0)));
        assert_eq!(env.lookup_word("over").map(Signature::shape), Some((2, 3)));
        assert!(env.lookup_word("frobnicate").is_none());
    }

    #[test]
    fn test_add_word() {
        let mut env = Environment::new();
        env.add_word("answer", Signature::concrete(&[], &[DataType::Int]));
        assert_eq!(
            env.lookup_word("answer"),
            Some(&Signature::concrete(&[], &[DataType::Int]))
        );
    }
}
