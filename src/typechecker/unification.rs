/**
Per-call generic resolution

A fresh `Bindings` is created for every word invocation: each generic
name binds to the first concrete type it meets and every later
occurrence in the same call must agree.
*/

use crate::ast::types::{DataType, Type};
use std::collections::HashMap;

/// Generic name to concrete type, valid for one call
#[derive(Debug, Default)]
pub struct Bindings {
    types: HashMap<String, DataType>,
}

impl Bindings {
    pub fn new() -> Self {
        Bindings::default()
    }

    /// Concrete type `ty` stands for under the current bindings, if known
    pub fn resolve(&self, ty: &Type) -> Option<DataType> {
        match ty {
            Type::Concrete(concrete) => Some(*concrete),
            Type::Generic(name) => self.types.get(name).copied(),
        }
    }

    /// Match an actual stack entry against an expected type, binding
    /// the generic on first use
    pub fn unify(&mut self, expected: &Type, actual: DataType) -> Result<(), Type> {
        match expected {
            Type::Concrete(concrete) if *concrete == actual => Ok(()),
            Type::Concrete(_) => Err(expected.clone()),
            Type::Generic(name) => match self.types.get(name) {
                Some(bound) if *bound == actual => Ok(()),
                Some(bound) => Err(Type::Concrete(*bound)),
                None => {
                    self.types.insert(name.clone(), actual);
                    Ok(())
                }
            },
        }
    }

    /// Substitute bound generics; `Err` carries the first unbound name
    pub fn substitute(&self, types: &[Type]) -> Result<Vec<DataType>, String> {
        types
            .iter()
            .map(|ty| match ty {
                Type::Concrete(concrete) => Ok(*concrete),
                Type::Generic(name) => self.types.get(name).copied().ok_or_else(|| name.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_binds_once() {
        let mut bindings = Bindings::new();
        let t = Type::generic("T");

        assert!(bindings.unify(&t, DataType::Int).is_ok());
        assert!(bindings.unify(&t, DataType::Int).is_ok());
        assert_eq!(
            bindings.unify(&t, DataType::Str),
            Err(Type::Concrete(DataType::Int))
        );
        assert_eq!(bindings.resolve(&t), Some(DataType::Int));
    }

    #[test]
    fn test_concrete_must_match() {
        let mut bindings = Bindings::new();
        let int = Type::Concrete(DataType::Int);

        assert!(bindings.unify(&int, DataType::Int).is_ok());
        assert_eq!(bindings.unify(&int, DataType::Bool), Err(int.clone()));
    }

    #[test]
    fn test_substitute() {
        let mut bindings = Bindings::new();
        bindings.unify(&Type::generic("A"), DataType::Char).unwrap();

        let out = bindings
            .substitute(&[Type::generic("A"), Type::Concrete(DataType::Bool)])
            .unwrap();
        assert_eq!(out, vec![DataType::Char, DataType::Bool]);

        assert_eq!(
            bindings.substitute(&[Type::generic("B")]),
            Err("B".to_string())
        );
    }

    #[test]
    fn test_fresh_bindings_per_call() {
        let t = Type::generic("T");

        let mut first = Bindings::new();
        first.unify(&t, DataType::Int).unwrap();

        let mut second = Bindings::new();
        assert!(second.unify(&t, DataType::Float).is_ok());
    }
}
