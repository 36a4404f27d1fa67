/// Type representations for Yezu stack effects

use std::fmt;

/// Concrete value types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Float,
    Bool,
    Str,
    Char,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int => "INT",
            DataType::Float => "FLOAT",
            DataType::Bool => "BOOL",
            DataType::Str => "STR",
            DataType::Char => "CHAR",
        };
        write!(f, "{}", name)
    }
}

/// A type in a signature: concrete, or a named placeholder
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Concrete(DataType),
    /// Resolves to one concrete type per call
    Generic(String),
}

impl Type {
    pub fn generic(name: &str) -> Self {
        Type::Generic(name.to_string())
    }
}

impl From<DataType> for Type {
    fn from(ty: DataType) -> Self {
        Type::Concrete(ty)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Concrete(ty) => write!(f, "{}", ty),
            Type::Generic(name) => write!(f, "{}", name),
        }
    }
}

/// Stack effect: consumed types and produced types, both listed
/// bottom to top (the last entry is the top of the stack)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub consumes: Vec<Type>,
    pub produces: Vec<Type>,
}

impl Signature {
    pub fn new(consumes: Vec<Type>, produces: Vec<Type>) -> Self {
        Signature { consumes, produces }
    }

    /// Signature built from concrete types only
    pub fn concrete(consumes: &[DataType], produces: &[DataType]) -> Self {
        Signature {
            consumes: consumes.iter().copied().map(Type::from).collect(),
            produces: produces.iter().copied().map(Type::from).collect(),
        }
    }

    /// (arity in, arity out)
    pub fn shape(&self) -> (usize, usize) {
        (self.consumes.len(), self.produces.len())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for ty in &self.consumes {
            write!(f, "{} ", ty)?;
        }
        write!(f, "--")?;
        for ty in &self.produces {
            write!(f, " {}", ty)?;
        }
        write!(f, ")")
    }
}

/// The checker's simulated value stack, bottom first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackType(Vec<DataType>);

impl StackType {
    pub fn empty() -> Self {
        StackType(Vec::new())
    }

    pub fn from_vec(types: Vec<DataType>) -> Self {
        StackType(types)
    }

    pub fn push(&mut self, ty: DataType) {
        self.0.push(ty);
    }

    pub fn pop(&mut self) -> Option<DataType> {
        self.0.pop()
    }

    pub fn top(&self) -> Option<DataType> {
        self.0.last().copied()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[DataType] {
        &self.0
    }
}

impl fmt::Display for StackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", ty)?;
        }
        write!(f, "]")
    }
}
