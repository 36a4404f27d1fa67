/**
Core type checker for Yezu

Simulates the value stack with concrete types. Word calls unify their
signature against the top of the simulated stack, `if` arms must agree
on the resulting stack, and `while` bodies must leave it unchanged.
Function signatures are inferred from their bodies on first use.
*/

use crate::ast::types::{DataType, Signature, StackType, Type};
use crate::ast::{Function, If, Instruction, Program, While};
use crate::parser::Position;
use crate::typechecker::environment::Environment;
use crate::typechecker::errors::{TypeError, TypeResult};
use crate::typechecker::unification::Bindings;
use log::{debug, trace};
use std::collections::{BTreeMap, HashSet};

/// Outcome of checking a whole program
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    /// Stack left by the top-level body
    pub stack: StackType,
    /// Signature of every function, by name
    pub signatures: BTreeMap<String, Signature>,
}

/// The main type checker
pub struct TypeChecker {
    env: Environment,
    /// Names registered through `declare`
    declared: HashSet<String>,
    /// Functions whose bodies are being inferred
    in_progress: HashSet<String>,
    /// Functions whose bodies have been checked
    finished: HashSet<String>,
}

impl TypeChecker {
    /// Create a new type checker
    pub fn new() -> Self {
        TypeChecker {
            env: Environment::new(),
            declared: HashSet::new(),
            in_progress: HashSet::new(),
            finished: HashSet::new(),
        }
    }

    /// Register a signature ahead of checking. External words are
    /// trusted; a program function with this name must match it.
    pub fn declare(&mut self, name: &str, signature: Signature) {
        self.declared.insert(name.to_string());
        self.env.add_word(name, signature);
    }

    /// Type check a complete program
    pub fn check_program(&mut self, program: &Program) -> TypeResult<CheckReport> {
        for function in &program.functions {
            self.check_function(function, program)?;
        }

        let stack = self.check_sequence(&program.body, StackType::empty(), None, program)?;
        debug!("top-level body leaves {}", stack);

        let signatures = program
            .functions
            .iter()
            .filter_map(|f| {
                self.env
                    .lookup_word(&f.name)
                    .map(|sig| (f.name.clone(), sig.clone()))
            })
            .collect();

        Ok(CheckReport { stack, signatures })
    }

    /// Type check a free-standing instruction sequence from `stack`,
    /// using builtins and previously registered words only
    pub fn check_instructions(
        &mut self,
        instructions: &[Instruction],
        stack: StackType,
    ) -> TypeResult<StackType> {
        let program = Program::new();
        self.check_sequence(instructions, stack, None, &program)
    }

    /// Infer (or verify) one function's signature from its body
    fn check_function(&mut self, function: &Function, program: &Program) -> TypeResult<()> {
        if self.finished.contains(&function.name) {
            return Ok(());
        }

        let declared = if self.declared.contains(&function.name) {
            self.env.lookup_word(&function.name).cloned()
        } else {
            None
        };

        self.in_progress.insert(function.name.clone());
        let result = match &declared {
            Some(declared) => self.verify_declared(function, declared, program),
            None => self.infer(function, program),
        };
        self.in_progress.remove(&function.name);
        let signature = result?;
        debug!("{} {}", function.name, signature);

        if declared.is_none() {
            self.env.add_word(function.name.as_str(), signature);
        }
        self.finished.insert(function.name.clone());
        Ok(())
    }

    /// Check a body from an empty stack, recording what it draws from below
    fn infer(&mut self, function: &Function, program: &Program) -> TypeResult<Signature> {
        let mut inputs = Vec::new();
        let outputs =
            self.check_sequence(&function.body, StackType::empty(), Some(&mut inputs), program)?;
        Ok(Signature::concrete(&inputs, outputs.as_slice()))
    }

    /// Check a body from its declared inputs; the result must match
    fn verify_declared(
        &mut self,
        function: &Function,
        declared: &Signature,
        program: &Program,
    ) -> TypeResult<Signature> {
        let inputs = Bindings::new()
            .substitute(&declared.consumes)
            .map_err(|generic| TypeError::UnresolvedGeneric {
                pos: function.pos.clone(),
                word: function.name.clone(),
                name: generic,
            })?;
        let outputs = self.check_sequence(
            &function.body,
            StackType::from_vec(inputs.clone()),
            None,
            program,
        )?;

        let inferred = Signature::concrete(&inputs, outputs.as_slice());
        if inferred != *declared {
            return Err(TypeError::SignatureMismatch {
                pos: function.pos.clone(),
                name: function.name.clone(),
                declared: declared.clone(),
                inferred,
            });
        }
        Ok(inferred)
    }

    /// Resolve a word to its signature, inferring user functions on demand
    fn signature_of(
        &mut self,
        name: &str,
        pos: &Position,
        program: &Program,
    ) -> TypeResult<Signature> {
        if !self.declared.contains(name) {
            if let Some(function) = program.function(name) {
                if self.in_progress.contains(name) {
                    return Err(TypeError::RecursiveFunction {
                        pos: pos.clone(),
                        name: name.to_string(),
                    });
                }
                self.check_function(function, program)?;
            }
        }

        self.env
            .lookup_word(name)
            .cloned()
            .ok_or_else(|| TypeError::UnknownWord {
                pos: pos.clone(),
                name: name.to_string(),
            })
    }

    /// Thread `stack` through a sequence. `inputs` collects values drawn
    /// from below the entry stack while inferring a function; it is only
    /// passed for a function's straight-line top level.
    fn check_sequence(
        &mut self,
        instructions: &[Instruction],
        mut stack: StackType,
        mut inputs: Option<&mut Vec<DataType>>,
        program: &Program,
    ) -> TypeResult<StackType> {
        for instruction in instructions {
            stack = self.check_instruction(instruction, stack, inputs.as_deref_mut(), program)?;
            trace!("{} {} -> {}", instruction.pos(), instruction, stack);
        }
        Ok(stack)
    }

    /// Type check an instruction, returning the resulting stack type
    fn check_instruction(
        &mut self,
        instruction: &Instruction,
        mut stack: StackType,
        inputs: Option<&mut Vec<DataType>>,
        program: &Program,
    ) -> TypeResult<StackType> {
        match instruction {
            Instruction::Push { value, .. } => {
                stack.push(value.data_type());
                Ok(stack)
            }

            Instruction::Word { pos, name } => {
                let signature = self.signature_of(name, pos, program)?;
                apply_signature(name, pos, &signature, stack, inputs)
            }

            Instruction::If(node) => self.check_if(node, stack, program),

            Instruction::While(node) => self.check_while(node, stack, program),
        }
    }

    fn check_if(&mut self, node: &If, stack: StackType, program: &Program) -> TypeResult<StackType> {
        // Stack seen by the next condition, and by a missing else arm
        let mut entry = stack;
        let mut results = Vec::with_capacity(node.cases.len() + 1);

        for case in &node.cases {
            if let Some(condition) = &case.condition {
                let after = self.check_sequence(condition, entry, None, program)?;
                entry = pop_condition(after, &node.pos, "if")?;
            }
            results.push(self.check_sequence(&case.body, entry.clone(), None, program)?);
        }

        // Without else, falling through must have the same effect as any arm
        if !node.has_else() {
            results.push(entry);
        }

        let mut results = results.into_iter();
        let Some(merged) = results.next() else {
            return Ok(StackType::empty());
        };
        for result in results {
            if result != merged {
                return Err(TypeError::DivergentBranches {
                    pos: node.pos.clone(),
                    expected: merged,
                    actual: result,
                });
            }
        }

        Ok(merged)
    }

    fn check_while(
        &mut self,
        node: &While,
        stack: StackType,
        program: &Program,
    ) -> TypeResult<StackType> {
        let after = self.check_sequence(&node.condition, stack.clone(), None, program)?;
        let entry = pop_condition(after, &node.pos, "while")?;
        if entry != stack {
            return Err(TypeError::LoopEffectMismatch {
                pos: node.pos.clone(),
                before: stack,
                after: entry,
            });
        }

        let after = self.check_sequence(&node.body, entry, None, program)?;
        if after != stack {
            return Err(TypeError::LoopEffectMismatch {
                pos: node.pos.clone(),
                before: stack,
                after,
            });
        }

        Ok(stack)
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Pop the Bool a condition must leave on top
fn pop_condition(mut stack: StackType, pos: &Position, keyword: &str) -> TypeResult<StackType> {
    match stack.top() {
        Some(DataType::Bool) => {
            stack.pop();
            Ok(stack)
        }
        Some(actual) => Err(TypeError::TypeMismatch {
            pos: pos.clone(),
            expected: Type::Concrete(DataType::Bool),
            actual,
            context: format!("{} condition", keyword),
        }),
        None => Err(TypeError::StackUnderflow {
            pos: pos.clone(),
            word: keyword.to_string(),
            required: 1,
            available: 0,
        }),
    }
}

/// Apply a word's signature to the current stack
///
/// Consumed types are matched top of stack first against a fresh set of
/// generic bindings. With `inputs` present, a missing value whose type is
/// already known is drawn from below the entry stack instead of
/// underflowing.
fn apply_signature(
    name: &str,
    pos: &Position,
    signature: &Signature,
    mut stack: StackType,
    mut inputs: Option<&mut Vec<DataType>>,
) -> TypeResult<StackType> {
    let mut bindings = Bindings::new();
    let required = signature.consumes.len();
    let available = stack.depth();

    // Values may only be drawn from below while inferring a signature
    if inputs.is_none() && available < required {
        return Err(TypeError::StackUnderflow {
            pos: pos.clone(),
            word: name.to_string(),
            required,
            available,
        });
    }

    for expected in signature.consumes.iter().rev() {
        let actual = match stack.pop() {
            Some(actual) => actual,
            None => match (inputs.as_deref_mut(), bindings.resolve(expected)) {
                (Some(inputs), Some(ty)) => {
                    // Each draw sits below the previous one
                    inputs.insert(0, ty);
                    ty
                }
                _ => {
                    return Err(TypeError::StackUnderflow {
                        pos: pos.clone(),
                        word: name.to_string(),
                        required,
                        available,
                    });
                }
            },
        };

        bindings
            .unify(expected, actual)
            .map_err(|expected| TypeError::TypeMismatch {
                pos: pos.clone(),
                expected,
                actual,
                context: format!("'{}'", name),
            })?;
    }

    let produced =
        bindings
            .substitute(&signature.produces)
            .map_err(|generic| TypeError::UnresolvedGeneric {
                pos: pos.clone(),
                word: name.to_string(),
                name: generic,
            })?;
    for ty in produced {
        stack.push(ty);
    }

    Ok(stack)
}
