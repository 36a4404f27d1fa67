/// Type checker for Yezu
///
/// This module implements stack effect checking with:
/// - Per-call resolution of generic placeholders
/// - Branch agreement for if/elif/else
/// - Stack-neutral while loops
/// - Signature inference for user functions

pub mod checker;
pub mod environment;
pub mod errors;
pub mod unification;

pub use checker::{CheckReport, TypeChecker};
pub use errors::{TypeError, TypeResult};
