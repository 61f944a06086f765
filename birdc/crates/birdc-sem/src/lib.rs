//! birdc-sem - Semantic analysis and type checking
//!
//! Two AST walks run after parsing:
//!
//! - [`SemanticAnalyzer`] establishes name resolution and structural
//!   validity: redeclaration, mutability, loop/function placement of jump
//!   statements, call arity.
//! - [`TypeChecker`] computes a [`BirdType`] for every expression bottom-up
//!   and checks declarations, assignments, operators, conditions, calls,
//!   and returns against the operator result tables.
//!
//! Both passes report through the shared diagnostic handler and keep
//! walking after an error so several problems surface per run. The
//! [`Environment`] scope stack defined here is also what the interpreter
//! and the lowerer parameterise for their own bindings.

mod analysis;
pub mod scope;
mod type_checker;
mod types;

pub use analysis::SemanticAnalyzer;
pub use scope::Environment;
pub use type_checker::TypeChecker;
pub use types::{BirdType, FnSig};
