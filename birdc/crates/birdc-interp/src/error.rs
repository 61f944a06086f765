//! Runtime errors.

use thiserror::Error;

/// An error raised during evaluation.
///
/// Most variants are unreachable once the semantic and type passes have
/// accepted the program; division by zero is the one a valid program can
/// still hit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("division by zero (line {line}, character {column})")]
    DivisionByZero { line: u32, column: u32 },

    #[error("malformed numeric literal '{text}'")]
    MalformedNumber { text: String },

    #[error("undefined identifier '{name}'")]
    UndefinedIdentifier { name: String },

    #[error("undefined function '{name}'")]
    UndefinedFunction { name: String },

    #[error("identifier '{name}' is not mutable")]
    ImmutableAssignment { name: String },

    #[error("invalid operands for '{op}' (line {line}, character {column})")]
    InvalidOperands { op: String, line: u32, column: u32 },

    #[error("break or continue escaped the body of '{name}'")]
    LoopJumpEscapedFunction { name: String },

    #[error("void value used in an expression")]
    VoidInExpression,

    #[error("write failed: {0}")]
    Io(String),
}
