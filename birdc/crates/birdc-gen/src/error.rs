//! Fatal lowering errors.

use thiserror::Error;

/// An error that aborts lowering.
///
/// Some well-typed programs are still rejected here: float `%` has no
/// WebAssembly opcode and string concatenation needs runtime allocation
/// the module does not carry. Both stay available in the interpreter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LowerError {
    #[error("modular operation requires integer values")]
    FloatModulo,

    #[error("string concatenation is not supported in compiled modules")]
    StrConcat,

    #[error("unsupported print type")]
    UnsupportedPrint,

    #[error("break or continue outside of a loop")]
    JumpOutsideLoop,

    #[error("malformed numeric literal '{text}'")]
    MalformedNumber { text: String },

    #[error("undefined identifier '{name}' during lowering")]
    UndefinedLocal { name: String },

    #[error("undefined function '{name}' during lowering")]
    UndefinedFunction { name: String },

    #[error("unknown type '{name}' during lowering")]
    UnknownType { name: String },

    #[error("invalid operand for unary negation")]
    InvalidNegation,

    #[error("cannot lower a void value")]
    VoidValue,

    #[error("unsupported operator in lowering")]
    UnsupportedOperator,
}
