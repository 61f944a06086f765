//! birdc-gen - WebAssembly lowerer
//!
//! Lowers a checked AST to a WebAssembly module. The module imports
//! `print_i32`, `print_f64`, and `print_str` from the `env` namespace,
//! exports `main` (the top-level statements) plus every user function and
//! one memory, and places each string literal in a static data segment.
//!
//! The module is built as a structured instruction tree ([`ir::Instr`]),
//! printable as WAT text ([`WasmModule::to_wat`]) and serialisable to the
//! binary format ([`WasmModule::to_bytes`]).

mod encode;
mod error;
pub mod ir;
mod lower;
mod module;

pub use error::LowerError;
pub use lower::CodeGen;
pub use module::{DataSegment, FuncType, Function, Import, WasmModule};
