//! birdc-util - Shared compiler infrastructure
//!
//! This crate holds the pieces every pipeline stage needs: source location
//! tracking ([`Span`]), the source buffer with diagnostic context rendering
//! ([`SourceBuffer`]), and the diagnostic sink ([`Handler`]).

pub mod diagnostic;
pub mod source;
pub mod span;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use source::SourceBuffer;
pub use span::Span;
