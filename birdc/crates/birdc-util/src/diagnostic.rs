//! Diagnostic reporting infrastructure.
//!
//! Every pass reports through a [`Handler`]: an append-only sink the driver
//! inspects between stages. Diagnostics carry a [`Span`] anchor and render
//! in the form `>>[ERROR] <message> (line N, character M)`.
//!
//! # Examples
//!
//! ```
//! use birdc_util::{Diagnostic, Handler, Span};
//!
//! let handler = Handler::new();
//! handler.emit(Diagnostic::error("unexpected token", Span::new(0, 1, 1, 1)));
//!
//! assert!(handler.has_errors());
//! assert_eq!(handler.error_count(), 1);
//! ```

use std::cell::RefCell;
use std::fmt;

use crate::span::Span;
use crate::SourceBuffer;

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that prevents later pipeline stages from running
    Error,
    /// A warning that does not stop compilation
    Warning,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "ERROR"),
            Level::Warning => write!(f, "WARNING"),
        }
    }
}

/// A diagnostic message with severity and source anchor.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    /// Diagnostic severity level
    pub level: Level,
    /// Main diagnostic message
    pub message: String,
    /// Source location
    pub span: Span,
}

impl Diagnostic {
    pub fn new(level: Level, message: impl Into<String>, span: Span) -> Self {
        Self {
            level,
            message: message.into(),
            span,
        }
    }

    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Error, message, span)
    }

    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self::new(Level::Warning, message, span)
    }

    /// "expected X after Y" parse errors.
    pub fn expected(what: &str, context: &str, span: Span) -> Self {
        if context.is_empty() {
            Self::error(format!("expected {}", what), span)
        } else {
            Self::error(format!("expected {} {}", what, context), span)
        }
    }

    /// Name-resolution and placement errors.
    pub fn semantic_error(message: impl Into<String>, span: Span) -> Self {
        Self::error(message, span)
    }

    /// Type errors with a free-form message.
    pub fn type_error(message: impl Into<String>, span: Span) -> Self {
        let message = message.into();
        Self::error(format!("type error: {}", message), span)
    }

    /// Type mismatches, phrased by location ("in declaration", ...).
    pub fn type_mismatch(where_: &str, span: Span) -> Self {
        Self::error(format!("type mismatch: {}", where_), span)
    }

    /// Formats the diagnostic header line.
    pub fn render(&self) -> String {
        if self.span.is_dummy() {
            format!(">>[{}] {}", self.level, self.message)
        } else {
            format!(
                ">>[{}] {} (line {}, character {})",
                self.level, self.message, self.span.line, self.span.column
            )
        }
    }
}

/// Sink for collecting diagnostics across a pass.
///
/// Interior mutability lets every visitor hold a shared reference while the
/// walk appends. The driver checks `has_errors` between stages.
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl Handler {
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
        }
    }

    /// Appends a diagnostic to the sink.
    pub fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// True if any error-level diagnostic has been reported.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of error-level diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// Snapshot of all diagnostics reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Clears the sink.
    pub fn clear(&self) {
        self.diagnostics.borrow_mut().clear();
    }

    /// Renders every diagnostic with its context picture.
    pub fn render_all(&self, source: &SourceBuffer) -> String {
        let diags = self.diagnostics.borrow();
        let mut out = String::new();
        for diag in diags.iter() {
            out.push_str(&diag.render());
            out.push('\n');
            if !diag.span.is_dummy() {
                out.push_str(&source.render_context(diag.span.line, diag.span.column));
            }
        }
        out.push_str(&format!("[{} ERRORS FOUND]\n", self.error_count()));
        out
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}
