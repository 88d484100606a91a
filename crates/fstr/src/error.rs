//! Error types.
//!
//! Rendering itself never fails: problems with arguments show up as
//! sentinels in the output. These errors come from the opt-in surfaces,
//! [`validate`](crate::validate) and [`try_render`](crate::try_render). The
//! writer-based helpers report only the writer's own `io::Error`.

use thiserror::Error;

/// What is wrong with a format string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatErrorKind {
    /// A `}` that closes nothing and is not part of a `}}` escape.
    #[error("unexpected closing brace")]
    UnexpectedClosingBrace,

    /// A `{` with no matching `}`.
    #[error("unclosed brace")]
    UnclosedBrace,
}

/// A structural problem in a format string, with the byte offset of the
/// offending brace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at position {position}")]
pub struct FormatError {
    pub kind: FormatErrorKind,
    pub position: usize,
}

impl FormatError {
    pub fn new(kind: FormatErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// Errors from the fallible rendering entry points.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The format string is malformed.
    #[error("invalid format string: {0}")]
    Format(#[from] FormatError),

    /// A custom formatter or verb panicked.
    #[error("formatter panicked: {0}")]
    FormatterPanic(String),
}

/// Result type for fallible rendering.
pub type Result<T> = std::result::Result<T, RenderError>;
