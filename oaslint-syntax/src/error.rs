//! Error types owned by the syntax layer (§4.1, §6, §7).

use thiserror::Error;

use crate::span::Span;

/// A document failed to parse as JSON or YAML.
///
/// Per §4.1, a parse failure is surfaced as a synthetic `parse-error`
/// diagnostic and suppresses all other rules for that document; it is
/// never propagated as a hard failure out of the loader.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct ParseError {
    /// The human-readable description of the failure.
    pub message: String,
    /// The best-effort span of the offending input.
    pub span: Span,
}

impl ParseError {
    /// Constructs a parse error at the given span.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A filesystem port operation failed (§6, §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IoError {
    /// The requested URI does not exist.
    #[error("no such file: {0}")]
    NotFound(String),
    /// The URI exists but could not be read (permissions, I/O error, etc).
    #[error("failed to read {uri}: {reason}")]
    ReadFailed {
        /// The URI that failed to read.
        uri: String,
        /// The underlying reason, as text (kept `Eq`-able and cheap to clone).
        reason: String,
    },
    /// The URI's scheme or extension is not a supported document format.
    #[error("unsupported document format for {0}: expected .json, .yaml, or .yml")]
    UnsupportedFormat(String),
}
