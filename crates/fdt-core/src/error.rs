//! Framework error type and the structured error report handed to callers.
//!
//! Sub-crates define their own error enums.  Each one implements
//! [`Reportable`] so the surrounding system can render any failure as an
//! [`ErrorReport`] (kind + message) instead of crashing the process.

use serde::Serialize;
use thiserror::Error;

/// The base error type for `fdt-core`.
#[derive(Debug, Error)]
pub enum FdtError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `fdt-core`.
pub type FdtResult<T> = Result<T, FdtError>;

// ── Structured reporting ──────────────────────────────────────────────────────

/// Coarse classification of a failure, stable across crates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An engine was used before it was configured (e.g. no graph attached).
    Configuration,
    /// A record referenced an id that does not exist.
    MissingReference,
    /// A parameter set is malformed or has inconsistent shapes.
    Parameters,
    /// Caller-supplied input could not be parsed or violates a constraint.
    Input,
    /// Underlying file-system failure.
    Io,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Configuration    => "configuration",
            ErrorKind::MissingReference => "missing_reference",
            ErrorKind::Parameters       => "parameters",
            ErrorKind::Input            => "input",
            ErrorKind::Io               => "io",
        };
        f.write_str(s)
    }
}

/// Plain-data failure record returned to the surrounding system.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorReport {
    pub kind:    ErrorKind,
    pub message: String,
}

/// Implemented by every `fdt-*` error enum.
pub trait Reportable: std::error::Error {
    fn kind(&self) -> ErrorKind;

    fn report(&self) -> ErrorReport {
        ErrorReport { kind: self.kind(), message: self.to_string() }
    }
}

impl Reportable for FdtError {
    fn kind(&self) -> ErrorKind {
        match self {
            FdtError::Config(_) => ErrorKind::Configuration,
            FdtError::Parse(_)  => ErrorKind::Input,
            FdtError::Io(_)     => ErrorKind::Io,
        }
    }
}
