//! Error types for fdt-nn.

use thiserror::Error;

use fdt_core::{ErrorKind, Reportable};

#[derive(Debug, Error)]
pub enum NnError {
    #[error("layer {layer}: expected {expected} values, got {got}")]
    Shape {
        layer:    String,
        expected: usize,
        got:      usize,
    },

    #[error("parameter JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type NnResult<T> = Result<T, NnError>;

impl Reportable for NnError {
    fn kind(&self) -> ErrorKind {
        match self {
            NnError::Shape { .. } | NnError::Json(_) => ErrorKind::Parameters,
            NnError::Io(_) => ErrorKind::Io,
        }
    }
}
