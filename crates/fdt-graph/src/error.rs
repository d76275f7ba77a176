//! Graph-subsystem error type.

use thiserror::Error;

use fdt_core::{ErrorKind, Reportable};

/// Errors produced by `fdt-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("node {0:?} already exists")]
    DuplicateNode(String),

    #[error("edge {source_id:?} -> {target_id:?} references unknown node {missing:?}")]
    UnknownNode {
        source_id: String,
        target_id: String,
        missing:   String,
    },

    #[error("graph record parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;

impl Reportable for GraphError {
    fn kind(&self) -> ErrorKind {
        match self {
            GraphError::DuplicateNode(_) | GraphError::Parse(_) => ErrorKind::Input,
            GraphError::UnknownNode { .. } => ErrorKind::MissingReference,
            GraphError::Io(_) => ErrorKind::Io,
        }
    }
}
