//! Evacuation-subsystem error type.
//!
//! Planning itself never fails: missing shelters or routes degrade to empty
//! output.  Errors come only from record loading and parameter files.

use thiserror::Error;

use fdt_core::{ErrorKind, Reportable};
use fdt_nn::NnError;

#[derive(Debug, Error)]
pub enum EvacError {
    #[error("record parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("policy parameter error: {0}")]
    Nn(#[from] NnError),
}

pub type EvacResult<T> = Result<T, EvacError>;

impl Reportable for EvacError {
    fn kind(&self) -> ErrorKind {
        match self {
            EvacError::Parse(_) => ErrorKind::Input,
            EvacError::Io(_)    => ErrorKind::Io,
            EvacError::Nn(e)    => e.kind(),
        }
    }
}
