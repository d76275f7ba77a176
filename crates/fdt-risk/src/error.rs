//! Risk-engine error type.

use thiserror::Error;

use fdt_core::{ErrorKind, Reportable};
use fdt_graph::GraphError;
use fdt_nn::NnError;

#[derive(Debug, Error)]
pub enum RiskError {
    /// `propagate` was called before `set_graph`.
    #[error("no infrastructure graph attached; call set_graph first")]
    NotConfigured,

    #[error("parameter error: {0}")]
    Nn(#[from] NnError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type RiskResult<T> = Result<T, RiskError>;

impl Reportable for RiskError {
    fn kind(&self) -> ErrorKind {
        match self {
            RiskError::NotConfigured => ErrorKind::Configuration,
            RiskError::Nn(e)         => e.kind(),
            RiskError::Graph(e)      => e.kind(),
        }
    }
}
