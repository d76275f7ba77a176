use thiserror::Error;

use fdt_core::{ErrorKind, Reportable};
use fdt_risk::RiskError;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario configuration error: {0}")]
    Config(String),

    #[error("risk propagation failed at step {step}: {source}")]
    Step {
        step:   u32,
        #[source]
        source: RiskError,
    },
}

pub type ScenarioResult<T> = Result<T, ScenarioError>;

impl Reportable for ScenarioError {
    fn kind(&self) -> ErrorKind {
        match self {
            ScenarioError::Config(_)           => ErrorKind::Configuration,
            ScenarioError::Step { source, .. } => source.kind(),
        }
    }
}
