//! Parameter-set persistence.
//!
//! Trained weights arrive as opaque JSON documents.  Every network type
//! implements [`ParamSet`] so that a loaded document is shape-checked before
//! any engine evaluates it.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::NnResult;

/// A serialisable, self-validating collection of layers.
pub trait ParamSet: Serialize + DeserializeOwned {
    /// Check internal shape consistency (buffer lengths and layer chaining).
    fn validate(&self) -> NnResult<()>;
}

/// Read, parse, and validate a parameter file.
pub fn load_params<P: ParamSet>(path: &Path) -> NnResult<P> {
    let text = std::fs::read_to_string(path)?;
    let params: P = serde_json::from_str(&text)?;
    params.validate()?;
    Ok(params)
}

/// Write a parameter set as pretty-printed JSON.
pub fn save_params<P: ParamSet>(params: &P, path: &Path) -> NnResult<()> {
    let text = serde_json::to_string_pretty(params)?;
    std::fs::write(path, text)?;
    Ok(())
}
