//! `fdt-nn` — forward-only dense layers with fixed parameters.
//!
//! Both engines evaluate small pre-trained networks.  Only inference is
//! needed, so everything here is explicit `f32` linear algebra over flat
//! row-major buffers: no autodiff, no tensor library.
//!
//! # Crate layout
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`layers`]     | `Linear`, `LayerNorm`                                 |
//! | [`activation`] | `relu_in_place`, `sigmoid`, `softmax`                 |
//! | [`params`]     | `ParamSet` trait, JSON load/save with shape checks    |
//! | [`error`]      | `NnError`, `NnResult<T>`                              |

pub mod activation;
pub mod error;
pub mod layers;
pub mod params;


pub use activation::{relu_in_place, sigmoid, softmax};
pub use error::{NnError, NnResult};
pub use layers::{LayerNorm, Linear};
pub use params::{ParamSet, load_params, save_params};
