//! `fdt-graph` — the infrastructure knowledge graph.
//!
//! Nodes are flood zones and facilities; directed edges are roads and
//! drainage links.  Nodes receive a dense [`NodeIdx`](fdt_core::NodeIdx) in
//! insertion order which is never reused, so the propagation engine can
//! address fixed-size feature and adjacency arrays directly.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`node`]      | `Node`, `NodeKind`, `FacilitySubtype`, feature encoding   |
//! | [`edge`]      | `Edge`, `EdgeKind`                                        |
//! | [`graph`]     | `InfrastructureGraph` (insertion, depths, R-tree queries) |
//! | [`adjacency`] | `Adjacency`, CSR predecessor lists                        |
//! | [`loader`]    | CSV records, `GraphRecords`, `GraphLoad`                  |
//! | [`error`]     | `GraphError`, `GraphResult<T>`                            |

pub mod adjacency;
pub mod edge;
pub mod error;
pub mod graph;
pub mod loader;
pub mod node;

#[cfg(test)]
mod tests;

pub use adjacency::Adjacency;
pub use edge::{Edge, EdgeKind};
pub use error::{GraphError, GraphResult};
pub use graph::{DepthMap, InfrastructureGraph};
pub use loader::{
    EdgeRecord, EdgeRecordKind, FacilityRecord, GraphLoad, GraphRecords, RejectedEdge, ZoneRecord,
};
pub use node::{FEATURE_NAMES, FEATURE_WIDTH, FacilitySubtype, Node, NodeKind};
