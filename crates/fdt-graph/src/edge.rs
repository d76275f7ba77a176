//! Directed graph edges.

use serde::Serialize;

use fdt_core::NodeIdx;

/// Road or drainage link.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeKind {
    Road {
        distance_km:     f64,
        /// Lowest point along the road, metres.
        min_elevation_m: f64,
        passable:        bool,
    },
    /// Water always flows from `source` (upstream) to `target` (downstream).
    Drainage {
        flow_capacity: f64,
    },
}

/// A directed edge between two existing nodes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Edge {
    pub source: NodeIdx,
    pub target: NodeIdx,
    pub kind:   EdgeKind,
}
