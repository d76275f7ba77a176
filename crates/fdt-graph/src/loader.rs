//! CSV graph-construction records.
//!
//! # CSV format
//!
//! Three files, one per record kind.  Optional columns may be left empty.
//!
//! ```csv
//! # zones.csv
//! id,lat,lon,elevation,population,depth
//! hatyai_center,7.0086,100.4747,8.0,45000,0.0
//!
//! # facilities.csv
//! id,subtype,lat,lon,elevation,capacity
//! hospital_hatyai,hospital,7.0153,100.4689,10.0,0
//!
//! # edges.csv
//! kind,source,target,distance,flow_capacity,min_elevation
//! road,hatyai_center,hospital_hatyai,1.2,,6.0
//! drainage,khlong_hae,hatyai_center,,1.5,
//! ```
//!
//! Empty `depth` and `capacity` cells mean 0.  Road rows without a `distance` use the great-circle distance between the
//! endpoints; a missing `min_elevation` defaults to 0.  Drainage rows
//! without a `flow_capacity` default to 1.0.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use fdt_core::GeoPoint;

use crate::{FacilitySubtype, GraphError, GraphResult, InfrastructureGraph};

const DEFAULT_FLOW_CAPACITY: f64 = 1.0;

// ── CSV records ───────────────────────────────────────────────────────────────

/// One flood zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZoneRecord {
    pub id:         String,
    pub lat:        f64,
    pub lon:        f64,
    pub elevation:  f64,
    pub population: u32,
    #[serde(default)]
    pub depth:      Option<f64>,
}

/// One facility.  `subtype` is one of `hospital`, `shelter`,
/// `power_station`, `school`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub id:        String,
    pub subtype:   String,
    pub lat:       f64,
    pub lon:       f64,
    pub elevation: f64,
    #[serde(default)]
    pub capacity:  Option<u32>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRecordKind {
    Road,
    Drainage,
}

/// One directed edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub kind:          EdgeRecordKind,
    pub source:        String,
    pub target:        String,
    #[serde(default)]
    pub distance:      Option<f64>,
    #[serde(default)]
    pub flow_capacity: Option<f64>,
    #[serde(default)]
    pub min_elevation: Option<f64>,
}

/// The full set of construction records for one graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphRecords {
    pub zones:      Vec<ZoneRecord>,
    pub facilities: Vec<FacilityRecord>,
    pub edges:      Vec<EdgeRecord>,
}

impl GraphRecords {
    /// Parse three CSV sources.  Useful with `std::io::Cursor` in tests.
    pub fn from_readers<Z: Read, F: Read, E: Read>(
        zones:      Z,
        facilities: F,
        edges:      E,
    ) -> GraphResult<Self> {
        Ok(Self {
            zones:      read_rows(zones)?,
            facilities: read_rows(facilities)?,
            edges:      read_rows(edges)?,
        })
    }

    /// Load `zones.csv`, `facilities.csv` and `edges.csv` from `dir`.
    pub fn load_dir(dir: &Path) -> GraphResult<Self> {
        let open = |name: &str| std::fs::File::open(dir.join(name)).map_err(GraphError::Io);
        Self::from_readers(open("zones.csv")?, open("facilities.csv")?, open("edges.csv")?)
    }
}

fn read_rows<T: for<'de> Deserialize<'de>, R: Read>(reader: R) -> GraphResult<Vec<T>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    csv_reader
        .deserialize::<T>()
        .map(|row| row.map_err(|e| GraphError::Parse(e.to_string())))
        .collect()
}

// ── Graph construction ────────────────────────────────────────────────────────

/// An edge record that was not inserted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RejectedEdge {
    pub source: String,
    pub target: String,
    pub reason: String,
}

/// Result of [`InfrastructureGraph::from_records`].
pub struct GraphLoad {
    pub graph:          InfrastructureGraph,
    /// Edges dropped because an endpoint does not exist.  Each one was also
    /// logged at `warn` level.
    pub rejected_edges: Vec<RejectedEdge>,
}

impl InfrastructureGraph {
    /// Build a graph from construction records.
    ///
    /// Nodes are inserted zones first, then facilities, each in record
    /// order.  A duplicate id or unknown facility subtype aborts the load.
    /// An edge naming an absent node is rejected and reported in
    /// [`GraphLoad::rejected_edges`]; the load continues.
    pub fn from_records(records: &GraphRecords) -> GraphResult<GraphLoad> {
        let mut graph = InfrastructureGraph::new();

        for z in &records.zones {
            graph.add_zone(
                z.id.clone(),
                GeoPoint::from_degrees(z.lat, z.lon),
                z.elevation,
                z.population,
                z.depth.unwrap_or(0.0),
            )?;
        }
        for f in &records.facilities {
            let subtype: FacilitySubtype = f.subtype.parse()?;
            graph.add_facility(
                f.id.clone(),
                subtype,
                GeoPoint::from_degrees(f.lat, f.lon),
                f.elevation,
                f.capacity.unwrap_or(0),
            )?;
        }

        let mut rejected_edges = Vec::new();
        for e in &records.edges {
            let inserted = match e.kind {
                EdgeRecordKind::Road => {
                    let distance = e
                        .distance
                        .unwrap_or_else(|| graph.straight_line_km(&e.source, &e.target));
                    graph.add_road_edge(&e.source, &e.target, distance, e.min_elevation.unwrap_or(0.0))
                }
                EdgeRecordKind::Drainage => graph.add_drainage_edge(
                    &e.source,
                    &e.target,
                    e.flow_capacity.unwrap_or(DEFAULT_FLOW_CAPACITY),
                ),
            };
            match inserted {
                Ok(_) => {}
                Err(err @ GraphError::UnknownNode { .. }) => rejected_edges.push(RejectedEdge {
                    source: e.source.clone(),
                    target: e.target.clone(),
                    reason: err.to_string(),
                }),
                Err(err) => return Err(err),
            }
        }

        if !rejected_edges.is_empty() {
            warn!(count = rejected_edges.len(), "edges rejected during graph load");
        }
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "infrastructure graph loaded"
        );
        Ok(GraphLoad { graph, rejected_edges })
    }

    /// Great-circle distance between two nodes, 0 if either is missing.
    fn straight_line_km(&self, a: &str, b: &str) -> f64 {
        match (self.node_by_id(a), self.node_by_id(b)) {
            (Some(a), Some(b)) => a.position.distance_km(b.position),
            _ => 0.0,
        }
    }
}
