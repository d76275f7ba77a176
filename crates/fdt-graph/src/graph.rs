//! The infrastructure knowledge graph.
//!
//! # Data layout
//!
//! Nodes live in a `Vec<Node>` indexed by [`NodeIdx`]; a `HashMap` maps the
//! external string id to that index.  Edges are kept in insertion order.
//! The propagation engine never walks this structure directly; it asks for
//! [`node_features`](InfrastructureGraph::node_features) and
//! [`in_adjacency`](InfrastructureGraph::in_adjacency), both dense arrays
//! addressed by `NodeIdx`.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(lat, lon)` to the nearest nodes.  Used to
//! find the closest facility of a given subtype to a zone or observation.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::warn;

use fdt_core::{EdgeIdx, GeoPoint, NodeIdx};

use crate::{
    Adjacency, Edge, EdgeKind, FEATURE_WIDTH, FacilitySubtype, GraphError, GraphResult, Node,
    NodeKind,
};

pub use fdt_core::DepthMap;

// ── R-tree node entry ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
struct NodeEntry {
    point: [f32; 2], // [lat, lon]
    idx:   NodeIdx,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough for ranking
    /// candidates within one river basin.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── InfrastructureGraph ───────────────────────────────────────────────────────

/// Directed graph of zones and facilities linked by roads and drainage.
///
/// Cycles (road loops) are allowed.  Ids are unique; inserting an existing
/// id fails with [`GraphError::DuplicateNode`], and edges naming an absent
/// endpoint are rejected with [`GraphError::UnknownNode`] (and logged).
#[derive(Clone)]
pub struct InfrastructureGraph {
    nodes:       Vec<Node>,
    by_id:       HashMap<String, NodeIdx>,
    edges:       Vec<Edge>,
    spatial_idx: RTree<NodeEntry>,
}

impl InfrastructureGraph {
    pub fn new() -> Self {
        Self {
            nodes:       Vec::new(),
            by_id:       HashMap::new(),
            edges:       Vec::new(),
            spatial_idx: RTree::new(),
        }
    }

    // ── Dimensions & lookup ───────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, idx: NodeIdx) -> Option<&Node> {
        self.nodes.get(idx.index())
    }

    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.index_of(id).and_then(|idx| self.node(idx))
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIdx> {
        self.by_id.get(id).copied()
    }

    // ── Insertion ─────────────────────────────────────────────────────────

    /// Add a flood zone.
    pub fn add_zone(
        &mut self,
        id:          impl Into<String>,
        position:    GeoPoint,
        elevation_m: f64,
        population:  u32,
        depth_m:     f64,
    ) -> GraphResult<NodeIdx> {
        self.insert_node(id.into(), NodeKind::FloodZone, position, elevation_m, |n| {
            n.population = population;
            n.current_depth_m = depth_m;
        })
    }

    /// Add a facility.  Facilities start dry.
    pub fn add_facility(
        &mut self,
        id:          impl Into<String>,
        subtype:     FacilitySubtype,
        position:    GeoPoint,
        elevation_m: f64,
        capacity:    u32,
    ) -> GraphResult<NodeIdx> {
        self.insert_node(id.into(), NodeKind::Facility(subtype), position, elevation_m, |n| {
            n.capacity = capacity;
        })
    }

    fn insert_node(
        &mut self,
        id:          String,
        kind:        NodeKind,
        position:    GeoPoint,
        elevation_m: f64,
        init:        impl FnOnce(&mut Node),
    ) -> GraphResult<NodeIdx> {
        if self.by_id.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        let idx = NodeIdx::try_from(self.nodes.len())
            .map_err(|_| GraphError::Parse("node count exceeds u32 range".to_string()))?;

        let mut node = Node {
            id: id.clone(),
            idx,
            kind,
            position,
            elevation_m,
            population:      0,
            capacity:        0,
            current_depth_m: 0.0,
            risk_score:      0.0,
        };
        init(&mut node);

        self.spatial_idx.insert(NodeEntry { point: position.as_array(), idx });
        self.by_id.insert(id, idx);
        self.nodes.push(node);
        Ok(idx)
    }

    /// Add a directed road from `source` to `target`.  Roads start passable.
    pub fn add_road_edge(
        &mut self,
        source:          &str,
        target:          &str,
        distance_km:     f64,
        min_elevation_m: f64,
    ) -> GraphResult<EdgeIdx> {
        self.insert_edge(source, target, EdgeKind::Road {
            distance_km,
            min_elevation_m,
            passable: true,
        })
    }

    /// Add a drainage link; water flows from `upstream` to `downstream`.
    pub fn add_drainage_edge(
        &mut self,
        upstream:      &str,
        downstream:    &str,
        flow_capacity: f64,
    ) -> GraphResult<EdgeIdx> {
        self.insert_edge(upstream, downstream, EdgeKind::Drainage { flow_capacity })
    }

    fn insert_edge(&mut self, source: &str, target: &str, kind: EdgeKind) -> GraphResult<EdgeIdx> {
        let resolve = |id: &str| {
            self.index_of(id).ok_or_else(|| GraphError::UnknownNode {
                source_id: source.to_string(),
                target_id: target.to_string(),
                missing:   id.to_string(),
            })
        };
        let endpoints = resolve(source).and_then(|s| resolve(target).map(|t| (s, t)));
        let (s, t) = match endpoints {
            Ok(pair) => pair,
            Err(e) => {
                warn!(source, target, error = %e, "rejected edge with unknown endpoint");
                return Err(e);
            }
        };

        let idx = EdgeIdx::try_from(self.edges.len())
            .map_err(|_| GraphError::Parse("edge count exceeds u32 range".to_string()))?;
        self.edges.push(Edge { source: s, target: t, kind });
        Ok(idx)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Overwrite `current_depth_m` for every listed node.  Unknown ids are
    /// ignored.  Returns how many nodes were updated.
    pub fn update_depths(&mut self, depths: &DepthMap) -> usize {
        let mut updated = 0;
        for (id, &depth) in depths {
            if let Some(idx) = self.index_of(id) {
                self.nodes[idx.index()].current_depth_m = depth;
                updated += 1;
            }
        }
        updated
    }

    /// Record a computed risk score on a node.  Out-of-range indices are
    /// ignored.
    pub fn set_risk_score(&mut self, idx: NodeIdx, score: f64) {
        if let Some(node) = self.nodes.get_mut(idx.index()) {
            node.risk_score = score;
        }
    }

    /// Set passability on every road `source -> target`.  Returns the number
    /// of road edges touched.
    pub fn set_passable(&mut self, source: &str, target: &str, passable: bool) -> usize {
        let (Some(s), Some(t)) = (self.index_of(source), self.index_of(target)) else {
            return 0;
        };
        let mut touched = 0;
        for edge in self.edges.iter_mut().filter(|e| e.source == s && e.target == t) {
            if let EdgeKind::Road { passable: p, .. } = &mut edge.kind {
                *p = passable;
                touched += 1;
            }
        }
        touched
    }

    // ── Dense views for propagation ───────────────────────────────────────

    /// One feature row per node, in insertion order.
    pub fn node_features(&self) -> Vec<[f32; FEATURE_WIDTH]> {
        self.nodes.iter().map(Node::features).collect()
    }

    /// Directed `(source, target)` pairs in insertion order.
    pub fn edge_list(&self) -> Vec<(NodeIdx, NodeIdx)> {
        self.edges.iter().map(|e| (e.source, e.target)).collect()
    }

    /// CSR predecessor lists over all edges.
    pub fn in_adjacency(&self) -> Adjacency {
        Adjacency::from_edge_list(self.nodes.len(), &self.edge_list())
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Up to `k` nodes nearest to `pos`, closest first.
    pub fn nearest_nodes(&self, pos: GeoPoint, k: usize) -> Vec<NodeIdx> {
        self.spatial_idx
            .nearest_neighbor_iter(&pos.as_array())
            .take(k)
            .map(|e| e.idx)
            .collect()
    }

    /// The nearest facility of `subtype` to `pos`, if any exists.
    pub fn nearest_facility(&self, pos: GeoPoint, subtype: FacilitySubtype) -> Option<NodeIdx> {
        self.spatial_idx
            .nearest_neighbor_iter(&pos.as_array())
            .map(|e| e.idx)
            .find(|&idx| self.nodes[idx.index()].kind == NodeKind::Facility(subtype))
    }
}

impl Default for InfrastructureGraph {
    fn default() -> Self {
        Self::new()
    }
}
