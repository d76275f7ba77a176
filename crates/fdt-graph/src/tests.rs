//! Unit tests for fdt-graph.
//!
//! All tests use small hand-built graphs around Hat Yai coordinates.

#[cfg(test)]
mod helpers {
    use fdt_core::GeoPoint;
    use crate::{FacilitySubtype, InfrastructureGraph};

    /// Two zones and two facilities:
    ///
    ///   low_zone --road--> hospital
    ///   high_zone --drainage--> low_zone
    ///   high_zone --road--> shelter
    pub fn small_graph() -> InfrastructureGraph {
        let mut g = InfrastructureGraph::new();
        g.add_zone("low_zone", GeoPoint::new(7.00, 100.47), 2.0, 5_000, 0.0).unwrap();
        g.add_zone("high_zone", GeoPoint::new(7.02, 100.48), 14.0, 5_000, 0.0).unwrap();
        g.add_facility("hospital", FacilitySubtype::Hospital, GeoPoint::new(7.01, 100.47), 10.0, 0)
            .unwrap();
        g.add_facility("shelter", FacilitySubtype::Shelter, GeoPoint::new(7.05, 100.50), 15.0, 800)
            .unwrap();
        g.add_road_edge("low_zone", "hospital", 1.2, 2.0).unwrap();
        g.add_drainage_edge("high_zone", "low_zone", 2.0).unwrap();
        g.add_road_edge("high_zone", "shelter", 3.5, 12.0).unwrap();
        g
    }
}

// ── Insertion ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod insertion {
    use fdt_core::{ErrorKind, GeoPoint, NodeIdx, Reportable};
    use crate::{EdgeKind, FacilitySubtype, GraphError, InfrastructureGraph};

    #[test]
    fn indices_follow_insertion_order() {
        let g = super::helpers::small_graph();
        assert_eq!(g.node_count(), 4);
        assert_eq!(g.index_of("low_zone"), Some(NodeIdx(0)));
        assert_eq!(g.index_of("shelter"), Some(NodeIdx(3)));
        assert_eq!(g.node(NodeIdx(2)).unwrap().id, "hospital");
    }

    #[test]
    fn duplicate_id_rejected() {
        let mut g = super::helpers::small_graph();
        let err = g
            .add_facility("low_zone", FacilitySubtype::School, GeoPoint::new(7.0, 100.0), 5.0, 0)
            .unwrap_err();
        assert!(matches!(err, GraphError::DuplicateNode(ref id) if id == "low_zone"));
        assert_eq!(g.node_count(), 4);
    }

    #[test]
    fn edge_to_unknown_node_rejected() {
        let mut g = super::helpers::small_graph();
        let err = g.add_road_edge("low_zone", "nowhere", 1.0, 0.0).unwrap_err();
        match &err {
            GraphError::UnknownNode { missing, .. } => assert_eq!(missing, "nowhere"),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::MissingReference);
        assert_eq!(g.edge_count(), 3, "rejected edge must not be inserted");
    }

    #[test]
    fn unknown_source_reported_first() {
        let mut g = InfrastructureGraph::new();
        let err = g.add_drainage_edge("a", "b", 1.0).unwrap_err();
        assert!(matches!(err, GraphError::UnknownNode { ref missing, .. } if missing == "a"));
    }

    #[test]
    fn roads_start_passable_and_toggle() {
        let mut g = super::helpers::small_graph();
        assert_eq!(g.set_passable("low_zone", "hospital", false), 1);
        assert!(matches!(g.edges()[0].kind, EdgeKind::Road { passable: false, .. }));
        // Drainage links are not roads.
        assert_eq!(g.set_passable("high_zone", "low_zone", false), 0);
        assert_eq!(g.set_passable("ghost", "hospital", false), 0);
    }

    #[test]
    fn cycles_are_allowed() {
        let mut g = super::helpers::small_graph();
        g.add_road_edge("hospital", "low_zone", 1.2, 2.0).unwrap();
        assert_eq!(g.edge_count(), 4);
    }
}

// ── Depths & features ─────────────────────────────────────────────────────────

#[cfg(test)]
mod features {
    use fdt_core::{GeoPoint, NodeIdx};
    use crate::{DepthMap, FEATURE_WIDTH, InfrastructureGraph};

    #[test]
    fn update_depths_ignores_unknown_ids() {
        let mut g = super::helpers::small_graph();
        let depths = DepthMap::from([
            ("low_zone".to_string(), 2.0),
            ("atlantis".to_string(), 9.0),
        ]);
        assert_eq!(g.update_depths(&depths), 1);
        assert_eq!(g.node_by_id("low_zone").unwrap().current_depth_m, 2.0);
        assert_eq!(g.node_by_id("high_zone").unwrap().current_depth_m, 0.0);
    }

    #[test]
    fn feature_encoding() {
        let mut g = super::helpers::small_graph();
        g.update_depths(&DepthMap::from([("low_zone".to_string(), 1.5)]));
        let f = g.node_features();
        assert_eq!(f.len(), 4);
        assert_eq!(f[0].len(), FEATURE_WIDTH);

        // low_zone
        assert!((f[0][0] - 0.02).abs() < 1e-6);
        assert_eq!(f[0][1], 1.0);
        assert_eq!(&f[0][2..6], &[0.0; 4]);
        assert!((f[0][6] - 0.5).abs() < 1e-6);
        assert!((f[0][7] - 0.5).abs() < 1e-6);

        // hospital, shelter one-hots
        assert_eq!(&f[2][1..6], &[0.0, 1.0, 0.0, 0.0, 0.0]);
        assert_eq!(&f[3][1..6], &[0.0, 0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn depth_and_population_clamped() {
        let mut g = InfrastructureGraph::new();
        g.add_zone("z", GeoPoint::new(0.0, 0.0), 1.0, 50_000, 12.0).unwrap();
        let f = g.node_features();
        assert_eq!(f[0][6], 1.0);
        assert_eq!(f[0][7], 1.0);
    }

    #[test]
    fn risk_score_write_back() {
        let mut g = super::helpers::small_graph();
        g.set_risk_score(NodeIdx(1), 42.5);
        g.set_risk_score(NodeIdx(99), 1.0);
        assert_eq!(g.node(NodeIdx(1)).unwrap().risk_score, 42.5);
    }
}

// ── Edge list & adjacency ─────────────────────────────────────────────────────

#[cfg(test)]
mod adjacency {
    use fdt_core::NodeIdx;
    use crate::{Adjacency, InfrastructureGraph};

    #[test]
    fn empty_graph_yields_empty_edge_list() {
        let g = InfrastructureGraph::new();
        assert!(g.is_empty());
        assert!(g.edge_list().is_empty());
        assert_eq!(g.in_adjacency().edge_count(), 0);
    }

    #[test]
    fn edge_list_in_insertion_order() {
        let g = super::helpers::small_graph();
        assert_eq!(
            g.edge_list(),
            vec![
                (NodeIdx(0), NodeIdx(2)),
                (NodeIdx(1), NodeIdx(0)),
                (NodeIdx(1), NodeIdx(3)),
            ]
        );
    }

    #[test]
    fn predecessors() {
        let adj = super::helpers::small_graph().in_adjacency();
        assert_eq!(adj.node_count(), 4);
        assert_eq!(adj.predecessors(NodeIdx(0)), &[NodeIdx(1)]);
        assert_eq!(adj.predecessors(NodeIdx(1)), &[] as &[NodeIdx]);
        assert_eq!(adj.in_degree(NodeIdx(2)), 1);
        assert!(adj.predecessors(NodeIdx(50)).is_empty());
    }

    #[test]
    fn out_of_range_pairs_skipped() {
        let adj = Adjacency::from_edge_list(2, &[(NodeIdx(0), NodeIdx(1)), (NodeIdx(5), NodeIdx(1))]);
        assert_eq!(adj.edge_count(), 1);
    }

    #[test]
    fn parallel_edges_kept() {
        let adj = Adjacency::from_edge_list(2, &[(NodeIdx(0), NodeIdx(1)), (NodeIdx(0), NodeIdx(1))]);
        assert_eq!(adj.in_degree(NodeIdx(1)), 2);
    }
}

// ── Spatial queries ───────────────────────────────────────────────────────────

#[cfg(test)]
mod spatial {
    use fdt_core::{GeoPoint, NodeIdx};
    use crate::{FacilitySubtype, InfrastructureGraph};

    #[test]
    fn nearest_nodes_closest_first() {
        let g = super::helpers::small_graph();
        let near = g.nearest_nodes(GeoPoint::new(7.001, 100.47), 2);
        assert_eq!(near, vec![NodeIdx(0), NodeIdx(2)]);
    }

    #[test]
    fn nearest_facility_by_subtype() {
        let g = super::helpers::small_graph();
        let pos = GeoPoint::new(7.00, 100.47);
        assert_eq!(g.nearest_facility(pos, FacilitySubtype::Shelter), Some(NodeIdx(3)));
        assert_eq!(g.nearest_facility(pos, FacilitySubtype::School), None);
    }

    #[test]
    fn empty_graph_queries() {
        let g = InfrastructureGraph::default();
        assert!(g.nearest_nodes(GeoPoint::new(0.0, 0.0), 3).is_empty());
        assert_eq!(g.nearest_facility(GeoPoint::new(0.0, 0.0), FacilitySubtype::Hospital), None);
    }
}

// ── CSV loading ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use crate::{EdgeKind, GraphError, GraphRecords, InfrastructureGraph};

    const ZONES: &str = "\
id,lat,lon,elevation,population,depth
hatyai_center,7.0086,100.4747,8.0,45000,0.4
khlong_hae,7.0300,100.4900,5.0,22000,
";

    const FACILITIES: &str = "\
id,subtype,lat,lon,elevation,capacity
hospital_hatyai,hospital,7.0153,100.4689,10.0,
shelter_psu,shelter,7.0072,100.4980,25.0,2000
";

    const EDGES: &str = "\
kind,source,target,distance,flow_capacity,min_elevation
road,hatyai_center,hospital_hatyai,1.2,,6.0
road,khlong_hae,shelter_psu,,,
drainage,khlong_hae,hatyai_center,,2.5,
road,hatyai_center,missing_school,1.0,,
";

    fn records() -> GraphRecords {
        GraphRecords::from_readers(
            Cursor::new(ZONES),
            Cursor::new(FACILITIES),
            Cursor::new(EDGES),
        )
        .unwrap()
    }

    #[test]
    fn parses_optional_columns() {
        let r = records();
        assert_eq!(r.zones.len(), 2);
        assert_eq!(r.zones[1].depth, None);
        assert_eq!(r.facilities[0].capacity, None);
        assert_eq!(r.edges[1].distance, None);
        assert_eq!(r.edges[2].flow_capacity, Some(2.5));
    }

    #[test]
    fn unknown_endpoint_is_collected_not_fatal() {
        let load = InfrastructureGraph::from_records(&records()).unwrap();
        assert_eq!(load.graph.node_count(), 4);
        assert_eq!(load.graph.edge_count(), 3);
        assert_eq!(load.rejected_edges.len(), 1);
        assert_eq!(load.rejected_edges[0].target, "missing_school");
        assert!(load.rejected_edges[0].reason.contains("missing_school"));
    }

    #[test]
    fn missing_road_distance_uses_great_circle() {
        let load = InfrastructureGraph::from_records(&records()).unwrap();
        match load.graph.edges()[1].kind {
            EdgeKind::Road { distance_km, min_elevation_m, .. } => {
                assert!(distance_km > 0.5 && distance_km < 5.0, "got {distance_km}");
                assert_eq!(min_elevation_m, 0.0);
            }
            ref other => panic!("expected road, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_node_is_fatal() {
        let mut r = records();
        r.facilities[1].id = "hatyai_center".to_string();
        let err = InfrastructureGraph::from_records(&r).err().unwrap();
        assert!(matches!(err, GraphError::DuplicateNode(_)));
    }

    #[test]
    fn bad_subtype_is_parse_error() {
        let mut r = records();
        r.facilities[0].subtype = "castle".to_string();
        let err = InfrastructureGraph::from_records(&r).err().unwrap();
        assert!(matches!(err, GraphError::Parse(_)));
    }

    #[test]
    fn malformed_csv_is_parse_error() {
        let err = GraphRecords::from_readers(
            Cursor::new("id,lat\nx,notanumber\n"),
            Cursor::new(FACILITIES),
            Cursor::new(EDGES),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::Parse(_)));
    }

    #[test]
    fn load_dir_reads_three_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("zones.csv"), ZONES).unwrap();
        std::fs::write(dir.path().join("facilities.csv"), FACILITIES).unwrap();
        std::fs::write(dir.path().join("edges.csv"), EDGES).unwrap();
        let r = GraphRecords::load_dir(dir.path()).unwrap();
        assert_eq!(r.edges.len(), 4);
    }

    #[test]
    fn load_dir_missing_file_is_io() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(GraphRecords::load_dir(dir.path()), Err(GraphError::Io(_))));
    }
}
