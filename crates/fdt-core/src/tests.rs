//! Unit tests for fdt-core primitives.

#[cfg(test)]
mod ids {
    use crate::{EdgeIdx, NodeIdx};

    #[test]
    fn index_roundtrip() {
        let id = NodeIdx(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeIdx::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeIdx::INVALID.0, u32::MAX);
        assert_eq!(EdgeIdx::INVALID.0, u32::MAX);
    }

    #[test]
    fn display() {
        assert_eq!(NodeIdx(7).to_string(), "#7");
    }
}

#[cfg(test)]
mod geo {
    use crate::GeoPoint;

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(7.006, 100.468);
        assert!(p.distance_km(p) < 1e-6);
    }

    #[test]
    fn one_degree_latitude() {
        let a = GeoPoint::new(7.0, 100.0);
        let b = GeoPoint::new(8.0, 100.0);
        let d = a.distance_km(b);
        assert!((d - 111.2).abs() < 0.5, "got {d}");
    }

    #[test]
    fn from_degrees_narrows() {
        let p = GeoPoint::from_degrees(7.0086, 100.4747);
        assert!((p.lat - 7.0086).abs() < 1e-5);
        assert_eq!(p.as_array(), [p.lat, p.lon]);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.unit(), r2.unit());
        }
    }

    #[test]
    fn unit_draws_stay_in_range() {
        let mut rng = SimRng::new(5);
        assert!((0..1_000).map(|_| rng.unit()).all(|u| (0.0..1.0).contains(&u)));
    }

    #[test]
    fn weighted_sampling_skips_zero_weights() {
        let mut rng = SimRng::new(9);
        for _ in 0..500 {
            let i = rng.sample_weighted(&[0.0, 1.0, 0.0, 3.0]).unwrap();
            assert!(i == 1 || i == 3);
        }
    }

    #[test]
    fn weighted_sampling_degenerate_inputs() {
        let mut rng = SimRng::new(9);
        assert_eq!(rng.sample_weighted(&[]), None);
        assert_eq!(rng.sample_weighted(&[0.0, 0.0]), None);
        assert_eq!(rng.sample_weighted(&[-1.0, f32::NAN]), None);
    }
}

#[cfg(test)]
mod config {
    use std::io::Write;

    use crate::{EngineConfig, ParamFallback};

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        assert_eq!(cfg.risk.rounds, 3);
        assert_eq!(cfg.risk.hidden_channels, 64);
        assert_eq!(cfg.evacuation.max_steps, 100);
        assert_eq!(cfg.evacuation.per_step_cap, 500);
        assert_eq!(cfg.evacuation.observation_width, 64);
        assert_eq!(cfg.scenario.time_step_minutes, 15);
        assert_eq!(cfg.scenario.drainage_capacity_mm_per_hour, 150.0);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = EngineConfig::from_toml_str(
            "[risk]\nrounds = 5\nfallback = \"seeded\"\n\n[logging]\njson = true\n",
        )
        .unwrap();
        assert_eq!(cfg.risk.rounds, 5);
        assert_eq!(cfg.risk.fallback, ParamFallback::Seeded);
        assert_eq!(cfg.risk.hidden_channels, 64);
        assert!(cfg.logging.json);
        assert_eq!(cfg.logging.filter, "info");
    }

    #[test]
    fn malformed_document_is_config_error() {
        use crate::{ErrorKind, Reportable};
        let err = EngineConfig::from_toml_str("[risk]\nrounds = \"three\"\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn zero_step_cap_rejected() {
        use crate::{ErrorKind, FdtError, Reportable};
        let err = EngineConfig::from_toml_str("[evacuation]\nper_step_cap = 0\n").unwrap_err();
        assert!(matches!(err, FdtError::Config(ref m) if m.contains("per_step_cap")));
        assert_eq!(err.kind(), ErrorKind::Configuration);

        assert!(EngineConfig::from_toml_str("[evacuation]\nmax_steps = 0\n").is_err());
        assert!(EngineConfig::from_toml_str("[scenario]\ntime_step_minutes = 0\n").is_err());
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[evacuation]\nmax_steps = 7").unwrap();
        let cfg = EngineConfig::load(file.path()).unwrap();
        assert_eq!(cfg.evacuation.max_steps, 7);
    }

    #[test]
    fn missing_file_is_io_error() {
        use crate::{ErrorKind, Reportable};
        let err = EngineConfig::load(std::path::Path::new("/nonexistent/fdt.toml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}

#[cfg(test)]
mod error {
    use crate::{ErrorKind, FdtError, Reportable};

    #[test]
    fn report_carries_kind_and_message() {
        let report = FdtError::Parse("bad row".into()).report();
        assert_eq!(report.kind, ErrorKind::Input);
        assert_eq!(report.message, "parse error: bad row");
    }

    #[test]
    fn kind_display_is_snake_case() {
        assert_eq!(ErrorKind::MissingReference.to_string(), "missing_reference");
    }
}
