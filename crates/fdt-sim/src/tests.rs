//! Unit tests for fdt-sim.

#[cfg(test)]
mod helpers {
    use fdt_core::{GeoPoint, RiskConfig};
    use fdt_graph::{FacilitySubtype, InfrastructureGraph};
    use fdt_risk::RiskEngine;

    /// Low zone draining into a mid zone, a dry hill zone, and a hospital
    /// reached from the low zone.
    pub fn basin() -> InfrastructureGraph {
        let mut g = InfrastructureGraph::new();
        g.add_zone("low", GeoPoint::new(7.010, 100.468), 4.0, 6_000, 0.0).unwrap();
        g.add_zone("mid", GeoPoint::new(7.005, 100.480), 8.0, 8_500, 0.0).unwrap();
        g.add_zone("hill", GeoPoint::new(7.045, 100.435), 15.0, 15_000, 0.0).unwrap();
        g.add_facility("hospital", FacilitySubtype::Hospital, GeoPoint::new(7.008, 100.474), 12.5, 0)
            .unwrap();
        g.add_drainage_edge("low", "mid", 100.0).unwrap();
        g.add_road_edge("low", "hospital", 2.5, 4.0).unwrap();
        g
    }

    pub fn engine() -> RiskEngine {
        RiskEngine::from_config(&RiskConfig::default())
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use fdt_core::{ErrorKind, Reportable, ScenarioConfig};
    use crate::{RainfallParams, ScenarioBuilder, ScenarioError};
    use super::helpers::{basin, engine};

    #[test]
    fn default_storm_has_48_steps() {
        let s = ScenarioBuilder::new(basin(), engine()).build().unwrap();
        assert_eq!(s.total_steps(), 48);
        assert_eq!(s.graph().unwrap().node_count(), 4);
    }

    #[test]
    fn rejects_zero_step_length() {
        let cfg = ScenarioConfig { time_step_minutes: 0, ..ScenarioConfig::default() };
        let err = ScenarioBuilder::new(basin(), engine()).config(cfg).build().err().unwrap();
        assert!(matches!(err, ScenarioError::Config(_)));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn rejects_storm_shorter_than_one_step() {
        let rain = RainfallParams { duration_hours: 0.1, ..RainfallParams::default() };
        assert!(ScenarioBuilder::new(basin(), engine()).rainfall(rain).build().is_err());
    }

    #[test]
    fn rejects_negative_rainfall() {
        let rain = RainfallParams { rainfall_mm_per_hour: -1.0, ..RainfallParams::default() };
        assert!(ScenarioBuilder::new(basin(), engine()).rainfall(rain).build().is_err());
    }

    #[test]
    fn rainfall_params_from_toml() {
        let p: RainfallParams = toml::from_str("rainfall_mm_per_hour = 80.0").unwrap();
        assert_eq!(p.rainfall_mm_per_hour, 80.0);
        assert_eq!(p.duration_hours, 12.0);
    }
}

// ── Depth model ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod depths {
    use fdt_core::ScenarioConfig;
    use crate::{RainfallParams, ScenarioBuilder};
    use super::helpers::{basin, engine};

    #[test]
    fn first_step_is_dry() {
        let s = ScenarioBuilder::new(basin(), engine()).build().unwrap();
        assert!(s.depths_at(0).values().all(|&d| d == 0.0));
        assert_eq!(s.rainfall_at(0), 25.0);
    }

    #[test]
    fn mid_storm_depths() {
        let s = ScenarioBuilder::new(basin(), engine()).build().unwrap();
        let d = s.depths_at(24);
        // rain 50 → base 1.0; factor (15 - elevation) / 15.
        assert!((d["low"] - 11.0 / 15.0).abs() < 1e-9);
        assert!((d["mid"] - 7.0 / 15.0).abs() < 1e-9);
        assert_eq!(d["hill"], 0.0);
        assert!(!d.contains_key("hospital"));
    }

    #[test]
    fn depth_is_capped_and_tide_scales() {
        let rain = RainfallParams { rainfall_mm_per_hour: 500.0, tide_factor: 2.0, ..RainfallParams::default() };
        let cfg = ScenarioConfig { max_water_depth_m: 3.0, ..ScenarioConfig::default() };
        let s = ScenarioBuilder::new(basin(), engine()).rainfall(rain).config(cfg).build().unwrap();
        assert_eq!(s.depths_at(40)["low"], 3.0);
    }
}

// ── Run loop ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run {
    use crate::{NoopObserver, ScenarioBuilder, ScenarioObserver, ScenarioSummary, StepReport};
    use super::helpers::{basin, engine};

    #[derive(Default)]
    struct Recorder {
        steps:    Vec<u32>,
        progress: Vec<f64>,
        low_risk: Vec<f64>,
        ended:    bool,
    }

    impl ScenarioObserver for Recorder {
        fn on_step(&mut self, r: &StepReport<'_>) {
            self.steps.push(r.step);
            self.progress.push(r.progress_percent);
            self.low_risk.push(r.risk.zone_risk_scores["low"]);
        }

        fn on_end(&mut self, summary: &ScenarioSummary) {
            assert_eq!(summary.steps as usize, self.steps.len());
            self.ended = true;
        }
    }

    #[test]
    fn observer_sees_every_step() {
        let mut s = ScenarioBuilder::new(basin(), engine()).build().unwrap();
        let mut rec = Recorder::default();
        let summary = s.run(&mut rec).unwrap();

        assert!(rec.ended);
        assert_eq!(rec.steps, (0..48).collect::<Vec<_>>());
        assert_eq!(*rec.progress.last().unwrap(), 100.0);
        assert!(rec.low_risk.iter().all(|r| (0.0..=100.0).contains(r)));
        // Risk in the low zone rises as water accumulates.
        assert!(rec.low_risk[40] > rec.low_risk[0]);
        assert!(summary.peak_zone_risk["low"] >= summary.peak_zone_risk["hill"]);
        assert!(summary.peak_depth_m > 0.0);
    }

    #[test]
    fn engine_keeps_last_depths() {
        let mut s = ScenarioBuilder::new(basin(), engine()).build().unwrap();
        let summary = s.run(&mut NoopObserver).unwrap();
        let last = s.depths_at(47);
        let graph = s.graph().unwrap();
        assert_eq!(graph.node_by_id("low").unwrap().current_depth_m, last["low"]);
        let final_result = summary.final_result.unwrap();
        assert_eq!(graph.node_by_id("low").unwrap().risk_score, final_result.zone_risk_scores["low"]);
        let engine = s.into_engine();
        assert!(engine.graph().is_some());
    }
}

mod quick {
    use fdt_core::{ErrorKind, Reportable, ScenarioConfig};
    use crate::{DepthCategory, FloodSeverity, Priority, QuickZone, RainfallParams, quick_assess};

    fn zone(id: &str, base_depth_m: f64, vulnerability: f64, population: u32) -> QuickZone {
        QuickZone { id: id.into(), base_depth_m, vulnerability, population }
    }

    fn storm(rainfall_mm_per_hour: f64, duration_hours: f64) -> RainfallParams {
        RainfallParams { rainfall_mm_per_hour, duration_hours, ..Default::default() }
    }

    #[test]
    fn heavy_storm_is_severe() {
        let zones = [zone("river", 0.5, 1.0, 6000), zone("town", 0.3, 0.5, 25000), zone("ridge", 0.0, 0.1, 900)];
        let a = quick_assess(&storm(200.0, 3.0), &zones, &ScenarioConfig::default()).unwrap();

        assert_eq!(a.summary.total_rainfall_mm, 600.0);
        assert_eq!(a.summary.excess_water_mm, 150.0);
        assert_eq!(a.summary.flood_factor, 0.75);
        assert_eq!(a.summary.severity, FloodSeverity::Severe);
        assert_eq!(a.summary.peak_time_hours, 2.1);
        assert_eq!(a.summary.estimated_duration_hours, 4.5);

        // ridge: 0.15 m stays below the affected line.
        let ids: Vec<_> = a.zones_affected.iter().map(|z| z.zone_id.as_str()).collect();
        assert_eq!(ids, ["river", "town"]);
        let river = &a.zones_affected[0];
        assert_eq!(river.predicted_depth_m, 2.0);
        assert_eq!(river.depth_category, DepthCategory::High);
        assert_eq!(river.risk_score, 90.0);
        assert_eq!(river.affected_population, 6000);
        let town = &a.zones_affected[1];
        assert_eq!(town.depth_category, DepthCategory::Medium);
        assert_eq!(town.risk_score, 61.5);
        assert!((17_499..=17_500).contains(&town.affected_population));
        assert_eq!(
            a.total_affected_population,
            u64::from(river.affected_population + town.affected_population)
        );

        let actions: Vec<_> = a.recommendations.iter().map(|r| r.action).collect();
        assert_eq!(actions, ["Immediate evacuation", "Close roads", "Activate shelters"]);
        assert_eq!(a.recommendations[0].message, "Evacuate river immediately");
        assert!(a.recommendations.windows(2).all(|w| w[0].priority <= w[1].priority));
    }

    #[test]
    fn moderate_storm_prepares_evacuation() {
        // 400 mm against 300 mm of drainage.
        let a = quick_assess(&storm(200.0, 2.0), &[zone("river", 0.5, 1.0, 100)], &ScenarioConfig::default())
            .unwrap();
        assert_eq!(a.summary.flood_factor, 0.5);
        assert_eq!(a.summary.severity, FloodSeverity::Moderate);
        let recs: Vec<_> = a.recommendations.iter().map(|r| (r.priority, r.action)).collect();
        assert_eq!(
            recs,
            [
                (Priority::High, "Prepare evacuation"),
                (Priority::Medium, "Monitor roads"),
                (Priority::Standard, "Activate shelters"),
            ]
        );
        assert_eq!(a.recommendations[0].message, "Prepare evacuation for river");
    }

    #[test]
    fn drained_storm_leaves_only_standing_water() {
        let zones = [zone("pond", 0.5, 1.0, 1000), zone("street", 0.3, 1.0, 1000)];
        let a = quick_assess(&storm(100.0, 12.0), &zones, &ScenarioConfig::default()).unwrap();

        assert_eq!(a.summary.excess_water_mm, 0.0);
        assert_eq!(a.summary.flood_factor, 0.0);
        assert_eq!(a.summary.severity, FloodSeverity::Minor);
        assert_eq!(a.summary.peak_time_hours, 8.4);
        assert_eq!(a.zones_affected.len(), 1);
        assert_eq!(a.zones_affected[0].zone_id, "pond");
        assert_eq!(a.zones_affected[0].depth_category, DepthCategory::Low);
        assert_eq!(a.zones_affected[0].affected_population, 333);
        assert_eq!(a.recommendations.len(), 1);
        assert_eq!(a.recommendations[0].priority, Priority::Standard);
        assert_eq!(a.recommendations[0].message, "Ready shelters to receive up to 333 evacuees");
    }

    #[test]
    fn depth_capped_and_peak_bounded() {
        let a = quick_assess(&storm(400.0, 30.0), &[zone("basin", 2.5, 1.0, 10)], &ScenarioConfig::default())
            .unwrap();
        assert_eq!(a.summary.flood_factor, 1.0);
        assert_eq!(a.summary.peak_time_hours, 12.0);
        assert_eq!(a.zones_affected[0].predicted_depth_m, 3.0);
        assert_eq!(a.zones_affected[0].risk_score, 100.0);
        assert_eq!(a.zones_affected[0].affected_population, 10);
    }

    #[test]
    fn no_zones_no_shelter_call() {
        let a = quick_assess(&storm(200.0, 3.0), &[], &ScenarioConfig::default()).unwrap();
        assert_eq!(a.total_affected_population, 0);
        let actions: Vec<_> = a.recommendations.iter().map(|r| r.action).collect();
        assert_eq!(actions, ["Immediate evacuation", "Close roads"]);
        assert_eq!(a.recommendations[0].message, "Evacuate low-lying zones immediately");
    }

    #[test]
    fn invalid_inputs_rejected() {
        let cfg = ScenarioConfig::default();
        for rain in [storm(f64::NAN, 3.0), storm(-1.0, 3.0), storm(50.0, f64::INFINITY), storm(50.0, -2.0)] {
            let err = quick_assess(&rain, &[], &cfg).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
        let leaky = ScenarioConfig { drainage_capacity_mm_per_hour: -5.0, ..ScenarioConfig::default() };
        let err = quick_assess(&storm(50.0, 3.0), &[], &leaky).unwrap_err();
        assert!(err.to_string().contains("drainage_capacity_mm_per_hour"));
    }
}
