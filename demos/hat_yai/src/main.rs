//! hat_yai — storm replay and evacuation plan for Hat Yai, Songkhla.
//!
//! Builds the five-zone infrastructure graph around the U-Tapao canal,
//! replays a 12-hour monsoon storm through the risk engine, then plans an
//! evacuation against the wettest flood state the storm produced.
//!
//! ```text
//! cargo run -p hat_yai [-- path/to/engine.toml]
//! ```

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use fdt_core::telemetry::init_tracing;
use fdt_core::{DepthMap, EngineConfig, SimRng};
use fdt_evac::{
    ActionSelection, ActorCritic, EpisodeSummary, EvacuationEnv, EvacuationPlan,
    EvacuationPlanner, PlanningRequest, RouteRecord, ShelterCapacityOverview, ShelterRecord,
    ShelterRecommendation, ZoneRecord, quick_recommendations, read_records, run_episode,
};
use fdt_graph::{GraphRecords, InfrastructureGraph};
use fdt_risk::{RiskEngine, RiskPropagationResult};
use fdt_sim::{
    QuickAssessment, QuickZone, RainfallParams, ScenarioBuilder, ScenarioObserver, ScenarioSummary,
    StepReport, quick_assess,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const REPORT_EVERY_STEPS: u32   = 4; // hourly at 15-minute steps
const NEAREST_SHELTERS:   usize = 2;

// ── Hat Yai data ──────────────────────────────────────────────────────────────

const ZONES_CSV: &str = "\
id,lat,lon,elevation,population,depth\n\
zone_u_tapao,7.010,100.468,4.0,6000,\n\
zone_hatyai_nai,7.005,100.480,6.0,25000,\n\
zone_klong_hae,7.025,100.460,8.0,8500,\n\
zone_khohong,7.000,100.505,10.0,12000,\n\
zone_khuan_lang,7.045,100.435,15.0,15000,\n\
";

const FACILITIES_CSV: &str = "\
id,subtype,lat,lon,elevation,capacity\n\
hospital_hatyai,hospital,7.0086,100.4747,12.5,800\n\
hospital_songklanagarind,hospital,7.0050,100.5020,8.2,1200\n\
shelter_a,shelter,7.0300,100.4400,18.5,2000\n\
shelter_b,shelter,6.9850,100.4900,14.0,1500\n\
power_main,power_station,7.0150,100.4580,15.0,\n\
";

// Roads chain the zones along the canal and reach each facility from its
// nearest zone; drainage runs downstream towards the city centre.
const EDGES_CSV: &str = "\
kind,source,target,distance,flow_capacity,min_elevation\n\
road,zone_khuan_lang,zone_klong_hae,2.5,,8.0\n\
road,zone_klong_hae,zone_u_tapao,2.5,,4.0\n\
road,zone_u_tapao,zone_hatyai_nai,2.5,,4.0\n\
road,zone_hatyai_nai,zone_khohong,2.5,,6.0\n\
road,zone_u_tapao,hospital_hatyai,,,4.0\n\
road,zone_khohong,hospital_songklanagarind,,,8.2\n\
road,zone_khuan_lang,shelter_a,,,15.0\n\
road,zone_hatyai_nai,shelter_b,,,6.0\n\
road,zone_klong_hae,power_main,,,8.0\n\
drainage,zone_khuan_lang,zone_klong_hae,,100,\n\
drainage,zone_klong_hae,zone_u_tapao,,100,\n\
drainage,zone_u_tapao,zone_hatyai_nai,,100,\n\
drainage,zone_hatyai_nai,zone_khohong,,100,\n\
";

const SHELTERS_CSV: &str = "\
id,lat,lon,capacity,current_occupancy,operational\n\
shelter_a,7.0300,100.4400,2000,450,true\n\
shelter_b,6.9850,100.4900,1500,280,true\n\
shelter_c,7.0100,100.4650,1000,720,true\n\
";

const ROUTES_CSV: &str = "\
id,origin_zone_id,status,passable,current_water_depth,length_km,estimated_time_minutes,risk_score\n\
route_north_highway,zone_klong_hae,open,true,0.1,8.5,25,15\n\
route_east_bypass,zone_hatyai_nai,at_risk,true,0.35,12.0,35,55\n\
route_central,zone_hatyai_nai,closed,false,0.8,5.0,20,92\n\
route_south,zone_u_tapao,open,true,0.05,10.0,30,20\n\
";

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs hourly progress and keeps the wettest flood state seen.
#[derive(Default)]
struct StormObserver {
    peak_total_depth: f64,
    peak_depths:      DepthMap,
    peak_step:        u32,
}

impl ScenarioObserver for StormObserver {
    fn on_step(&mut self, report: &StepReport<'_>) {
        let total: f64 = report.flood_depths.values().sum();
        if total > self.peak_total_depth {
            self.peak_total_depth = total;
            self.peak_depths = report.flood_depths.clone();
            self.peak_step = report.step;
        }
        if report.step % REPORT_EVERY_STEPS == 0 {
            info!(
                step = report.step,
                progress_percent = report.progress_percent,
                rainfall_mm_h = report.rainfall_mm_per_hour,
                warnings = report.risk.critical_warnings.len(),
                "storm progress"
            );
        }
    }

    fn on_end(&mut self, summary: &ScenarioSummary) {
        info!(
            steps = summary.steps,
            peak_step = self.peak_step,
            peak_depth_m = summary.peak_depth_m,
            "storm replay finished"
        );
    }
}

// Standing water and exposure per zone for the drainage heuristic.
const QUICK_ZONES_JSON: &str = r#"[
    { "id": "zone_u_tapao",     "base_depth_m": 0.5,  "vulnerability": 1.0, "population": 6000 },
    { "id": "zone_hatyai_nai",  "base_depth_m": 0.3,  "vulnerability": 0.8, "population": 25000 },
    { "id": "zone_klong_hae",   "base_depth_m": 0.2,  "vulnerability": 0.7, "population": 8500 },
    { "id": "zone_khohong",     "base_depth_m": 0.15, "vulnerability": 0.6, "population": 12000 },
    { "id": "zone_khuan_lang",  "base_depth_m": 0.1,  "vulnerability": 0.5, "population": 15000 }
]"#;

// ── Report ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Report {
    quick:           QuickAssessment,
    storm:           ScenarioSummary,
    peak_step:       u32,
    peak_risk:       RiskPropagationResult,
    plan:            EvacuationPlan,
    rollout:         EpisodeSummary,
    nearest_shelter: Vec<(String, Vec<ShelterRecommendation>)>,
    capacity:        ShelterCapacityOverview,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(Path::new(&path))?,
        None => EngineConfig::default(),
    };
    init_tracing(&config.logging);

    // ── Graph ─────────────────────────────────────────────────────────────
    let records = GraphRecords::from_readers(
        Cursor::new(ZONES_CSV),
        Cursor::new(FACILITIES_CSV),
        Cursor::new(EDGES_CSV),
    )?;
    let load = InfrastructureGraph::from_records(&records)?;
    info!(
        nodes = load.graph.node_count(),
        edges = load.graph.edge_count(),
        rejected = load.rejected_edges.len(),
        "graph ready"
    );

    // ── Quick assessment ──────────────────────────────────────────────────
    let rainfall = RainfallParams { rainfall_mm_per_hour: 80.0, ..RainfallParams::default() };
    let quick_zones: Vec<QuickZone> = serde_json::from_str(QUICK_ZONES_JSON)?;
    let quick = quick_assess(&rainfall, &quick_zones, &config.scenario)?;
    info!(
        flood_factor = quick.summary.flood_factor,
        affected = quick.total_affected_population,
        "quick assessment"
    );

    // ── Storm replay ──────────────────────────────────────────────────────
    let engine = RiskEngine::from_config(&config.risk);
    let mut scenario = ScenarioBuilder::new(load.graph, engine)
        .rainfall(rainfall)
        .config(config.scenario.clone())
        .build()?;

    let started = Instant::now();
    let mut observer = StormObserver::default();
    let storm = scenario.run(&mut observer)?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "scenario wall time");

    // Re-score the peak flood state for the report.
    let mut engine = scenario.into_engine();
    let peak_risk = engine.propagate(&observer.peak_depths, 24)?;

    // ── Evacuation ────────────────────────────────────────────────────────
    let zones: Vec<ZoneRecord> = records
        .zones
        .iter()
        .map(|z| ZoneRecord { id: z.id.clone(), lat: z.lat, lon: z.lon, population: z.population })
        .collect();
    let shelters: Vec<ShelterRecord> = read_records(Cursor::new(SHELTERS_CSV))?;
    let routes: Vec<RouteRecord> = read_records(Cursor::new(ROUTES_CSV))?;

    let policy = ActorCritic::from_config(&config.evacuation, zones.len() * shelters.len());
    let planner = EvacuationPlanner::with_config(policy, config.evacuation.clone());
    let request = PlanningRequest {
        flood_state: observer.peak_depths.clone(),
        zones:       zones.clone(),
        shelters:    shelters.clone(),
        routes:      routes.clone(),
        shelter_allow_list: None,
    };
    let plan = planner.plan(&request);

    let mut env = EvacuationEnv::with_config(zones.clone(), shelters.clone(), routes, &config.evacuation);
    env.reset();
    env.update_flood_state(&observer.peak_depths);
    let mut rng = SimRng::new(config.evacuation.seed);
    let rollout = run_episode(&mut env, planner.policy(), ActionSelection::Greedy, &mut rng);

    let nearest_shelter = zones
        .iter()
        .map(|z| (z.id.clone(), quick_recommendations(z, &shelters, NEAREST_SHELTERS)))
        .collect();

    let report = Report {
        quick,
        storm,
        peak_step: observer.peak_step,
        peak_risk,
        plan,
        rollout,
        nearest_shelter,
        capacity: ShelterCapacityOverview::from_shelters(&shelters),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
