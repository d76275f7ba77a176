//! `RiskEngine` — binds parameters and (optionally) one owned graph.
//!
//! # Ownership
//!
//! The engine owns its attached graph.  [`RiskEngine::propagate`] takes
//! `&mut self`, so two overlapping calls on one engine cannot race on node
//! depths; callers sharing an engine across threads wrap it in a `Mutex`.
//! Callers that want to keep their own graph untouched use
//! [`RiskEngine::propagate_snapshot`], which works on a private copy.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, warn};

use fdt_core::{NodeIdx, ParamFallback, RiskConfig};
use fdt_graph::{DepthMap, InfrastructureGraph, NodeKind};
use fdt_nn::{ParamSet, load_params};

use crate::model::forward;
use crate::result::{CriticalWarning, RiskPropagationResult, simulate_cascade};
use crate::{GcnParams, RiskError, RiskResult};

/// Where the active parameters came from.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamSource {
    /// Trained weights read from this file.
    Loaded(PathBuf),
    /// Passed in directly via [`RiskEngine::new`].
    Provided,
    /// Built-in hydraulic prior.
    Prior,
    /// Xavier initialisation from this seed.
    Seeded(u64),
}

impl ParamSource {
    /// `true` when running on fallback parameters.
    pub fn is_degraded(&self) -> bool {
        matches!(self, ParamSource::Prior | ParamSource::Seeded(_))
    }
}

pub struct RiskEngine {
    params:             GcnParams,
    source:             ParamSource,
    warning_threshold:  f64,
    critical_threshold: f64,
    graph:              Option<InfrastructureGraph>,
}

impl RiskEngine {
    /// Engine over an explicit parameter set.  Fails on inconsistent shapes.
    pub fn new(params: GcnParams) -> RiskResult<Self> {
        params.validate()?;
        let defaults = RiskConfig::default();
        Ok(Self {
            params,
            source:             ParamSource::Provided,
            warning_threshold:  defaults.warning_threshold,
            critical_threshold: defaults.critical_threshold,
            graph:              None,
        })
    }

    /// Engine configured from `cfg`.  Never fails: when `params_path` is
    /// unset or cannot be loaded the configured fallback is used and a
    /// warning is logged.
    pub fn from_config(cfg: &RiskConfig) -> Self {
        let (params, source) = match &cfg.params_path {
            Some(path) => match load_params::<GcnParams>(path) {
                Ok(p) => {
                    info!(
                        path = %path.display(),
                        hidden = p.hidden_channels(),
                        rounds = p.round_count(),
                        "loaded risk model parameters"
                    );
                    (p, ParamSource::Loaded(path.clone()))
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "risk model parameters unavailable; using fallback");
                    fallback(cfg)
                }
            },
            None => {
                debug!("no risk model parameter file configured; using fallback");
                fallback(cfg)
            }
        };

        Self {
            params,
            source,
            warning_threshold:  cfg.warning_threshold,
            critical_threshold: cfg.critical_threshold,
            graph:              None,
        }
    }

    /// Override the warning thresholds (defaults 70 / 85).
    pub fn with_thresholds(mut self, warning: f64, critical: f64) -> Self {
        self.warning_threshold = warning;
        self.critical_threshold = critical;
        self
    }

    pub fn params(&self) -> &GcnParams {
        &self.params
    }

    pub fn source(&self) -> &ParamSource {
        &self.source
    }

    // ── Graph binding ─────────────────────────────────────────────────────

    /// Attach `graph`, returning the previously attached one.
    pub fn set_graph(&mut self, graph: InfrastructureGraph) -> Option<InfrastructureGraph> {
        self.graph.replace(graph)
    }

    pub fn graph(&self) -> Option<&InfrastructureGraph> {
        self.graph.as_ref()
    }

    pub fn take_graph(&mut self) -> Option<InfrastructureGraph> {
        self.graph.take()
    }

    // ── Propagation ───────────────────────────────────────────────────────

    /// Merge `depths` into the attached graph, score every node, write the
    /// scores back onto the nodes, and project the cascade over
    /// `hours_ahead` hours.
    ///
    /// Fails with [`RiskError::NotConfigured`] when no graph is attached.
    pub fn propagate(&mut self, depths: &DepthMap, hours_ahead: u32) -> RiskResult<RiskPropagationResult> {
        let started = Instant::now();
        let mut graph = self.graph.take().ok_or(RiskError::NotConfigured)?;

        graph.update_depths(depths);
        let scores = self.score_graph(&graph);
        let indices: Vec<NodeIdx> = graph.nodes().iter().map(|n| n.idx).collect();
        for (idx, &score) in indices.into_iter().zip(&scores) {
            graph.set_risk_score(idx, score);
        }
        let result = self.assemble(&graph, &scores, depths, hours_ahead);
        self.graph = Some(graph);

        debug!(
            nodes = scores.len(),
            warnings = result.critical_warnings.len(),
            elapsed_ms = started.elapsed().as_secs_f64() * 1e3,
            "risk propagation complete"
        );
        Ok(result)
    }

    /// Like [`propagate`](Self::propagate) but over a private copy of
    /// `graph`; neither the engine nor `graph` is modified.
    pub fn propagate_snapshot(
        &self,
        graph:       &InfrastructureGraph,
        depths:      &DepthMap,
        hours_ahead: u32,
    ) -> RiskPropagationResult {
        let mut snapshot = graph.clone();
        snapshot.update_depths(depths);
        let scores = self.score_graph(&snapshot);
        self.assemble(&snapshot, &scores, depths, hours_ahead)
    }

    /// Score every node of `graph` as it stands, in insertion order.
    ///
    /// Pure: no randomness and no mutation.  Every score is in `[0, 100]`.
    pub fn score_graph(&self, graph: &InfrastructureGraph) -> Vec<f64> {
        forward(&self.params, &graph.node_features(), &graph.in_adjacency())
    }

    fn assemble(
        &self,
        graph:       &InfrastructureGraph,
        scores:      &[f64],
        depths:      &DepthMap,
        hours_ahead: u32,
    ) -> RiskPropagationResult {
        let mut result = RiskPropagationResult::default();

        for (node, &score) in graph.nodes().iter().zip(scores) {
            match node.kind {
                NodeKind::FloodZone => {
                    result.zone_risk_scores.insert(node.id.clone(), score);
                }
                NodeKind::Facility(subtype) => {
                    result.facility_risk_scores.insert(node.id.clone(), score);
                    if score > self.warning_threshold {
                        result.critical_warnings.push(CriticalWarning::new(
                            &node.id,
                            subtype,
                            score,
                            self.critical_threshold,
                        ));
                    }
                }
            }
        }

        // Stable: equal scores keep insertion order.
        result.critical_warnings.sort_by(|a, b| b.score.total_cmp(&a.score));
        result.cascade_timeline = simulate_cascade(depths, hours_ahead);
        result
    }
}

fn fallback(cfg: &RiskConfig) -> (GcnParams, ParamSource) {
    match cfg.fallback {
        ParamFallback::Prior => (GcnParams::prior(cfg.hidden_channels, cfg.rounds), ParamSource::Prior),
        ParamFallback::Seeded => (
            GcnParams::seeded(cfg.hidden_channels, cfg.rounds, cfg.seed),
            ParamSource::Seeded(cfg.seed),
        ),
    }
}
