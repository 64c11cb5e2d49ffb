//! Site Scorer - Main coordinator for suitability analysis
//!
//! Runs the pipeline for one polygon and energy type:
//!
//! 1. Grid generation over the polygon
//! 2. Terrain derivatives and energy potential (chunked, parallel per point)
//! 3. Raw factor assembly
//! 4. Min-max normalization per factor
//! 5. Constraint mask
//! 6. Weighted combination
//! 7. Ranking and report
//!
//! Each stage consumes the whole output of the previous one. Progress is
//! reported after every chunk of step 2, and cancellation is honoured between
//! chunks.
//!
//! `compare_energy_types` runs the pipeline once per energy type and classifies
//! every grid point (best type, suitable types, multi-source).

use crate::classification::{class_counts, classify_grid, PointClassification, SiteClass};
use crate::config::AnalysisConfig;
use crate::constraints::{apply_mask, constraint_mask, ConstraintConfig, SiteContext};
use crate::combination::{combine, SuitabilityScore};
use crate::data::{LayerName, LayerStore};
use crate::error::{Result, SitingError};
use crate::explanation::generator::{ReportGenerator, RunStats};
use crate::explanation::types::AnalysisReport;
use crate::factors::{EnergyType, FactorBundle, WeightTable};
use crate::geometry::{GridSpec, Point, Polygon};
use crate::layer::{GridFrame, Layer};
use crate::potentials::{calculate_potential, PotentialInputs, PotentialResult};
use crate::progress::{CancellationToken, ProgressCallback, ProgressTracker};
use crate::ranking::{rank_candidates, CandidateSpot, SiteAttributes};
use crate::terrain::TerrainDerivatives;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// One analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub polygon: Polygon,
    pub energy_type: EnergyType,
    /// Overrides the configured top-N
    #[serde(default)]
    pub top_n: Option<usize>,
    /// Overrides the configured constraints for this energy type
    #[serde(default)]
    pub constraints: Option<ConstraintConfig>,
    /// Overrides the configured weights for this energy type
    #[serde(default)]
    pub weights: Option<WeightTable>,
}

impl AnalysisRequest {
    pub fn new(polygon: Polygon, energy_type: EnergyType) -> Self {
        Self {
            polygon,
            energy_type,
            top_n: None,
            constraints: None,
            weights: None,
        }
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }

    pub fn with_constraints(mut self, constraints: ConstraintConfig) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn with_weights(mut self, weights: WeightTable) -> Self {
        self.weights = Some(weights);
        self
    }
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub candidates: Vec<CandidateSpot>,
    /// Score of every scored grid point (heat map), in grid order
    pub scores: Layer<SuitabilityScore>,
    pub grid: Vec<Point>,
}

/// Side-by-side run of every energy type over one polygon
#[derive(Debug, Clone)]
pub struct EnergyComparison {
    pub reports: Vec<AnalysisReport>,
    /// Highest mean candidate suitability among types with candidates
    pub best: Option<EnergyType>,
    /// Per-point classification over the shared grid, in grid order
    pub points: Vec<PointClassification>,
}

impl EnergyComparison {
    pub fn multi_source_points(&self) -> impl Iterator<Item = &PointClassification> + '_ {
        self.points.iter().filter(|p| p.is_multi_source())
    }

    pub fn class_counts(&self) -> BTreeMap<SiteClass, usize> {
        class_counts(&self.points)
    }
}

/// Main site scorer
pub struct SiteScorer {
    config: AnalysisConfig,
}

impl SiteScorer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: AnalysisConfig::default(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the full pipeline
    pub fn analyze(&self, store: &LayerStore, request: &AnalysisRequest) -> Result<AnalysisOutcome> {
        self.analyze_with(store, request, None, &CancellationToken::new())
    }

    /// Run the full pipeline with progress reporting and cancellation
    pub fn analyze_with(
        &self,
        store: &LayerStore,
        request: &AnalysisRequest,
        progress: Option<&ProgressCallback>,
        cancel: &CancellationToken,
    ) -> Result<AnalysisOutcome> {
        let start = Instant::now();
        let energy_type = request.energy_type;

        // Resolve per-run settings
        let weights = request
            .weights
            .clone()
            .unwrap_or_else(|| self.config.weights_for(energy_type));
        weights.validate()?;
        let constraints = request
            .constraints
            .clone()
            .unwrap_or_else(|| self.config.constraints_for(energy_type));
        let top_n = request.top_n.unwrap_or(self.config.top_n);

        // 1. Grid
        let grid = GridSpec::new(request.polygon.clone(), self.config.grid_step)?;
        let frame = grid.frame();
        let points = grid.points();
        tracing::info!(
            energy = %energy_type,
            grid_points = points.len(),
            step = self.config.grid_step,
            "Starting site analysis"
        );

        // 2. Terrain derivatives and potential, chunk by chunk
        let t0 = Instant::now();
        let (terrain, potential) =
            self.per_point_stage(store, energy_type, &points, frame, progress, cancel)?;
        tracing::debug!(
            slope_points = terrain.len(),
            potential_points = potential.layer.len(),
            skipped = potential.skipped,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Per-point stage complete"
        );

        let scores = if potential.layer.is_empty() {
            tracing::warn!(energy = %energy_type, "Potential layer is empty; no points can be scored");
            Layer::new(format!("{}_suitability", energy_type.as_str()), frame)
        } else {
            // 3-6. Factors, normalization, constraints, combination
            let inputs = self.inputs(store, &terrain, &points, frame);
            let bundle = FactorBundle::assemble(&weights, &inputs, &potential).normalized();

            let site = SiteContext {
                elevation: store.layer(LayerName::Elevation),
                slope: Some(&terrain.slope),
                land_cover: store.land_cover(),
            };
            let mask = constraint_mask(&points, &constraints, &site, frame);
            let constrained = bundle.map_layers(|_, layer| apply_mask(layer, &mask));

            combine(&constrained, &weights)
        };

        // 7. Ranking and report
        let candidates: Vec<CandidateSpot> = rank_candidates(scores.values(), top_n)
            .into_iter()
            .map(|spot| {
                let attributes = SiteAttributes::from_store(store, spot.point());
                spot.with_attributes(attributes)
            })
            .collect();

        let stats = RunStats {
            grid_point_count: points.len(),
            scored_point_count: scores.len(),
            elapsed: start.elapsed(),
        };
        let report = ReportGenerator::generate(&candidates, energy_type, &request.polygon, stats);

        tracing::info!(
            energy = %energy_type,
            scored = scores.len(),
            candidates = candidates.len(),
            elapsed_ms = report.processing_time_ms,
            "Site analysis complete"
        );

        Ok(AnalysisOutcome {
            report,
            candidates,
            scores,
            grid: points,
        })
    }

    /// Run every energy type with its configured defaults
    pub fn compare_energy_types(&self, store: &LayerStore, polygon: &Polygon) -> Result<EnergyComparison> {
        let mut reports = Vec::with_capacity(EnergyType::ALL.len());
        let mut layers = Vec::with_capacity(EnergyType::ALL.len());
        let mut grid = Vec::new();
        for energy_type in EnergyType::ALL {
            let request = AnalysisRequest::new(polygon.clone(), energy_type);
            let outcome = self.analyze(store, &request)?;
            reports.push(outcome.report);
            layers.push((energy_type, outcome.scores));
            // Same polygon and step: every run shares one grid
            grid = outcome.grid;
        }

        let mut best: Option<&AnalysisReport> = None;
        for report in reports.iter().filter(|r| r.candidate_count > 0) {
            if best.map_or(true, |b| report.average_suitability > b.average_suitability) {
                best = Some(report);
            }
        }
        let best = best.map(|r| r.energy_type);

        let points = classify_grid(&grid, &layers, &self.config.thresholds);
        let multi_source = points.iter().filter(|p| p.is_multi_source()).count();

        tracing::info!(best = ?best, grid_points = points.len(), multi_source, "Energy type comparison complete");
        Ok(EnergyComparison { reports, best, points })
    }

    fn inputs<'a>(
        &self,
        store: &'a LayerStore,
        terrain: &'a TerrainDerivatives,
        points: &'a [Point],
        frame: GridFrame,
    ) -> PotentialInputs<'a> {
        PotentialInputs {
            points,
            store,
            terrain,
            frame,
            latitude: self.config.reference_latitude(),
            hydro_strategy: self.config.hydro_strategy,
        }
    }

    fn per_point_stage(
        &self,
        store: &LayerStore,
        energy_type: EnergyType,
        points: &[Point],
        frame: GridFrame,
        progress: Option<&ProgressCallback>,
        cancel: &CancellationToken,
    ) -> Result<(TerrainDerivatives, PotentialResult)> {
        let tracker = ProgressTracker::new(points.len(), progress);
        let elevation = store.layer(LayerName::Elevation);

        let mut terrain = TerrainDerivatives::empty(frame);
        let mut potential = PotentialResult::empty(energy_type, frame, 0);

        for chunk in points.chunks(self.config.chunk_size) {
            if cancel.is_cancelled() {
                tracing::info!(processed = tracker.processed(), total = points.len(), "Analysis cancelled");
                return Err(SitingError::Cancelled);
            }

            let chunk_terrain = match elevation {
                Some(layer) => TerrainDerivatives::compute(layer, chunk, self.config.cell_size, frame),
                None => TerrainDerivatives::empty(frame),
            };
            let chunk_potential = calculate_potential(energy_type, &self.inputs(store, &chunk_terrain, chunk, frame));

            terrain.extend(chunk_terrain);
            potential.extend(chunk_potential);
            tracker.advance(chunk.len());
        }

        Ok((terrain, potential))
    }
}
