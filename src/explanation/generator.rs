use crate::explanation::types::{AnalysisReport, SuitabilityBand};
use crate::factors::EnergyType;
use crate::geometry::{polygon_area, Polygon};
use crate::ranking::CandidateSpot;
use chrono::Utc;
use std::time::Duration;

pub const NO_CANDIDATES_MESSAGE: &str = "No suitable locations found within the specified area";

/// Run statistics the report is built from
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    pub grid_point_count: usize,
    pub scored_point_count: usize,
    pub elapsed: Duration,
}

/// Builds the analysis report from ranked candidates
pub struct ReportGenerator;

impl ReportGenerator {
    /// Generate the report for one run
    ///
    /// Takes:
    /// - candidates: ranked candidate list (best first)
    /// - energy_type: technology analysed
    /// - polygon: area of interest (area is reported, 0 if degenerate)
    /// - stats: grid size, scored points, elapsed time
    pub fn generate(
        candidates: &[CandidateSpot],
        energy_type: EnergyType,
        polygon: &Polygon,
        stats: RunStats,
    ) -> AnalysisReport {
        let count = candidates.len();
        let (average, max) = if count == 0 {
            (0.0, 0.0)
        } else {
            let sum: f64 = candidates.iter().map(CandidateSpot::suitability).sum();
            let max = candidates
                .iter()
                .map(CandidateSpot::suitability)
                .fold(f64::NEG_INFINITY, f64::max);
            (sum / count as f64, max)
        };
        let band = SuitabilityBand::from_mean(average);

        let report = AnalysisReport {
            energy_type,
            polygon: polygon.clone(),
            total_area: polygon_area(polygon).unwrap_or(0.0),
            grid_point_count: stats.grid_point_count,
            scored_point_count: stats.scored_point_count,
            candidate_count: count,
            average_suitability: average,
            max_suitability: max,
            band,
            processing_time_ms: stats.elapsed.as_millis() as u64,
            recommendations: Self::recommendations(candidates, energy_type, band),
            generated_at: Utc::now(),
        };

        tracing::info!(
            energy = %energy_type,
            candidates = count,
            average,
            max,
            "Report generated"
        );

        report
    }

    /// Recommendation lines
    ///
    /// - no candidates: a single "nothing found" line
    /// - otherwise: best location, candidate count (when > 1), band sentence
    pub fn recommendations(
        candidates: &[CandidateSpot],
        energy_type: EnergyType,
        band: SuitabilityBand,
    ) -> Vec<String> {
        let Some(best) = candidates.first() else {
            return vec![NO_CANDIDATES_MESSAGE.to_string()];
        };

        let mut lines = Vec::with_capacity(3);
        let p = best.point();
        lines.push(format!(
            "Best location: {:.1}, {:.1} ({:.1}% suitability)",
            p.x,
            p.y,
            best.suitability() * 100.0
        ));
        if candidates.len() > 1 {
            lines.push(format!("{} suitable locations identified", candidates.len()));
        }
        lines.push(band.recommendation(energy_type));
        lines
    }
}
