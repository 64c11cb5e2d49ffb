use crate::factors::EnergyType;
use crate::geometry::Polygon;
use crate::ranking::CandidateSpot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall suitability band from the mean candidate score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuitabilityBand {
    High,     // mean > 0.7
    Moderate, // mean > 0.4
    Low,
}

impl SuitabilityBand {
    pub fn from_mean(mean: f64) -> Self {
        if mean > 0.7 {
            SuitabilityBand::High
        } else if mean > 0.4 {
            SuitabilityBand::Moderate
        } else {
            SuitabilityBand::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SuitabilityBand::High => "High",
            SuitabilityBand::Moderate => "Moderate",
            SuitabilityBand::Low => "Low",
        }
    }

    /// Recommendation sentence for this band
    pub fn recommendation(&self, energy_type: EnergyType) -> String {
        match self {
            SuitabilityBand::High => format!("High overall suitability for {} energy", energy_type),
            SuitabilityBand::Moderate => format!("Moderate suitability for {} energy", energy_type),
            SuitabilityBand::Low => "Consider alternative energy types or expand search area".to_string(),
        }
    }
}

/// Summary of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub energy_type: EnergyType,
    pub polygon: Polygon,
    /// Shoelace area in coordinate units squared
    pub total_area: f64,
    pub grid_point_count: usize,
    pub scored_point_count: usize,
    pub candidate_count: usize,
    /// 0 when there are no candidates
    pub average_suitability: f64,
    /// 0 when there are no candidates
    pub max_suitability: f64,
    pub band: SuitabilityBand,
    pub processing_time_ms: u64,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Report plus its ranked candidates, as exported
#[derive(Debug, Clone, Serialize)]
pub struct SiteAnalysis<'a> {
    pub report: &'a AnalysisReport,
    pub candidates: &'a [CandidateSpot],
}
