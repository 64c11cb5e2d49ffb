use crate::explanation::types::{AnalysisReport, SiteAnalysis};
use crate::ranking::CandidateSpot;
use serde_json;

/// JSON formatter for analysis results
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format report and candidates as pretty-printed JSON
    pub fn format(report: &AnalysisReport, candidates: &[CandidateSpot]) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&SiteAnalysis { report, candidates })
    }

    /// Format report and candidates as compact JSON (no whitespace)
    pub fn format_compact(report: &AnalysisReport, candidates: &[CandidateSpot]) -> Result<String, serde_json::Error> {
        serde_json::to_string(&SiteAnalysis { report, candidates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explanation::generator::{ReportGenerator, RunStats};
    use crate::factors::EnergyType;
    use crate::geometry::Polygon;

    #[test]
    fn test_format_json() {
        let polygon = Polygon::from_coords(&[(0.0, 0.0), (2.0, 0.0), (0.0, 2.0)]);
        let report = ReportGenerator::generate(&[], EnergyType::Tidal, &polygon, RunStats::default());

        let json = JsonFormatter::format(&report, &[]).unwrap();
        assert!(json.contains("\"energyType\": \"tidal\""));
        assert!(json.contains("\"candidateCount\": 0"));

        let compact = JsonFormatter::format_compact(&report, &[]).unwrap();
        assert!(!compact.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(value["report"]["totalArea"], 2.0);
        assert!(value["candidates"].as_array().unwrap().is_empty());
    }
}
