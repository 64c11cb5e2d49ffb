pub mod types;
pub mod highlights;
pub mod generator;
pub mod formatters;

pub use types::{AnalysisReport, SiteAnalysis, SuitabilityBand};
pub use highlights::{explain_score, factor_highlight, FALLBACK_EXPLANATION, HIGHLIGHT_THRESHOLD};
pub use generator::{ReportGenerator, RunStats, NO_CANDIDATES_MESSAGE};
pub use formatters::{CsvFormatter, GeoJsonFormatter, JsonFormatter, MarkdownFormatter};
