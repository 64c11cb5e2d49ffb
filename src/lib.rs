//! Site Scorer Rust Implementation
//!
//! Suitability analysis for renewable-energy siting: given a polygon, an
//! energy type and a set of spatial layers, score every grid point inside the
//! polygon and rank the best candidate sites.
//!
//! Module layout:
//! - `geometry/`: points, polygons, grid generation, strategic sampling
//! - `layer/` + `data/`: grid-keyed layers and their loading with Polars
//! - `terrain/`: slope and aspect (Horn kernel)
//! - `potentials/`: per-technology resource potentials (solar, wind, tidal, hydro)
//! - `factors/` + `constraints/` + `combination/`: the multi-criteria core
//! - `ranking/` + `explanation/`: candidates, reports and export formats
//! - `fetch/` + `progress/`: batched layer acquisition, progress, cancellation
//! - `classification/`: per-point best type, suitable types, multi-source sites
//! - `scorer/`: the pipeline coordinator

pub mod error;
pub mod geometry;
pub mod layer;
pub mod data;
pub mod terrain;
pub mod potentials;
pub mod factors;
pub mod constraints;
pub mod combination;
pub mod ranking;
pub mod classification;
pub mod explanation;
pub mod progress;
pub mod fetch;
pub mod config;
pub mod synthetic;
pub mod scorer;
pub mod utils;

// Re-export commonly used types
pub use error::{Result, SitingError};
pub use geometry::{generate_grid, select_strategic_points, GridSpec, Point, Polygon};
pub use layer::{GridFrame, Layer};
pub use data::{LayerName, LayerStore};
pub use factors::{EnergyType, Factor, WeightTable};
pub use constraints::{ConstraintConfig, ExclusionKind, ExclusionZone};
pub use combination::SuitabilityScore;
pub use ranking::{CandidateSpot, SiteAttributes};
pub use classification::{EnergyThresholds, PointClassification, SiteClass};
pub use explanation::{AnalysisReport, CsvFormatter, GeoJsonFormatter, JsonFormatter, MarkdownFormatter};
pub use progress::{CancellationToken, Progress, ProgressCallback};
pub use fetch::{BatchFetcher, FetchConfig, FetchOutcome, PointSample, PointSource, StoreSource};
pub use potentials::{WeatherPotentials, WeatherSample};
pub use config::AnalysisConfig;
pub use synthetic::{synthetic_store, SyntheticWeather, SYNTHETIC_CELL_SIZE};
pub use scorer::{AnalysisOutcome, AnalysisRequest, EnergyComparison, SiteScorer};
pub use utils::LandCover;
