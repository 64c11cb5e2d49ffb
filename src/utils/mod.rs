//! Utility modules for site scoring
//!
//! Shared functionality used across potentials, constraints and reports:
//! - Normalization: min-max scaling of factor layers
//! - Land cover: closed category set with wind suitability lookup
//! - Resource bands: coarse ratings of raw solar/wind resources

pub mod normalization;
pub mod land_cover;
pub mod resource_bands;

// Re-export commonly used types
pub use normalization::{normalize, min_max_normalize, DEGENERATE_NORMALIZED_VALUE};
pub use land_cover::{LandCover, UNKNOWN_LAND_COVER_FACTOR};
pub use resource_bands::{classify_solar, classify_wind, SolarBand, WindBand};
