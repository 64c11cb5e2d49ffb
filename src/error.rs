//! Error types for the siting engine

use crate::data::LayerName;
use crate::factors::Factor;
use thiserror::Error;

/// Errors raised by the analysis pipeline
#[derive(Error, Debug)]
pub enum SitingError {
    #[error("polygon needs at least 3 vertices, got {vertices}")]
    InvalidPolygon { vertices: usize },

    #[error("grid step must be a positive finite number, got {0}")]
    InvalidGridStep(f64),

    #[error("grid of {points} lattice positions exceeds the limit of {max}")]
    GridTooLarge { points: f64, max: usize },

    #[error("required layer '{0}' is missing")]
    MissingLayer(LayerName),

    #[error("weight for factor '{factor}' must be finite and non-negative, got {weight}")]
    InvalidWeight { factor: Factor, weight: f64 },

    #[error("unknown energy type: {0}")]
    UnknownEnergyType(String),

    #[error("failed to fetch layers at ({x}, {y}): {reason}")]
    Fetch { x: f64, y: f64, reason: String },

    #[error("analysis cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for siting operations
pub type Result<T> = std::result::Result<T, SitingError>;
