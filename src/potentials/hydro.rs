//! HYDRO POTENTIAL
//!
//! Two named strategies share the head/flow core:
//!
//!   HeadFlow:       head × flow × stream
//!   SlopePenalized: head × flow × stream × max(0, 1 − |slope − 20| / 40)
//!
//!   head   = min(1, elevation / 1000)
//!   flow   = min(1, (rainfall / 1000) × (stream_density / 10))
//!   stream = min(1, stream_density / 5)
//!
//! **Inputs needed**: elevation, rainfall, stream_density (+ slope for
//! `SlopePenalized`)

use super::{required_layer, PotentialInputs, PotentialResult};
use crate::data::LayerName;
use crate::factors::EnergyType;
use crate::geometry::Point;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Slope giving the best head over a short penstock
pub const OPTIMAL_SLOPE: f64 = 20.0;

/// Hydro scoring strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HydroStrategy {
    /// Head, flow and stream density only
    #[default]
    HeadFlow,
    /// Additionally penalise slopes away from 20°
    SlopePenalized,
}

pub fn head_factor(elevation: f64) -> f64 {
    (elevation / 1000.0).min(1.0)
}

pub fn flow_factor(rainfall: f64, stream_density: f64) -> f64 {
    ((rainfall / 1000.0) * (stream_density / 10.0)).min(1.0)
}

pub fn stream_factor(stream_density: f64) -> f64 {
    (stream_density / 5.0).min(1.0)
}

pub fn slope_factor(slope: f64) -> f64 {
    (1.0 - (slope - OPTIMAL_SLOPE).abs() / 40.0).max(0.0)
}

pub fn calculate_hydro_potential(inputs: &PotentialInputs<'_>) -> PotentialResult {
    let energy = EnergyType::Hydro;
    let (Some(elevation), Some(rainfall), Some(streams)) = (
        required_layer(inputs.store, LayerName::Elevation, energy),
        required_layer(inputs.store, LayerName::Rainfall, energy),
        required_layer(inputs.store, LayerName::StreamDensity, energy),
    ) else {
        return PotentialResult::empty(energy, inputs.frame, inputs.points.len());
    };
    let strategy = inputs.hydro_strategy;

    let samples: Vec<Option<(Point, f64)>> = inputs
        .points
        .par_iter()
        .map(|&p| {
            let elev = *elevation.get(p)?;
            let rain = *rainfall.get(p)?;
            let density = *streams.get(p)?;

            let mut potential = head_factor(elev) * flow_factor(rain, density) * stream_factor(density);
            if strategy == HydroStrategy::SlopePenalized {
                potential *= slope_factor(*inputs.terrain.slope.get(p)?);
            }

            Some((p, potential.max(0.0)))
        })
        .collect();

    PotentialResult::from_samples(energy, inputs.frame, samples)
}
