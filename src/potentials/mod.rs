//! Energy Potential Calculators
//!
//! One module per technology, each turning raw layers and terrain derivatives
//! into a per-point potential layer:
//! - `solar`: irradiance scaled by elevation, slope, aspect and shading
//! - `wind`: wind speed scaled by elevation, slope, land cover and roughness
//! - `tidal`: coastal distance, water depth and current strength
//! - `hydro`: head, flow and stream density (optionally slope-penalised)
//! - `weather`: solar, wind and hydro from one weather observation per point
//!
//! Points missing any required input are skipped (no entry), never zero-filled.
//! A layer missing entirely yields an empty potential layer and a warning.

pub mod solar;
pub mod wind;
pub mod tidal;
pub mod hydro;
pub mod weather;

pub use solar::calculate_solar_potential;
pub use wind::calculate_wind_potential;
pub use tidal::calculate_tidal_potential;
pub use hydro::{calculate_hydro_potential, HydroStrategy};
pub use weather::{weather_potentials, WeatherPotentials, WeatherSample};

use crate::data::{LayerName, LayerStore};
use crate::factors::EnergyType;
use crate::geometry::Point;
use crate::layer::{GridFrame, Layer};
use crate::terrain::TerrainDerivatives;

/// Latitude assumed when a run does not supply one (degrees north)
pub const DEFAULT_REFERENCE_LATITUDE: f64 = 40.0;

/// Everything a calculator reads for one run
#[derive(Debug, Clone, Copy)]
pub struct PotentialInputs<'a> {
    /// Grid points to evaluate, in grid order
    pub points: &'a [Point],
    pub store: &'a LayerStore,
    pub terrain: &'a TerrainDerivatives,
    /// Frame keying the output layers (the analysis grid)
    pub frame: GridFrame,
    pub latitude: f64,
    pub hydro_strategy: HydroStrategy,
}

/// Potential layer for one energy type
#[derive(Debug, Clone)]
pub struct PotentialResult {
    pub energy_type: EnergyType,
    pub layer: Layer<f64>,
    /// Points skipped for missing inputs
    pub skipped: usize,
}

impl PotentialResult {
    pub fn empty(energy_type: EnergyType, frame: GridFrame, skipped: usize) -> Self {
        Self {
            energy_type,
            layer: Layer::new(layer_name(energy_type), frame),
            skipped,
        }
    }

    /// Collect per-point outcomes (in grid order) into a layer
    pub(crate) fn from_samples(
        energy_type: EnergyType,
        frame: GridFrame,
        samples: Vec<Option<(Point, f64)>>,
    ) -> Self {
        let total = samples.len();
        let layer = Layer::from_entries(layer_name(energy_type), frame, samples.into_iter().flatten());
        let skipped = total - layer.len();
        Self {
            energy_type,
            layer,
            skipped,
        }
    }

    /// Append the result of another chunk of points
    pub fn extend(&mut self, other: PotentialResult) {
        self.skipped += other.skipped;
        self.layer.extend(other.layer);
    }
}

fn layer_name(energy_type: EnergyType) -> String {
    format!("{}_potential", energy_type.as_str())
}

/// Dispatch to the calculator of `energy_type`
pub fn calculate_potential(energy_type: EnergyType, inputs: &PotentialInputs<'_>) -> PotentialResult {
    match energy_type {
        EnergyType::Solar => calculate_solar_potential(inputs),
        EnergyType::Wind => calculate_wind_potential(inputs),
        EnergyType::Tidal => calculate_tidal_potential(inputs),
        EnergyType::Hydro => calculate_hydro_potential(inputs),
    }
}

/// Required store layer, logging when the whole layer is absent
pub(crate) fn required_layer<'a>(
    store: &'a LayerStore,
    name: LayerName,
    energy_type: EnergyType,
) -> Option<&'a Layer<f64>> {
    match store.require(name) {
        Ok(layer) => Some(layer),
        Err(err) => {
            tracing::warn!(energy = %energy_type, "{err}; potential layer will be empty");
            None
        }
    }
}
