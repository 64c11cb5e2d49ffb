//! TIDAL POTENTIAL
//!
//! **Formula**:
//!   potential = distance_factor × depth_factor × current_factor
//!
//!   distance_factor = max(0, 1 − km_to_coast / 50)
//!   depth_factor    = 1 for depths 20-50 m, depth / 20 when shallower,
//!                     max(0, 1 − (depth − 50) / 100) when deeper
//!   current_factor  = min(1, current / 2)
//!
//! Depth is the absolute value of the bathymetry sample.
//!
//! **Inputs needed**: coastal_distance, bathymetry, current_strength

use super::{required_layer, PotentialInputs, PotentialResult};
use crate::data::LayerName;
use crate::factors::EnergyType;
use crate::geometry::Point;
use rayon::prelude::*;

/// Distance beyond which a site is too far offshore (km)
pub const MAX_COASTAL_DISTANCE_KM: f64 = 50.0;

/// Depth band suited to seabed-mounted turbines (m)
pub const OPTIMAL_DEPTH_RANGE: (f64, f64) = (20.0, 50.0);

pub fn distance_factor(km_to_coast: f64) -> f64 {
    (1.0 - km_to_coast / MAX_COASTAL_DISTANCE_KM).max(0.0)
}

pub fn depth_factor(bathymetry: f64) -> f64 {
    let depth = bathymetry.abs();
    let (shallow, deep) = OPTIMAL_DEPTH_RANGE;
    if depth < shallow {
        depth / shallow
    } else if depth > deep {
        (1.0 - (depth - deep) / 100.0).max(0.0)
    } else {
        1.0
    }
}

pub fn current_factor(current: f64) -> f64 {
    (current / 2.0).min(1.0)
}

/// Flat seabed preferred; falls to 0 at vertical
pub fn slope_factor(slope: f64) -> f64 {
    (1.0 - slope / 90.0).max(0.0)
}

pub fn calculate_tidal_potential(inputs: &PotentialInputs<'_>) -> PotentialResult {
    let energy = EnergyType::Tidal;
    let (Some(distance), Some(bathymetry), Some(current)) = (
        required_layer(inputs.store, LayerName::CoastalDistance, energy),
        required_layer(inputs.store, LayerName::Bathymetry, energy),
        required_layer(inputs.store, LayerName::CurrentStrength, energy),
    ) else {
        return PotentialResult::empty(energy, inputs.frame, inputs.points.len());
    };

    let samples: Vec<Option<(Point, f64)>> = inputs
        .points
        .par_iter()
        .map(|&p| {
            let km = *distance.get(p)?;
            let depth = *bathymetry.get(p)?;
            let speed = *current.get(p)?;

            let potential = distance_factor(km) * depth_factor(depth) * current_factor(speed);
            Some((p, potential.max(0.0)))
        })
        .collect();

    PotentialResult::from_samples(energy, inputs.frame, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::GridFrame;
    use crate::potentials::test_support::{grid, ramp_store};
    use crate::potentials::{HydroStrategy, DEFAULT_REFERENCE_LATITUDE};
    use crate::terrain::TerrainDerivatives;
    use approx::assert_relative_eq;

    #[test]
    fn test_depth_bands() {
        assert_relative_eq!(depth_factor(-10.0), 0.5);
        assert_relative_eq!(depth_factor(-20.0), 1.0);
        assert_relative_eq!(depth_factor(-50.0), 1.0);
        assert_relative_eq!(depth_factor(-100.0), 0.5);
        assert_relative_eq!(depth_factor(-300.0), 0.0);
        // Sign does not matter
        assert_relative_eq!(depth_factor(35.0), 1.0);
    }

    #[test]
    fn test_distance_and_current() {
        assert_relative_eq!(distance_factor(0.0), 1.0);
        assert_relative_eq!(distance_factor(25.0), 0.5);
        assert_relative_eq!(distance_factor(80.0), 0.0);
        assert_relative_eq!(current_factor(1.0), 0.5);
        assert_relative_eq!(current_factor(3.0), 1.0);
    }

    #[test]
    fn test_potential_over_grid() {
        let store = ramp_store();
        let points = grid();
        let terrain = TerrainDerivatives::empty(GridFrame::unit());
        let inputs = PotentialInputs {
            points: &points,
            store: &store,
            terrain: &terrain,
            frame: GridFrame::unit(),
            latitude: DEFAULT_REFERENCE_LATITUDE,
            hydro_strategy: HydroStrategy::default(),
        };

        let result = calculate_tidal_potential(&inputs);
        assert_eq!(result.layer.len(), 25);

        // x = 1 → 10 km, current 1.0; y = 1 → depth 20 m
        let p = Point::new(1.0, 1.0);
        assert_relative_eq!(*result.layer.get(p).unwrap(), 0.8 * 1.0 * 0.5, epsilon = 1e-12);
    }
}
