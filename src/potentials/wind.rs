//! WIND POTENTIAL
//!
//! Scores turbine siting per grid point.
//!
//! **Formula**:
//!   potential = wind_speed
//!             × (1 + 0.1 × elevation / 1000)                 higher sites, stronger wind
//!             × max(0, 1 − |slope − 15| / 30)                 moderate slopes preferred
//!             × land_cover_factor                            surface roughness class
//!             × max(0.5, 1 − relief / 100)                    local terrain roughness
//!
//! `relief` is the RMS elevation difference to the 8 zero-filled neighbours.
//!
//! **Inputs needed**: wind_speed, elevation, slope, land_cover

use super::{required_layer, PotentialInputs, PotentialResult};
use crate::data::LayerName;
use crate::factors::EnergyType;
use crate::geometry::Point;
use crate::layer::Layer;
use crate::terrain::local_relief;
use rayon::prelude::*;

/// Slope with the best exposure to prevailing winds
pub const OPTIMAL_SLOPE: f64 = 15.0;

/// Floor of the roughness multiplier
pub const MIN_ROUGHNESS_FACTOR: f64 = 0.5;

pub fn elevation_factor(elevation: f64) -> f64 {
    1.0 + 0.1 * elevation / 1000.0
}

pub fn slope_factor(slope: f64) -> f64 {
    (1.0 - (slope - OPTIMAL_SLOPE).abs() / 30.0).max(0.0)
}

pub fn roughness_factor(elevation: &Layer<f64>, point: Point) -> f64 {
    (1.0 - local_relief(elevation, point) / 100.0).max(MIN_ROUGHNESS_FACTOR)
}

pub fn calculate_wind_potential(inputs: &PotentialInputs<'_>) -> PotentialResult {
    let energy = EnergyType::Wind;
    let (Some(wind), Some(elevation)) = (
        required_layer(inputs.store, LayerName::WindSpeed, energy),
        required_layer(inputs.store, LayerName::Elevation, energy),
    ) else {
        return PotentialResult::empty(energy, inputs.frame, inputs.points.len());
    };
    let Some(land_cover) = inputs.store.land_cover() else {
        tracing::warn!(energy = %energy, "land cover layer is missing; potential layer will be empty");
        return PotentialResult::empty(energy, inputs.frame, inputs.points.len());
    };

    let samples: Vec<Option<(Point, f64)>> = inputs
        .points
        .par_iter()
        .map(|&p| {
            let speed = *wind.get(p)?;
            let elev = *elevation.get(p)?;
            let slope = *inputs.terrain.slope.get(p)?;
            let cover = *land_cover.get(p)?;

            let potential = speed
                * elevation_factor(elev)
                * slope_factor(slope)
                * cover.wind_factor()
                * roughness_factor(elevation, p);

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
    fn test_factor_shapes() {
        assert_relative_eq!(elevation_factor(1000.0), 1.1);
        assert_relative_eq!(slope_factor(15.0), 1.0);
        assert_relative_eq!(slope_factor(0.0), 0.5);
        assert_relative_eq!(slope_factor(50.0), 0.0);
    }

    #[test]
    fn test_roughness_floor() {
        let layer = Layer::from_entries(
            "elevation",
            GridFrame::unit(),
            vec![(Point::new(0.0, 0.0), 1000.0)],
        );
        // Every neighbour reads 0, relief = 1000
        assert_relative_eq!(roughness_factor(&layer, Point::new(0.0, 0.0)), 0.5);
    }

    #[test]
    fn test_potential_skips_points_without_land_cover() {
        let mut store = ramp_store();
        let points = grid();
        // Extra point with every scalar layer but no land cover
        let extra = Point::new(5.0, 0.0);
        for name in [LayerName::WindSpeed, LayerName::Elevation] {
            store.insert_value(name, extra, 10.0);
        }
        let mut all_points = points.clone();
        all_points.push(extra);

        let terrain = TerrainDerivatives::compute(
            store.layer(LayerName::Elevation).unwrap(),
            &all_points,
            1.0,
            GridFrame::unit(),
        );
        let inputs = PotentialInputs {
            points: &all_points,
            store: &store,
            terrain: &terrain,
            frame: GridFrame::unit(),
            latitude: DEFAULT_REFERENCE_LATITUDE,
            hydro_strategy: HydroStrategy::default(),
        };

        let result = calculate_wind_potential(&inputs);
        assert_eq!(result.layer.len(), 25);
        assert_eq!(result.skipped, 1);
        assert!(!result.layer.contains(extra));
        assert!(result.layer.values().all(|&v| v >= 0.0));
    }
}
