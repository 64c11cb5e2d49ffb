//! SOLAR POTENTIAL
//!
//! Scores photovoltaic yield per grid point from irradiance and terrain.
//!
//! **Formula**:
//!   potential = irradiance
//!             × (0.8 + 0.2 × min(1, elevation / 1000))       elevation bonus
//!             × max(0, 1 − |slope − optimum| / 45)           slope factor
//!             × max(0, 1 − |aspect − 180| / 180)             south-facing aspect
//!             × shading                                      0.8 if any neighbour is higher
//!
//! The slope optimum is `max(0, latitude − 15)`. Aspect assumes the northern
//! hemisphere (due south = 180°).
//!
//! **Inputs needed**: solar_irradiance, elevation, slope, aspect

use super::{required_layer, PotentialInputs, PotentialResult};
use crate::data::LayerName;
use crate::factors::EnergyType;
use crate::geometry::Point;
use crate::layer::Layer;
use crate::terrain::max_neighbor_elevation;
use rayon::prelude::*;

/// Aspect of maximum yield (due south)
pub const OPTIMAL_ASPECT: f64 = 180.0;

/// Multiplier for points overshadowed by a higher neighbour
pub const SHADED_FACTOR: f64 = 0.8;

/// 0.8 at sea level rising to 1.0 at 1000 m and above
pub fn elevation_factor(elevation: f64) -> f64 {
    0.8 + 0.2 * (elevation / 1000.0).min(1.0)
}

/// Optimal tilt is roughly latitude − 15°; falls to 0 at 45° away
pub fn slope_factor(slope: f64, latitude: f64) -> f64 {
    let optimal = (latitude - 15.0).max(0.0);
    (1.0 - (slope - optimal).abs() / 45.0).max(0.0)
}

pub fn aspect_factor(aspect: f64) -> f64 {
    (1.0 - (aspect - OPTIMAL_ASPECT).abs() / 180.0).max(0.0)
}

pub fn shading_factor(elevation: &Layer<f64>, point: Point) -> f64 {
    let own = elevation.get(point).copied().unwrap_or(0.0);
    if max_neighbor_elevation(elevation, point) > own {
        SHADED_FACTOR
    } else {
        1.0
    }
}

pub fn calculate_solar_potential(inputs: &PotentialInputs<'_>) -> PotentialResult {
    let energy = EnergyType::Solar;
    let (Some(irradiance), Some(elevation)) = (
        required_layer(inputs.store, LayerName::SolarIrradiance, energy),
        required_layer(inputs.store, LayerName::Elevation, energy),
    ) else {
        return PotentialResult::empty(energy, inputs.frame, inputs.points.len());
    };

    let samples: Vec<Option<(Point, f64)>> = inputs
        .points
        .par_iter()
        .map(|&p| {
            let solar = *irradiance.get(p)?;
            let elev = *elevation.get(p)?;
            let slope = *inputs.terrain.slope.get(p)?;
            let aspect = *inputs.terrain.aspect.get(p)?;

            let potential = solar
                * elevation_factor(elev)
                * slope_factor(slope, inputs.latitude)
                * aspect_factor(aspect)
                * shading_factor(elevation, p);

            Some((p, potential.max(0.0)))
        })
        .collect();

    PotentialResult::from_samples(energy, inputs.frame, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LayerStore;
    use crate::layer::GridFrame;
    use crate::potentials::test_support::{grid, ramp_store};
    use crate::potentials::{HydroStrategy, DEFAULT_REFERENCE_LATITUDE};
    use crate::terrain::TerrainDerivatives;
    use approx::assert_relative_eq;

    #[test]
    fn test_factor_shapes() {
        assert_relative_eq!(elevation_factor(0.0), 0.8);
        assert_relative_eq!(elevation_factor(500.0), 0.9);
        assert_relative_eq!(elevation_factor(3000.0), 1.0);
        // Latitude 40 → optimum 25°
        assert_relative_eq!(slope_factor(25.0, 40.0), 1.0);
        assert_relative_eq!(slope_factor(70.0, 40.0), 0.0);
        assert_relative_eq!(slope_factor(0.0, 10.0), 1.0);
        assert_relative_eq!(aspect_factor(180.0), 1.0);
        assert_relative_eq!(aspect_factor(0.0), 0.0);
        assert_relative_eq!(aspect_factor(90.0), 0.5);
    }

    #[test]
    fn test_potential_matches_formula() {
        let store = ramp_store();
        let points = grid();
        let elevation = store.layer(LayerName::Elevation).unwrap();
        let terrain = TerrainDerivatives::compute(elevation, &points, 1.0, GridFrame::unit());
        let inputs = PotentialInputs {
            points: &points,
            store: &store,
            terrain: &terrain,
            frame: GridFrame::unit(),
            latitude: DEFAULT_REFERENCE_LATITUDE,
            hydro_strategy: HydroStrategy::default(),
        };

        let result = calculate_solar_potential(&inputs);
        assert_eq!(result.layer.len(), 25);
        assert_eq!(result.skipped, 0);

        let p = Point::new(2.0, 2.0);
        let slope = *terrain.slope.get(p).unwrap();
        let aspect = *terrain.aspect.get(p).unwrap();
        let expected = 5.2
            * elevation_factor(520.0)
            * slope_factor(slope, 40.0)
            * aspect_factor(aspect)
            * shading_factor(elevation, p);
        assert_relative_eq!(*result.layer.get(p).unwrap(), expected, epsilon = 1e-12);
        assert!(result.layer.values().all(|&v| v >= 0.0));
    }

    #[test]
    fn test_missing_irradiance_yields_empty_layer() {
        let points = grid();
        let store = LayerStore::new(GridFrame::unit()).with_layer(
            LayerName::Elevation,
            points.iter().map(|&p| (p, 100.0)),
        );
        let terrain = TerrainDerivatives::compute(
            store.layer(LayerName::Elevation).unwrap(),
            &points,
            1.0,
            GridFrame::unit(),
        );
        let inputs = PotentialInputs {
            points: &points,
            store: &store,
            terrain: &terrain,
            frame: GridFrame::unit(),
            latitude: DEFAULT_REFERENCE_LATITUDE,
            hydro_strategy: HydroStrategy::default(),
        };
        let result = calculate_solar_potential(&inputs);
        assert!(result.layer.is_empty());
        assert_eq!(result.skipped, 25);
    }

    #[test]
    fn test_shading_from_higher_neighbor() {
        let layer = Layer::from_entries(
            "elevation",
            GridFrame::unit(),
            vec![(Point::new(0.0, 0.0), 100.0), (Point::new(1.0, 0.0), 150.0)],
        );
        assert_relative_eq!(shading_factor(&layer, Point::new(0.0, 0.0)), 0.8);
        assert_relative_eq!(shading_factor(&layer, Point::new(1.0, 0.0)), 1.0);
    }
}
