//! Terrain derivatives from the elevation layer
//!
//! Slope and aspect use Horn's 3x3 finite-difference kernel. Neighbours missing
//! from the elevation layer are read as 0 (zero-fill), so edge cells report the
//! drop towards sea level rather than being skipped.
//!
//! **Orientation**: a row offset of -1 is treated as north and a column offset
//! of +1 as east.
//!
//! ```text
//!   NW  N  NE        (-1,-1) (0,-1) (1,-1)
//!   W   .  E         (-1, 0)   .    (1, 0)
//!   SW  S  SE        (-1, 1) (0, 1) (1, 1)
//! ```

use crate::geometry::Point;
use crate::layer::{GridFrame, Layer};
use rayon::prelude::*;

/// Neighbour offsets in the order NW, N, NE, W, E, SW, S, SE
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Zero-filled neighbour elevations in `NEIGHBOR_OFFSETS` order
pub fn neighbor_elevations(elevation: &Layer<f64>, point: Point) -> [f64; 8] {
    NEIGHBOR_OFFSETS.map(|(dcol, drow)| {
        elevation
            .neighbor(point, dcol, drow)
            .copied()
            .unwrap_or(0.0)
    })
}

/// Horn slope and aspect at a point, both in degrees
///
/// - `slope = atan(sqrt(dz/dx² + dz/dy²))`, in [0, 90)
/// - `aspect = atan2(dz/dy, -dz/dx)`, shifted into [0, 360)
///
/// Flat cells yield aspect 180 (atan2 of +0 and -0).
/// An empty layer or a non-positive cell size yields (0, 0).
pub fn slope_and_aspect(elevation: &Layer<f64>, point: Point, cell_size: f64) -> (f64, f64) {
    if elevation.is_empty() || !(cell_size.is_finite() && cell_size > 0.0) {
        return (0.0, 0.0);
    }

    let [nw, n, ne, w, e, sw, s, se] = neighbor_elevations(elevation, point);

    let dz_dx = ((ne + 2.0 * e + se) - (nw + 2.0 * w + sw)) / (8.0 * cell_size);
    let dz_dy = ((sw + 2.0 * s + se) - (nw + 2.0 * n + ne)) / (8.0 * cell_size);

    let slope = (dz_dx * dz_dx + dz_dy * dz_dy).sqrt().atan().to_degrees();

    let mut aspect = dz_dy.atan2(-dz_dx).to_degrees();
    if aspect < 0.0 {
        aspect += 360.0;
    }

    (slope, aspect)
}

/// Highest zero-filled neighbour elevation
pub fn max_neighbor_elevation(elevation: &Layer<f64>, point: Point) -> f64 {
    neighbor_elevations(elevation, point)
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max)
}

/// Root-mean-square elevation difference to the 8 zero-filled neighbours
pub fn local_relief(elevation: &Layer<f64>, point: Point) -> f64 {
    let center = elevation.get(point).copied().unwrap_or(0.0);
    let sum_sq: f64 = neighbor_elevations(elevation, point)
        .iter()
        .map(|n| (n - center).powi(2))
        .sum();
    (sum_sq / NEIGHBOR_OFFSETS.len() as f64).sqrt()
}

/// Slope and aspect layers over a set of points
#[derive(Debug, Clone)]
pub struct TerrainDerivatives {
    pub slope: Layer<f64>,
    pub aspect: Layer<f64>,
}

impl TerrainDerivatives {
    pub fn empty(frame: GridFrame) -> Self {
        Self {
            slope: Layer::new("slope", frame),
            aspect: Layer::new("aspect", frame),
        }
    }

    /// Derive slope and aspect for every point that has an elevation sample
    ///
    /// Output layers are keyed by `frame` and follow the order of `points`.
    pub fn compute(elevation: &Layer<f64>, points: &[Point], cell_size: f64, frame: GridFrame) -> Self {
        let samples: Vec<(Point, (f64, f64))> = points
            .par_iter()
            .filter(|p| elevation.contains(**p))
            .map(|&p| (p, slope_and_aspect(elevation, p, cell_size)))
            .collect();

        let mut derivatives = Self::empty(frame);
        for (p, (slope, aspect)) in samples {
            derivatives.slope.insert(p, slope);
            derivatives.aspect.insert(p, aspect);
        }
        derivatives
    }

    pub fn len(&self) -> usize {
        self.slope.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slope.is_empty()
    }

    /// Append derivatives computed for another chunk of points
    pub fn extend(&mut self, other: TerrainDerivatives) {
        self.slope.extend(other.slope);
        self.aspect.extend(other.aspect);
    }
}
