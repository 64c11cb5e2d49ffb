//! Weighted factor combination
//!
//! score(p) = Σ value_f(p) × w_f / Σ w_f, both sums over the weighted factors
//! present at p. Missing factors do not drag a point down; a point with none of
//! the weighted factors (or only zero-weight ones) gets no score.

use crate::factors::{EnergyType, Factor, FactorBundle, WeightTable};
use crate::geometry::Point;
use crate::layer::Layer;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Combined suitability of one grid point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuitabilityScore {
    pub point: Point,
    pub energy_type: EnergyType,
    /// In [0, 1] when every factor value is
    pub value: f64,
    /// Normalized, constrained value of each contributing factor
    pub breakdown: BTreeMap<Factor, f64>,
}

/// Combine a (normalized, constrained) bundle into one score per point
pub fn combine(bundle: &FactorBundle, weights: &WeightTable) -> Layer<SuitabilityScore> {
    let energy_type = bundle.energy_type();
    let layers: Vec<(Factor, f64, &Layer<f64>)> = weights
        .iter()
        .filter_map(|(factor, weight)| bundle.get(factor).map(|layer| (factor, weight, layer)))
        .collect();

    let scores: Vec<(Point, SuitabilityScore)> = bundle
        .points()
        .par_iter()
        .filter_map(|&p| {
            let mut weighted_sum = 0.0;
            let mut total_weight = 0.0;
            let mut breakdown = BTreeMap::new();

            for &(factor, weight, layer) in &layers {
                if let Some(&value) = layer.get(p) {
                    weighted_sum += value * weight;
                    total_weight += weight;
                    breakdown.insert(factor, value);
                }
            }

            if total_weight > 0.0 {
                Some((
                    p,
                    SuitabilityScore {
                        point: p,
                        energy_type,
                        value: weighted_sum / total_weight,
                        breakdown,
                    },
                ))
            } else {
                None
            }
        })
        .collect();

    Layer::from_entries(
        format!("{}_suitability", energy_type.as_str()),
        bundle.frame(),
        scores,
    )
}
