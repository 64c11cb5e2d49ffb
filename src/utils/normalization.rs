//! Normalization Utilities
//!
//! Min-max scaling of factor layers onto [0, 1]. Every factor is normalized
//! over the points of one run before weighting, so scores are relative to the
//! area being analysed.

use crate::layer::Layer;

/// Value assigned to every point of a constant (degenerate) layer
pub const DEGENERATE_NORMALIZED_VALUE: f64 = 0.5;

/// Scale one value against a known range
///
/// Returns 0.5 when the range is empty (`max == min`).
pub fn min_max_normalize(value: f64, min: f64, max: f64) -> f64 {
    let range = max - min;
    if range == 0.0 {
        DEGENERATE_NORMALIZED_VALUE
    } else {
        (value - min) / range
    }
}

/// Min-max normalize a layer
///
/// Algorithm:
/// 1. Find min and max over the layer's values
/// 2. Map each value to (v - min) / (max - min)
/// 3. Constant layers map every point to 0.5
///
/// Empty layers stay empty; names and entry order are preserved.
pub fn normalize(layer: &Layer<f64>) -> Layer<f64> {
    let Some((min, max)) = layer.min_max() else {
        return layer.clone();
    };
    layer.map(layer.name().to_string(), |_, &v| min_max_normalize(v, min, max))
}
