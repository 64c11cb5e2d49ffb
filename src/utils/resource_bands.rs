/// Resource Classification Bands
///
/// Coarse ratings for raw point resources, shown next to candidates in
/// reports. Thresholds follow common siting rules of thumb:
///
/// Solar irradiance (kWh/m²/day):
/// - < 3.0 → Poor (0.1)
/// - [3.0, 4.5) → Moderate (0.4)
/// - [4.5, 5.5) → Good (0.7)
/// - ≥ 5.5 → Excellent (1.0)
///
/// Wind speed (m/s):
/// - < 3 → Not usable (0.0)
/// - [3, 5) → Small turbines (0.3)
/// - [5, 7) → Good (0.6)
/// - [7, 9) → Excellent (0.9)
/// - ≥ 9 → Very high (0.8, turbulence and cut-out risk)
///
/// Non-positive or non-finite inputs are unrated (`None`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolarBand {
    Poor,
    Moderate,
    Good,
    Excellent,
}

impl SolarBand {
    pub fn label(&self) -> &'static str {
        match self {
            SolarBand::Poor => "poor",
            SolarBand::Moderate => "moderate",
            SolarBand::Good => "good",
            SolarBand::Excellent => "excellent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindBand {
    NotUsable,
    SmallTurbines,
    Good,
    Excellent,
    VeryHigh,
}

impl WindBand {
    pub fn label(&self) -> &'static str {
        match self {
            WindBand::NotUsable => "not usable",
            WindBand::SmallTurbines => "small turbines",
            WindBand::Good => "good",
            WindBand::Excellent => "excellent",
            WindBand::VeryHigh => "very high",
        }
    }
}

/// Rating and band for a solar irradiance value
pub fn classify_solar(irradiance: f64) -> Option<(f64, SolarBand)> {
    if !(irradiance.is_finite() && irradiance > 0.0) {
        return None;
    }
    Some(if irradiance < 3.0 {
        (0.1, SolarBand::Poor)
    } else if irradiance < 4.5 {
        (0.4, SolarBand::Moderate)
    } else if irradiance < 5.5 {
        (0.7, SolarBand::Good)
    } else {
        (1.0, SolarBand::Excellent)
    })
}

/// Rating and band for a wind speed value
pub fn classify_wind(speed: f64) -> Option<(f64, WindBand)> {
    if !(speed.is_finite() && speed > 0.0) {
        return None;
    }
    Some(if speed < 3.0 {
        (0.0, WindBand::NotUsable)
    } else if speed < 5.0 {
        (0.3, WindBand::SmallTurbines)
    } else if speed < 7.0 {
        (0.6, WindBand::Good)
    } else if speed < 9.0 {
        (0.9, WindBand::Excellent)
    } else {
        (0.8, WindBand::VeryHigh)
    })
}
