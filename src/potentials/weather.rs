//! WEATHER POTENTIALS
//!
//! Point potentials from a single weather observation, for points sampled
//! from a weather service instead of raster layers.
//!
//! **Formulas** (each clamped to [0, 1]):
//!   solar = (1 − cloud_cover / 100)
//!         × (1 if 0 < temperature < 40 °C else 0.8)        panel efficiency
//!         × (1 if 0 < wind_speed < 10 m/s else 0.9)        convective cooling
//!   wind  = speed / 12                 for 3 ≤ speed ≤ 12
//!         = 1 − (speed − 12) / 20      above 12 (cut-out range)
//!         = 0                          below 3
//!   hydro = humidity / 100 × (1.2 if pressure < 1013 hPa else 1)
//!         + rain_1h / 10
//!
//! Tidal has no weather proxy.

use crate::factors::EnergyType;
use crate::layer::Layer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cut-in speed below which wind is not usable (m/s)
pub const WIND_CUT_IN: f64 = 3.0;

/// Speed at which the wind potential peaks (m/s)
pub const WIND_RATED: f64 = 12.0;

/// Standard sea-level pressure (hPa)
pub const STANDARD_PRESSURE: f64 = 1013.0;

/// One weather observation at a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSample {
    /// °C
    pub temperature: f64,
    /// Percent of sky covered, 0-100
    pub cloud_cover: f64,
    /// m/s
    pub wind_speed: f64,
    /// Relative humidity, 0-100
    pub humidity: f64,
    /// hPa
    pub pressure: f64,
    /// mm over the last hour, when it rained
    #[serde(default)]
    pub rain_1h: Option<f64>,
}

/// Weather-derived potentials of one point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherPotentials {
    pub solar: f64,
    pub wind: f64,
    pub hydro: f64,
}

impl WeatherPotentials {
    pub fn from_sample(sample: &WeatherSample) -> Self {
        Self {
            solar: solar_potential(sample),
            wind: wind_potential(sample.wind_speed),
            hydro: hydro_potential(sample),
        }
    }

    /// Potentials keyed by energy type (tidal absent)
    pub fn scores(&self) -> BTreeMap<EnergyType, f64> {
        BTreeMap::from([
            (EnergyType::Solar, self.solar),
            (EnergyType::Wind, self.wind),
            (EnergyType::Hydro, self.hydro),
        ])
    }
}

pub fn solar_potential(sample: &WeatherSample) -> f64 {
    let clear_sky = 1.0 - sample.cloud_cover / 100.0;
    let temperature = if sample.temperature > 0.0 && sample.temperature < 40.0 {
        1.0
    } else {
        0.8
    };
    let cooling = if sample.wind_speed > 0.0 && sample.wind_speed < 10.0 {
        1.0
    } else {
        0.9
    };
    (clear_sky * temperature * cooling).clamp(0.0, 1.0)
}

pub fn wind_potential(speed: f64) -> f64 {
    let potential = if (WIND_CUT_IN..=WIND_RATED).contains(&speed) {
        speed / WIND_RATED
    } else if speed > WIND_RATED {
        1.0 - (speed - WIND_RATED) / 20.0
    } else {
        0.0
    };
    potential.clamp(0.0, 1.0)
}

pub fn hydro_potential(sample: &WeatherSample) -> f64 {
    let pressure = if sample.pressure < STANDARD_PRESSURE { 1.2 } else { 1.0 };
    let rain = sample.rain_1h.filter(|r| *r > 0.0).map_or(0.0, |r| r / 10.0);
    (sample.humidity / 100.0 * pressure + rain).clamp(0.0, 1.0)
}

/// Potentials for every sampled point, in sample order
pub fn weather_potentials(samples: &Layer<WeatherSample>) -> Layer<WeatherPotentials> {
    samples.map("weather_potentials", |_, sample| WeatherPotentials::from_sample(sample))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::layer::GridFrame;
    use approx::assert_relative_eq;

    fn sample() -> WeatherSample {
        WeatherSample {
            temperature: 22.0,
            cloud_cover: 25.0,
            wind_speed: 6.0,
            humidity: 60.0,
            pressure: 1020.0,
            rain_1h: None,
        }
    }

    #[test]
    fn test_solar_from_clouds_and_temperature() {
        assert_relative_eq!(solar_potential(&sample()), 0.75);
        let hot = WeatherSample { temperature: 41.0, ..sample() };
        assert_relative_eq!(solar_potential(&hot), 0.6);
        let gusty_overcast = WeatherSample {
            cloud_cover: 100.0,
            wind_speed: 14.0,
            ..sample()
        };
        assert_eq!(solar_potential(&gusty_overcast), 0.0);
    }

    #[test]
    fn test_wind_speed_banding() {
        assert_eq!(wind_potential(2.9), 0.0);
        assert_relative_eq!(wind_potential(3.0), 0.25);
        assert_relative_eq!(wind_potential(12.0), 1.0);
        assert_relative_eq!(wind_potential(17.0), 0.75);
        assert_eq!(wind_potential(40.0), 0.0);
    }

    #[test]
    fn test_hydro_pressure_and_rain() {
        assert_relative_eq!(hydro_potential(&sample()), 0.6);
        let low = WeatherSample { pressure: 1000.0, ..sample() };
        assert_relative_eq!(hydro_potential(&low), 0.72);
        let rainy = WeatherSample { rain_1h: Some(2.0), ..low };
        assert_relative_eq!(hydro_potential(&rainy), 0.92);
        let downpour = WeatherSample { rain_1h: Some(9.0), ..low };
        assert_eq!(hydro_potential(&downpour), 1.0);
    }

    #[test]
    fn test_layer_of_potentials_keeps_order() {
        let samples = Layer::from_entries(
            "weather",
            GridFrame::unit(),
            vec![(Point::new(1.0, 0.0), sample()), (Point::new(0.0, 0.0), sample())],
        );
        let potentials = weather_potentials(&samples);
        let points: Vec<Point> = potentials.points().collect();
        assert_eq!(points, vec![Point::new(1.0, 0.0), Point::new(0.0, 0.0)]);
        let scores = potentials.get(Point::new(0.0, 0.0)).unwrap().scores();
        assert!(!scores.contains_key(&EnergyType::Tidal));
        assert_relative_eq!(scores[&EnergyType::Wind], 0.5);
    }
}
