//! Deterministic synthetic layers for demos, tests and benchmarks
//!
//! Cells sit on the unit lattice `0..width x 0..height` and represent 1 km
//! squares; analyse them with `cell_size = SYNTHETIC_CELL_SIZE`.
//!
//! Patterns (plus seeded noise):
//!   - elevation   100 + 200 sin(0.1x) + 150 cos(0.1y)
//!   - irradiance  3 + 1.5 sin(0.05x)
//!   - wind        5 + 3 cos(0.08y)
//!   - rainfall    500 + 300 sin(0.03x)
//!   - coast along x = 0, seabed deepening offshore
//!   - land cover drawn uniformly from forest, grassland, urban, water, agricultural
//!
//! `SyntheticWeather` stands in for a weather service: each point gets a fixed
//! observation derived from the seed and the point's lattice cell.

use crate::data::{LayerName, LayerStore};
use crate::error::Result;
use crate::fetch::{PointSample, PointSource};
use crate::geometry::Point;
use crate::layer::GridFrame;
use crate::potentials::weather::WeatherSample;
use crate::utils::land_cover::LandCover;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Metres between synthetic cells
pub const SYNTHETIC_CELL_SIZE: f64 = 1000.0;

const LAND_COVER_CHOICES: [LandCover; 5] = [
    LandCover::Forest,
    LandCover::Grassland,
    LandCover::Urban,
    LandCover::Water,
    LandCover::Agricultural,
];

/// Build a `width x height` store; the same seed always gives the same layers
pub fn synthetic_store(width: usize, height: usize, seed: u64) -> LayerStore {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut store = LayerStore::new(GridFrame::unit());
    let center = (width as f64 / 2.0, height as f64 / 2.0);
    let span = (width + height).max(1) as f64;

    for xi in 0..width {
        for yi in 0..height {
            let (x, y) = (xi as f64, yi as f64);
            let p = Point::new(x, y);

            let elevation = 100.0 + (x * 0.1).sin() * 200.0 + (y * 0.1).cos() * 150.0 + rng.gen::<f64>() * 100.0;
            let solar = 3.0 + (x * 0.05).sin() * 1.5 + rng.gen::<f64>() * 2.0;
            let wind = 5.0 + (y * 0.08).cos() * 3.0 + rng.gen::<f64>() * 5.0;
            let rainfall = 500.0 + (x * 0.03).sin() * 300.0 + rng.gen::<f64>() * 400.0;
            let coastal_distance = x;
            let bathymetry = -(5.0 + x * 3.0 + rng.gen::<f64>() * 10.0);
            let current = 0.5 + (y * 0.1).cos() * 0.5 + rng.gen::<f64>() * 1.5;
            let stream_density = 1.0 + (x * 0.07).sin().abs() * 4.0 + rng.gen::<f64>() * 3.0;
            let infrastructure =
                1.0 - (x - center.0).hypot(y - center.1) / span + rng.gen::<f64>() * 0.1;
            let cover = LAND_COVER_CHOICES[rng.gen_range(0..LAND_COVER_CHOICES.len())];

            store.insert_value(LayerName::Elevation, p, elevation);
            store.insert_value(LayerName::SolarIrradiance, p, solar);
            store.insert_value(LayerName::WindSpeed, p, wind);
            store.insert_value(LayerName::Rainfall, p, rainfall);
            store.insert_value(LayerName::CoastalDistance, p, coastal_distance);
            store.insert_value(LayerName::Bathymetry, p, bathymetry);
            store.insert_value(LayerName::CurrentStrength, p, current);
            store.insert_value(LayerName::StreamDensity, p, stream_density);
            store.insert_value(LayerName::InfrastructureAccess, p, infrastructure);
            store.insert_land_cover(p, cover);
        }
    }

    tracing::debug!(width, height, seed, "Generated synthetic layers");
    store
}

/// Seeded per-point weather observations
#[derive(Debug, Clone, Copy)]
pub struct SyntheticWeather {
    seed: u64,
    frame: GridFrame,
}

impl SyntheticWeather {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            frame: GridFrame::unit(),
        }
    }

    pub fn observation(&self, point: Point) -> WeatherSample {
        let key = self.frame.key(point);
        let cell = (key.col as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (key.row as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        let mut rng = StdRng::seed_from_u64(self.seed ^ cell);

        let raining = rng.gen_bool(0.3);
        WeatherSample {
            temperature: rng.gen_range(-5.0..38.0),
            cloud_cover: rng.gen_range(0.0..100.0),
            wind_speed: rng.gen_range(0.0..16.0),
            humidity: rng.gen_range(25.0..98.0),
            pressure: rng.gen_range(995.0..1030.0),
            rain_1h: raining.then(|| rng.gen_range(0.1..6.0)),
        }
    }
}

impl PointSource for SyntheticWeather {
    fn fetch(&self, point: Point) -> Result<PointSample> {
        Ok(PointSample::default().with_weather(self.observation(point)))
    }
}
