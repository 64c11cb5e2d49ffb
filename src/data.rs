//! Data Loading and Management
//!
//! Holds the raster-like input layers of an analysis and loads them from wide
//! tables with Polars.
//!
//! **Table layout** (CSV or Parquet), one row per sample point:
//!   - `x`, `y`              - coordinates
//!   - one numeric column per `LayerName` (e.g. `elevation`, `wind_speed`)
//!   - `land_cover`          - optional category label
//!
//! Null or non-finite cells are left out of the layer (absent, not zero).

use crate::error::{Result, SitingError};
use crate::geometry::Point;
use crate::layer::{GridFrame, Layer, LayerDomain};
use crate::utils::land_cover::LandCover;
use anyhow::Context;
use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Column holding land-cover labels
pub const LAND_COVER_COLUMN: &str = "land_cover";

/// Scalar input layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerName {
    /// Metres above sea level
    Elevation,
    /// kWh/m²/day
    SolarIrradiance,
    /// m/s
    WindSpeed,
    /// mm/year
    Rainfall,
    /// Signed depth, negative below sea level
    Bathymetry,
    /// m/s
    CurrentStrength,
    /// km to the coastline
    CoastalDistance,
    /// Stream length per unit area
    StreamDensity,
    /// Relative access score, higher is better
    InfrastructureAccess,
}

impl LayerName {
    pub const ALL: [LayerName; 9] = [
        LayerName::Elevation,
        LayerName::SolarIrradiance,
        LayerName::WindSpeed,
        LayerName::Rainfall,
        LayerName::Bathymetry,
        LayerName::CurrentStrength,
        LayerName::CoastalDistance,
        LayerName::StreamDensity,
        LayerName::InfrastructureAccess,
    ];

    /// Column / layer name
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerName::Elevation => "elevation",
            LayerName::SolarIrradiance => "solar_irradiance",
            LayerName::WindSpeed => "wind_speed",
            LayerName::Rainfall => "rainfall",
            LayerName::Bathymetry => "bathymetry",
            LayerName::CurrentStrength => "current_strength",
            LayerName::CoastalDistance => "coastal_distance",
            LayerName::StreamDensity => "stream_density",
            LayerName::InfrastructureAccess => "infrastructure_access",
        }
    }
}

impl fmt::Display for LayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        LayerName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown layer: {s}"))
    }
}

/// All input layers of an analysis
///
/// Lookups are O(1) per point; layers share the store's `GridFrame`.
#[derive(Debug, Clone, Default)]
pub struct LayerStore {
    frame: GridFrame,
    scalars: FxHashMap<LayerName, Layer<f64>>,
    land_cover: Option<Layer<LandCover>>,
}

impl LayerStore {
    pub fn new(frame: GridFrame) -> Self {
        Self {
            frame,
            scalars: FxHashMap::default(),
            land_cover: None,
        }
    }

    pub fn frame(&self) -> GridFrame {
        self.frame
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.values().all(Layer::is_empty)
            && self.land_cover.as_ref().map_or(true, Layer::is_empty)
    }

    /// Record a scalar sample; non-finite values are dropped
    pub fn insert_value(&mut self, name: LayerName, point: Point, value: f64) {
        if !value.is_finite() {
            return;
        }
        let frame = self.frame;
        self.scalars
            .entry(name)
            .or_insert_with(|| Layer::new(name.as_str(), frame))
            .insert(point, value);
    }

    pub fn insert_land_cover(&mut self, point: Point, cover: LandCover) {
        let frame = self.frame;
        self.land_cover
            .get_or_insert_with(|| Layer::new(LAND_COVER_COLUMN, frame))
            .insert(point, cover);
    }

    /// Builder form of `insert_value` for a whole set of samples
    pub fn with_layer<I>(mut self, name: LayerName, samples: I) -> Self
    where
        I: IntoIterator<Item = (Point, f64)>,
    {
        for (point, value) in samples {
            self.insert_value(name, point, value);
        }
        self
    }

    pub fn with_land_cover<I>(mut self, samples: I) -> Self
    where
        I: IntoIterator<Item = (Point, LandCover)>,
    {
        for (point, cover) in samples {
            self.insert_land_cover(point, cover);
        }
        self
    }

    pub fn layer(&self, name: LayerName) -> Option<&Layer<f64>> {
        self.scalars.get(&name).filter(|layer| !layer.is_empty())
    }

    /// Layer that a calculation cannot proceed without
    pub fn require(&self, name: LayerName) -> Result<&Layer<f64>> {
        self.layer(name).ok_or(SitingError::MissingLayer(name))
    }

    pub fn land_cover(&self) -> Option<&Layer<LandCover>> {
        self.land_cover.as_ref().filter(|layer| !layer.is_empty())
    }

    pub fn value(&self, name: LayerName, point: Point) -> Option<f64> {
        self.layer(name)?.get(point).copied()
    }

    pub fn land_cover_at(&self, point: Point) -> Option<LandCover> {
        self.land_cover()?.get(point).copied()
    }

    /// Names of the non-empty scalar layers, sorted
    pub fn layer_names(&self) -> Vec<LayerName> {
        let mut names: Vec<LayerName> = self
            .scalars
            .iter()
            .filter(|(_, layer)| !layer.is_empty())
            .map(|(name, _)| *name)
            .collect();
        names.sort();
        names
    }

    /// Declared domains of every loaded layer, land cover last
    pub fn domains(&self) -> Vec<(String, LayerDomain)> {
        let mut domains: Vec<(String, LayerDomain)> = self
            .layer_names()
            .into_iter()
            .filter_map(|name| Some((name.as_str().to_string(), self.layer(name)?.domain())))
            .collect();
        if let Some(cover) = self.land_cover() {
            domains.push((LAND_COVER_COLUMN.to_string(), cover.domain()));
        }
        domains
    }

    /// Restrict every layer to the given points
    pub fn clip(&self, points: &[Point]) -> Self {
        Self {
            frame: self.frame,
            scalars: self
                .scalars
                .iter()
                .map(|(name, layer)| (*name, layer.clip(points)))
                .collect(),
            land_cover: self.land_cover.as_ref().map(|layer| layer.clip(points)),
        }
    }

    /// Merge another store; existing cells keep their values
    pub fn merge(&mut self, other: LayerStore) {
        for (name, layer) in other.scalars {
            for (point, value) in layer.iter() {
                self.insert_value(name, point, *value);
            }
        }
        if let Some(cover) = other.land_cover {
            for (point, value) in cover.iter() {
                self.insert_land_cover(point, *value);
            }
        }
    }

    /// Load layers from a wide CSV table
    pub fn load_csv(path: impl AsRef<Path>, frame: GridFrame) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.into()))
            .with_context(|| format!("Failed to create CSV reader: {}", path.display()))?
            .finish()
            .with_context(|| format!("Failed to load layer CSV: {}", path.display()))?;

        Self::from_dataframe(&df, frame)
    }

    /// Load layers from a wide Parquet table
    pub fn load_parquet(path: impl AsRef<Path>, frame: GridFrame) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let df = LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to scan parquet: {}", path.display()))?
            .collect()
            .with_context(|| format!("Failed to load layer parquet: {}", path.display()))?;

        Self::from_dataframe(&df, frame)
    }

    /// Load by file extension (`.parquet`, anything else as CSV)
    pub fn load(path: impl AsRef<Path>, frame: GridFrame) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("parquet") => Self::load_parquet(path, frame),
            _ => Self::load_csv(path, frame),
        }
    }

    /// Build a store from a wide DataFrame
    pub fn from_dataframe(df: &DataFrame, frame: GridFrame) -> anyhow::Result<Self> {
        let xs = float_column(df, "x")?;
        let ys = float_column(df, "y")?;
        let xs = xs.f64()?;
        let ys = ys.f64()?;

        let mut store = Self::new(frame);

        for name in LayerName::ALL {
            if df.column(name.as_str()).is_err() {
                continue;
            }
            let values = float_column(df, name.as_str())?;
            let values = values.f64()?;

            for idx in 0..df.height() {
                if let (Some(x), Some(y), Some(v)) = (xs.get(idx), ys.get(idx), values.get(idx)) {
                    store.insert_value(name, Point::new(x, y), v);
                }
            }
        }

        if df.column(LAND_COVER_COLUMN).is_ok() {
            let labels = df
                .column(LAND_COVER_COLUMN)?
                .cast(&DataType::String)
                .with_context(|| format!("Column '{}' is not castable to string", LAND_COVER_COLUMN))?;
            let labels = labels.str()?;

            for idx in 0..df.height() {
                if let (Some(x), Some(y), Some(label)) = (xs.get(idx), ys.get(idx), labels.get(idx)) {
                    store.insert_land_cover(Point::new(x, y), LandCover::from_label(label));
                }
            }
        }

        tracing::debug!(
            rows = df.height(),
            layers = ?store.layer_names(),
            land_cover = store.land_cover().is_some(),
            "Loaded layer table"
        );

        Ok(store)
    }
}

fn float_column(df: &DataFrame, name: &str) -> anyhow::Result<Column> {
    df.column(name)
        .with_context(|| format!("Column '{}' not found", name))?
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{}' is not numeric", name))
}
