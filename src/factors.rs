//! Energy types, suitability factors and weight tables
//!
//! A run scores one `EnergyType`. Its `WeightTable` names the factors that take
//! part; `FactorBundle::assemble` builds one raw layer per weighted factor over
//! the grid, which the scorer then normalizes, constrains and combines.
//!
//! **Factor sources**:
//!   - raw store layers: solarRadiation, windSpeed, elevation, currentStrength,
//!     rainfall, streamDensity, infrastructure
//!   - suitability transforms: slope (energy-specific optimum), aspect
//!     (south-facing), landCover (lookup), coastalProximity and bathymetry
//!     (tidal distance/depth factors)
//!   - potentials: solarPotential, windPotential, tidalPotential, hydroPotential

use crate::data::LayerName;
use crate::error::{Result, SitingError};
use crate::geometry::Point;
use crate::layer::{GridFrame, Layer};
use crate::potentials::{hydro, solar, tidal, wind, PotentialInputs, PotentialResult};
use crate::utils::normalization::normalize;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyType {
    Solar,
    Wind,
    Tidal,
    Hydro,
}

impl EnergyType {
    pub const ALL: [EnergyType; 4] = [
        EnergyType::Solar,
        EnergyType::Wind,
        EnergyType::Tidal,
        EnergyType::Hydro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyType::Solar => "solar",
            EnergyType::Wind => "wind",
            EnergyType::Tidal => "tidal",
            EnergyType::Hydro => "hydro",
        }
    }

    /// Factor carrying this type's potential layer
    pub fn potential_factor(&self) -> Factor {
        match self {
            EnergyType::Solar => Factor::SolarPotential,
            EnergyType::Wind => Factor::WindPotential,
            EnergyType::Tidal => Factor::TidalPotential,
            EnergyType::Hydro => Factor::HydroPotential,
        }
    }

    /// Slope suitability in [0, 1] for this technology
    pub fn slope_suitability(&self, slope: f64, latitude: f64) -> f64 {
        match self {
            EnergyType::Solar => solar::slope_factor(slope, latitude),
            EnergyType::Wind => wind::slope_factor(slope),
            EnergyType::Tidal => tidal::slope_factor(slope),
            EnergyType::Hydro => hydro::slope_factor(slope),
        }
    }
}

impl fmt::Display for EnergyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyType {
    type Err = SitingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solar" => Ok(EnergyType::Solar),
            "wind" => Ok(EnergyType::Wind),
            "tidal" => Ok(EnergyType::Tidal),
            "hydro" => Ok(EnergyType::Hydro),
            other => Err(SitingError::UnknownEnergyType(other.to_string())),
        }
    }
}

/// Named suitability factor
///
/// Declaration order fixes the order of factor highlights in explanations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Factor {
    SolarRadiation,
    Elevation,
    Slope,
    WindSpeed,
    Infrastructure,
    Aspect,
    LandCover,
    CoastalProximity,
    Bathymetry,
    CurrentStrength,
    Rainfall,
    StreamDensity,
    SolarPotential,
    WindPotential,
    TidalPotential,
    HydroPotential,
}

impl Factor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::SolarRadiation => "solarRadiation",
            Factor::Elevation => "elevation",
            Factor::Slope => "slope",
            Factor::WindSpeed => "windSpeed",
            Factor::Infrastructure => "infrastructure",
            Factor::Aspect => "aspect",
            Factor::LandCover => "landCover",
            Factor::CoastalProximity => "coastalProximity",
            Factor::Bathymetry => "bathymetry",
            Factor::CurrentStrength => "currentStrength",
            Factor::Rainfall => "rainfall",
            Factor::StreamDensity => "streamDensity",
            Factor::SolarPotential => "solarPotential",
            Factor::WindPotential => "windPotential",
            Factor::TidalPotential => "tidalPotential",
            Factor::HydroPotential => "hydroPotential",
        }
    }

    /// Store layer read directly by raw factors
    pub fn source_layer(&self) -> Option<LayerName> {
        match self {
            Factor::SolarRadiation => Some(LayerName::SolarIrradiance),
            Factor::Elevation => Some(LayerName::Elevation),
            Factor::WindSpeed => Some(LayerName::WindSpeed),
            Factor::Infrastructure => Some(LayerName::InfrastructureAccess),
            Factor::CurrentStrength => Some(LayerName::CurrentStrength),
            Factor::Rainfall => Some(LayerName::Rainfall),
            Factor::StreamDensity => Some(LayerName::StreamDensity),
            Factor::Slope
            | Factor::Aspect
            | Factor::LandCover
            | Factor::CoastalProximity
            | Factor::Bathymetry
            | Factor::SolarPotential
            | Factor::WindPotential
            | Factor::TidalPotential
            | Factor::HydroPotential => None,
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-negative weights per factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable {
    weights: BTreeMap<Factor, f64>,
}

impl WeightTable {
    pub fn new<I>(weights: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Factor, f64)>,
    {
        let table = Self {
            weights: weights.into_iter().collect(),
        };
        table.validate()?;
        Ok(table)
    }

    /// Built-in weights per energy type
    pub fn default_for(energy_type: EnergyType) -> Self {
        let weights: &[(Factor, f64)] = match energy_type {
            EnergyType::Solar => &[
                (Factor::SolarRadiation, 0.4),
                (Factor::Elevation, 0.2),
                (Factor::Slope, 0.15),
                (Factor::Aspect, 0.1),
                (Factor::LandCover, 0.1),
                (Factor::Infrastructure, 0.05),
                (Factor::SolarPotential, 0.3),
            ],
            EnergyType::Wind => &[
                (Factor::WindSpeed, 0.4),
                (Factor::Elevation, 0.2),
                (Factor::Slope, 0.15),
                (Factor::LandCover, 0.15),
                (Factor::Infrastructure, 0.1),
                (Factor::WindPotential, 0.3),
            ],
            EnergyType::Tidal => &[
                (Factor::CoastalProximity, 0.5),
                (Factor::Bathymetry, 0.3),
                (Factor::CurrentStrength, 0.2),
                (Factor::TidalPotential, 0.3),
            ],
            EnergyType::Hydro => &[
                (Factor::Elevation, 0.3),
                (Factor::Rainfall, 0.25),
                (Factor::StreamDensity, 0.25),
                (Factor::Slope, 0.2),
                (Factor::HydroPotential, 0.3),
            ],
        };
        Self {
            weights: weights.iter().copied().collect(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (&factor, &weight) in &self.weights {
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(SitingError::InvalidWeight { factor, weight });
            }
        }
        Ok(())
    }

    pub fn get(&self, factor: Factor) -> Option<f64> {
        self.weights.get(&factor).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        self.weights.iter().map(|(f, w)| (*f, *w))
    }

    pub fn factors(&self) -> impl Iterator<Item = Factor> + '_ {
        self.weights.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Factor layers of one run over the analysis grid
#[derive(Debug, Clone)]
pub struct FactorBundle {
    energy_type: EnergyType,
    points: Vec<Point>,
    frame: GridFrame,
    layers: BTreeMap<Factor, Layer<f64>>,
}

impl FactorBundle {
    pub fn new(energy_type: EnergyType, points: Vec<Point>, frame: GridFrame) -> Self {
        Self {
            energy_type,
            points,
            frame,
            layers: BTreeMap::new(),
        }
    }

    /// Build the raw layer of every weighted factor
    ///
    /// Points lacking a factor's inputs are absent from that factor's layer.
    pub fn assemble(
        weights: &WeightTable,
        inputs: &PotentialInputs<'_>,
        potential: &PotentialResult,
    ) -> Self {
        let mut bundle = Self::new(potential.energy_type, inputs.points.to_vec(), inputs.frame);
        for factor in weights.factors() {
            let layer = raw_factor_layer(factor, inputs, potential);
            if layer.is_empty() {
                tracing::debug!(%factor, energy = %potential.energy_type, "Factor has no samples");
            }
            bundle.insert(factor, layer);
        }
        bundle
    }

    pub fn insert(&mut self, factor: Factor, layer: Layer<f64>) {
        self.layers.insert(factor, layer);
    }

    pub fn energy_type(&self) -> EnergyType {
        self.energy_type
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn frame(&self) -> GridFrame {
        self.frame
    }

    pub fn get(&self, factor: Factor) -> Option<&Layer<f64>> {
        self.layers.get(&factor)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, &Layer<f64>)> + '_ {
        self.layers.iter().map(|(f, l)| (*f, l))
    }

    /// Apply `f` to every layer, keeping points and energy type
    pub fn map_layers<F>(&self, f: F) -> Self
    where
        F: Fn(Factor, &Layer<f64>) -> Layer<f64>,
    {
        Self {
            energy_type: self.energy_type,
            points: self.points.clone(),
            frame: self.frame,
            layers: self
                .layers
                .iter()
                .map(|(factor, layer)| (*factor, f(*factor, layer)))
                .collect(),
        }
    }

    /// Min-max normalize every factor layer
    pub fn normalized(&self) -> Self {
        self.map_layers(|_, layer| normalize(layer))
    }
}

fn raw_factor_layer(factor: Factor, inputs: &PotentialInputs<'_>, potential: &PotentialResult) -> Layer<f64> {
    let frame = inputs.frame;
    let store = inputs.store;
    let terrain = inputs.terrain;

    if let Some(name) = factor.source_layer() {
        return match store.layer(name) {
            Some(layer) => sample(factor, frame, inputs.points, |p| layer.get(p).copied()),
            None => Layer::new(factor.as_str(), frame),
        };
    }

    match factor {
        Factor::Slope => {
            let energy = potential.energy_type;
            sample(factor, frame, inputs.points, |p| {
                terrain
                    .slope
                    .get(p)
                    .map(|&s| energy.slope_suitability(s, inputs.latitude))
            })
        }
        Factor::Aspect => sample(factor, frame, inputs.points, |p| {
            terrain.aspect.get(p).map(|&a| solar::aspect_factor(a))
        }),
        Factor::LandCover => sample(factor, frame, inputs.points, |p| {
            store.land_cover_at(p).map(|cover| cover.wind_factor())
        }),
        Factor::CoastalProximity => sample(factor, frame, inputs.points, |p| {
            store
                .value(LayerName::CoastalDistance, p)
                .map(tidal::distance_factor)
        }),
        Factor::Bathymetry => sample(factor, frame, inputs.points, |p| {
            store.value(LayerName::Bathymetry, p).map(tidal::depth_factor)
        }),
        Factor::SolarPotential
        | Factor::WindPotential
        | Factor::TidalPotential
        | Factor::HydroPotential => {
            if potential.energy_type.potential_factor() == factor {
                sample(factor, frame, inputs.points, |p| potential.layer.get(p).copied())
            } else {
                tracing::warn!(
                    %factor,
                    energy = %potential.energy_type,
                    "Potential factor of another energy type is not available"
                );
                Layer::new(factor.as_str(), frame)
            }
        }
        // Raw layer factors handled above
        Factor::SolarRadiation
        | Factor::Elevation
        | Factor::WindSpeed
        | Factor::Infrastructure
        | Factor::CurrentStrength
        | Factor::Rainfall
        | Factor::StreamDensity => Layer::new(factor.as_str(), frame),
    }
}

fn sample<F>(factor: Factor, frame: GridFrame, points: &[Point], value_at: F) -> Layer<f64>
where
    F: Fn(Point) -> Option<f64> + Sync,
{
    let samples: Vec<(Point, f64)> = points
        .par_iter()
        .filter_map(|&p| value_at(p).filter(|v| v.is_finite()).map(|v| (p, v)))
        .collect();
    Layer::from_entries(factor.as_str(), frame, samples)
}
