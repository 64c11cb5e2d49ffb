//! Analysis configuration
//!
//! Every tunable of a run lives in `AnalysisConfig`. Unset fields fall back to
//! the built-in defaults, so a config file only needs the values it changes:
//!
//! ```json
//! {
//!   "gridStep": 0.5,
//!   "latitude": 52.0,
//!   "weights": { "solar": { "solarRadiation": 0.6, "slope": 0.4 } },
//!   "constraints": { "wind": { "maxSlope": 20.0 } }
//! }
//! ```

use crate::classification::EnergyThresholds;
use crate::constraints::ConstraintConfig;
use crate::error::{Result, SitingError};
use crate::factors::{EnergyType, WeightTable};
use crate::fetch::FetchConfig;
use crate::potentials::{HydroStrategy, DEFAULT_REFERENCE_LATITUDE};
use crate::ranking::DEFAULT_TOP_N;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Spacing of the analysis grid, in coordinate units
    pub grid_step: f64,
    /// Horizontal cell size used by the slope kernel, in elevation units
    pub cell_size: f64,
    /// Site latitude for the solar tilt optimum (defaults to 40°N)
    pub latitude: Option<f64>,
    pub top_n: usize,
    pub hydro_strategy: HydroStrategy,
    /// Points per progress/cancellation step
    pub chunk_size: usize,
    /// Per-energy-type overrides of the built-in weights
    pub weights: BTreeMap<EnergyType, WeightTable>,
    /// Per-energy-type overrides of the built-in constraints
    pub constraints: BTreeMap<EnergyType, ConstraintConfig>,
    /// Per-type scores a point needs to count as suitable in comparisons
    pub thresholds: EnergyThresholds,
    pub fetch: FetchConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            grid_step: 1.0,
            cell_size: 1.0,
            latitude: None,
            top_n: DEFAULT_TOP_N,
            hydro_strategy: HydroStrategy::default(),
            chunk_size: 1024,
            weights: BTreeMap::new(),
            constraints: BTreeMap::new(),
            thresholds: EnergyThresholds::default(),
            fetch: FetchConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_json(&contents)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: AnalysisConfig =
            serde_json::from_str(json).with_context(|| "Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.grid_step.is_finite() && self.grid_step > 0.0) {
            return Err(SitingError::InvalidGridStep(self.grid_step));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(SitingError::InvalidConfig(format!(
                "cell size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.chunk_size == 0 {
            return Err(SitingError::InvalidConfig("chunk size must be positive".to_string()));
        }
        if self.fetch.batch_size == 0 {
            return Err(SitingError::InvalidConfig("fetch batch size must be positive".to_string()));
        }
        for table in self.weights.values() {
            table.validate()?;
        }
        self.thresholds.validate()?;
        Ok(())
    }

    pub fn reference_latitude(&self) -> f64 {
        self.latitude.unwrap_or(DEFAULT_REFERENCE_LATITUDE)
    }

    pub fn weights_for(&self, energy_type: EnergyType) -> WeightTable {
        self.weights
            .get(&energy_type)
            .cloned()
            .unwrap_or_else(|| WeightTable::default_for(energy_type))
    }

    pub fn constraints_for(&self, energy_type: EnergyType) -> ConstraintConfig {
        self.constraints
            .get(&energy_type)
            .cloned()
            .unwrap_or_else(|| ConstraintConfig::default_for(energy_type))
    }
}
