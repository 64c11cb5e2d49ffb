//! Per-point energy classification
//!
//! Given each energy type's score at a point, decide which types clear their
//! threshold, which type is best, and whether the point is a multi-source site
//! (more than one type qualifies, a hybrid candidate).
//!
//! A type with no score at a point is treated as not suitable there.

use crate::combination::SuitabilityScore;
use crate::error::{Result, SitingError};
use crate::factors::EnergyType;
use crate::geometry::Point;
use crate::layer::Layer;
use crate::potentials::weather::WeatherSample;
use crate::potentials::WeatherPotentials;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Minimum score for a type to count as suitable at a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnergyThresholds {
    pub solar: f64,
    pub wind: f64,
    pub tidal: f64,
    pub hydro: f64,
}

impl Default for EnergyThresholds {
    fn default() -> Self {
        Self {
            solar: 0.4,
            wind: 0.3,
            tidal: 0.3,
            hydro: 0.3,
        }
    }
}

impl EnergyThresholds {
    pub fn for_type(&self, energy_type: EnergyType) -> f64 {
        match energy_type {
            EnergyType::Solar => self.solar,
            EnergyType::Wind => self.wind,
            EnergyType::Tidal => self.tidal,
            EnergyType::Hydro => self.hydro,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for energy_type in EnergyType::ALL {
            let threshold = self.for_type(energy_type);
            if !(0.0..=1.0).contains(&threshold) {
                return Err(SitingError::InvalidConfig(format!(
                    "{} threshold must lie in [0, 1], got {}",
                    energy_type, threshold
                )));
            }
        }
        Ok(())
    }
}

/// Site class of a point: one qualifying type, several, or none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteClass {
    Solar,
    Wind,
    Tidal,
    Hydro,
    Multi,
    None,
}

impl SiteClass {
    pub fn from_suitable(suitable: &[EnergyType]) -> Self {
        match suitable {
            [] => SiteClass::None,
            [EnergyType::Solar] => SiteClass::Solar,
            [EnergyType::Wind] => SiteClass::Wind,
            [EnergyType::Tidal] => SiteClass::Tidal,
            [EnergyType::Hydro] => SiteClass::Hydro,
            _ => SiteClass::Multi,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteClass::Solar => "solar",
            SiteClass::Wind => "wind",
            SiteClass::Tidal => "tidal",
            SiteClass::Hydro => "hydro",
            SiteClass::Multi => "multi",
            SiteClass::None => "none",
        }
    }
}

impl fmt::Display for SiteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointClassification {
    pub point: Point,
    pub scores: BTreeMap<EnergyType, f64>,
    /// Types at or above their threshold, in `EnergyType::ALL` order
    pub suitable: Vec<EnergyType>,
    /// Highest positive score regardless of thresholds; first type wins ties
    pub best: Option<EnergyType>,
    /// Best score among suitable types, or among all types when none qualifies
    pub best_score: f64,
    pub class: SiteClass,
}

impl PointClassification {
    pub fn is_multi_source(&self) -> bool {
        self.suitable.len() > 1
    }
}

/// Classify one point from its per-type scores
pub fn classify_point(
    point: Point,
    scores: BTreeMap<EnergyType, f64>,
    thresholds: &EnergyThresholds,
) -> PointClassification {
    let suitable: Vec<EnergyType> = EnergyType::ALL
        .into_iter()
        .filter(|t| scores.get(t).is_some_and(|&s| s >= thresholds.for_type(*t)))
        .collect();

    let mut best: Option<(EnergyType, f64)> = None;
    for (&energy_type, &score) in &scores {
        if score > 0.0 && best.map_or(true, |(_, b)| score > b) {
            best = Some((energy_type, score));
        }
    }

    let best_score = if suitable.is_empty() {
        scores.values().copied().fold(0.0, f64::max)
    } else {
        suitable
            .iter()
            .filter_map(|t| scores.get(t).copied())
            .fold(0.0, f64::max)
    };

    PointClassification {
        point,
        class: SiteClass::from_suitable(&suitable),
        suitable,
        best: best.map(|(t, _)| t),
        best_score,
        scores,
    }
}

/// Classify every grid point from per-type score layers
pub fn classify_grid(
    grid: &[Point],
    layers: &[(EnergyType, Layer<SuitabilityScore>)],
    thresholds: &EnergyThresholds,
) -> Vec<PointClassification> {
    grid.par_iter()
        .map(|&p| {
            let scores = layers
                .iter()
                .filter_map(|(energy_type, layer)| layer.get(p).map(|s| (*energy_type, s.value)))
                .collect();
            classify_point(p, scores, thresholds)
        })
        .collect()
}

/// Classify points from their weather observations (solar, wind, hydro)
pub fn classify_weather(samples: &Layer<WeatherSample>, thresholds: &EnergyThresholds) -> Vec<PointClassification> {
    samples
        .iter()
        .map(|(p, sample)| classify_point(p, WeatherPotentials::from_sample(sample).scores(), thresholds))
        .collect()
}

/// Number of points per site class
pub fn class_counts(points: &[PointClassification]) -> BTreeMap<SiteClass, usize> {
    let mut counts = BTreeMap::new();
    for point in points {
        *counts.entry(point.class).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::GridFrame;

    fn scores(entries: &[(EnergyType, f64)]) -> BTreeMap<EnergyType, f64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_point_suitable_for_two_types_is_multi_source() {
        let c = classify_point(
            Point::new(1.0, 2.0),
            scores(&[
                (EnergyType::Solar, 0.45),
                (EnergyType::Wind, 0.62),
                (EnergyType::Hydro, 0.1),
            ]),
            &EnergyThresholds::default(),
        );
        assert_eq!(c.suitable, vec![EnergyType::Solar, EnergyType::Wind]);
        assert_eq!(c.class, SiteClass::Multi);
        assert!(c.is_multi_source());
        assert_eq!(c.best, Some(EnergyType::Wind));
        assert_eq!(c.best_score, 0.62);
    }

    #[test]
    fn test_per_type_thresholds() {
        // 0.35 clears wind (0.3) but not solar (0.4)
        let c = classify_point(
            Point::new(0.0, 0.0),
            scores(&[(EnergyType::Solar, 0.38), (EnergyType::Wind, 0.35)]),
            &EnergyThresholds::default(),
        );
        assert_eq!(c.suitable, vec![EnergyType::Wind]);
        assert_eq!(c.class, SiteClass::Wind);
        assert!(!c.is_multi_source());
        // Best ignores thresholds
        assert_eq!(c.best, Some(EnergyType::Solar));
        assert_eq!(c.best_score, 0.35);
    }

    #[test]
    fn test_no_suitable_type() {
        let c = classify_point(
            Point::new(0.0, 0.0),
            scores(&[(EnergyType::Solar, 0.2), (EnergyType::Hydro, 0.25)]),
            &EnergyThresholds::default(),
        );
        assert_eq!(c.class, SiteClass::None);
        assert_eq!(c.best, Some(EnergyType::Hydro));
        assert_eq!(c.best_score, 0.25);

        let empty = classify_point(Point::new(0.0, 0.0), BTreeMap::new(), &EnergyThresholds::default());
        assert_eq!(empty.best, None);
        assert_eq!(empty.best_score, 0.0);
        assert_eq!(empty.class, SiteClass::None);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let c = classify_point(
            Point::new(0.0, 0.0),
            scores(&[(EnergyType::Hydro, 0.3)]),
            &EnergyThresholds::default(),
        );
        assert_eq!(c.class, SiteClass::Hydro);
    }

    #[test]
    fn test_classify_grid_treats_missing_scores_as_unsuitable() {
        let p = Point::new(0.0, 0.0);
        let q = Point::new(1.0, 0.0);
        let score = |point: Point, energy_type: EnergyType, value: f64| {
            (
                point,
                SuitabilityScore {
                    point,
                    energy_type,
                    value,
                    breakdown: BTreeMap::new(),
                },
            )
        };
        let layers = vec![
            (
                EnergyType::Solar,
                Layer::from_entries("solar", GridFrame::unit(), vec![score(p, EnergyType::Solar, 0.8)]),
            ),
            (
                EnergyType::Tidal,
                Layer::from_entries(
                    "tidal",
                    GridFrame::unit(),
                    vec![score(p, EnergyType::Tidal, 0.5), score(q, EnergyType::Tidal, 0.1)],
                ),
            ),
        ];

        let classified = classify_grid(&[p, q], &layers, &EnergyThresholds::default());
        assert_eq!(classified[0].class, SiteClass::Multi);
        assert_eq!(classified[0].suitable, vec![EnergyType::Solar, EnergyType::Tidal]);
        assert_eq!(classified[1].class, SiteClass::None);
        assert!(!classified[1].scores.contains_key(&EnergyType::Solar));

        let counts = class_counts(&classified);
        assert_eq!(counts.get(&SiteClass::Multi), Some(&1));
        assert_eq!(counts.get(&SiteClass::None), Some(&1));
    }

    #[test]
    fn test_classify_weather_observation() {
        let samples = Layer::from_entries(
            "weather",
            GridFrame::unit(),
            vec![(
                Point::new(3.0, 3.0),
                WeatherSample {
                    temperature: 15.0,
                    cloud_cover: 80.0,
                    wind_speed: 9.0,
                    humidity: 85.0,
                    pressure: 1002.0,
                    rain_1h: None,
                },
            )],
        );
        let classified = classify_weather(&samples, &EnergyThresholds::default());
        // solar 0.2, wind 0.75, hydro 1.0 (clamped)
        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].suitable, vec![EnergyType::Wind, EnergyType::Hydro]);
        assert_eq!(classified[0].best, Some(EnergyType::Hydro));
        assert_eq!(classified[0].class, SiteClass::Multi);
    }

    #[test]
    fn test_threshold_validation() {
        assert!(EnergyThresholds::default().validate().is_ok());
        let bad = EnergyThresholds {
            wind: 1.5,
            ..EnergyThresholds::default()
        };
        assert!(matches!(bad.validate(), Err(SitingError::InvalidConfig(_))));
    }
}
