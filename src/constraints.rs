//! Siting constraints
//!
//! Each point gets a multiplicative constraint factor:
//!   - inside an exclusion zone           → × 0
//!   - slope above `max_slope`            → × 0
//!   - elevation outside [min, max]       → × 0.5
//!   - land cover in the restricted set   → × 0
//!
//! A rule whose input is unknown at a point (no elevation, slope or land-cover
//! sample) is not applied there. Constrained values are therefore never above
//! their inputs.

use crate::factors::EnergyType;
use crate::geometry::{Point, Polygon};
use crate::layer::{GridFrame, Layer};
use crate::utils::land_cover::LandCover;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Multiplier for points outside the elevation band
pub const ELEVATION_DISCOUNT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExclusionKind {
    ProtectedArea,
    WaterBody,
    UrbanArea,
}

/// Named polygon in which no development is allowed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionZone {
    pub name: String,
    pub kind: ExclusionKind,
    pub polygon: Polygon,
}

impl ExclusionZone {
    pub fn new(name: impl Into<String>, kind: ExclusionKind, polygon: Polygon) -> Self {
        Self {
            name: name.into(),
            kind,
            polygon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConstraintConfig {
    pub exclusion_zones: Vec<ExclusionZone>,
    pub max_slope: Option<f64>,
    pub min_elevation: Option<f64>,
    pub max_elevation: Option<f64>,
    pub land_cover_restrictions: Vec<LandCover>,
}

impl Default for ConstraintConfig {
    fn default() -> Self {
        Self {
            exclusion_zones: Vec::new(),
            max_slope: Some(30.0),
            min_elevation: Some(0.0),
            max_elevation: Some(2000.0),
            land_cover_restrictions: vec![LandCover::Water, LandCover::Urban],
        }
    }
}

impl ConstraintConfig {
    /// Built-in constraints per energy type
    pub fn default_for(energy_type: EnergyType) -> Self {
        match energy_type {
            EnergyType::Solar | EnergyType::Wind => Self::default(),
            EnergyType::Hydro => Self {
                land_cover_restrictions: vec![LandCover::Urban],
                ..Self::default()
            },
            // Tidal sites sit offshore: no terrain limits, water allowed
            EnergyType::Tidal => Self {
                max_slope: None,
                min_elevation: None,
                max_elevation: None,
                land_cover_restrictions: vec![LandCover::Urban],
                ..Self::default()
            },
        }
    }

    /// No rules at all
    pub fn unconstrained() -> Self {
        Self {
            exclusion_zones: Vec::new(),
            max_slope: None,
            min_elevation: None,
            max_elevation: None,
            land_cover_restrictions: Vec::new(),
        }
    }

    pub fn with_exclusion(mut self, zone: ExclusionZone) -> Self {
        self.exclusion_zones.push(zone);
        self
    }

    pub fn is_excluded(&self, point: Point) -> bool {
        self.exclusion_zones
            .iter()
            .any(|zone| zone.polygon.contains(point))
    }

    /// Multiplicative factor in {0, 0.5, 1} for one point
    pub fn factor_at(&self, point: Point, site: &SiteContext<'_>) -> f64 {
        if self.is_excluded(point) {
            return 0.0;
        }

        let mut factor = 1.0;

        if let (Some(max_slope), Some(slope)) = (self.max_slope, site.slope(point)) {
            if slope > max_slope {
                factor *= 0.0;
            }
        }

        if let Some(elevation) = site.elevation(point) {
            let too_low = self.min_elevation.is_some_and(|min| elevation < min);
            let too_high = self.max_elevation.is_some_and(|max| elevation > max);
            if too_low || too_high {
                factor *= ELEVATION_DISCOUNT;
            }
        }

        if let Some(cover) = site.land_cover(point) {
            if self.land_cover_restrictions.contains(&cover) {
                factor *= 0.0;
            }
        }

        factor
    }
}

/// Attribute layers the constraint rules read
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteContext<'a> {
    pub elevation: Option<&'a Layer<f64>>,
    pub slope: Option<&'a Layer<f64>>,
    pub land_cover: Option<&'a Layer<LandCover>>,
}

impl SiteContext<'_> {
    fn elevation(&self, point: Point) -> Option<f64> {
        self.elevation?.get(point).copied()
    }

    fn slope(&self, point: Point) -> Option<f64> {
        self.slope?.get(point).copied()
    }

    fn land_cover(&self, point: Point) -> Option<LandCover> {
        self.land_cover?.get(point).copied()
    }
}

/// Constraint factor for every point, in point order
pub fn constraint_mask(
    points: &[Point],
    config: &ConstraintConfig,
    site: &SiteContext<'_>,
    frame: GridFrame,
) -> Layer<f64> {
    let factors: Vec<(Point, f64)> = points
        .par_iter()
        .map(|&p| (p, config.factor_at(p, site)))
        .collect();
    Layer::from_entries("constraint_mask", frame, factors)
}

/// Multiply a factor layer by a mask; points absent from the mask are kept
pub fn apply_mask(layer: &Layer<f64>, mask: &Layer<f64>) -> Layer<f64> {
    layer.map(layer.name().to_string(), |p, &v| {
        v * mask.get(p).copied().unwrap_or(1.0)
    })
}

/// Apply the rules to a factor layer directly
pub fn apply_constraints(
    layer: &Layer<f64>,
    config: &ConstraintConfig,
    site: &SiteContext<'_>,
) -> Layer<f64> {
    layer.map(layer.name().to_string(), |p, &v| v * config.factor_at(p, site))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn single(name: &str, value: f64) -> Layer<f64> {
        Layer::from_entries(name, GridFrame::unit(), vec![(Point::new(0.0, 0.0), value)])
    }

    #[test]
    fn test_high_elevation_is_halved() {
        let base = single("solarRadiation", 0.8);
        let elevation = single("elevation", 2500.0);
        let site = SiteContext {
            elevation: Some(&elevation),
            ..Default::default()
        };
        let out = apply_constraints(&base, &ConstraintConfig::default(), &site);
        assert_relative_eq!(*out.get(Point::new(0.0, 0.0)).unwrap(), 0.4);
    }

    #[test]
    fn test_exclusion_beats_everything() {
        let base = single("windSpeed", 0.9);
        let elevation = single("elevation", 2500.0);
        let zone = ExclusionZone::new(
            "reserve",
            ExclusionKind::ProtectedArea,
            Polygon::from_coords(&[(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)]),
        );
        let config = ConstraintConfig::default().with_exclusion(zone);
        let site = SiteContext {
            elevation: Some(&elevation),
            ..Default::default()
        };
        let out = apply_constraints(&base, &config, &site);
        assert_eq!(*out.get(Point::new(0.0, 0.0)).unwrap(), 0.0);
    }

    #[test]
    fn test_steep_and_restricted_cover_zeroed() {
        let slope = single("slope", 35.0);
        let cover = Layer::from_entries(
            "land_cover",
            GridFrame::unit(),
            vec![(Point::new(1.0, 0.0), LandCover::Urban)],
        );
        let site = SiteContext {
            slope: Some(&slope),
            land_cover: Some(&cover),
            ..Default::default()
        };
        let config = ConstraintConfig::default();
        assert_eq!(config.factor_at(Point::new(0.0, 0.0), &site), 0.0);
        assert_eq!(config.factor_at(Point::new(1.0, 0.0), &site), 0.0);
    }

    #[test]
    fn test_unknown_attributes_not_penalised() {
        let config = ConstraintConfig::default();
        let site = SiteContext::default();
        assert_eq!(config.factor_at(Point::new(3.0, 3.0), &site), 1.0);
    }

    #[test]
    fn test_tidal_allows_water_and_depth() {
        let config = ConstraintConfig::default_for(EnergyType::Tidal);
        let elevation = single("elevation", -40.0);
        let cover = Layer::from_entries(
            "land_cover",
            GridFrame::unit(),
            vec![(Point::new(0.0, 0.0), LandCover::Water)],
        );
        let site = SiteContext {
            elevation: Some(&elevation),
            land_cover: Some(&cover),
            ..Default::default()
        };
        assert_eq!(config.factor_at(Point::new(0.0, 0.0), &site), 1.0);
    }

    #[test]
    fn test_mask_never_increases_values() {
        let points: Vec<Point> = (0..4).map(|i| Point::new(i as f64, 0.0)).collect();
        let base = Layer::from_entries("f", GridFrame::unit(), points.iter().map(|&p| (p, 0.6)));
        let elevation = Layer::from_entries(
            "elevation",
            GridFrame::unit(),
            points.iter().map(|&p| (p, -50.0 + p.x * 1000.0)),
        );
        let site = SiteContext {
            elevation: Some(&elevation),
            ..Default::default()
        };
        let mask = constraint_mask(&points, &ConstraintConfig::default(), &site, GridFrame::unit());
        let out = apply_mask(&base, &mask);
        for (p, &v) in out.iter() {
            assert!(v <= *base.get(p).unwrap());
        }
        // -50 m and 2950 m are outside the band
        assert_relative_eq!(*out.get(Point::new(0.0, 0.0)).unwrap(), 0.3);
        assert_relative_eq!(*out.get(Point::new(1.0, 0.0)).unwrap(), 0.6);
        assert_relative_eq!(*out.get(Point::new(3.0, 0.0)).unwrap(), 0.3);
    }

    #[test]
    fn test_config_from_json() {
        let config: ConstraintConfig = serde_json::from_str(
            r#"{"maxSlope": 20.0, "landCoverRestrictions": ["forest"],
                "exclusionZones": [{"name": "lake", "kind": "waterBody",
                  "polygon": [{"x": 0.0, "y": 0.0}, {"x": 1.0, "y": 0.0}, {"x": 0.0, "y": 1.0}]}]}"#,
        )
        .unwrap();
        assert_eq!(config.max_slope, Some(20.0));
        assert_eq!(config.max_elevation, Some(2000.0));
        assert_eq!(config.land_cover_restrictions, vec![LandCover::Forest]);
        assert_eq!(config.exclusion_zones[0].kind, ExclusionKind::WaterBody);
    }
}
