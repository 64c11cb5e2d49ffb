/// Land Cover Categories
///
/// Closed set of land-cover classes used by the wind potential and by the
/// land-cover constraint. Labels are parsed case-insensitively; anything that
/// is not recognised becomes `Unknown`, which never fails a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Factor applied to classes without a documented wind suitability
pub const UNKNOWN_LAND_COVER_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandCover {
    Water,
    Grassland,
    Agricultural,
    Mountain,
    Forest,
    Urban,
    Unknown,
}

impl LandCover {
    pub const ALL: [LandCover; 7] = [
        LandCover::Water,
        LandCover::Grassland,
        LandCover::Agricultural,
        LandCover::Mountain,
        LandCover::Forest,
        LandCover::Urban,
        LandCover::Unknown,
    ];

    /// Parse a label, falling back to `Unknown`
    ///
    /// # Examples
    /// - "Forest" → Forest
    /// - " water " → Water
    /// - "wetland" → Unknown
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "water" => LandCover::Water,
            "grassland" => LandCover::Grassland,
            "agricultural" => LandCover::Agricultural,
            "mountain" => LandCover::Mountain,
            "forest" => LandCover::Forest,
            "urban" => LandCover::Urban,
            _ => LandCover::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LandCover::Water => "water",
            LandCover::Grassland => "grassland",
            LandCover::Agricultural => "agricultural",
            LandCover::Mountain => "mountain",
            LandCover::Forest => "forest",
            LandCover::Urban => "urban",
            LandCover::Unknown => "unknown",
        }
    }

    /// Wind suitability of the surface (open water best, built-up worst)
    pub fn wind_factor(&self) -> f64 {
        match self {
            LandCover::Water => 1.0,
            LandCover::Grassland => 0.9,
            LandCover::Agricultural => 0.8,
            LandCover::Mountain => 0.7,
            LandCover::Forest => 0.6,
            LandCover::Urban => 0.4,
            LandCover::Unknown => UNKNOWN_LAND_COVER_FACTOR,
        }
    }
}

impl fmt::Display for LandCover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LandCover {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels() {
        assert_eq!(LandCover::from_label("Forest"), LandCover::Forest);
        assert_eq!(LandCover::from_label(" water "), LandCover::Water);
        assert_eq!(LandCover::from_label("wetland"), LandCover::Unknown);
        assert_eq!("URBAN".parse::<LandCover>().unwrap(), LandCover::Urban);
    }

    #[test]
    fn test_wind_factors() {
        assert_eq!(LandCover::Water.wind_factor(), 1.0);
        assert_eq!(LandCover::Urban.wind_factor(), 0.4);
        assert_eq!(LandCover::from_label("tundra").wind_factor(), 0.5);
    }

    #[test]
    fn test_labels_round_trip() {
        for cover in LandCover::ALL {
            assert_eq!(LandCover::from_label(cover.as_str()), cover);
        }
    }
}
