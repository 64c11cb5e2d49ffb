//! Candidate ranking
//!
//! Keeps scores strictly above 0.3, sorts them by value (descending, stable so
//! grid order breaks ties), truncates to the top N and numbers them 1, 2, 3...

use crate::combination::SuitabilityScore;
use crate::data::{LayerName, LayerStore};
use crate::explanation::highlights::explain_score;
use crate::geometry::Point;
use crate::utils::land_cover::LandCover;
use serde::{Deserialize, Serialize};

/// Scores at or below this value are never candidates
pub const MIN_SUITABILITY: f64 = 0.3;

pub const DEFAULT_TOP_N: usize = 20;

/// Raw attributes reported alongside a candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteAttributes {
    pub elevation: Option<f64>,
    pub solar: Option<f64>,
    pub wind: Option<f64>,
    pub land_cover: Option<LandCover>,
}

impl SiteAttributes {
    pub fn from_store(store: &LayerStore, point: Point) -> Self {
        Self {
            elevation: store.value(LayerName::Elevation, point),
            solar: store.value(LayerName::SolarIrradiance, point),
            wind: store.value(LayerName::WindSpeed, point),
            land_cover: store.land_cover_at(point),
        }
    }
}

/// Ranked candidate site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSpot {
    /// 1-based position in the ranking
    pub rank: usize,
    pub score: SuitabilityScore,
    pub explanation: String,
    pub attributes: SiteAttributes,
}

impl CandidateSpot {
    pub fn point(&self) -> Point {
        self.score.point
    }

    pub fn suitability(&self) -> f64 {
        self.score.value
    }

    pub fn with_attributes(mut self, attributes: SiteAttributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Rank scores into at most `top_n` candidates
pub fn rank_candidates<'a, I>(scores: I, top_n: usize) -> Vec<CandidateSpot>
where
    I: IntoIterator<Item = &'a SuitabilityScore>,
{
    let mut kept: Vec<&SuitabilityScore> = scores
        .into_iter()
        .filter(|s| s.value > MIN_SUITABILITY)
        .collect();

    // sort_by is stable: equal values keep grid order
    kept.sort_by(|a, b| b.value.total_cmp(&a.value));
    kept.truncate(top_n);

    kept.into_iter()
        .enumerate()
        .map(|(i, score)| CandidateSpot {
            rank: i + 1,
            explanation: explain_score(score),
            score: score.clone(),
            attributes: SiteAttributes::default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::{EnergyType, Factor};
    use std::collections::BTreeMap;

    fn score(x: f64, value: f64) -> SuitabilityScore {
        SuitabilityScore {
            point: Point::new(x, 0.0),
            energy_type: EnergyType::Wind,
            value,
            breakdown: BTreeMap::from([(Factor::WindSpeed, value)]),
        }
    }

    #[test]
    fn test_threshold_sort_and_rank() {
        let scores = vec![score(0.0, 0.9), score(1.0, 0.5), score(2.0, 0.2), score(3.0, 0.35)];
        let ranked = rank_candidates(&scores, DEFAULT_TOP_N);

        let values: Vec<f64> = ranked.iter().map(CandidateSpot::suitability).collect();
        assert_eq!(values, vec![0.9, 0.5, 0.35]);
        assert_eq!(ranked.iter().map(|c| c.rank).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(ranked[0].explanation, "Strong wind resources");
        assert_eq!(ranked[1].explanation, "Moderate suitability");
    }

    #[test]
    fn test_threshold_is_strict() {
        let scores = vec![score(0.0, 0.3), score(1.0, 0.300001)];
        let ranked = rank_candidates(&scores, DEFAULT_TOP_N);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].point(), Point::new(1.0, 0.0));
    }

    #[test]
    fn test_ties_keep_input_order_and_truncate() {
        let scores: Vec<SuitabilityScore> = (0..30).map(|i| score(i as f64, 0.6)).collect();
        let ranked = rank_candidates(&scores, 5);
        assert_eq!(ranked.len(), 5);
        let xs: Vec<f64> = ranked.iter().map(|c| c.point().x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_zero_top_n() {
        let scores = vec![score(0.0, 0.9)];
        assert!(rank_candidates(&scores, 0).is_empty());
    }
}
