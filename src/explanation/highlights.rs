//! Per-candidate explanations
//!
//! A candidate's explanation lists the human-readable label of every factor
//! whose normalized value exceeds 0.7, in factor order, joined with ", ".
//! Candidates with no strong factor read "Moderate suitability".

use crate::combination::SuitabilityScore;
use crate::factors::Factor;
use smallvec::SmallVec;

/// Factor value above which a factor is called out
pub const HIGHLIGHT_THRESHOLD: f64 = 0.7;

pub const FALLBACK_EXPLANATION: &str = "Moderate suitability";

/// Label used when a factor stands out
pub fn factor_highlight(factor: Factor) -> &'static str {
    match factor {
        Factor::SolarRadiation => "High solar radiation",
        Factor::Elevation => "Optimal elevation",
        Factor::Slope => "Suitable slope",
        Factor::WindSpeed => "Strong wind resources",
        Factor::Infrastructure => "Good infrastructure access",
        Factor::Aspect => "Favourable aspect",
        Factor::LandCover => "Compatible land cover",
        Factor::CoastalProximity => "Close to the coast",
        Factor::Bathymetry => "Suitable water depth",
        Factor::CurrentStrength => "Strong tidal currents",
        Factor::Rainfall => "High rainfall",
        Factor::StreamDensity => "Dense stream network",
        Factor::SolarPotential => "High solar potential",
        Factor::WindPotential => "High wind potential",
        Factor::TidalPotential => "High tidal potential",
        Factor::HydroPotential => "High hydro potential",
    }
}

/// Factors of a score above the highlight threshold
pub fn strong_factors(score: &SuitabilityScore) -> SmallVec<[Factor; 8]> {
    score
        .breakdown
        .iter()
        .filter(|(_, &value)| value > HIGHLIGHT_THRESHOLD)
        .map(|(&factor, _)| factor)
        .collect()
}

pub fn explain_score(score: &SuitabilityScore) -> String {
    let labels: SmallVec<[&'static str; 8]> = strong_factors(score)
        .into_iter()
        .map(factor_highlight)
        .collect();

    if labels.is_empty() {
        FALLBACK_EXPLANATION.to_string()
    } else {
        labels.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::EnergyType;
    use crate::geometry::Point;
    use std::collections::BTreeMap;

    fn score(entries: &[(Factor, f64)]) -> SuitabilityScore {
        SuitabilityScore {
            point: Point::new(0.0, 0.0),
            energy_type: EnergyType::Solar,
            value: 0.5,
            breakdown: entries.iter().copied().collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_explanation_lists_strong_factors_in_order() {
        let s = score(&[
            (Factor::Infrastructure, 0.9),
            (Factor::SolarRadiation, 0.95),
            (Factor::Slope, 0.7),
        ]);
        assert_eq!(explain_score(&s), "High solar radiation, Good infrastructure access");
    }

    #[test]
    fn test_explanation_fallback() {
        let s = score(&[(Factor::Elevation, 0.3)]);
        assert_eq!(explain_score(&s), FALLBACK_EXPLANATION);
    }
}
