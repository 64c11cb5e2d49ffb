use crate::factors::EnergyType;
use crate::ranking::CandidateSpot;
use serde_json::{json, Value};

/// GeoJSON export of ranked candidates
///
/// One `Point` feature per candidate with coordinates `[x, y]`; properties
/// `id` (1-based position), `suitability`, `elevation`, `solar`, `wind`,
/// `landCover`, `energyType`. Missing attributes are `null`.
pub struct GeoJsonFormatter;

impl GeoJsonFormatter {
    pub fn feature_collection(candidates: &[CandidateSpot], energy_type: EnergyType) -> Value {
        let features: Vec<Value> = candidates
            .iter()
            .enumerate()
            .map(|(i, spot)| {
                let p = spot.point();
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [p.x, p.y],
                    },
                    "properties": {
                        "id": i + 1,
                        "suitability": spot.suitability(),
                        "elevation": spot.attributes.elevation,
                        "solar": spot.attributes.solar,
                        "wind": spot.attributes.wind,
                        "landCover": spot.attributes.land_cover.map(|c| c.as_str()),
                        "energyType": energy_type.as_str(),
                    },
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }

    pub fn format(candidates: &[CandidateSpot], energy_type: EnergyType) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::feature_collection(candidates, energy_type))
    }
}
