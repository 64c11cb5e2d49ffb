use crate::factors::EnergyType;
use crate::ranking::CandidateSpot;

pub const CSV_HEADER: &str = "ID,X,Y,Suitability,Elevation,Solar,Wind,Land Cover,Energy Type";

/// CSV export of ranked candidates
///
/// Suitability and solar carry 3 decimals, elevation 2, wind 1. Missing
/// attributes are left empty.
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn format(candidates: &[CandidateSpot], energy_type: EnergyType) -> String {
        let mut csv = String::with_capacity(64 * (candidates.len() + 1));
        csv.push_str(CSV_HEADER);
        csv.push('\n');

        for (i, spot) in candidates.iter().enumerate() {
            let p = spot.point();
            let attrs = &spot.attributes;
            csv.push_str(&format!(
                "{},{},{},{:.3},{},{},{},{},{}\n",
                i + 1,
                p.x,
                p.y,
                spot.suitability(),
                fixed(attrs.elevation, 2),
                fixed(attrs.solar, 3),
                fixed(attrs.wind, 1),
                attrs.land_cover.map(|c| c.as_str()).unwrap_or(""),
                energy_type,
            ));
        }

        csv
    }
}

fn fixed(value: Option<f64>, places: usize) -> String {
    value
        .map(|v| format!("{:.*}", places, v))
        .unwrap_or_default()
}
