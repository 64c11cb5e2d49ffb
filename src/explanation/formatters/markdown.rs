use crate::explanation::types::AnalysisReport;
use crate::ranking::CandidateSpot;
use crate::utils::resource_bands::{classify_solar, classify_wind};

/// Markdown formatter for analysis reports
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Format report and candidate table as markdown
    pub fn format(report: &AnalysisReport, candidates: &[CandidateSpot]) -> String {
        let mut md = String::with_capacity(2048);

        md.push_str(&format!(
            "# {} Energy Site Analysis - {} Suitability\n\n",
            capitalize(report.energy_type.as_str()),
            report.band.label()
        ));
        md.push_str(&format!("**Area:** {:.4} square units  \n", report.total_area));
        md.push_str(&format!(
            "**Grid points:** {} ({} scored)  \n",
            report.grid_point_count, report.scored_point_count
        ));
        md.push_str(&format!("**Candidates:** {}  \n", report.candidate_count));
        md.push_str(&format!(
            "**Average suitability:** {:.1}%  \n",
            report.average_suitability * 100.0
        ));
        md.push_str(&format!(
            "**Best suitability:** {:.1}%  \n",
            report.max_suitability * 100.0
        ));
        md.push_str(&format!(
            "**Processing time:** {} ms  \n",
            report.processing_time_ms
        ));
        md.push_str(&format!(
            "**Generated:** {}\n\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        md.push_str("## Recommendations\n\n");
        for line in &report.recommendations {
            md.push_str(&format!("- {}\n", line));
        }
        md.push('\n');

        if !candidates.is_empty() {
            Self::format_candidates(&mut md, candidates);
        }

        md
    }

    fn format_candidates(md: &mut String, candidates: &[CandidateSpot]) {
        md.push_str("## Candidate Sites\n\n");
        md.push_str("| Rank | X | Y | Suitability | Elevation | Solar | Wind | Land Cover | Why |\n");
        md.push_str("|------|---|---|-------------|-----------|-------|------|------------|-----|\n");

        for spot in candidates {
            let p = spot.point();
            let attrs = &spot.attributes;

            let elevation = attrs
                .elevation
                .map(|e| format!("{:.0} m", e))
                .unwrap_or_else(|| "-".to_string());
            let solar = attrs
                .solar
                .map(|s| match classify_solar(s) {
                    Some((_, band)) => format!("{:.2} ({})", s, band.label()),
                    None => format!("{:.2}", s),
                })
                .unwrap_or_else(|| "-".to_string());
            let wind = attrs
                .wind
                .map(|w| match classify_wind(w) {
                    Some((_, band)) => format!("{:.1} ({})", w, band.label()),
                    None => format!("{:.1}", w),
                })
                .unwrap_or_else(|| "-".to_string());
            let cover = attrs.land_cover.map(|c| c.as_str()).unwrap_or("-");

            md.push_str(&format!(
                "| {} | {:.4} | {:.4} | {:.1}% | {} | {} | {} | {} | {} |\n",
                spot.rank,
                p.x,
                p.y,
                spot.suitability() * 100.0,
                elevation,
                solar,
                wind,
                cover,
                spot.explanation
            ));
        }
        md.push('\n');
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
