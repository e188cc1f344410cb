//! Plain-text rendering of a [`Recommendation`].

use std::fmt::Write as _;

use land_suitability_analysis_models::{Outcome, Recommendation};

use crate::config::{AnalysisConfig, distance_label};
use crate::rotation::rotation_patterns;

const fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

const fn marker(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::NotSuitable => "[x]",
        Outcome::LimitedWaterAccess | Outcome::TerrainCaution => "[!]",
        Outcome::IncompleteData => "[i]",
        Outcome::Suitable => "[ok]",
    }
}

/// Renders the attribute summary, final recommendation, climatic advice,
/// and rotation suggestions for each known dominant soil.
#[must_use]
pub fn render(recommendation: &Recommendation, config: &AnalysisConfig) -> String {
    let r = recommendation;
    let mut out = String::new();

    writeln!(out, "Suitability Analysis:").unwrap();
    writeln!(out, "  Soil Type (DOMSOI):       {}", r.dom_soils).unwrap();
    writeln!(out, "  FAO Soil Class:           {}", r.fao_soils).unwrap();
    writeln!(out, "  Suggested Crops:          {}", r.crop_types).unwrap();
    writeln!(
        out,
        "  Nearby River (within {}): {}",
        distance_label(config.river_buffer_meters),
        yes_no(r.is_near_river)
    ).unwrap();
    writeln!(
        out,
        "  Nearby Pond (within {}):  {}",
        distance_label(config.pond_buffer_meters),
        yes_no(r.is_near_pond)
    ).unwrap();
    writeln!(
        out,
        "  Built-up Area within {}:  {:.2}%",
        distance_label(config.builtup_buffer_meters),
        r.coverage_pct
    ).unwrap();
    writeln!(out, "  Agro Ecological Zone:     {}", r.agro_zones).unwrap();
    writeln!(out, "  Climatic Zone:            {}", r.climatic_zones).unwrap();
    writeln!(out, "  Terrain:                  {}", r.terrains).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "Final Recommendation:").unwrap();
    writeln!(out, "  {} {}", marker(r.outcome), r.message).unwrap();

    if let Some(advisory) = &r.climatic_advisory {
        writeln!(out, "  Climatic Advice: {advisory}").unwrap();
    }

    let rotations = rotation_patterns(&r.dom_soils);
    if !rotations.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "Crop Rotation:").unwrap();
        for (soil, pattern) in rotations {
            writeln!(out, "  {soil}: {pattern}").unwrap();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use land_suitability_analysis_models::{AttributeSet, NOT_AVAILABLE, UNKNOWN};

    use super::*;

    fn set(values: &[&str], sentinel: &str) -> AttributeSet {
        AttributeSet::collect(values.iter().map(|v| Some((*v).to_string())), sentinel)
    }

    fn recommendation() -> Recommendation {
        Recommendation {
            outcome: Outcome::Suitable,
            message: "Suitable for agriculture. Best crops: Maize".to_string(),
            dom_soils: set(&["Loam"], UNKNOWN),
            fao_soils: set(&["Lf"], UNKNOWN),
            crop_types: set(&["Maize"], NOT_AVAILABLE),
            is_near_river: true,
            is_near_pond: false,
            coverage_pct: 4.5678,
            agro_zones: set(&["WL2a"], UNKNOWN),
            climatic_zones: set(&["Wet Zone"], UNKNOWN),
            terrains: set(&["Flat"], UNKNOWN),
            climatic_advisory: Some("This area is in the Wet Zone zone.".to_string()),
        }
    }

    #[test]
    fn renders_summary_and_recommendation() {
        let text = render(&recommendation(), &AnalysisConfig::default());
        assert!(text.contains("Soil Type (DOMSOI):       Loam"));
        assert!(text.contains("Nearby River (within 500m): Yes"));
        assert!(text.contains("Nearby Pond (within 300m):  No"));
        assert!(text.contains("Built-up Area within 1km:  4.57%"));
        assert!(text.contains("[ok] Suitable for agriculture. Best crops: Maize"));
        assert!(text.contains("Climatic Advice: This area is in the Wet Zone zone."));
        assert!(text.contains("Loam: Season 1: Maize"));
    }

    #[test]
    fn unknown_soil_has_no_rotation_section() {
        let mut rec = recommendation();
        rec.dom_soils = set(&[], UNKNOWN);
        rec.climatic_advisory = None;
        let text = render(&rec, &AnalysisConfig::default());
        assert!(!text.contains("Crop Rotation:"));
        assert!(!text.contains("Climatic Advice"));
    }
}
