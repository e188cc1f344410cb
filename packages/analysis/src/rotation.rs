//! Three-season crop rotation suggestions by soil type.

use land_suitability_analysis_models::{AttributeSet, UNKNOWN};

/// Rotation used for soil types without a specific pattern.
pub const GENERIC_ROTATION: &str = "Generic rotation: Maize → Beans → Vegetables";

const PATTERNS: &[(&str, &str)] = &[
    (
        "Loam",
        "Season 1: Maize → Season 2: Legumes → Season 3: Vegetables",
    ),
    (
        "Clay",
        "Season 1: Rice → Season 2: Green gram → Season 3: Sunflower",
    ),
    (
        "Sandy",
        "Season 1: Groundnut → Season 2: Cowpea → Season 3: Onion",
    ),
];

/// Returns the rotation pattern for `soil_type` (exact, case-sensitive
/// match), or [`GENERIC_ROTATION`].
#[must_use]
pub fn rotation_pattern(soil_type: &str) -> &'static str {
    PATTERNS
        .iter()
        .find(|(soil, _)| *soil == soil_type)
        .map_or(GENERIC_ROTATION, |(_, pattern)| *pattern)
}

/// Rotation patterns for each known soil in `soils`, skipping the
/// unknown sentinel.
#[must_use]
pub fn rotation_patterns(soils: &AttributeSet) -> Vec<(&str, &'static str)> {
    soils
        .iter()
        .filter(|soil| *soil != UNKNOWN)
        .map(|soil| (soil, rotation_pattern(soil)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_soils_have_patterns() {
        assert_eq!(
            rotation_pattern("Loam"),
            "Season 1: Maize → Season 2: Legumes → Season 3: Vegetables"
        );
        assert_eq!(
            rotation_pattern("Clay"),
            "Season 1: Rice → Season 2: Green gram → Season 3: Sunflower"
        );
        assert_eq!(
            rotation_pattern("Sandy"),
            "Season 1: Groundnut → Season 2: Cowpea → Season 3: Onion"
        );
    }

    #[test]
    fn unknown_soil_gets_generic_rotation() {
        assert_eq!(rotation_pattern("Peat"), GENERIC_ROTATION);
        assert_eq!(rotation_pattern("loam"), GENERIC_ROTATION);
        assert_eq!(rotation_pattern(""), GENERIC_ROTATION);
    }

    #[test]
    fn patterns_skip_unknown_sentinel() {
        let soils = AttributeSet::collect(
            [Some("Clay".to_string()), None, Some("Peat".to_string())],
            UNKNOWN,
        );
        assert_eq!(
            rotation_patterns(&soils),
            vec![
                ("Clay", "Season 1: Rice → Season 2: Green gram → Season 3: Sunflower"),
                ("Peat", GENERIC_ROTATION),
            ]
        );
    }
}
