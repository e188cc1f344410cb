//! Attribute aggregation over query results.
//!
//! Each summary collects the distinct values of a few designated
//! attributes, substituting a sentinel for features that lack them.

use land_suitability_analysis_models::{AttributeSet, Feature, NOT_AVAILABLE, UNKNOWN};

/// Dominant soil type attribute on the soil dataset.
pub const DOMINANT_SOIL_FIELD: &str = "DOMSOI";
/// FAO soil class attribute on the soil dataset.
pub const FAO_SOIL_FIELD: &str = "FAOSOIL";
/// Suggested crop attribute on the soil dataset.
pub const CROP_FIELD: &str = "Crop";
/// Zone name attribute on the agro-ecological zone dataset.
pub const ZONE_FIELD: &str = "ZONE";
/// Fallback zone name attribute.
pub const ZONE_NAME_FIELD: &str = "Name";
/// Climatic zone attribute on the agro-ecological zone dataset.
pub const CLIMATIC_ZONE_FIELD: &str = "climatic_z";
/// Terrain class attribute on the agro-ecological zone dataset.
pub const TERRAIN_FIELD: &str = "terrain";

/// Collects the label of the first present key in `keys` for every feature.
#[must_use]
pub fn distinct_values(features: &[Feature], keys: &[&str], sentinel: &str) -> AttributeSet {
    AttributeSet::collect(features.iter().map(|f| f.label(keys)), sentinel)
}

/// Soil attributes of the features intersecting the region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoilSummary {
    /// Distinct `DOMSOI` values.
    pub dom_soils: AttributeSet,
    /// Distinct `FAOSOIL` values.
    pub fao_soils: AttributeSet,
    /// Distinct `Crop` values.
    pub crop_types: AttributeSet,
}

impl SoilSummary {
    /// Aggregates the soil attributes of `features`. Missing soil values
    /// become `Unknown` and missing crops `N/A`.
    #[must_use]
    pub fn from_features(features: &[Feature]) -> Self {
        Self {
            dom_soils: distinct_values(features, &[DOMINANT_SOIL_FIELD], UNKNOWN),
            fao_soils: distinct_values(features, &[FAO_SOIL_FIELD], UNKNOWN),
            crop_types: distinct_values(features, &[CROP_FIELD], NOT_AVAILABLE),
        }
    }
}

/// Agro-ecological zone attributes of the features intersecting the region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSummary {
    /// Distinct `ZONE` (or `Name`) values.
    pub agro_zones: AttributeSet,
    /// Distinct `climatic_z` values.
    pub climatic_zones: AttributeSet,
    /// Distinct `terrain` values.
    pub terrains: AttributeSet,
}

impl ZoneSummary {
    /// Aggregates the zone attributes of `features`. The zone name falls
    /// back from `ZONE` to `Name`; anything missing becomes `Unknown`.
    #[must_use]
    pub fn from_features(features: &[Feature]) -> Self {
        Self {
            agro_zones: distinct_values(features, &[ZONE_FIELD, ZONE_NAME_FIELD], UNKNOWN),
            climatic_zones: distinct_values(features, &[CLIMATIC_ZONE_FIELD], UNKNOWN),
            terrains: distinct_values(features, &[TERRAIN_FIELD], UNKNOWN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use land_suitability_analysis_models::AttributeValue;

    fn soil(dom: Option<&str>, fao: Option<&str>, crop: Option<&str>) -> Feature {
        let mut attrs = Vec::new();
        if let Some(v) = dom {
            attrs.push((DOMINANT_SOIL_FIELD, AttributeValue::from(v)));
        }
        if let Some(v) = fao {
            attrs.push((FAO_SOIL_FIELD, AttributeValue::from(v)));
        }
        if let Some(v) = crop {
            attrs.push((CROP_FIELD, AttributeValue::from(v)));
        }
        Feature::new(None, attrs)
    }

    #[test]
    fn no_soil_features_yields_sentinels() {
        let summary = SoilSummary::from_features(&[]);
        assert!(summary.dom_soils.is_only(UNKNOWN));
        assert!(summary.fao_soils.is_only(UNKNOWN));
        assert!(summary.crop_types.is_only(NOT_AVAILABLE));
        assert_eq!(summary.crop_types.len(), 1);
    }

    #[test]
    fn soil_values_are_deduplicated_in_order() {
        let summary = SoilSummary::from_features(&[
            soil(Some("Loam"), Some("Lf"), Some("Maize")),
            soil(Some("Clay"), Some("Lf"), Some("Rice")),
            soil(Some("Loam"), None, Some("Maize")),
        ]);
        assert_eq!(summary.dom_soils.to_string(), "Loam, Clay");
        assert_eq!(summary.fao_soils.to_string(), "Lf, Unknown");
        assert_eq!(summary.crop_types.to_string(), "Maize, Rice");
    }

    #[test]
    fn missing_crop_uses_not_available() {
        let summary = SoilSummary::from_features(&[soil(Some("Loam"), Some("Lf"), None)]);
        assert!(summary.crop_types.contains(NOT_AVAILABLE));
    }

    #[test]
    fn zone_falls_back_to_name_then_unknown() {
        let features = vec![
            Feature::new(None, [(ZONE_FIELD, "WL2a")]),
            Feature::new(
                None,
                [
                    (ZONE_FIELD, AttributeValue::Null),
                    (ZONE_NAME_FIELD, AttributeValue::from("DL1b")),
                ],
            ),
            Feature::new(None, [(TERRAIN_FIELD, "Flat")]),
        ];
        let summary = ZoneSummary::from_features(&features);
        assert_eq!(summary.agro_zones.to_string(), "WL2a, DL1b, Unknown");
        assert_eq!(summary.terrains.to_string(), "Unknown, Flat");
        assert!(summary.climatic_zones.is_only(UNKNOWN));
    }
}
