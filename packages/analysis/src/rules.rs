//! The suitability rule cascade.
//!
//! Rules are checked in order and the first one that applies decides the
//! outcome. The order is significant: urban coverage overrides everything,
//! water access overrides data completeness, and so on.

use land_suitability_analysis_models::{
    AttributeSet, NOT_AVAILABLE, Outcome, Recommendation, UNKNOWN,
};

use crate::aggregate::{SoilSummary, ZoneSummary};
use crate::config::{AnalysisConfig, distance_label};

/// Terrain classes that trigger a caution.
pub const DIFFICULT_TERRAINS: &[&str] = &["Hilly", "Steep"];

/// Everything the cascade looks at, gathered from the five queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    /// Soil attributes inside the region.
    pub soil: SoilSummary,
    /// A river lies within the river buffer.
    pub is_near_river: bool,
    /// A pond lies within the pond buffer.
    pub is_near_pond: bool,
    /// Built-up share of the built-up buffer, in percent.
    pub coverage_pct: f64,
    /// Agro-ecological zone attributes inside the region.
    pub zones: ZoneSummary,
}

struct Rule {
    outcome: Outcome,
    applies: fn(&Evidence, &AnalysisConfig) -> bool,
}

const CASCADE: &[Rule] = &[
    Rule {
        outcome: Outcome::NotSuitable,
        applies: |e, config| e.coverage_pct >= config.coverage_threshold_pct,
    },
    Rule {
        outcome: Outcome::LimitedWaterAccess,
        applies: |e, _| !e.is_near_river && !e.is_near_pond,
    },
    Rule {
        outcome: Outcome::IncompleteData,
        applies: |e, _| e.soil.crop_types.contains(NOT_AVAILABLE) || e.soil.dom_soils.contains(UNKNOWN),
    },
    Rule {
        outcome: Outcome::TerrainCaution,
        applies: |e, _| DIFFICULT_TERRAINS.iter().any(|t| e.zones.terrains.contains(t)),
    },
];

/// Runs the cascade and returns the first matching outcome, or
/// [`Outcome::Suitable`] when no rule applies.
#[must_use]
pub fn decide(evidence: &Evidence, config: &AnalysisConfig) -> Outcome {
    CASCADE
        .iter()
        .find(|rule| (rule.applies)(evidence, config))
        .map_or(Outcome::Suitable, |rule| rule.outcome)
}

/// Recommendation text for an outcome.
#[must_use]
pub fn message(outcome: Outcome, evidence: &Evidence, config: &AnalysisConfig) -> String {
    match outcome {
        Outcome::NotSuitable => format!(
            "Not suitable: Urban coverage exceeds {}% within {} buffer.",
            config.coverage_threshold_pct,
            distance_label(config.builtup_buffer_meters)
        ),
        Outcome::LimitedWaterAccess => {
            "Limited water access. Consider irrigation support.".to_string()
        }
        Outcome::IncompleteData => {
            "Soil or crop data incomplete. Field assessment recommended.".to_string()
        }
        Outcome::TerrainCaution => "Caution: Terrain may not be ideal. Consider soil erosion \
                                    risk and terracing."
            .to_string(),
        Outcome::Suitable => format!(
            "Suitable for agriculture. Best crops: {}",
            evidence.soil.crop_types
        ),
    }
}

/// Climatic advice, present unless every climatic zone is unknown.
#[must_use]
pub fn climatic_advisory(climatic_zones: &AttributeSet) -> Option<String> {
    if climatic_zones.is_only(UNKNOWN) {
        return None;
    }
    Some(format!(
        "This area is in the {climatic_zones} zone. Match crops to rainfall/temperature patterns."
    ))
}

impl Evidence {
    /// Runs the cascade and packages the result.
    #[must_use]
    pub fn into_recommendation(self, config: &AnalysisConfig) -> Recommendation {
        let outcome = decide(&self, config);
        let message = message(outcome, &self, config);
        let climatic_advisory = climatic_advisory(&self.zones.climatic_zones);

        Recommendation {
            outcome,
            message,
            dom_soils: self.soil.dom_soils,
            fao_soils: self.soil.fao_soils,
            crop_types: self.soil.crop_types,
            is_near_river: self.is_near_river,
            is_near_pond: self.is_near_pond,
            coverage_pct: self.coverage_pct,
            agro_zones: self.zones.agro_zones,
            climatic_zones: self.zones.climatic_zones,
            terrains: self.zones.terrains,
            climatic_advisory,
        }
    }
}
