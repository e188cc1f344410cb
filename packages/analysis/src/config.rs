//! Buffer distances and thresholds for the suitability rules.

use serde::{Deserialize, Serialize};

/// Tunable distances and thresholds for one analysis.
///
/// [`AnalysisConfig::default`] holds the standard values: 500 m river
/// buffer, 300 m pond buffer, 1 km built-up buffer, 20 % urban coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnalysisConfig {
    /// Distance within which a river counts as nearby.
    pub river_buffer_meters: f64,
    /// Distance within which a pond counts as nearby.
    pub pond_buffer_meters: f64,
    /// Radius of the ring used for built-up coverage.
    pub builtup_buffer_meters: f64,
    /// Coverage percentage at or above which the area is not suitable.
    pub coverage_threshold_pct: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            river_buffer_meters: 500.0,
            pond_buffer_meters: 300.0,
            builtup_buffer_meters: 1000.0,
            coverage_threshold_pct: 20.0,
        }
    }
}

/// Formats a distance the way it appears in recommendation text
/// (`"1km"`, `"500m"`).
#[must_use]
pub fn distance_label(meters: f64) -> String {
    if meters >= 1000.0 && meters % 1000.0 == 0.0 {
        format!("{}km", meters / 1000.0)
    } else {
        format!("{meters}m")
    }
}
