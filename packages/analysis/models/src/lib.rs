#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Feature, region, and recommendation types for land suitability analysis.
//!
//! These are the values exchanged between the suitability evaluator and
//! whatever back-end answers its spatial queries: features with scalar
//! attributes going in, a [`Recommendation`] coming out.

pub mod region;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use region::{Region, RegionError};

/// Placeholder for missing soil, zone, climate, and terrain values.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder for a missing crop suggestion.
pub const NOT_AVAILABLE: &str = "N/A";

/// The five thematic datasets every analysis consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// Soil map with `DOMSOI`, `FAOSOIL`, and `Crop` attributes.
    Soil,
    /// River coverage.
    Water,
    /// Ponds and reservoirs.
    Ponds,
    /// Built-up (urban) area polygons.
    Builtup,
    /// Agro-ecological zones with `ZONE`, `climatic_z`, and `terrain`.
    AgroZone,
}

impl Dataset {
    /// Every dataset, in query order.
    pub const ALL: [Self; 5] = [
        Self::Soil,
        Self::Water,
        Self::Ponds,
        Self::Builtup,
        Self::AgroZone,
    ];

    /// Name the dataset is resolved by.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Soil => "soil",
            Self::Water => "water",
            Self::Ponds => "ponds",
            Self::Builtup => "builtup",
            Self::AgroZone => "agro_zone",
        }
    }

    /// Layer title the dataset is published under, used as a fallback
    /// when a definition's id does not match [`Dataset::as_str`].
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Soil => "Soil Type",
            Self::Water => "Water Coverage",
            Self::Ponds => "Ponds",
            Self::Builtup => "Built-up Area",
            Self::AgroZone => "Agro Ecological Zone",
        }
    }

    /// Parses a dataset name as returned by [`Dataset::as_str`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == name)
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar attribute value on a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Text value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// Explicit null.
    Null,
}

impl AttributeValue {
    /// Returns the value as a display label, or `None` if it counts as
    /// missing (null or empty text).
    #[must_use]
    pub fn as_label(&self) -> Option<String> {
        match self {
            Self::Text(s) if s.is_empty() => None,
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(format_number(*n)),
            Self::Bool(b) => Some(b.to_string()),
            Self::Null => None,
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::Text(s),
            other @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Self::Text(other.to_string())
            }
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// One row returned by a spatial query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feature {
    /// Feature geometry, if the service returned one.
    pub geometry: Option<geo::Geometry<f64>>,
    /// Attribute name to value.
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Feature {
    /// Creates a feature from a geometry and attribute pairs.
    #[must_use]
    pub fn new<K, V>(
        geometry: Option<geo::Geometry<f64>>,
        attributes: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<AttributeValue>,
    {
        Self {
            geometry,
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the label for the first of `keys` that holds a non-missing
    /// value.
    #[must_use]
    pub fn label(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.attributes.get(*key))
            .find_map(AttributeValue::as_label)
    }
}

/// Features returned by one query against one dataset, in service order.
pub type LayerQueryResult = Vec<Feature>;

/// A de-duplicated list of attribute values ordered by first occurrence.
///
/// Never empty: an aggregation with no input holds only its sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AttributeSet(Vec<String>);

/// An attribute list with no values, which no aggregation produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Attribute set must hold at least one value")]
pub struct EmptyAttributeSet;

impl TryFrom<Vec<String>> for AttributeSet {
    type Error = EmptyAttributeSet;

    fn try_from(values: Vec<String>) -> Result<Self, Self::Error> {
        if values.is_empty() {
            return Err(EmptyAttributeSet);
        }
        let mut out: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            if !out.contains(&value) {
                out.push(value);
            }
        }
        Ok(Self(out))
    }
}

impl From<AttributeSet> for Vec<String> {
    fn from(set: AttributeSet) -> Self {
        set.0
    }
}

impl AttributeSet {
    /// Builds a set from values, substituting `sentinel` for missing ones.
    /// An empty iterator yields `{sentinel}`.
    #[must_use]
    pub fn collect<I>(values: I, sentinel: &str) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        let mut out: Vec<String> = Vec::new();
        for value in values {
            let value = value.unwrap_or_else(|| sentinel.to_string());
            if !out.contains(&value) {
                out.push(value);
            }
        }
        if out.is_empty() {
            out.push(sentinel.to_string());
        }
        Self(out)
    }

    /// Whether `value` is present.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|v| v == value)
    }

    /// Whether every entry equals `value`.
    #[must_use]
    pub fn is_only(&self, value: &str) -> bool {
        self.0.iter().all(|v| v == value)
    }

    /// Values in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false` for sets built through [`AttributeSet::collect`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for AttributeSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// Qualitative result of the rule cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Urban coverage exceeds the threshold.
    NotSuitable,
    /// Neither a river nor a pond is nearby.
    LimitedWaterAccess,
    /// Soil or crop data is missing.
    IncompleteData,
    /// Hilly or steep terrain.
    TerrainCaution,
    /// Suitable for agriculture.
    Suitable,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotSuitable => write!(f, "not suitable"),
            Self::LimitedWaterAccess => write!(f, "limited water access"),
            Self::IncompleteData => write!(f, "incomplete data"),
            Self::TerrainCaution => write!(f, "terrain caution"),
            Self::Suitable => write!(f, "suitable"),
        }
    }
}

/// Everything one analysis run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Which rule matched.
    pub outcome: Outcome,
    /// Human-readable text for the outcome.
    pub message: String,
    /// Dominant soil types (`DOMSOI`).
    pub dom_soils: AttributeSet,
    /// FAO soil classes (`FAOSOIL`).
    pub fao_soils: AttributeSet,
    /// Suggested crops (`Crop`).
    pub crop_types: AttributeSet,
    /// A river feature lies within the river buffer.
    pub is_near_river: bool,
    /// A pond feature lies within the pond buffer.
    pub is_near_pond: bool,
    /// Built-up share of the built-up buffer, in percent. Not clamped.
    pub coverage_pct: f64,
    /// Agro-ecological zones (`ZONE`, falling back to `Name`).
    pub agro_zones: AttributeSet,
    /// Climatic zones (`climatic_z`).
    pub climatic_zones: AttributeSet,
    /// Terrain classes (`terrain`).
    pub terrains: AttributeSet,
    /// Present when the climatic zone is known.
    pub climatic_advisory: Option<String>,
}
