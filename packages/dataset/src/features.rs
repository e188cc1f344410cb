//! `GeoJSON` to [`Feature`] conversion.

use geojson::GeoJson;
use land_suitability_analysis_models::{AttributeValue, Feature};

use crate::DatasetError;

/// Converts a `GeoJSON` feature. Properties become attributes; a geometry
/// that cannot be represented is dropped with a warning, leaving a
/// feature that no spatial query will match.
#[must_use]
pub fn from_geojson(feature: geojson::Feature) -> Feature {
    let geometry = feature.geometry.and_then(|geom| {
        match geo::Geometry::<f64>::try_from(geom) {
            Ok(geometry) => Some(geometry),
            Err(e) => {
                log::warn!("Skipping unconvertible feature geometry: {e}");
                None
            }
        }
    });

    let attributes = feature
        .properties
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, AttributeValue::from(value)))
        .collect();

    Feature {
        geometry,
        attributes,
    }
}

/// Parses `GeoJSON` text holding a `FeatureCollection` or a single
/// `Feature`.
///
/// # Errors
///
/// Returns [`DatasetError::GeoJson`] if the text is not valid `GeoJSON`,
/// or [`DatasetError::Conversion`] if it is a bare geometry.
pub fn parse_collection(text: &str) -> Result<Vec<Feature>, DatasetError> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => {
            Ok(collection.features.into_iter().map(from_geojson).collect())
        }
        GeoJson::Feature(feature) => Ok(vec![from_geojson(feature)]),
        GeoJson::Geometry(_) => Err(DatasetError::Conversion {
            message: "Expected a FeatureCollection, found a bare geometry".to_string(),
        }),
    }
}

/// Converts raw `GeoJSON` feature objects, as found in a service
/// response's `features` array.
///
/// # Errors
///
/// Returns [`DatasetError::Json`] if a value is not a `GeoJSON` feature.
pub fn from_json_values(
    values: impl IntoIterator<Item = serde_json::Value>,
) -> Result<Vec<Feature>, DatasetError> {
    values
        .into_iter()
        .map(|value| {
            serde_json::from_value::<geojson::Feature>(value)
                .map(from_geojson)
                .map_err(DatasetError::from)
        })
        .collect()
}
