//! Reading a sketched region from a `GeoJSON` file.

use std::path::Path;

use geojson::GeoJson;
use land_suitability_analysis_models::{Region, RegionError};

/// Errors reading a region file.
#[derive(Debug, thiserror::Error)]
pub enum RegionFileError {
    /// Reading the file failed.
    #[error("Failed to read region file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not `GeoJSON`, or its geometry cannot be converted.
    #[error("Region file is not valid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    /// No feature in the collection has a polygonal geometry.
    #[error("Region file contains no polygon")]
    NoPolygon,

    /// The polygon failed region validation.
    #[error(transparent)]
    Region(#[from] RegionError),
}

/// Reads a region from a `GeoJSON` geometry, feature, or feature
/// collection. A collection contributes its first polygonal feature.
///
/// # Errors
///
/// Returns [`RegionFileError`] if the file cannot be read or parsed, holds
/// no polygon, or the polygon is not a valid region.
pub fn read_region(path: &Path) -> Result<Region, RegionFileError> {
    let text = std::fs::read_to_string(path)?;
    parse_region(&text)
}

/// Parses a region from `GeoJSON` text. See [`read_region`].
///
/// # Errors
///
/// See [`read_region`].
pub fn parse_region(text: &str) -> Result<Region, RegionFileError> {
    let geometry = match text.parse::<GeoJson>()? {
        GeoJson::Geometry(geometry) => Some(geometry),
        GeoJson::Feature(feature) => feature.geometry,
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .filter_map(|feature| feature.geometry)
            .find(|geometry| {
                matches!(
                    geometry.value,
                    geojson::Value::Polygon(_) | geojson::Value::MultiPolygon(_)
                )
            }),
    };

    let geometry = geometry.ok_or(RegionFileError::NoPolygon)?;
    let geometry = geo::Geometry::<f64>::try_from(geometry)?;
    Ok(Region::try_from_geometry(geometry)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLYGON: &str = r#"{"type": "Polygon", "coordinates":
        [[[80.0, 7.0], [80.01, 7.0], [80.01, 7.01], [80.0, 7.01], [80.0, 7.0]]]}"#;

    #[test]
    fn reads_bare_polygon() {
        let region = parse_region(POLYGON).unwrap();
        assert_eq!(region.as_multi_polygon().0.len(), 1);
    }

    #[test]
    fn reads_feature_geometry() {
        let text = format!(r#"{{"type": "Feature", "properties": {{}}, "geometry": {POLYGON}}}"#);
        assert!(parse_region(&text).is_ok());
    }

    #[test]
    fn collection_uses_first_polygon_feature() {
        let text = format!(
            r#"{{"type": "FeatureCollection", "features": [
                {{"type": "Feature", "properties": {{}},
                  "geometry": {{"type": "Point", "coordinates": [80.0, 7.0]}}}},
                {{"type": "Feature", "properties": {{}}, "geometry": {POLYGON}}}
            ]}}"#
        );
        assert!(parse_region(&text).is_ok());
    }

    #[test]
    fn point_only_file_has_no_polygon() {
        let result = parse_region(r#"{"type": "Point", "coordinates": [80.0, 7.0]}"#);
        assert!(matches!(
            result,
            Err(RegionFileError::Region(RegionError::NotPolygonal { .. }))
        ));

        let result = parse_region(r#"{"type": "FeatureCollection", "features": []}"#);
        assert!(matches!(result, Err(RegionFileError::NoPolygon)));
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(
            parse_region("not geojson"),
            Err(RegionFileError::GeoJson(_))
        ));
    }
}
