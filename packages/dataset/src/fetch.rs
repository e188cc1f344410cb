//! Feature downloads for each dataset source type.
//!
//! `ArcGIS` layers are queried with `f=geojson` to get standard `GeoJSON`
//! output and paginated via `resultOffset` while the server reports
//! `exceededTransferLimit`.

use land_suitability_analysis_models::Feature;
use land_suitability_dataset_models::{DatasetDefinition, DatasetSourceConfig};

use crate::{DatasetError, features};

/// Page size requested from `ArcGIS` when a definition does not set one.
pub const DEFAULT_MAX_RECORDS: u32 = 1000;

/// Fetches every feature of a dataset.
///
/// # Errors
///
/// Returns [`DatasetError`] if the download fails or the response cannot
/// be parsed.
pub async fn fetch_all(
    client: &reqwest::Client,
    definition: &DatasetDefinition,
) -> Result<Vec<Feature>, DatasetError> {
    match &definition.source {
        DatasetSourceConfig::Arcgis { url, max_records } => {
            let values = query_arcgis(
                client,
                &query_url(url),
                &[("where", "1=1".to_string())],
                *max_records,
            )
            .await?;
            features::from_json_values(values)
        }
        DatasetSourceConfig::GeojsonUrl { url } => {
            let resp = client.get(url).send().await?;
            if !resp.status().is_success() {
                return Err(DatasetError::Conversion {
                    message: format!("GeoJSON request failed with status {}", resp.status()),
                });
            }
            features::parse_collection(&resp.text().await?)
        }
        DatasetSourceConfig::GeojsonFile { path } => {
            let text = tokio::fs::read_to_string(path).await?;
            features::parse_collection(&text)
        }
    }
}

/// Query endpoint for an `ArcGIS` layer URL.
#[must_use]
pub fn query_url(layer_url: &str) -> String {
    let base = layer_url.trim_end_matches('/');
    if base.ends_with("/query") {
        base.to_string()
    } else {
        format!("{base}/query")
    }
}

/// Runs a paginated `ArcGIS` query and returns the raw `GeoJSON` feature
/// objects of every page.
///
/// `params` are sent alongside the fixed output parameters as a form
/// body, so large geometry filters do not hit URL length limits.
///
/// # Errors
///
/// Returns [`DatasetError`] if a request fails, the server reports an
/// error, or a response cannot be parsed.
pub async fn query_arcgis(
    client: &reqwest::Client,
    query_url: &str,
    params: &[(&str, String)],
    max_records: Option<u32>,
) -> Result<Vec<serde_json::Value>, DatasetError> {
    let record_count = max_records.unwrap_or(DEFAULT_MAX_RECORDS);
    let mut all_features = Vec::new();
    let mut offset = 0u32;

    loop {
        let mut form: Vec<(&str, String)> = params.to_vec();
        form.extend([
            ("outFields", "*".to_string()),
            ("f", "geojson".to_string()),
            ("returnGeometry", "true".to_string()),
            ("resultRecordCount", record_count.to_string()),
            ("resultOffset", offset.to_string()),
        ]);

        let resp = client.post(query_url).form(&form).send().await?;
        if !resp.status().is_success() {
            return Err(DatasetError::Conversion {
                message: format!("ArcGIS request failed with status {}", resp.status()),
            });
        }
        let body = resp.text().await?;
        let page = parse_page(&body)?;

        if page.features.is_empty() {
            break;
        }

        #[allow(clippy::cast_possible_truncation)]
        let fetched = page.features.len() as u32;
        all_features.extend(page.features);

        if !page.exceeded_transfer_limit {
            break;
        }
        offset += fetched;
        log::debug!("ArcGIS transfer limit reached, continuing at offset {offset}");
    }

    Ok(all_features)
}

/// One page of an `ArcGIS` `GeoJSON` query response.
#[derive(Debug)]
pub struct ArcgisPage {
    /// Raw `GeoJSON` feature objects.
    pub features: Vec<serde_json::Value>,
    /// Whether more features are available past this page.
    pub exceeded_transfer_limit: bool,
}

/// Parses one `ArcGIS` query response body.
///
/// # Errors
///
/// Returns [`DatasetError::Conversion`] if the body is not JSON, carries
/// an `error` object, or has no `features` array.
pub fn parse_page(body: &str) -> Result<ArcgisPage, DatasetError> {
    let mut json: serde_json::Value =
        serde_json::from_str(body).map_err(|e| DatasetError::Conversion {
            message: format!("Failed to parse ArcGIS response: {e}"),
        })?;

    if json.get("error").is_some() {
        return Err(DatasetError::Conversion {
            message: format!(
                "ArcGIS API error: {}",
                json["error"]["message"].as_str().unwrap_or("unknown error")
            ),
        });
    }

    // GeoJSON output moves the flag under `properties`.
    let exceeded_transfer_limit = json["exceededTransferLimit"]
        .as_bool()
        .or_else(|| json["properties"]["exceededTransferLimit"].as_bool())
        .unwrap_or(false);

    let features = match json.get_mut("features").map(serde_json::Value::take) {
        Some(serde_json::Value::Array(features)) => features,
        _ => {
            return Err(DatasetError::Conversion {
                message: "No features array in ArcGIS response".to_string(),
            });
        }
    };

    Ok(ArcgisPage {
        features,
        exceeded_transfer_limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_url_appends_query_once() {
        assert_eq!(
            query_url("https://example.com/FeatureServer/0"),
            "https://example.com/FeatureServer/0/query"
        );
        assert_eq!(
            query_url("https://example.com/FeatureServer/0/"),
            "https://example.com/FeatureServer/0/query"
        );
        assert_eq!(
            query_url("https://example.com/FeatureServer/0/query"),
            "https://example.com/FeatureServer/0/query"
        );
    }

    #[test]
    fn parses_features_and_transfer_limit() {
        let page = parse_page(
            r#"{"type": "FeatureCollection",
                "features": [{"type": "Feature", "geometry": null, "properties": {}}],
                "properties": {"exceededTransferLimit": true}}"#,
        )
        .unwrap();
        assert_eq!(page.features.len(), 1);
        assert!(page.exceeded_transfer_limit);
    }

    #[test]
    fn top_level_transfer_limit_is_honored() {
        let page = parse_page(r#"{"features": [], "exceededTransferLimit": true}"#).unwrap();
        assert!(page.features.is_empty());
        assert!(page.exceeded_transfer_limit);
    }

    #[test]
    fn missing_transfer_limit_means_last_page() {
        let page = parse_page(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(!page.exceeded_transfer_limit);
    }

    #[test]
    fn service_error_is_reported() {
        let result = parse_page(
            r#"{"error": {"code": 400, "message": "Invalid or missing input parameters."}}"#,
        );
        match result {
            Err(DatasetError::Conversion { message }) => {
                assert_eq!(message, "ArcGIS API error: Invalid or missing input parameters.");
            }
            other => panic!("expected conversion error, got {other:?}"),
        }
    }

    #[test]
    fn missing_features_array_is_an_error() {
        assert!(matches!(
            parse_page(r#"{"type": "FeatureCollection"}"#),
            Err(DatasetError::Conversion { .. })
        ));
        assert!(matches!(
            parse_page("<html>Service unavailable</html>"),
            Err(DatasetError::Conversion { .. })
        ));
    }

    #[tokio::test]
    async fn reads_geojson_file_sources() {
        let path = std::env::temp_dir().join(format!(
            "land_suitability_fetch_test_{}.geojson",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [80.0, 7.0]},
                 "properties": {"Name": "Tank"}}]}"#,
        )
        .unwrap();

        let definition = DatasetDefinition {
            id: "ponds".to_string(),
            title: "Ponds".to_string(),
            source: DatasetSourceConfig::GeojsonFile { path: path.clone() },
        };
        let features = fetch_all(&reqwest::Client::new(), &definition).await;
        std::fs::remove_file(&path).unwrap();

        let features = features.unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].label(&["Name"]).as_deref(), Some("Tank"));
    }
}
