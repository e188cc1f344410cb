//! Live `ArcGIS` `FeatureServer` back-end.
//!
//! Every query is forwarded to the layer's `/query` endpoint with the
//! region as an Esri polygon filter. Nothing is cached and failed
//! requests are not retried.

use std::collections::BTreeMap;

use async_trait::async_trait;
use geo::algorithm::orient::{Direction, Orient};
use land_suitability_analysis::{DatasetQuery, QueryError};
use land_suitability_analysis_models::{Dataset, LayerQueryResult, Region};
use land_suitability_dataset_models::DatasetSourceConfig;

use crate::registry::DatasetRegistry;
use crate::{features, fetch};

/// Spatial reference of every geometry exchanged with the service (WGS84).
pub const WGS84_WKID: u32 = 4326;

#[derive(Debug, Clone)]
struct ArcgisLayer {
    query_url: String,
    max_records: Option<u32>,
}

/// Queries `ArcGIS` layers on demand.
#[derive(Debug, Clone)]
pub struct ArcgisDatasets {
    client: reqwest::Client,
    layers: BTreeMap<String, ArcgisLayer>,
}

impl ArcgisDatasets {
    /// Binds each analysis dataset the registry resolves to an `ArcGIS`
    /// layer. Datasets defined with a non-`ArcGIS` source are skipped.
    #[must_use]
    pub fn new(client: reqwest::Client, registry: &DatasetRegistry) -> Self {
        let mut layers = BTreeMap::new();

        for dataset in Dataset::ALL {
            let Some(definition) = registry.resolve(dataset.as_str()) else {
                log::warn!("No definition for dataset '{dataset}'");
                continue;
            };
            match &definition.source {
                DatasetSourceConfig::Arcgis { url, max_records } => {
                    layers.insert(
                        dataset.as_str().to_string(),
                        ArcgisLayer {
                            query_url: fetch::query_url(url),
                            max_records: *max_records,
                        },
                    );
                }
                other => log::warn!(
                    "Dataset '{dataset}' is not an ArcGIS layer ({}), skipping",
                    other.describe()
                ),
            }
        }

        Self { client, layers }
    }
}

/// Encodes `region` as an Esri JSON polygon: exterior rings clockwise,
/// holes counter-clockwise, all rings of all parts in one `rings` array.
#[must_use]
pub fn esri_polygon(region: &Region) -> serde_json::Value {
    let rings: Vec<Vec<[f64; 2]>> = region
        .as_multi_polygon()
        .iter()
        .map(|polygon| polygon.orient(Direction::Reversed))
        .flat_map(|polygon| {
            let (exterior, interiors) = polygon.into_inner();
            std::iter::once(exterior).chain(interiors)
        })
        .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
        .collect();

    serde_json::json!({
        "rings": rings,
        "spatialReference": { "wkid": WGS84_WKID },
    })
}

#[async_trait]
impl DatasetQuery for ArcgisDatasets {
    fn has_dataset(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    async fn query_intersecting(
        &self,
        name: &str,
        geometry: &Region,
    ) -> Result<LayerQueryResult, QueryError> {
        let layer = self
            .layers
            .get(name)
            .ok_or_else(|| QueryError::UnknownDataset {
                dataset: name.to_string(),
            })?;

        let params = [
            ("geometry", esri_polygon(geometry).to_string()),
            ("geometryType", "esriGeometryPolygon".to_string()),
            ("inSR", WGS84_WKID.to_string()),
            ("outSR", WGS84_WKID.to_string()),
            ("spatialRel", "esriSpatialRelIntersects".to_string()),
        ];

        let values =
            fetch::query_arcgis(&self.client, &layer.query_url, &params, layer.max_records)
                .await?;
        let features = features::from_json_values(values)?;
        log::debug!("{name}: {} features from {}", features.len(), layer.query_url);

        Ok(features)
    }
}
