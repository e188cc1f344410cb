//! In-memory snapshot back-end.
//!
//! Loads every feature of every dataset once, builds an R-tree per dataset
//! keyed by feature bounding box, and answers intersection queries with an
//! envelope prefilter followed by an exact `Intersects` check.

use std::collections::BTreeMap;

use async_trait::async_trait;
use geo::{BoundingRect, Intersects};
use land_suitability_analysis::{DatasetQuery, QueryError};
use land_suitability_analysis_models::{Dataset, Feature, LayerQueryResult, Region};
use rstar::{AABB, RTree, RTreeObject};

use crate::registry::DatasetRegistry;
use crate::{DatasetError, fetch};

/// A feature position stored in the R-tree.
struct IndexedFeature {
    position: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedFeature {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// One dataset's features and their spatial index.
struct LayerIndex {
    features: Vec<Feature>,
    tree: RTree<IndexedFeature>,
}

impl LayerIndex {
    fn new(features: Vec<Feature>) -> Self {
        let entries: Vec<IndexedFeature> = features
            .iter()
            .enumerate()
            .filter_map(|(position, feature)| {
                let envelope = compute_envelope(feature.geometry.as_ref()?.bounding_rect()?);
                Some(IndexedFeature { position, envelope })
            })
            .collect();

        Self {
            features,
            tree: RTree::bulk_load(entries),
        }
    }

    fn query(&self, region: &Region) -> LayerQueryResult {
        let Some(rect) = region.as_multi_polygon().bounding_rect() else {
            return Vec::new();
        };
        let region_geometry = region.to_geometry();

        let mut positions: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&compute_envelope(rect))
            .map(|entry| entry.position)
            .filter(|position| {
                self.features[*position]
                    .geometry
                    .as_ref()
                    .is_some_and(|geometry| geometry.intersects(&region_geometry))
            })
            .collect();
        positions.sort_unstable();

        positions
            .into_iter()
            .map(|position| self.features[position].clone())
            .collect()
    }
}

fn compute_envelope(rect: geo::Rect<f64>) -> AABB<[f64; 2]> {
    AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y])
}

/// Snapshot of every dataset held in memory.
///
/// Results preserve the order features had when loaded. Features without
/// geometry are kept for completeness but never match a query.
#[derive(Default)]
pub struct InMemoryDatasets {
    layers: BTreeMap<String, LayerIndex>,
}

impl std::fmt::Debug for InMemoryDatasets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.layers
                    .iter()
                    .map(|(name, layer)| (name, layer.features.len())),
            )
            .finish()
    }
}

impl InMemoryDatasets {
    /// Builds a snapshot from already-loaded features, keyed by dataset
    /// name.
    #[must_use]
    pub fn from_features<I, S>(layers: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<Feature>)>,
        S: Into<String>,
    {
        Self {
            layers: layers
                .into_iter()
                .map(|(name, features)| (name.into(), LayerIndex::new(features)))
                .collect(),
        }
    }

    /// Downloads every analysis dataset the registry resolves.
    ///
    /// Datasets with no definition are left out, so evaluating against
    /// the snapshot reports them as configuration errors.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if any download fails.
    pub async fn load(
        client: &reqwest::Client,
        registry: &DatasetRegistry,
    ) -> Result<Self, DatasetError> {
        let resolved: Vec<_> = Dataset::ALL
            .into_iter()
            .filter_map(|dataset| match registry.require(dataset) {
                Ok(definition) => Some((dataset, definition)),
                Err(e) => {
                    log::warn!("{e}");
                    None
                }
            })
            .collect();

        let layers = futures::future::try_join_all(resolved.into_iter().map(
            |(dataset, definition)| async move {
                let features = fetch::fetch_all(client, definition).await?;
                log::info!(
                    "Loaded {} features for {dataset} from {}",
                    features.len(),
                    definition.source.describe()
                );
                Ok::<_, DatasetError>((dataset.as_str(), features))
            },
        ))
        .await?;

        Ok(Self::from_features(layers))
    }

    /// Number of features loaded for `name`.
    #[must_use]
    pub fn feature_count(&self, name: &str) -> Option<usize> {
        self.layers.get(name).map(|layer| layer.features.len())
    }
}

#[async_trait]
impl DatasetQuery for InMemoryDatasets {
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
        Ok(layer.query(geometry))
    }
}

#[cfg(test)]
mod tests {
    use geo::{Geometry, line_string, polygon};
    use land_suitability_analysis::{AnalysisConfig, Outcome, SuitabilityError, evaluate};

    use super::*;

    fn square(x: f64, y: f64, size: f64) -> Geometry<f64> {
        Geometry::Polygon(polygon![
            (x: x, y: y),
            (x: x + size, y: y),
            (x: x + size, y: y + size),
            (x: x, y: y + size),
            (x: x, y: y),
        ])
    }

    fn region() -> Region {
        Region::try_from_geometry(square(80.0, 7.0, 0.01)).unwrap()
    }

    fn named(geometry: Option<Geometry<f64>>, name: &str) -> Feature {
        Feature::new(geometry, [("Name", name)])
    }

    #[tokio::test]
    async fn returns_intersecting_features_in_load_order() {
        let datasets = InMemoryDatasets::from_features([(
            "ponds",
            vec![
                named(Some(square(80.005, 7.005, 0.01)), "overlapping"),
                named(Some(square(81.0, 8.0, 0.01)), "far away"),
                named(Some(square(79.995, 6.995, 0.01)), "corner"),
            ],
        )]);

        let names: Vec<_> = datasets
            .query_intersecting("ponds", &region())
            .await
            .unwrap()
            .iter()
            .filter_map(|f| f.label(&["Name"]))
            .collect();

        assert_eq!(names, vec!["overlapping", "corner"]);
    }

    #[tokio::test]
    async fn envelope_overlap_alone_does_not_match() {
        // Triangle whose bounding box covers the region but whose area
        // stays in the opposite corner.
        let triangle = Geometry::Polygon(polygon![
            (x: 80.009, y: 7.02),
            (x: 80.02, y: 6.99),
            (x: 80.02, y: 7.02),
            (x: 80.009, y: 7.02),
        ]);
        let datasets =
            InMemoryDatasets::from_features([("soil", vec![named(Some(triangle), "triangle")])]);

        let features = datasets.query_intersecting("soil", &region()).await.unwrap();
        assert!(features.is_empty());
    }

    #[tokio::test]
    async fn features_without_geometry_never_match() {
        let datasets = InMemoryDatasets::from_features([("soil", vec![named(None, "none")])]);
        assert_eq!(datasets.feature_count("soil"), Some(1));

        let features = datasets.query_intersecting("soil", &region()).await.unwrap();
        assert!(features.is_empty());
    }

    #[tokio::test]
    async fn unknown_dataset_is_reported() {
        let datasets = InMemoryDatasets::default();
        assert!(!datasets.has_dataset("soil"));

        let result = datasets.query_intersecting("soil", &region()).await;
        assert!(matches!(result, Err(QueryError::UnknownDataset { dataset }) if dataset == "soil"));
    }

    #[tokio::test]
    async fn evaluates_region_against_snapshot() {
        let soil = Feature::new(
            Some(square(79.99, 6.99, 0.05)),
            [("DOMSOI", "Loam"), ("FAOSOIL", "Lf"), ("Crop", "Maize")],
        );
        // Roughly 220 m east of the region, inside the 500 m river buffer.
        let river = Feature::new(
            Some(Geometry::LineString(line_string![
                (x: 80.012, y: 6.9),
                (x: 80.012, y: 7.1),
            ])),
            [("Name", "Kala Oya")],
        );
        let zone = Feature::new(
            Some(square(79.9, 6.9, 0.5)),
            [("ZONE", "DL1b"), ("climatic_z", "Dry Zone"), ("terrain", "Flat")],
        );
        let datasets = InMemoryDatasets::from_features([
            ("soil", vec![soil]),
            ("water", vec![river]),
            ("ponds", Vec::new()),
            ("builtup", Vec::new()),
            ("agro_zone", vec![zone]),
        ]);

        let recommendation = evaluate(&region(), &datasets, &AnalysisConfig::default())
            .await
            .unwrap();

        assert_eq!(recommendation.outcome, Outcome::Suitable);
        assert!(recommendation.is_near_river);
        assert!(!recommendation.is_near_pond);
        assert!(recommendation.coverage_pct.abs() < f64::EPSILON);
        assert_eq!(recommendation.crop_types.to_string(), "Maize");
        assert_eq!(recommendation.climatic_zones.to_string(), "Dry Zone");
    }

    #[tokio::test]
    async fn missing_layer_is_a_configuration_error() {
        let datasets = InMemoryDatasets::from_features([("soil", Vec::new())]);
        let result = evaluate(&region(), &datasets, &AnalysisConfig::default()).await;
        assert!(matches!(
            result,
            Err(SuitabilityError::Configuration {
                dataset: Dataset::Water
            })
        ));
    }
}
