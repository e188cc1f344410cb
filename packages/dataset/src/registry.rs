//! Compile-time registry of dataset definitions.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! A user manifest with `[[datasets]]` tables replaces the embedded set
//! entirely when one is given.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use land_suitability_analysis_models::Dataset;
use land_suitability_dataset_models::{DatasetDefinition, DatasetManifest};

use crate::DatasetError;

/// Environment variable naming a dataset manifest to use instead of the
/// embedded definitions.
pub const DATASETS_ENV_VAR: &str = "LAND_SUITABILITY_DATASETS";

/// Number of embedded dataset definitions. Enforced by a test.
#[cfg(test)]
const EXPECTED_DATASET_COUNT: usize = 5;

/// Embedded TOML dataset definitions.
const DATASET_TOMLS: &[(&str, &str)] = &[
    ("soil", include_str!("../datasets/soil.toml")),
    ("water", include_str!("../datasets/water.toml")),
    ("ponds", include_str!("../datasets/ponds.toml")),
    ("builtup", include_str!("../datasets/builtup.toml")),
    ("agro_zone", include_str!("../datasets/agro_zone.toml")),
];

/// Returns all embedded dataset definitions.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn embedded_definitions() -> Vec<DatasetDefinition> {
    DATASET_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse dataset definition '{name}': {e}"))
        })
        .collect()
}

/// A resolved set of dataset definitions.
#[derive(Debug, Clone)]
pub struct DatasetRegistry {
    definitions: Vec<DatasetDefinition>,
}

impl Default for DatasetRegistry {
    fn default() -> Self {
        Self::embedded()
    }
}

impl DatasetRegistry {
    /// Registry of the embedded definitions.
    #[must_use]
    pub fn embedded() -> Self {
        Self {
            definitions: embedded_definitions(),
        }
    }

    /// Builds a registry from definitions, rejecting duplicate ids.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Conversion`] if two definitions share an id.
    pub fn new(definitions: Vec<DatasetDefinition>) -> Result<Self, DatasetError> {
        let mut seen = BTreeSet::new();
        for definition in &definitions {
            if !seen.insert(definition.id.as_str()) {
                return Err(DatasetError::Conversion {
                    message: format!("Duplicate dataset id: {}", definition.id),
                });
            }
        }
        Ok(Self { definitions })
    }

    /// Parses a `[[datasets]]` manifest.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Toml`] if the manifest does not parse, or
    /// [`DatasetError::Conversion`] for duplicate ids.
    pub fn from_manifest_str(manifest: &str) -> Result<Self, DatasetError> {
        let manifest: DatasetManifest = toml::de::from_str(manifest)?;
        Self::new(manifest.datasets)
    }

    /// Reads a manifest file.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::Io`] if the file cannot be read, otherwise
    /// as [`DatasetRegistry::from_manifest_str`].
    pub fn load(path: &Path) -> Result<Self, DatasetError> {
        let contents = std::fs::read_to_string(path)?;
        let registry = Self::from_manifest_str(&contents)?;
        log::info!(
            "Loaded {} dataset definitions from {}",
            registry.definitions.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Uses `path` if given, else the manifest named by
    /// [`DATASETS_ENV_VAR`], else the embedded definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if a manifest is named but cannot be loaded.
    pub fn from_override(path: Option<&Path>) -> Result<Self, DatasetError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(DATASETS_ENV_VAR).map(PathBuf::from));

        match path {
            Some(path) => Self::load(&path),
            None => Ok(Self::embedded()),
        }
    }

    /// All definitions in registry order.
    #[must_use]
    pub fn definitions(&self) -> &[DatasetDefinition] {
        &self.definitions
    }

    /// Resolves `name` to a definition: by id first, then by title. For
    /// the five analysis datasets the title fallback also matches the
    /// layer's published title (so a definition titled "Soil Type"
    /// answers for `soil`).
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&DatasetDefinition> {
        let published_title = Dataset::from_name(name).map(Dataset::title);

        self.definitions
            .iter()
            .find(|d| d.id == name)
            .or_else(|| self.definitions.iter().find(|d| d.title == name))
            .or_else(|| {
                published_title.and_then(|title| self.definitions.iter().find(|d| d.title == title))
            })
    }

    /// Resolves a required analysis dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingDataset`] if nothing resolves.
    pub fn require(&self, dataset: Dataset) -> Result<&DatasetDefinition, DatasetError> {
        self.resolve(dataset.as_str())
            .ok_or_else(|| DatasetError::MissingDataset {
                dataset: dataset.as_str().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use land_suitability_dataset_models::DatasetSourceConfig;

    #[test]
    fn loads_all_datasets() {
        let definitions = embedded_definitions();
        assert_eq!(
            definitions.len(),
            EXPECTED_DATASET_COUNT,
            "Expected {EXPECTED_DATASET_COUNT} dataset definitions, found {}. \
             Update EXPECTED_DATASET_COUNT after adding/removing datasets.",
            definitions.len()
        );
    }

    #[test]
    fn dataset_ids_are_unique() {
        let definitions = embedded_definitions();
        let mut seen = BTreeSet::new();
        for definition in &definitions {
            assert!(
                seen.insert(&definition.id),
                "Duplicate dataset ID: {}",
                definition.id
            );
        }
    }

    #[test]
    fn all_datasets_have_required_fields() {
        for definition in &embedded_definitions() {
            assert!(!definition.id.is_empty(), "Dataset has empty id");
            assert!(
                !definition.title.is_empty(),
                "Dataset {} has empty title",
                definition.id
            );
            match &definition.source {
                DatasetSourceConfig::Arcgis { url, .. } => assert!(
                    url.starts_with("https://") && url.contains("/FeatureServer/"),
                    "Dataset {} has invalid FeatureServer URL: {url}",
                    definition.id
                ),
                other => panic!("Dataset {} is not an ArcGIS layer: {other:?}", definition.id),
            }
        }
    }

    #[test]
    fn every_analysis_dataset_resolves() {
        let registry = DatasetRegistry::embedded();
        for dataset in Dataset::ALL {
            let definition = registry.require(dataset).unwrap();
            assert_eq!(definition.id, dataset.as_str());
            assert_eq!(definition.title, dataset.title());
        }
    }

    fn manifest(entries: &[(&str, &str)]) -> String {
        entries
            .iter()
            .map(|(id, title)| {
                format!(
                    "[[datasets]]\nid = \"{id}\"\ntitle = \"{title}\"\n\
                     [datasets.source]\ntype = \"geojson_url\"\nurl = \"https://example.com/{id}\"\n"
                )
            })
            .collect()
    }

    #[test]
    fn resolves_by_title_when_id_differs() {
        let registry =
            DatasetRegistry::from_manifest_str(&manifest(&[("soil_map_2020", "Soil Type")]))
                .unwrap();

        assert_eq!(registry.resolve("soil").unwrap().id, "soil_map_2020");
        assert_eq!(registry.resolve("Soil Type").unwrap().id, "soil_map_2020");
        assert!(registry.resolve("water").is_none());
    }

    #[test]
    fn id_match_wins_over_title_match() {
        let registry = DatasetRegistry::from_manifest_str(&manifest(&[
            ("legacy", "Soil Type"),
            ("soil", "Soil (revised)"),
        ]))
        .unwrap();

        assert_eq!(registry.resolve("soil").unwrap().id, "soil");
    }

    #[test]
    fn missing_dataset_is_reported_by_name() {
        let registry = DatasetRegistry::from_manifest_str(&manifest(&[("soil", "Soil Type")]))
            .unwrap();
        let error = registry.require(Dataset::Ponds).unwrap_err();
        assert!(matches!(error, DatasetError::MissingDataset { dataset } if dataset == "ponds"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let result = DatasetRegistry::from_manifest_str(&manifest(&[
            ("soil", "Soil Type"),
            ("soil", "Soil Type"),
        ]));
        assert!(matches!(result, Err(DatasetError::Conversion { .. })));
    }

    #[test]
    fn invalid_manifest_is_a_toml_error() {
        let result = DatasetRegistry::from_manifest_str("[[datasets]]\nid = 3\n");
        assert!(matches!(result, Err(DatasetError::Toml(_))));
    }
}
