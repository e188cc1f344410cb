#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset source definition types.
//!
//! Defines the TOML schema describing where each thematic dataset (soil,
//! water, ponds, built-up area, agro-ecological zones) is fetched from.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A thematic dataset definition, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDefinition {
    /// Identifier the analysis resolves datasets by (e.g., `"soil"`).
    pub id: String,
    /// Human-readable layer title (e.g., "Soil Type").
    pub title: String,
    /// Where the features come from.
    pub source: DatasetSourceConfig,
}

impl DatasetDefinition {
    /// Returns the dataset identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the layer title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }
}

/// How to fetch a dataset's features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatasetSourceConfig {
    /// `ArcGIS` `FeatureServer` layer.
    ///
    /// Queries are sent to `{url}/query` with `f=geojson`.
    Arcgis {
        /// Layer URL (e.g., `.../FeatureServer/0`).
        url: String,
        /// Maximum records to request per page (default: 1000).
        max_records: Option<u32>,
    },
    /// URL returning a `GeoJSON` `FeatureCollection`.
    GeojsonUrl {
        /// Full URL.
        url: String,
    },
    /// Local `GeoJSON` `FeatureCollection` file.
    GeojsonFile {
        /// File path, relative to the working directory.
        path: PathBuf,
    },
}

impl DatasetSourceConfig {
    /// Short description for listings.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Arcgis { url, .. } => format!("arcgis {url}"),
            Self::GeojsonUrl { url } => format!("geojson {url}"),
            Self::GeojsonFile { path } => format!("file {}", path.display()),
        }
    }
}

/// Top-level layout of a dataset TOML file with one or more
/// `[[datasets]]` tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetManifest {
    /// Dataset definitions in file order.
    #[serde(default)]
    pub datasets: Vec<DatasetDefinition>,
}
