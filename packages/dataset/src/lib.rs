#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset registry and spatial query back-ends.
//!
//! Dataset definitions are TOML files embedded at compile time, optionally
//! replaced by a user manifest. Two [`DatasetQuery`] back-ends answer the
//! evaluator's queries: [`InMemoryDatasets`] loads every feature once and
//! queries an R-tree locally, [`ArcgisDatasets`] forwards each query to
//! the `ArcGIS` `FeatureServer` the dataset is published on.
//!
//! [`DatasetQuery`]: land_suitability_analysis::DatasetQuery

pub mod backends;
pub mod features;
pub mod fetch;
pub mod registry;

use land_suitability_analysis::QueryError;
use thiserror::Error;

pub use backends::arcgis::ArcgisDatasets;
pub use backends::memory::InMemoryDatasets;
pub use registry::DatasetRegistry;

/// Errors that can occur while loading or querying datasets.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Dataset manifest could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Reading a local file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `GeoJSON` decoding failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Data conversion or service error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },

    /// No definition resolves for a required dataset.
    #[error("No definition for dataset '{dataset}'")]
    MissingDataset {
        /// Name that failed to resolve.
        dataset: String,
    },
}

impl From<DatasetError> for QueryError {
    fn from(error: DatasetError) -> Self {
        match error {
            DatasetError::MissingDataset { dataset } => Self::UnknownDataset { dataset },
            other => Self::Backend {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dataset_maps_to_unknown_dataset() {
        let error: QueryError = DatasetError::MissingDataset {
            dataset: "ponds".to_string(),
        }
        .into();
        assert!(matches!(error, QueryError::UnknownDataset { dataset } if dataset == "ponds"));
    }

    #[test]
    fn other_errors_map_to_backend() {
        let error: QueryError = DatasetError::Conversion {
            message: "ArcGIS API error: Invalid query".to_string(),
        }
        .into();
        assert!(
            matches!(error, QueryError::Backend { message } if message.contains("Invalid query"))
        );
    }
}
