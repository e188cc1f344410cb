#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Rule-based land suitability evaluation.
//!
//! Given a sketched [`Region`] and a [`DatasetQuery`] back-end, the
//! evaluator buffers the region, queries the soil, water, pond, built-up,
//! and agro-ecological zone datasets concurrently, and runs an ordered
//! rule cascade over the aggregated attributes to produce a
//! [`Recommendation`].

pub mod aggregate;
pub mod config;
pub mod evaluator;
pub mod report;
pub mod rotation;
pub mod rules;
pub mod session;

use async_trait::async_trait;
use land_suitability_analysis_models::{Dataset, LayerQueryResult, Region, RegionError};
use land_suitability_geometry::GeometryError;

pub use config::AnalysisConfig;
pub use evaluator::{evaluate, evaluate_cancellable};
pub use land_suitability_analysis_models::{Outcome, Recommendation};
pub use session::AnalysisSession;

/// Errors a [`DatasetQuery`] back-end reports for a single query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The back-end has no dataset by this name.
    #[error("Unknown dataset: {dataset}")]
    UnknownDataset {
        /// Name that failed to resolve.
        dataset: String,
    },

    /// The query itself failed (network, service, or decoding error).
    #[error("Query failed: {message}")]
    Backend {
        /// Description of what went wrong.
        message: String,
    },
}

/// Errors that abort a suitability analysis.
///
/// No partial recommendation is ever produced alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum SuitabilityError {
    /// A required dataset is not configured on the back-end.
    #[error("Dataset '{dataset}' is not configured")]
    Configuration {
        /// The dataset that failed to resolve.
        dataset: Dataset,
    },

    /// The input region is unusable.
    #[error("Invalid region: {0}")]
    InvalidRegion(#[from] RegionError),

    /// Buffering the region failed.
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// A spatial query failed.
    #[error("Analysis failed while querying '{dataset}': {source}")]
    AnalysisFailed {
        /// The dataset whose query failed.
        dataset: Dataset,
        /// The underlying query error.
        #[source]
        source: QueryError,
    },

    /// The analysis was cancelled, usually by a newer sketch.
    #[error("Analysis cancelled")]
    Cancelled,
}

/// Spatial query capability the evaluator is run against.
///
/// Implementations only need to resolve dataset names and answer
/// intersection queries; the geometry operations default to the
/// geodesic helpers in [`land_suitability_geometry`].
#[async_trait]
pub trait DatasetQuery: Send + Sync {
    /// Whether a dataset with this name can be queried.
    fn has_dataset(&self, name: &str) -> bool;

    /// Returns every feature of `name` whose geometry intersects
    /// `geometry`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownDataset`] if the name does not
    /// resolve, or [`QueryError::Backend`] if the query fails.
    async fn query_intersecting(
        &self,
        name: &str,
        geometry: &Region,
    ) -> Result<LayerQueryResult, QueryError>;

    /// Expands `geometry` outward by `distance_meters`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] for an invalid distance or empty region.
    fn geodesic_buffer(
        &self,
        geometry: &Region,
        distance_meters: f64,
    ) -> Result<Region, GeometryError> {
        land_suitability_geometry::geodesic_buffer(geometry, distance_meters)
    }

    /// Overlap area of two regions in square meters; `0` if disjoint.
    fn intersection_area(&self, a: &Region, b: &Region) -> f64 {
        land_suitability_geometry::intersection_area(a, b)
    }

    /// Area of `region` in square meters.
    fn area(&self, region: &Region) -> f64 {
        land_suitability_geometry::geodesic_area(region)
    }
}
