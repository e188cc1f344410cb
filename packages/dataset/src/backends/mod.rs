//! [`DatasetQuery`](land_suitability_analysis::DatasetQuery) back-ends.

pub mod arcgis;
pub mod memory;
