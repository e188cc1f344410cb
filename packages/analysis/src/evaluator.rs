//! The suitability evaluator.
//!
//! One call issues five independent queries concurrently and waits for
//! all of them before running the cascade. The first failing query
//! aborts the rest.

use futures::future::{AbortRegistration, Abortable};
use geo::{Geometry, MultiPolygon};
use land_suitability_analysis_models::{Dataset, Feature, LayerQueryResult, Recommendation, Region};

use crate::aggregate::{SoilSummary, ZoneSummary};
use crate::config::AnalysisConfig;
use crate::rules::Evidence;
use crate::{DatasetQuery, QueryError, SuitabilityError};

/// Runs a full suitability analysis for `region`.
///
/// # Errors
///
/// * [`SuitabilityError::Configuration`] if any of the five datasets is
///   not available on `query`.
/// * [`SuitabilityError::InvalidRegion`] if `region` is empty or fails
///   [`Region::validate`].
/// * [`SuitabilityError::Geometry`] if a buffer cannot be computed.
/// * [`SuitabilityError::AnalysisFailed`] if any query fails.
pub async fn evaluate<Q>(
    region: &Region,
    query: &Q,
    config: &AnalysisConfig,
) -> Result<Recommendation, SuitabilityError>
where
    Q: DatasetQuery + ?Sized,
{
    for dataset in Dataset::ALL {
        if !query.has_dataset(dataset.as_str()) {
            return Err(SuitabilityError::Configuration { dataset });
        }
    }
    region.validate()?;

    let soil = async {
        let features = run_query(query, Dataset::Soil, region).await?;
        Ok::<_, SuitabilityError>(SoilSummary::from_features(&features))
    };

    let river = async {
        let buffer = query.geodesic_buffer(region, config.river_buffer_meters)?;
        let features = run_query(query, Dataset::Water, &buffer).await?;
        Ok::<_, SuitabilityError>(!features.is_empty())
    };

    let pond = async {
        let buffer = query.geodesic_buffer(region, config.pond_buffer_meters)?;
        let features = run_query(query, Dataset::Ponds, &buffer).await?;
        Ok::<_, SuitabilityError>(!features.is_empty())
    };

    let builtup = async {
        let buffer = query.geodesic_buffer(region, config.builtup_buffer_meters)?;
        let features = run_query(query, Dataset::Builtup, &buffer).await?;
        Ok::<_, SuitabilityError>(builtup_coverage(query, &buffer, &features))
    };

    let zones = async {
        let features = run_query(query, Dataset::AgroZone, region).await?;
        Ok::<_, SuitabilityError>(ZoneSummary::from_features(&features))
    };

    let (soil, is_near_river, is_near_pond, coverage_pct, zones) =
        futures::try_join!(soil, river, pond, builtup, zones)?;

    let recommendation = Evidence {
        soil,
        is_near_river,
        is_near_pond,
        coverage_pct,
        zones,
    }
    .into_recommendation(config);

    log::info!(
        "Suitability analysis: {} (coverage {:.2}%, river={}, pond={})",
        recommendation.outcome,
        recommendation.coverage_pct,
        recommendation.is_near_river,
        recommendation.is_near_pond,
    );

    Ok(recommendation)
}

/// Same as [`evaluate`], but resolves to [`SuitabilityError::Cancelled`]
/// as soon as the paired [`futures::future::AbortHandle`] is aborted.
/// All outstanding queries are dropped on cancellation.
///
/// # Errors
///
/// Returns every error [`evaluate`] does, plus
/// [`SuitabilityError::Cancelled`].
pub async fn evaluate_cancellable<Q>(
    region: &Region,
    query: &Q,
    config: &AnalysisConfig,
    registration: AbortRegistration,
) -> Result<Recommendation, SuitabilityError>
where
    Q: DatasetQuery + ?Sized,
{
    Abortable::new(evaluate(region, query, config), registration)
        .await
        .unwrap_or(Err(SuitabilityError::Cancelled))
}

async fn run_query<Q>(
    query: &Q,
    dataset: Dataset,
    geometry: &Region,
) -> Result<LayerQueryResult, SuitabilityError>
where
    Q: DatasetQuery + ?Sized,
{
    match query.query_intersecting(dataset.as_str(), geometry).await {
        Ok(features) => {
            log::debug!("Query '{dataset}' returned {} feature(s)", features.len());
            Ok(features)
        }
        Err(QueryError::UnknownDataset { .. }) => Err(SuitabilityError::Configuration { dataset }),
        Err(source) => {
            log::error!("Query '{dataset}' failed: {source}");
            Err(SuitabilityError::AnalysisFailed { dataset, source })
        }
    }
}

/// Percentage of `buffer` covered by the polygonal built-up features.
///
/// Point and line features are skipped. Overlapping built-up polygons are
/// counted once per feature, so the result can exceed 100.
fn builtup_coverage<Q>(query: &Q, buffer: &Region, features: &[Feature]) -> f64
where
    Q: DatasetQuery + ?Sized,
{
    let mut covered = 0.0;
    let mut skipped = 0usize;

    for feature in features {
        let footprint = match &feature.geometry {
            Some(Geometry::Polygon(polygon)) => {
                Region::from_multi_polygon(MultiPolygon(vec![polygon.clone()]))
            }
            Some(Geometry::MultiPolygon(multi)) => Region::from_multi_polygon(multi.clone()),
            _ => {
                skipped += 1;
                continue;
            }
        };
        covered += query.intersection_area(buffer, &footprint);
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} non-polygonal built-up feature(s)");
    }

    coverage_percentage(covered, query.area(buffer))
}

/// `100 * covered / total`, or `0` when `total` is zero or the ratio is
/// not finite.
#[must_use]
pub fn coverage_percentage(covered: f64, total: f64) -> f64 {
    if total <= 0.0 || !total.is_finite() {
        log::warn!("Built-up buffer has no area ({total} m²), reporting 0% coverage");
        return 0.0;
    }
    let pct = 100.0 * covered / total;
    if pct.is_finite() { pct } else { 0.0 }
}
