#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Geodesic geometry helpers for lon/lat regions.
//!
//! Areas are computed on the WGS84 ellipsoid. Buffers are built in a
//! local tangent plane centred on the region (meters east/north of the
//! centroid) and projected back, which is accurate to well under a
//! percent for sketch-sized regions and buffer distances of a few
//! kilometers.

use geo::{BooleanOps, Buffer, Centroid, Coord, GeodesicArea, MapCoords, MultiPolygon};
use land_suitability_analysis_models::Region;
use thiserror::Error;

/// Mean earth radius in meters (IUGG).
const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Errors from geometry operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Buffer distance is negative or not finite.
    #[error("Invalid buffer distance: {distance} m")]
    InvalidDistance {
        /// The rejected distance in meters.
        distance: f64,
    },

    /// The region has no polygons, so it has no centroid to project around.
    #[error("Cannot buffer an empty region")]
    EmptyRegion,
}

/// Equirectangular projection around a fixed origin, in meters.
#[derive(Debug, Clone, Copy)]
struct LocalPlane {
    origin: Coord<f64>,
    cos_lat: f64,
}

impl LocalPlane {
    fn centred_on(region: &Region) -> Option<Self> {
        let centroid = region.as_multi_polygon().centroid()?;
        Some(Self {
            origin: centroid.0,
            cos_lat: centroid.y().to_radians().cos(),
        })
    }

    fn forward(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: EARTH_RADIUS_METERS * (c.x - self.origin.x).to_radians() * self.cos_lat,
            y: EARTH_RADIUS_METERS * (c.y - self.origin.y).to_radians(),
        }
    }

    fn inverse(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: self.origin.x + (c.x / (EARTH_RADIUS_METERS * self.cos_lat)).to_degrees(),
            y: self.origin.y + (c.y / EARTH_RADIUS_METERS).to_degrees(),
        }
    }
}

/// Expands `region` outward by `distance_meters`.
///
/// # Errors
///
/// Returns [`GeometryError::InvalidDistance`] for a negative or
/// non-finite distance and [`GeometryError::EmptyRegion`] if the region
/// has no polygons.
pub fn geodesic_buffer(region: &Region, distance_meters: f64) -> Result<Region, GeometryError> {
    if !distance_meters.is_finite() || distance_meters < 0.0 {
        return Err(GeometryError::InvalidDistance {
            distance: distance_meters,
        });
    }

    let plane = LocalPlane::centred_on(region).ok_or(GeometryError::EmptyRegion)?;

    let projected = region.as_multi_polygon().map_coords(|c| plane.forward(c));
    let buffered: MultiPolygon<f64> = projected.buffer(distance_meters);
    let unprojected = buffered.map_coords(|c| plane.inverse(c));

    log::trace!(
        "Buffered region by {distance_meters} m ({} polygon(s))",
        unprojected.0.len()
    );

    Ok(Region::from_multi_polygon(unprojected))
}

/// Geodesic area of `region` in square meters.
#[must_use]
pub fn geodesic_area(region: &Region) -> f64 {
    region.as_multi_polygon().geodesic_area_unsigned()
}

/// Geometric intersection of two regions. Empty when they are disjoint.
#[must_use]
pub fn intersection(a: &Region, b: &Region) -> Region {
    Region::from_multi_polygon(a.as_multi_polygon().intersection(b.as_multi_polygon()))
}

/// Geodesic area of the overlap of two regions in square meters; `0`
/// when they are disjoint.
#[must_use]
pub fn intersection_area(a: &Region, b: &Region) -> f64 {
    let overlap = intersection(a, b);
    if overlap.is_empty() {
        return 0.0;
    }
    geodesic_area(&overlap)
}
