//! Polygonal regions of interest.

use geo::{Area, Coord, Geometry, MultiPolygon, Polygon, Validation};
use thiserror::Error;

/// Reasons a caller-supplied geometry cannot be used as a [`Region`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    /// The geometry has no polygons.
    #[error("Region geometry is empty")]
    EmptyGeometry,

    /// The geometry is not a polygon or multipolygon.
    #[error("Region must be a polygon, got {kind}")]
    NotPolygonal {
        /// Geometry kind that was supplied (e.g. `"Point"`).
        kind: &'static str,
    },

    /// An exterior ring has fewer than three distinct vertices.
    #[error("Region ring has {vertices} distinct vertices, at least 3 are required")]
    TooFewVertices {
        /// Distinct vertex count of the offending ring.
        vertices: usize,
    },

    /// The polygon encloses no area.
    #[error("Region encloses zero area")]
    ZeroArea,

    /// The polygon is self-intersecting or otherwise invalid.
    #[error("Region is not a valid simple polygon")]
    SelfIntersecting,
}

/// An immutable polygonal area in longitude/latitude (WGS84) coordinates.
///
/// User sketches are validated on construction. Derived regions such as
/// buffers and intersections go through [`Region::from_multi_polygon`],
/// which skips validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Region(MultiPolygon<f64>);

impl Region {
    /// Validates a single polygon sketch.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError`] if the polygon has fewer than three
    /// distinct vertices, zero area, or a self-intersecting ring.
    pub fn try_from_polygon(polygon: Polygon<f64>) -> Result<Self, RegionError> {
        validate_polygon(&polygon)?;
        Ok(Self(MultiPolygon(vec![polygon])))
    }

    /// Validates a polygon or multipolygon geometry.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError`] if the geometry is not polygonal or any of
    /// its polygons fails validation.
    pub fn try_from_geometry(geometry: Geometry<f64>) -> Result<Self, RegionError> {
        match geometry {
            Geometry::Polygon(polygon) => Self::try_from_polygon(polygon),
            Geometry::MultiPolygon(multi) => {
                let region = Self(multi);
                region.validate()?;
                Ok(region)
            }
            other => Err(RegionError::NotPolygonal {
                kind: geometry_kind(&other),
            }),
        }
    }

    /// Wraps a derived multipolygon without validation.
    #[must_use]
    pub const fn from_multi_polygon(multi: MultiPolygon<f64>) -> Self {
        Self(multi)
    }

    /// Returns the underlying multipolygon.
    #[must_use]
    pub const fn as_multi_polygon(&self) -> &MultiPolygon<f64> {
        &self.0
    }

    /// Returns the region as a generic [`Geometry`] for predicate checks.
    #[must_use]
    pub fn to_geometry(&self) -> Geometry<f64> {
        Geometry::MultiPolygon(self.0.clone())
    }

    /// Checks the region against the rules applied to user sketches.
    /// Useful for regions built with [`Region::from_multi_polygon`].
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::EmptyGeometry`] for a region with no
    /// polygons, otherwise the first polygon's validation error.
    pub fn validate(&self) -> Result<(), RegionError> {
        if self.0.0.is_empty() {
            return Err(RegionError::EmptyGeometry);
        }
        self.0.0.iter().try_for_each(validate_polygon)
    }

    /// Whether the region contains no polygons.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.0.is_empty()
    }
}

impl From<Region> for MultiPolygon<f64> {
    fn from(region: Region) -> Self {
        region.0
    }
}

fn validate_polygon(polygon: &Polygon<f64>) -> Result<(), RegionError> {
    let vertices = distinct_vertices(polygon.exterior().0.as_slice());
    if vertices < 3 {
        return Err(RegionError::TooFewVertices { vertices });
    }
    if polygon.unsigned_area() <= 0.0 {
        return Err(RegionError::ZeroArea);
    }
    if !polygon.is_valid() {
        return Err(RegionError::SelfIntersecting);
    }
    Ok(())
}

fn distinct_vertices(coords: &[Coord<f64>]) -> usize {
    let mut seen: Vec<Coord<f64>> = Vec::with_capacity(coords.len());
    for coord in coords {
        if !seen.contains(coord) {
            seen.push(*coord);
        }
    }
    seen.len()
}

/// Human-readable name of a geometry variant, used in error messages.
#[must_use]
pub const fn geometry_kind(geometry: &Geometry<f64>) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}
