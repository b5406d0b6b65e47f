//! Validated detection polygons in pixel space.

use geo::{Area, Coord, Intersects, Line, LineString, Polygon};

use crate::GeometryError;

/// A simple polygon in pixel coordinates with positive area.
///
/// Construction collapses repeated consecutive vertices (mask traces rounded
/// to integer pixels often repeat) and drops an explicit closing vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelPolygon {
    inner: Polygon<f64>,
    area: f64,
}

impl PixelPolygon {
    /// Validate a ring of `[x, y]` vertices.
    pub fn try_new(points: &[[f64; 2]]) -> Result<Self, GeometryError> {
        let mut ring: Vec<Coord<f64>> = Vec::with_capacity(points.len());
        for &[x, y] in points {
            if !x.is_finite() || !y.is_finite() {
                return Err(GeometryError::NonFiniteCoordinate { x, y });
            }
            let c = Coord { x, y };
            if ring.last() != Some(&c) {
                ring.push(c);
            }
        }
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(GeometryError::TooFewVertices(ring.len()));
        }

        check_simple(&ring)?;

        let inner = Polygon::new(LineString::from(ring), vec![]);
        let area = inner.unsigned_area();
        if area <= 0.0 {
            return Err(GeometryError::ZeroArea);
        }

        Ok(Self { inner, area })
    }

    /// Area in square pixels.
    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn as_geo(&self) -> &Polygon<f64> {
        &self.inner
    }
}

/// Reject rings where two non-adjacent edges touch or cross.
fn check_simple(ring: &[Coord<f64>]) -> Result<(), GeometryError> {
    let n = ring.len();
    let edge = |i: usize| Line::new(ring[i], ring[(i + 1) % n]);

    for i in 0..n {
        for j in (i + 2)..n {
            // first and last edges share the closing vertex
            if i == 0 && j == n - 1 {
                continue;
            }
            if edge(i).intersects(&edge(j)) {
                return Err(GeometryError::SelfIntersecting {
                    first: i,
                    second: j,
                });
            }
        }
    }
    Ok(())
}
