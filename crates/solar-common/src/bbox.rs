//! Bounding box types used to request imagery extents.

use serde::{Deserialize, Serialize};

/// A geographic or projected bounding box.
///
/// For geographic CRS (EPSG:4326), coordinates are in degrees.
/// For Web Mercator (EPSG:3857), coordinates are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Create a bounding box centred on a point with the given half extents.
    pub fn around(center_x: f64, center_y: f64, half_width: f64, half_height: f64) -> Self {
        Self::new(
            center_x - half_width,
            center_y - half_height,
            center_x + half_width,
            center_y + half_height,
        )
    }

    /// Format as "minx,miny,maxx,maxy" for imagery export requests.
    pub fn to_query_string(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Centre point as (x, y).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string() {
        let bbox = BoundingBox::new(-125.0, 24.5, -66.0, 50.0);
        assert_eq!(bbox.to_query_string(), "-125,24.5,-66,50");
    }

    #[test]
    fn test_around() {
        let bbox = BoundingBox::around(10.0, 20.0, 5.0, 2.0);
        assert_eq!(bbox.min_x, 5.0);
        assert_eq!(bbox.max_x, 15.0);
        assert_eq!(bbox.min_y, 18.0);
        assert_eq!(bbox.max_y, 22.0);
        assert_eq!(bbox.center(), (10.0, 20.0));
    }
}
