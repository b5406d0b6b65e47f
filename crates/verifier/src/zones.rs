//! Buffer circles around the image centre.

use geo::{EuclideanDistance, Intersects, Point};
use serde::Serialize;
use solar_common::{BufferTier, ImageFrame};

use crate::geometry::PixelPolygon;
use crate::gsd::gsd;
use crate::{VerifyError, VerifyResult};

/// A buffer circle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BufferZone {
    pub tier: BufferTier,
    /// Centre in pixel coordinates (x, y)
    pub center: (f64, f64),
    /// Radius in whole pixels, truncated toward zero
    pub radius_px: u32,
}

impl BufferZone {
    /// Build the zone for a tier, truncating the pixel radius.
    pub fn new(tier: BufferTier, center: (f64, f64), gsd: f64) -> Self {
        Self {
            tier,
            center,
            radius_px: (tier.radius_m() / gsd) as u32,
        }
    }

    /// Whether the polygon and the closed disk share at least one point.
    ///
    /// True when the centre lies inside (or on) the polygon, or when the
    /// polygon boundary comes within the radius of the centre. The latter also
    /// covers a polygon lying entirely inside the disk. A zone whose radius
    /// truncated to zero pixels is empty and intersects nothing.
    pub fn intersects(&self, polygon: &PixelPolygon) -> bool {
        if self.radius_px == 0 {
            return false;
        }
        let center = Point::new(self.center.0, self.center.1);
        let shape = polygon.as_geo();
        if center.intersects(shape) {
            return true;
        }
        center.euclidean_distance(shape.exterior()) <= self.radius_px as f64
    }
}

/// The inner (1200 sq.ft) and outer (2400 sq.ft) zones of one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BufferZones {
    pub inner: BufferZone,
    pub outer: BufferZone,
    /// Meters per pixel used to size the zones
    pub gsd: f64,
}

impl BufferZones {
    /// Build both zones for a frame at a zoom level.
    ///
    /// Fails on non-finite or out-of-range latitudes and on the poles, where
    /// the ground sample distance is zero.
    pub fn new(frame: &ImageFrame, zoom: u32) -> VerifyResult<Self> {
        let lat = frame.latitude;
        if !lat.is_finite() || lat.abs() > 90.0 {
            return Err(VerifyError::InvalidLatitude(lat));
        }
        if lat.abs() == 90.0 {
            return Err(VerifyError::PolarLatitude(lat));
        }
        Self::from_gsd(frame.center(), gsd(lat, zoom))
    }

    /// Build both zones around `center` for a known ground sample distance.
    pub fn from_gsd(center: (f64, f64), gsd: f64) -> VerifyResult<Self> {
        if !gsd.is_finite() || gsd <= 0.0 {
            return Err(VerifyError::InvalidGsd(gsd));
        }
        Ok(Self {
            inner: BufferZone::new(BufferTier::Sqft1200, center, gsd),
            outer: BufferZone::new(BufferTier::Sqft2400, center, gsd),
            gsd,
        })
    }

    /// Ground area of one pixel in square meters.
    pub fn pixel_area_m2(&self) -> f64 {
        self.gsd * self.gsd
    }

    /// Zones in matching precedence order, inner first.
    pub fn in_order(&self) -> [&BufferZone; 2] {
        [&self.inner, &self.outer]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> PixelPolygon {
        PixelPolygon::try_new(&[
            [x0, y0],
            [x0 + size, y0],
            [x0 + size, y0 + size],
            [x0, y0 + size],
        ])
        .unwrap()
    }

    #[test]
    fn test_reference_radii_delhi() {
        let frame = ImageFrame::new(600, 600, 28.6139).unwrap();
        let zones = BufferZones::new(&frame, 18).unwrap();
        assert!((zones.gsd - 0.5243).abs() < 0.001);
        assert_eq!(zones.inner.center, (300.0, 300.0));
        assert_eq!(zones.inner.radius_px, 11);
        assert_eq!(zones.outer.radius_px, 16);
    }

    #[test]
    fn test_radii_at_equator_zoom_18() {
        let zones = BufferZones::from_gsd((300.0, 300.0), 0.603).unwrap();
        assert_eq!(zones.inner.radius_px, 9);
        assert_eq!(zones.outer.radius_px, 13);
    }

    #[test]
    fn test_outer_never_smaller() {
        for lat in [-85.0, -30.0, 0.0, 12.9784, 60.0, 85.0] {
            for zoom in 0..=22 {
                let frame = ImageFrame::new(600, 600, lat).unwrap();
                let zones = BufferZones::new(&frame, zoom).unwrap();
                assert!(zones.outer.radius_px >= zones.inner.radius_px);
            }
        }
    }

    #[test]
    fn test_poles_rejected() {
        let frame = ImageFrame::new(600, 600, 90.0).unwrap();
        assert!(matches!(
            BufferZones::new(&frame, 18),
            Err(VerifyError::PolarLatitude(_))
        ));
        let frame = ImageFrame::new(600, 600, -90.0).unwrap();
        assert!(matches!(
            BufferZones::new(&frame, 18),
            Err(VerifyError::PolarLatitude(_))
        ));
    }

    #[test]
    fn test_invalid_latitude_rejected() {
        let frame = ImageFrame::new(600, 600, f64::NAN).unwrap();
        assert!(matches!(
            BufferZones::new(&frame, 18),
            Err(VerifyError::InvalidLatitude(_))
        ));
        let frame = ImageFrame::new(600, 600, 91.0).unwrap();
        assert!(BufferZones::new(&frame, 18).is_err());
    }

    #[test]
    fn test_zero_gsd_rejected() {
        assert!(BufferZones::from_gsd((0.0, 0.0), 0.0).is_err());
        assert!(BufferZones::from_gsd((0.0, 0.0), f64::INFINITY).is_err());
    }

    #[test]
    fn test_huge_zoom_rejected() {
        let frame = ImageFrame::new(600, 600, 0.0).unwrap();
        assert!(matches!(
            BufferZones::new(&frame, u32::MAX),
            Err(VerifyError::InvalidGsd(_))
        ));
    }

    #[test]
    fn test_zero_radius_zone_is_empty() {
        let zone = BufferZone {
            tier: BufferTier::Sqft1200,
            center: (100.0, 100.0),
            radius_px: 0,
        };
        // Even a polygon covering the centre misses an empty zone
        assert!(!zone.intersects(&square(90.0, 90.0, 20.0)));
    }

    #[test]
    fn test_low_zoom_truncates_radii_to_zero() {
        // gsd ≈ 9.55 m at the equator, zoom 14
        let frame = ImageFrame::new(600, 600, 0.0).unwrap();
        let zones = BufferZones::new(&frame, 14).unwrap();
        assert_eq!((zones.inner.radius_px, zones.outer.radius_px), (0, 0));
    }

    #[test]
    fn test_disk_intersection_cases() {
        let zone = BufferZone {
            tier: BufferTier::Sqft1200,
            center: (100.0, 100.0),
            radius_px: 10,
        };
        // Contains the centre
        assert!(zone.intersects(&square(90.0, 90.0, 20.0)));
        // Fully inside the disk
        assert!(zone.intersects(&square(98.0, 98.0, 2.0)));
        // Edge crosses the circle
        assert!(zone.intersects(&square(105.0, 95.0, 20.0)));
        // Touches the circle at one point
        assert!(zone.intersects(&square(110.0, 95.0, 10.0)));
        // Clear of the circle
        assert!(!zone.intersects(&square(111.0, 95.0, 10.0)));
        // Corner near the diagonal but outside the radius
        assert!(!zone.intersects(&square(108.0, 108.0, 10.0)));
    }
}
