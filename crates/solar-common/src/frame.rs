//! Image frame and buffer tier definitions.

use serde::{Deserialize, Serialize};

use crate::{SolarError, SolarResult};

/// Pixel dimensions of a fetched image plus the latitude that sets its scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFrame {
    pub width: u32,
    pub height: u32,
    /// Reference latitude of the image centre in degrees
    pub latitude: f64,
}

impl ImageFrame {
    /// Create a frame, rejecting empty images.
    pub fn new(width: u32, height: u32, latitude: f64) -> SolarResult<Self> {
        if width == 0 || height == 0 {
            return Err(SolarError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            latitude,
        })
    }

    /// Pixel centre of the image, using integer division like the drawing code.
    pub fn center(&self) -> (f64, f64) {
        ((self.width / 2) as f64, (self.height / 2) as f64)
    }
}

/// Regulatory buffer tier around a site.
///
/// Tiers are ordered inner first; the inner tier wins when both match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BufferTier {
    /// 1200 sq.ft circle, radius 5.95 m
    #[serde(rename = "1200")]
    Sqft1200,
    /// 2400 sq.ft circle, radius 8.42 m
    #[serde(rename = "2400")]
    Sqft2400,
}

impl BufferTier {
    /// Real-world radius of the tier's circle in meters.
    pub fn radius_m(&self) -> f64 {
        match self {
            BufferTier::Sqft1200 => 5.95,
            BufferTier::Sqft2400 => 8.42,
        }
    }

    /// Nominal area of the tier in square feet.
    pub fn sqft(&self) -> u32 {
        match self {
            BufferTier::Sqft1200 => 1200,
            BufferTier::Sqft2400 => 2400,
        }
    }
}

impl std::fmt::Display for BufferTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}sqft", self.sqft())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rejects_empty() {
        assert!(ImageFrame::new(0, 600, 28.6).is_err());
        assert!(ImageFrame::new(600, 0, 28.6).is_err());
    }

    #[test]
    fn test_frame_center_uses_integer_division() {
        let (w, h) = test_utils::fixtures::frames::ODD_601X599;
        let frame = ImageFrame::new(w, h, 0.0).unwrap();
        assert_eq!(frame.center(), (300.0, 299.0));
    }

    #[test]
    fn test_tier_order() {
        assert!(BufferTier::Sqft1200 < BufferTier::Sqft2400);
        assert!(BufferTier::Sqft2400.radius_m() > BufferTier::Sqft1200.radius_m());
    }
}
