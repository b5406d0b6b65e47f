//! Verification of detection polygons against the buffer zones.

use serde::{Deserialize, Serialize};
use solar_common::{BufferTier, ImageFrame};
use tracing::{debug, warn};

use crate::extract::{extract_polygons, Detection, DetectionSet};
use crate::geometry::PixelPolygon;
use crate::rounding::{round_to_cents, RoundingMode};
use crate::zones::BufferZones;
use crate::{VerifyError, VerifyResult};

/// What to do with a detection whose polygon is malformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryPolicy {
    /// Log and ignore the detection
    #[default]
    Skip,
    /// Fail verification of the whole image
    Abort,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOptions {
    #[serde(default)]
    pub geometry_policy: GeometryPolicy,
    #[serde(default)]
    pub rounding: RoundingMode,
}

/// A detection that touched a buffer zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonMatch {
    /// Index into the extracted polygon list
    pub index: usize,
    /// First zone matched, inner before outer
    pub tier: BufferTier,
    /// Unrounded ground area of the whole polygon
    pub area_sqm: f64,
    pub confidence: Option<f64>,
}

/// Outcome of verifying one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    pub verified: bool,
    /// Total area of matching polygons, rounded to 2 decimals
    pub area_sqm: f64,
    /// Inner tier if any polygon matched it, else outer if any matched
    pub tier: Option<BufferTier>,
    pub matches: Vec<PolygonMatch>,
    /// Detections ignored because of malformed geometry
    pub skipped: usize,
    pub zones: BufferZones,
}

impl Verification {
    /// Highest known confidence among matching detections.
    pub fn best_confidence(&self) -> Option<f64> {
        self.matches
            .iter()
            .filter_map(|m| m.confidence)
            .fold(None, |best, c| Some(best.map_or(c, |b: f64| b.max(c))))
    }
}

/// Check each polygon against the inner zone, then the outer zone.
///
/// Matching polygons contribute `area * pixel_area_m2` to the total; others
/// contribute nothing. Polygons with fewer than three points are ignored.
pub fn verify(
    detections: &[Detection],
    zones: &BufferZones,
    pixel_area_m2: f64,
    options: VerifyOptions,
) -> VerifyResult<Verification> {
    let mut matches = Vec::new();
    let mut skipped = 0;
    let mut total_area = 0.0;

    for (index, detection) in detections.iter().enumerate() {
        if detection.points.len() < 3 {
            continue;
        }

        let polygon = match PixelPolygon::try_new(&detection.points) {
            Ok(p) => p,
            Err(source) => match options.geometry_policy {
                GeometryPolicy::Skip => {
                    warn!(index, error = %source, "Skipping malformed detection");
                    skipped += 1;
                    continue;
                }
                GeometryPolicy::Abort => return Err(VerifyError::Geometry { index, source }),
            },
        };

        let Some(zone) = zones.in_order().into_iter().find(|z| z.intersects(&polygon)) else {
            continue;
        };

        let area_sqm = polygon.area() * pixel_area_m2;
        total_area += area_sqm;
        matches.push(PolygonMatch {
            index,
            tier: zone.tier,
            area_sqm,
            confidence: detection.confidence,
        });
    }

    let tier = matches.iter().map(|m| m.tier).min();
    let verification = Verification {
        verified: !matches.is_empty(),
        area_sqm: round_to_cents(total_area, options.rounding),
        tier,
        matches,
        skipped,
        zones: *zones,
    };

    debug!(
        verified = verification.verified,
        area_sqm = verification.area_sqm,
        matched = verification.matches.len(),
        skipped,
        "Verified detections"
    );
    Ok(verification)
}

/// Verify a detector result for one image frame.
///
/// Builds the zones for the frame's latitude at `zoom`, extracts polygons and
/// runs [`verify`] with the pixel area `gsd²`.
pub fn verify_frame(
    frame: &ImageFrame,
    zoom: u32,
    detections: &DetectionSet,
    options: VerifyOptions,
) -> VerifyResult<Verification> {
    let zones = BufferZones::new(frame, zoom)?;
    let polygons = extract_polygons(detections);
    verify(&polygons, &zones, zones.pixel_area_m2(), options)
}
