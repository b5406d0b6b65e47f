//! Buffer-zone verification for rooftop solar detections.
//!
//! Given an image frame, a zoom level and the detector's output, the verifier
//! computes the ground sample distance, builds the 1200 and 2400 sq.ft buffer
//! circles around the image centre and reports whether any detection touches
//! them, together with the total detected area in square meters.
//!
//! Everything here is pure: the same inputs always produce the same result.

pub mod error;
pub mod extract;
pub mod geometry;
pub mod gsd;
pub mod rounding;
pub mod verify;
pub mod zones;

pub use error::{GeometryError, VerifyError, VerifyResult};
pub use extract::{
    extract_polygons, BoxDetection, Detection, DetectionSet, DetectorOutput, MaskDetection,
    PixelRect,
};
pub use geometry::PixelPolygon;
pub use gsd::gsd;
pub use rounding::{round_to_cents, RoundingMode};
pub use verify::{
    verify, verify_frame, GeometryPolicy, PolygonMatch, Verification, VerifyOptions,
};
pub use zones::{BufferZone, BufferZones};
