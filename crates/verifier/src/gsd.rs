//! Ground sample distance under Web Mercator.

use solar_common::{zoom_scale, METERS_PER_PIXEL_Z0};

/// Meters of ground represented by one pixel at `latitude` and `zoom`.
///
/// `156543.03392 * cos(lat) / 2^zoom`. At ±90° the result is (numerically)
/// zero; [`crate::BufferZones::new`] rejects polar latitudes before dividing.
/// Absurd zooms give zero rather than wrapping around.
pub fn gsd(latitude_deg: f64, zoom: u32) -> f64 {
    METERS_PER_PIXEL_Z0 * latitude_deg.to_radians().cos() / zoom_scale(zoom)
}
