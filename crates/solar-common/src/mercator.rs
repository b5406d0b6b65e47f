//! Web Mercator (EPSG:3857) scale and coordinate helpers.
//!
//! The imagery providers serve Web Mercator pixels, so the ground scale of an
//! image depends on zoom level and latitude.

use crate::BoundingBox;

/// Meters per pixel at the equator for zoom 0 with 256px tiles.
pub const METERS_PER_PIXEL_Z0: f64 = 156543.03392;

/// Half the side of the Web Mercator square in meters.
pub const MAX_EXTENT: f64 = 20037508.342789244;

/// Latitude limit of the Web Mercator square.
pub const MAX_LATITUDE: f64 = 85.05112878;

/// Highest zoom level served by the imagery providers.
pub const MAX_ZOOM: u32 = 22;

/// Projected resolution (Mercator meters per pixel) at a zoom level.
///
/// This is the equatorial value; the true ground distance per pixel shrinks
/// with `cos(latitude)`.
pub fn resolution_at_zoom(zoom: u32) -> f64 {
    METERS_PER_PIXEL_Z0 / zoom_scale(zoom)
}

/// `2^zoom`; zooms past `i32::MAX` saturate to infinity instead of wrapping.
pub fn zoom_scale(zoom: u32) -> f64 {
    match i32::try_from(zoom) {
        Ok(z) => 2f64.powi(z),
        Err(_) => f64::INFINITY,
    }
}

/// Convert lon/lat degrees to Web Mercator meters.
pub fn lonlat_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let x = lon.to_radians() * MAX_EXTENT / std::f64::consts::PI;
    let y = (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln() * MAX_EXTENT
        / std::f64::consts::PI;
    (x, y)
}

/// Mercator extent of an image of `width` x `height` pixels centred on a point.
///
/// At the given zoom the returned bbox has the same meters-per-pixel as a
/// slippy-map tile, so `gsd(lat, zoom)` describes the resulting image.
pub fn centered_extent(lon: f64, lat: f64, zoom: u32, width: u32, height: u32) -> BoundingBox {
    let (x, y) = lonlat_to_mercator(lon, lat);
    let res = resolution_at_zoom(zoom);
    BoundingBox::around(
        x,
        y,
        width as f64 / 2.0 * res,
        height as f64 / 2.0 * res,
    )
}
