//! Common types and utilities shared across the solar verification workspace.

pub mod bbox;
pub mod error;
pub mod frame;
pub mod mercator;
pub mod site;

pub use bbox::BoundingBox;
pub use error::{SolarError, SolarResult};
pub use frame::{BufferTier, ImageFrame};
pub use mercator::{
    centered_extent, lonlat_to_mercator, resolution_at_zoom, zoom_scale, MAX_LATITUDE,
    MAX_ZOOM, METERS_PER_PIXEL_Z0,
};
pub use site::{QcStatus, Site, SiteReport};
