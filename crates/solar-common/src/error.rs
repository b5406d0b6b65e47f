//! Error types for solar verification services.

use thiserror::Error;

/// Result type alias using SolarError.
pub type SolarResult<T> = Result<T, SolarError>;

/// Primary error type for site and imagery handling.
#[derive(Debug, Error)]
pub enum SolarError {
    // === Input Errors ===
    #[error("Invalid coordinate for site {sample_id}: {message}")]
    InvalidCoordinate { sample_id: String, message: String },

    #[error("Invalid sample id {0:?}: must be non-empty and free of path separators")]
    InvalidSampleId(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid zoom level {0} (maximum is {})", crate::MAX_ZOOM)]
    InvalidZoom(u32),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    // === Data Errors ===
    #[error("Imagery not available for site {0}")]
    ImageryUnavailable(String),
}
