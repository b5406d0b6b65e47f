//! Error types for buffer verification.

use thiserror::Error;

/// Result type alias using VerifyError.
pub type VerifyResult<T> = Result<T, VerifyError>;

/// Errors that stop verification of a whole image.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Latitude {0} is not a finite value in [-90, 90]")]
    InvalidLatitude(f64),

    #[error("Latitude {0} is polar: ground sample distance is zero")]
    PolarLatitude(f64),

    #[error("Ground sample distance {0} is not positive")]
    InvalidGsd(f64),

    #[error("Geometry error in detection {index}: {source}")]
    Geometry {
        index: usize,
        #[source]
        source: GeometryError,
    },
}

/// Malformed detection polygons.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("coordinate ({x}, {y}) is not finite")]
    NonFiniteCoordinate { x: f64, y: f64 },

    #[error("only {0} distinct vertices after collapsing repeats")]
    TooFewVertices(usize),

    #[error("polygon has zero area")]
    ZeroArea,

    #[error("ring edges {first} and {second} cross")]
    SelfIntersecting { first: usize, second: usize },
}
