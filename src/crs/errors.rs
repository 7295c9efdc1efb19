//! Custom error types for referencing operations

use std::fmt;
use std::io;

/// Referencing-specific error types
#[derive(Debug)]
pub enum GeoError {
    /// I/O error
    IoError(io::Error),
    /// Authority code not claimed by any registered factory
    NoSuchAuthorityCode {
        /// The authority that was queried
        authority: String,
        /// The code that could not be resolved
        code: String,
    },
    /// Malformed identifier, unsupported operation method or
    /// conflicting factory registration
    Factory(String),
    /// Runtime failure evaluating a transform (domain error,
    /// non-invertible step)
    Transform(String),
    /// Coordinate array length disagrees with CRS dimensionality
    MismatchedDimension {
        /// Number of ordinates the transform or CRS expects
        expected: usize,
        /// Number of ordinates actually supplied
        actual: usize,
    },
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::IoError(e) => write!(f, "I/O error: {}", e),
            GeoError::NoSuchAuthorityCode { authority, code } => {
                write!(f, "No code \"{}\" from authority \"{}\"", code, authority)
            }
            GeoError::Factory(msg) => write!(f, "Factory error: {}", msg),
            GeoError::Transform(msg) => write!(f, "Transform error: {}", msg),
            GeoError::MismatchedDimension { expected, actual } => {
                write!(f, "Mismatched dimension: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for GeoError {}

impl From<io::Error> for GeoError {
    fn from(error: io::Error) -> Self {
        GeoError::IoError(error)
    }
}

/// Result type for referencing operations
pub type GeoResult<T> = Result<T, GeoError>;

impl From<String> for GeoError {
    fn from(msg: String) -> Self {
        GeoError::Factory(msg)
    }
}
