//! Coordinate operations
//!
//! A coordinate operation couples a math transform with the exact CRS
//! objects it was created for, plus the positional accuracy the
//! resolver could promise.

use std::sync::Arc;

use crate::crs::errors::GeoResult;
use crate::crs::system::Crs;
use crate::operation::transform::MathTransform;

/// Accuracy attached when a published datum shift was applied, metres
pub const DATUM_SHIFT_ACCURACY: f64 = 25.0;

/// Accuracy attached when a missing shift was leniently replaced by
/// the identity, metres
pub const LENIENT_SHIFT_ACCURACY: f64 = 1000.0;

/// A transform between two specific coordinate reference systems
pub struct CoordinateOperation {
    /// The CRS the caller asked to transform from
    pub source_crs: Arc<Crs>,
    /// The CRS the caller asked to transform to
    pub target_crs: Arc<Crs>,
    /// The assembled transform chain
    pub transform: Arc<dyn MathTransform>,
    /// Whether a missing datum shift was replaced by the identity
    pub lenient: bool,
    /// Positional accuracy in metres, when a datum shift degraded it
    pub accuracy: Option<f64>,
}

impl std::fmt::Debug for CoordinateOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinateOperation")
            .field("source_crs", &self.source_crs)
            .field("target_crs", &self.target_crs)
            .field("lenient", &self.lenient)
            .field("accuracy", &self.accuracy)
            .finish_non_exhaustive()
    }
}

impl CoordinateOperation {
    /// Whether this operation changes nothing
    pub fn is_identity(&self) -> bool {
        self.transform.is_identity()
    }

    /// Transform one coordinate tuple
    pub fn transform_point(&self, point: &[f64]) -> GeoResult<Vec<f64>> {
        self.transform.transform_point(point)
    }

    /// The reverse operation between the same pair of systems
    pub fn inverse(&self) -> GeoResult<CoordinateOperation> {
        Ok(CoordinateOperation {
            source_crs: Arc::clone(&self.target_crs),
            target_crs: Arc::clone(&self.source_crs),
            transform: self.transform.inverse()?,
            lenient: self.lenient,
            accuracy: self.accuracy,
        })
    }
}
