//! Math transform primitives
//!
//! A math transform maps coordinate tuples between two coordinate
//! spaces. Projections, datum shifts and axis swaps all implement the
//! same trait so the resolver can chain them freely. Chains are
//! simplified at construction: identity steps are dropped, nested
//! chains flattened, and adjacent affine steps collapsed into one.

use std::sync::Arc;

use crate::crs::errors::{GeoError, GeoResult};

/// A transform between coordinate tuples
pub trait MathTransform: Send + Sync {
    /// Number of source dimensions
    fn source_dimensions(&self) -> usize;

    /// Number of target dimensions
    fn target_dimensions(&self) -> usize;

    /// Transform one coordinate tuple
    fn transform_point(&self, point: &[f64]) -> GeoResult<Vec<f64>>;

    /// The inverse transform
    fn inverse(&self) -> GeoResult<Arc<dyn MathTransform>>;

    /// Whether this transform is the identity
    fn is_identity(&self) -> bool {
        false
    }

    /// Downcast hook for affine-chain collapsing
    fn as_affine(&self) -> Option<&AffineTransform> {
        None
    }

    /// Downcast hook for chain flattening
    fn as_concatenated(&self) -> Option<&ConcatenatedTransform> {
        None
    }
}

/// Check an input tuple against the expected dimension
pub fn check_dimension(point: &[f64], expected: usize) -> GeoResult<()> {
    if point.len() != expected {
        return Err(GeoError::MismatchedDimension {
            expected,
            actual: point.len(),
        });
    }
    Ok(())
}

/// The identity transform on n dimensions
#[derive(Debug, Clone)]
pub struct IdentityTransform {
    dimensions: usize,
}

impl IdentityTransform {
    pub fn new(dimensions: usize) -> Arc<Self> {
        Arc::new(IdentityTransform { dimensions })
    }
}

impl MathTransform for IdentityTransform {
    fn source_dimensions(&self) -> usize {
        self.dimensions
    }

    fn target_dimensions(&self) -> usize {
        self.dimensions
    }

    fn transform_point(&self, point: &[f64]) -> GeoResult<Vec<f64>> {
        check_dimension(point, self.dimensions)?;
        Ok(point.to_vec())
    }

    fn inverse(&self) -> GeoResult<Arc<dyn MathTransform>> {
        Ok(IdentityTransform::new(self.dimensions))
    }

    fn is_identity(&self) -> bool {
        true
    }
}

/// A two-dimensional affine transform
///
/// Stored as the top two rows of the 3x3 homogeneous matrix:
///
/// ```text
/// | m00 m01 m02 |   | x |
/// | m10 m11 m12 | * | y |
/// |  0   0   1  |   | 1 |
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub m00: f64,
    pub m01: f64,
    pub m02: f64,
    pub m10: f64,
    pub m11: f64,
    pub m12: f64,
}

impl AffineTransform {
    /// The identity matrix
    pub fn identity() -> Self {
        AffineTransform {
            m00: 1.0, m01: 0.0, m02: 0.0,
            m10: 0.0, m11: 1.0, m12: 0.0,
        }
    }

    /// Axis swap: (x, y) -> (y, x)
    pub fn swap_xy() -> Self {
        AffineTransform {
            m00: 0.0, m01: 1.0, m02: 0.0,
            m10: 1.0, m11: 0.0, m12: 0.0,
        }
    }

    /// Independent per-axis scale
    pub fn scale(sx: f64, sy: f64) -> Self {
        AffineTransform {
            m00: sx, m01: 0.0, m02: 0.0,
            m10: 0.0, m11: sy, m12: 0.0,
        }
    }

    /// Translation
    pub fn translation(tx: f64, ty: f64) -> Self {
        AffineTransform {
            m00: 1.0, m01: 0.0, m02: tx,
            m10: 0.0, m11: 1.0, m12: ty,
        }
    }

    /// Matrix product `self * other`: applying the result equals
    /// applying `other` first, then `self`
    pub fn multiply(&self, other: &AffineTransform) -> AffineTransform {
        AffineTransform {
            m00: self.m00 * other.m00 + self.m01 * other.m10,
            m01: self.m00 * other.m01 + self.m01 * other.m11,
            m02: self.m00 * other.m02 + self.m01 * other.m12 + self.m02,
            m10: self.m10 * other.m00 + self.m11 * other.m10,
            m11: self.m10 * other.m01 + self.m11 * other.m11,
            m12: self.m10 * other.m02 + self.m11 * other.m12 + self.m12,
        }
    }

    fn determinant(&self) -> f64 {
        self.m00 * self.m11 - self.m01 * self.m10
    }
}

impl MathTransform for AffineTransform {
    fn source_dimensions(&self) -> usize {
        2
    }

    fn target_dimensions(&self) -> usize {
        2
    }

    fn transform_point(&self, point: &[f64]) -> GeoResult<Vec<f64>> {
        check_dimension(point, 2)?;
        let (x, y) = (point[0], point[1]);
        Ok(vec![
            self.m00 * x + self.m01 * y + self.m02,
            self.m10 * x + self.m11 * y + self.m12,
        ])
    }

    fn inverse(&self) -> GeoResult<Arc<dyn MathTransform>> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(GeoError::Transform(
                "Affine transform is not invertible".to_string(),
            ));
        }
        Ok(Arc::new(AffineTransform {
            m00: self.m11 / det,
            m01: -self.m01 / det,
            m02: (self.m01 * self.m12 - self.m11 * self.m02) / det,
            m10: -self.m10 / det,
            m11: self.m00 / det,
            m12: (self.m10 * self.m02 - self.m00 * self.m12) / det,
        }))
    }

    fn is_identity(&self) -> bool {
        *self == AffineTransform::identity()
    }

    fn as_affine(&self) -> Option<&AffineTransform> {
        Some(self)
    }
}

/// An ordered chain of transforms, applied first to last
pub struct ConcatenatedTransform {
    steps: Vec<Arc<dyn MathTransform>>,
}

impl ConcatenatedTransform {
    /// Build a simplified chain from the given steps
    ///
    /// Drops identities, flattens nested chains and collapses adjacent
    /// affine steps. Returns an identity transform for an effectively
    /// empty chain, or the single remaining step unwrapped.
    pub fn create(steps: Vec<Arc<dyn MathTransform>>) -> Arc<dyn MathTransform> {
        let mut flat: Vec<Arc<dyn MathTransform>> = Vec::new();
        for step in steps {
            Self::push_simplified(&mut flat, step);
        }
        match flat.len() {
            0 => IdentityTransform::new(2),
            1 => flat.into_iter().next().unwrap(),
            _ => Arc::new(ConcatenatedTransform { steps: flat }),
        }
    }

    fn push_simplified(flat: &mut Vec<Arc<dyn MathTransform>>, step: Arc<dyn MathTransform>) {
        if step.is_identity() {
            return;
        }
        if let Some(chain) = step.as_concatenated() {
            for inner in &chain.steps {
                Self::push_simplified(flat, Arc::clone(inner));
            }
            return;
        }
        if let (Some(last_affine), Some(step_affine)) = (
            flat.last().and_then(|t| t.as_affine().copied()),
            step.as_affine(),
        ) {
            // Collapse adjacent affine steps into one matrix
            let merged = step_affine.multiply(&last_affine);
            flat.pop();
            if !merged.is_identity() {
                flat.push(Arc::new(merged));
            }
            return;
        }
        flat.push(step);
    }

    /// The simplified steps of this chain
    pub fn steps(&self) -> &[Arc<dyn MathTransform>] {
        &self.steps
    }
}

impl MathTransform for ConcatenatedTransform {
    fn source_dimensions(&self) -> usize {
        self.steps.first().map_or(2, |s| s.source_dimensions())
    }

    fn target_dimensions(&self) -> usize {
        self.steps.last().map_or(2, |s| s.target_dimensions())
    }

    fn transform_point(&self, point: &[f64]) -> GeoResult<Vec<f64>> {
        let mut current = point.to_vec();
        for step in &self.steps {
            current = step.transform_point(&current)?;
        }
        Ok(current)
    }

    fn inverse(&self) -> GeoResult<Arc<dyn MathTransform>> {
        let mut inverted: Vec<Arc<dyn MathTransform>> = Vec::with_capacity(self.steps.len());
        for step in self.steps.iter().rev() {
            inverted.push(step.inverse()?);
        }
        Ok(ConcatenatedTransform::create(inverted))
    }

    fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }

    fn as_concatenated(&self) -> Option<&ConcatenatedTransform> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affine_swap_and_inverse() {
        let swap = AffineTransform::swap_xy();
        assert_eq!(swap.transform_point(&[1.0, 2.0]).unwrap(), vec![2.0, 1.0]);
        let inv = swap.inverse().unwrap();
        assert_eq!(inv.transform_point(&[2.0, 1.0]).unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_affine_composition_order() {
        // Scale then translate
        let scale = AffineTransform::scale(2.0, 2.0);
        let translate = AffineTransform::translation(10.0, 0.0);
        let combined = translate.multiply(&scale);
        assert_eq!(
            combined.transform_point(&[3.0, 4.0]).unwrap(),
            vec![16.0, 8.0]
        );
    }

    #[test]
    fn test_concatenation_drops_identities() {
        let chain = ConcatenatedTransform::create(vec![
            IdentityTransform::new(2),
            Arc::new(AffineTransform::swap_xy()),
            IdentityTransform::new(2),
        ]);
        assert!(!chain.is_identity());
        assert_eq!(chain.transform_point(&[1.0, 2.0]).unwrap(), vec![2.0, 1.0]);
    }

    #[test]
    fn test_adjacent_affines_collapse_to_identity() {
        let chain = ConcatenatedTransform::create(vec![
            Arc::new(AffineTransform::swap_xy()) as Arc<dyn MathTransform>,
            Arc::new(AffineTransform::swap_xy()),
        ]);
        assert!(chain.is_identity());
    }

    #[test]
    fn test_dimension_mismatch() {
        let id = IdentityTransform::new(2);
        let err = id.transform_point(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(
            err,
            GeoError::MismatchedDimension { expected: 2, actual: 3 }
        ));
    }

    #[test]
    fn test_singular_affine_has_no_inverse() {
        let degenerate = AffineTransform::scale(0.0, 1.0);
        assert!(degenerate.inverse().is_err());
    }
}
