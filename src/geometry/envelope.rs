//! Two-dimensional envelopes
//!
//! An axis-aligned bounding box in the ordinate order of whatever CRS
//! it belongs to. An empty envelope contains nothing and is the
//! identity for union.

use crate::crs::errors::{GeoError, GeoResult};

/// An axis-aligned 2D bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    min: [f64; 2],
    max: [f64; 2],
}

impl Envelope {
    /// Create an envelope from two opposite corners, in any order
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> GeoResult<Self> {
        if !(x1.is_finite() && y1.is_finite() && x2.is_finite() && y2.is_finite()) {
            return Err(GeoError::Factory(format!(
                "Non-finite envelope corner: ({}, {}) ({}, {})", x1, y1, x2, y2
            )));
        }
        Ok(Envelope {
            min: [x1.min(x2), y1.min(y2)],
            max: [x1.max(x2), y1.max(y2)],
        })
    }

    /// The empty envelope
    pub fn empty() -> Self {
        Envelope {
            min: [f64::INFINITY; 2],
            max: [f64::NEG_INFINITY; 2],
        }
    }

    /// Whether this envelope contains no point
    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    /// Minimum ordinate of a dimension
    pub fn minimum(&self, dim: usize) -> f64 {
        self.min[dim]
    }

    /// Maximum ordinate of a dimension
    pub fn maximum(&self, dim: usize) -> f64 {
        self.max[dim]
    }

    /// Midpoint ordinate of a dimension
    pub fn median(&self, dim: usize) -> f64 {
        (self.min[dim] + self.max[dim]) / 2.0
    }

    /// Extent of a dimension
    pub fn span(&self, dim: usize) -> f64 {
        self.max[dim] - self.min[dim]
    }

    /// Grow to include a point
    pub fn add_point(&mut self, x: f64, y: f64) {
        self.min[0] = self.min[0].min(x);
        self.min[1] = self.min[1].min(y);
        self.max[0] = self.max[0].max(x);
        self.max[1] = self.max[1].max(y);
    }

    /// Grow to include another envelope
    pub fn add_envelope(&mut self, other: &Envelope) {
        if !other.is_empty() {
            self.add_point(other.min[0], other.min[1]);
            self.add_point(other.max[0], other.max[1]);
        }
    }

    /// Whether a point lies inside, boundary included
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min[0] && x <= self.max[0] && y >= self.min[1] && y <= self.max[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_order_does_not_matter() {
        let a = Envelope::new(10.0, 20.0, -5.0, 3.0).unwrap();
        let b = Envelope::new(-5.0, 3.0, 10.0, 20.0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.minimum(0), -5.0);
        assert_eq!(a.maximum(1), 20.0);
    }

    #[test]
    fn test_empty_envelope_union_identity() {
        let mut empty = Envelope::empty();
        assert!(empty.is_empty());
        assert!(!empty.contains(0.0, 0.0));
        let other = Envelope::new(1.0, 2.0, 3.0, 4.0).unwrap();
        empty.add_envelope(&other);
        assert_eq!(empty, other);
    }

    #[test]
    fn test_median_and_span() {
        let env = Envelope::new(0.0, -10.0, 10.0, 30.0).unwrap();
        assert_eq!(env.median(0), 5.0);
        assert_eq!(env.median(1), 10.0);
        assert_eq!(env.span(1), 40.0);
    }

    #[test]
    fn test_rejects_non_finite_corners() {
        assert!(Envelope::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
        assert!(Envelope::new(0.0, f64::INFINITY, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_contains_boundary() {
        let env = Envelope::new(0.0, 0.0, 10.0, 10.0).unwrap();
        assert!(env.contains(0.0, 10.0));
        assert!(!env.contains(10.000001, 5.0));
    }
}
