//! Coordinate operations between reference systems
//!
//! Math transform primitives, map projections, geocentric datum shifts
//! and the resolver that chains them.

pub mod transform;
pub mod projection;
pub mod geocentric;
#[allow(clippy::module_inception)]
pub mod operation;
pub mod resolver;

#[cfg(test)]
mod tests;

pub use operation::{CoordinateOperation, DATUM_SHIFT_ACCURACY, LENIENT_SHIFT_ACCURACY};
pub use resolver::{find_math_transform, OperationFactory};
pub use transform::{AffineTransform, ConcatenatedTransform, IdentityTransform, MathTransform};
