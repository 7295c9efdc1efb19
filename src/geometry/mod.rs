//! Geometry primitives and envelope reprojection

pub mod point;
pub mod envelope;
pub mod reproject;

pub use envelope::Envelope;
pub use point::Point;
pub use reproject::{transform_envelope, transform_envelope_naive};
