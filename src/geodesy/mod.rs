//! Geodesic calculations
//!
//! Direct and inverse problems on the ellipsoid surface, plus meridian
//! arc lengths and geodesic path sampling.

pub mod calculator;

pub use calculator::GeodeticCalculator;

#[cfg(test)]
mod tests;
