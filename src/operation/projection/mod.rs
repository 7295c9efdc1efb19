//! Map projections
//!
//! Each projection converts between geographic coordinates in degrees
//! (longitude first) and projected easting/northing in metres. The
//! forward and inverse directions are exposed to the resolver as a pair
//! of `MathTransform` adapters sharing one projection object.

pub mod mercator;
pub mod transverse_mercator;
pub mod polar_stereographic;

use std::sync::Arc;

use crate::crs::datum::Ellipsoid;
use crate::crs::errors::GeoResult;
use crate::crs::system::{ProjectionMethod, ProjectionSpec};
use crate::operation::transform::{check_dimension, MathTransform};

pub use mercator::{Mercator1Sp, WebMercator};
pub use polar_stereographic::PolarStereographic;
pub use transverse_mercator::TransverseMercator;

/// A map projection between geographic and projected space
pub trait Projection: Send + Sync {
    /// Project (longitude, latitude) in degrees to (easting, northing)
    /// in metres
    fn forward(&self, lon: f64, lat: f64) -> GeoResult<(f64, f64)>;

    /// Unproject (easting, northing) in metres to (longitude, latitude)
    /// in degrees
    fn inverse(&self, easting: f64, northing: f64) -> GeoResult<(f64, f64)>;
}

/// Instantiate the projection described by a spec on an ellipsoid
pub fn create_projection(
    spec: &ProjectionSpec,
    ellipsoid: &Ellipsoid,
) -> GeoResult<Arc<dyn Projection>> {
    let params = &spec.params;
    Ok(match spec.method {
        ProjectionMethod::WebMercator => Arc::new(WebMercator::new(ellipsoid, params)),
        ProjectionMethod::Mercator1SP => Arc::new(Mercator1Sp::new(ellipsoid, params)),
        ProjectionMethod::TransverseMercator => {
            Arc::new(TransverseMercator::new(ellipsoid, params))
        }
        ProjectionMethod::PolarStereographic => {
            Arc::new(PolarStereographic::new(ellipsoid, params)?)
        }
    })
}

/// Forward-direction adapter: geographic degrees in, metres out
pub struct ProjectionTransform {
    projection: Arc<dyn Projection>,
    forward: bool,
}

impl ProjectionTransform {
    /// Wrap a projection in its forward direction
    pub fn forward(projection: Arc<dyn Projection>) -> Arc<Self> {
        Arc::new(ProjectionTransform { projection, forward: true })
    }

    /// Wrap a projection in its inverse direction
    pub fn inverse(projection: Arc<dyn Projection>) -> Arc<Self> {
        Arc::new(ProjectionTransform { projection, forward: false })
    }
}

impl MathTransform for ProjectionTransform {
    fn source_dimensions(&self) -> usize {
        2
    }

    fn target_dimensions(&self) -> usize {
        2
    }

    fn transform_point(&self, point: &[f64]) -> GeoResult<Vec<f64>> {
        check_dimension(point, 2)?;
        let (a, b) = if self.forward {
            self.projection.forward(point[0], point[1])?
        } else {
            self.projection.inverse(point[0], point[1])?
        };
        Ok(vec![a, b])
    }

    fn inverse(&self) -> GeoResult<Arc<dyn MathTransform>> {
        Ok(Arc::new(ProjectionTransform {
            projection: Arc::clone(&self.projection),
            forward: !self.forward,
        }))
    }
}
