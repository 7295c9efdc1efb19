//! Envelope reprojection
//!
//! Transforming the four corners of a box is not enough: projected
//! images of straight edges bulge, poles collapse to points, and the
//! antimeridian folds the longitude range. The naive primitive samples
//! a 5x5 grid; the full wrapper adds the singularity handling on top.

use log::trace;

use crate::crs::errors::GeoResult;
use crate::crs::system::ProjectionMethod;
use crate::geometry::envelope::Envelope;
use crate::operation::operation::CoordinateOperation;
use crate::operation::transform::MathTransform;

/// Sample ordinates of one dimension: bounds, quartiles and median
fn sample_values(env: &Envelope, dim: usize) -> [f64; 5] {
    let min = env.minimum(dim);
    let span = env.span(dim);
    [
        min,
        min + 0.25 * span,
        min + 0.5 * span,
        min + 0.75 * span,
        env.maximum(dim),
    ]
}

fn grid_with_center(
    transform: &dyn MathTransform,
    env: &Envelope,
) -> GeoResult<(Envelope, Vec<f64>)> {
    let xs = sample_values(env, 0);
    let ys = sample_values(env, 1);
    let mut result = Envelope::empty();
    for (i, &x) in xs.iter().enumerate() {
        for (j, &y) in ys.iter().enumerate() {
            if i == 2 && j == 2 {
                continue;
            }
            let image = transform.transform_point(&[x, y])?;
            result.add_point(image[0], image[1]);
        }
    }
    // Center last; its image seeds the pole probes
    let center = transform.transform_point(&[xs[2], ys[2]])?;
    result.add_point(center[0], center[1]);
    Ok((result, center))
}

/// Transform an envelope by sampling a 5x5 grid of points
///
/// The result is the bounding box of the grid images. Edge curvature
/// between samples is absorbed by the quartile points; singularities
/// (poles, antimeridian) are NOT handled here.
pub fn transform_envelope_naive(
    transform: &dyn MathTransform,
    env: &Envelope,
) -> GeoResult<Envelope> {
    if env.is_empty() {
        return Ok(Envelope::empty());
    }
    grid_with_center(transform, env).map(|(result, _)| result)
}

/// Transform an envelope with singularity handling
///
/// On top of the grid sampling this folds in: source points on bounded
/// axis extremes crossing the envelope interior, target poles whose
/// inverse image falls inside the source envelope, the full longitude
/// range when a polar projection's origin pole lies inside the source
/// envelope, and extra meridian samples for world-spanning geographic
/// sources heading to a polar projection. Probe failures are swallowed;
/// only the primary grid must transform cleanly.
pub fn transform_envelope(op: &CoordinateOperation, env: &Envelope) -> GeoResult<Envelope> {
    if env.is_empty() {
        return Ok(Envelope::empty());
    }
    let transform = op.transform.as_ref();
    let (mut result, center) = grid_with_center(transform, env)?;

    // Source ordinates pinned to an axis extremum crossing the interior
    for dim in 0..2 {
        let range = op.source_crs.axis(dim).and_then(|a| a.value_range());
        if let Some((lo, hi)) = range {
            let other = 1 - dim;
            for extremum in [lo, hi] {
                if env.minimum(dim) < extremum && extremum < env.maximum(dim) {
                    for value in sample_values(env, other) {
                        let mut point = [0.0; 2];
                        point[dim] = extremum;
                        point[other] = value;
                        if let Ok(image) = transform.transform_point(&point) {
                            result.add_point(image[0], image[1]);
                        }
                    }
                }
            }
        }
    }

    // Pole probe: does a bounded target extremum map back inside the
    // source envelope?
    if let Ok(inverse) = op.transform.inverse() {
        for dim in 0..2 {
            let range = op.target_crs.axis(dim).and_then(|a| a.value_range());
            if let Some((lo, hi)) = range {
                for extremum in [lo, hi] {
                    let mut probe = center.clone();
                    probe[dim] = extremum;
                    if let Ok(source_point) = inverse.transform_point(&probe) {
                        if env.contains(source_point[0], source_point[1]) {
                            trace!(
                                "Target extremum {} of dimension {} is inside \
                                 the source envelope",
                                extremum, dim
                            );
                            result.add_point(probe[0], probe[1]);
                        }
                    }
                }
            }
        }
    }

    // A polar projection's origin pole inside the envelope covers every
    // longitude at once
    if let (Some(spec), true) = (op.source_crs.projection(), op.target_crs.is_geographic()) {
        if spec.method == ProjectionMethod::PolarStereographic {
            if let (Some(east_dim), Some(lon_dim)) =
                (op.source_crs.east_axis_index(), op.target_crs.east_axis_index())
            {
                let mut pole = [0.0; 2];
                pole[east_dim] = spec.params.false_easting;
                pole[1 - east_dim] = spec.params.false_northing;
                if env.contains(pole[0], pole[1]) {
                    let pole_lat = if spec.params.standard_parallel < 0.0 { -90.0 } else { 90.0 };
                    for lon in [-180.0, 180.0] {
                        let mut point = [0.0; 2];
                        point[lon_dim] = lon;
                        point[1 - lon_dim] = pole_lat;
                        result.add_point(point[0], point[1]);
                    }
                }
            }
        }
    }

    // World-spanning geographic source heading to a polar projection:
    // the grid's longitude samples depend on the envelope bounds, so
    // pin the cardinal meridians explicitly
    if op.source_crs.is_geographic() {
        let polar_target = op
            .target_crs
            .projection()
            .is_some_and(|spec| spec.method == ProjectionMethod::PolarStereographic);
        if let (true, Some(lon_dim)) = (polar_target, op.source_crs.east_axis_index()) {
            let lat_dim = 1 - lon_dim;
            if env.span(lon_dim) >= 360.0 - 1e-9 {
                for lon in [-180.0, -90.0, 0.0, 90.0, 180.0] {
                    for lat in [env.minimum(lat_dim), env.maximum(lat_dim)] {
                        let mut point = [0.0; 2];
                        point[lon_dim] = lon;
                        point[lat_dim] = lat;
                        if let Ok(image) = transform.transform_point(&point) {
                            result.add_point(image[0], image[1]);
                        }
                    }
                }
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authority::decoder::decode_forced;
    use crate::operation::resolver::OperationFactory;

    #[test]
    fn test_world_half_to_antarctic_square() {
        // Southern hemisphere in latitude-first WGS 84
        let source = decode_forced("EPSG:4326", false).unwrap();
        let target = decode_forced("EPSG:3031", false).unwrap();
        let op = OperationFactory::new(false)
            .create_operation(&source, &target)
            .unwrap();
        let env = Envelope::new(-90.0, -180.0, 0.0, 180.0).unwrap();
        let out = transform_envelope(&op, &env).unwrap();
        let extreme = 12_367_396.218_459_858;
        assert!((out.maximum(0) - extreme).abs() < 1.0);
        assert!((out.minimum(0) + extreme).abs() < 1.0);
        assert!((out.maximum(1) - extreme).abs() < 1.0);
        assert!((out.minimum(1) + extreme).abs() < 1.0);
    }

    #[test]
    fn test_envelope_containing_pole_covers_all_longitudes() {
        let source = decode_forced("EPSG:3031", false).unwrap();
        let target = decode_forced("EPSG:4326", false).unwrap();
        let op = OperationFactory::new(false)
            .create_operation(&source, &target)
            .unwrap();
        let env = Envelope::new(-1_000_000.0, -1_000_000.0, 1_000_000.0, 1_000_000.0).unwrap();
        let out = transform_envelope(&op, &env).unwrap();
        // Latitude-first target: dimension 0 is latitude
        assert!((out.minimum(0) + 90.0).abs() < 1e-9);
        assert_eq!(out.minimum(1), -180.0);
        assert_eq!(out.maximum(1), 180.0);
    }

    #[test]
    fn test_naive_misses_the_pole() {
        let source = decode_forced("EPSG:3031", false).unwrap();
        let target = decode_forced("EPSG:4326", false).unwrap();
        let op = OperationFactory::new(false)
            .create_operation(&source, &target)
            .unwrap();
        // Asymmetric box containing the pole: no grid sample hits the
        // pole exactly
        let env = Envelope::new(-1_000_000.0, -1_000_000.0, 2_000_000.0, 2_000_000.0).unwrap();
        let naive = transform_envelope_naive(op.transform.as_ref(), &env).unwrap();
        let full = transform_envelope(&op, &env).unwrap();
        // The grid alone cannot see the pole singularity
        assert!(naive.minimum(0) > -90.0);
        assert!(naive.span(1) < 360.0);
        // The wrapper output always contains the naive output
        assert!(full.minimum(0) <= naive.minimum(0));
        assert!(full.maximum(1) >= naive.maximum(1));
    }

    #[test]
    fn test_projected_grid_bulge() {
        // A wide mid-latitude box: the top edge of the web-Mercator
        // image bulges above the corner images
        let source = decode_forced("EPSG:4326", false).unwrap();
        let target = decode_forced("EPSG:3857", false).unwrap();
        let op = OperationFactory::new(false)
            .create_operation(&source, &target)
            .unwrap();
        let env = Envelope::new(40.0, -60.0, 60.0, 60.0).unwrap();
        let naive = transform_envelope_naive(op.transform.as_ref(), &env).unwrap();
        let corners_only = {
            let mut e = Envelope::empty();
            for &(lat, lon) in &[(40.0, -60.0), (40.0, 60.0), (60.0, -60.0), (60.0, 60.0)] {
                let p = op.transform_point(&[lat, lon]).unwrap();
                e.add_point(p[0], p[1]);
            }
            e
        };
        // Mercator meridians are straight, so here grid == corners;
        // the envelope must at least cover the corner box
        assert!(naive.minimum(0) <= corners_only.minimum(0));
        assert!(naive.maximum(1) >= corners_only.maximum(1));
    }

    #[test]
    fn test_empty_envelope_passes_through() {
        let source = decode_forced("EPSG:4326", false).unwrap();
        let target = decode_forced("EPSG:3857", false).unwrap();
        let op = OperationFactory::new(false)
            .create_operation(&source, &target)
            .unwrap();
        assert!(transform_envelope(&op, &Envelope::empty()).unwrap().is_empty());
    }
}
