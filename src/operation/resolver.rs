//! Coordinate operation resolver
//!
//! Assembles transform chains between coordinate reference systems:
//! axis normalization, inverse projection, datum shift through
//! geocentric space, forward projection and axis denormalization. Every
//! step that turns out to be the identity is dropped by chain
//! simplification, so structurally equal systems resolve to a true
//! identity operation.

use std::sync::Arc;

use log::{debug, warn};

use crate::crs::axis::AxisDirection;
use crate::crs::datum::GeodeticDatum;
use crate::crs::errors::{GeoError, GeoResult};
use crate::crs::system::{Crs, CrsKind};
use crate::operation::geocentric::{BursaWolfTransform, GeocentricTransform};
use crate::operation::operation::{
    CoordinateOperation, DATUM_SHIFT_ACCURACY, LENIENT_SHIFT_ACCURACY,
};
use crate::operation::projection::{create_projection, ProjectionTransform};
use crate::operation::transform::{
    AffineTransform, ConcatenatedTransform, IdentityTransform, MathTransform,
};

/// Factory assembling coordinate operations
pub struct OperationFactory {
    lenient: bool,
}

/// Outcome of planning the datum shift leg
struct DatumShiftPlan {
    steps: Vec<Arc<dyn MathTransform>>,
    lenient_substitution: bool,
    shift_applied: bool,
}

impl OperationFactory {
    /// Create a factory
    ///
    /// # Arguments
    /// * `lenient` - Replace missing datum shift parameters with the
    ///   identity instead of failing
    pub fn new(lenient: bool) -> Self {
        OperationFactory { lenient }
    }

    /// Create the operation transforming between two systems
    pub fn create_operation(
        &self,
        source: &Arc<Crs>,
        target: &Arc<Crs>,
    ) -> GeoResult<CoordinateOperation> {
        if source.equals_ignore_metadata(target) {
            debug!("Source and target are structurally equal; identity operation");
            return Ok(CoordinateOperation {
                source_crs: Arc::clone(source),
                target_crs: Arc::clone(target),
                transform: IdentityTransform::new(source.dimension()),
                lenient: false,
                accuracy: None,
            });
        }
        check_horizontal(source)?;
        check_horizontal(target)?;

        let mut steps: Vec<Arc<dyn MathTransform>> = Vec::new();

        // Into (east-ish, north-ish) base units
        steps.push(Arc::new(normalize_axes(source)?));

        // Into geographic degrees on the source datum
        if let CrsKind::Projected(spec) = &source.kind {
            let projection = create_projection(spec, &source.datum.ellipsoid)?;
            steps.push(ProjectionTransform::inverse(projection));
        }

        // Longitudes relative to Greenwich
        let src_pm = source.datum.prime_meridian.greenwich_longitude;
        if src_pm != 0.0 {
            steps.push(Arc::new(AffineTransform::translation(src_pm, 0.0)));
        }

        let plan = self.plan_datum_shift(&source.datum, &target.datum)?;
        let lenient_substitution = plan.lenient_substitution;
        let shift_applied = plan.shift_applied;
        steps.extend(plan.steps);

        let tgt_pm = target.datum.prime_meridian.greenwich_longitude;
        if tgt_pm != 0.0 {
            steps.push(Arc::new(AffineTransform::translation(-tgt_pm, 0.0)));
        }

        if let CrsKind::Projected(spec) = &target.kind {
            let projection = create_projection(spec, &target.datum.ellipsoid)?;
            steps.push(ProjectionTransform::forward(projection));
        }

        steps.push(Arc::new(normalize_axes(target)?.inverse_affine()?));

        let transform = ConcatenatedTransform::create(steps);
        let accuracy = if lenient_substitution {
            Some(LENIENT_SHIFT_ACCURACY)
        } else if shift_applied {
            Some(DATUM_SHIFT_ACCURACY)
        } else {
            None
        };
        Ok(CoordinateOperation {
            source_crs: Arc::clone(source),
            target_crs: Arc::clone(target),
            transform,
            lenient: lenient_substitution,
            accuracy,
        })
    }

    /// Plan the geocentric leg between two datums
    ///
    /// Pivots through WGS 84: source-to-WGS84 followed by the inverse
    /// of target-to-WGS84. Skipped entirely when the datums compare
    /// structurally equal.
    fn plan_datum_shift(
        &self,
        source: &GeodeticDatum,
        target: &GeodeticDatum,
    ) -> GeoResult<DatumShiftPlan> {
        if source.equals_ignore_metadata(target) {
            return Ok(DatumShiftPlan {
                steps: Vec::new(),
                lenient_substitution: false,
                shift_applied: false,
            });
        }
        let mut lenient_substitution = false;
        let mut resolve = |datum: &GeodeticDatum| -> GeoResult<crate::crs::datum::BursaWolf> {
            match datum.to_wgs84 {
                Some(params) => Ok(params),
                None if self.lenient => {
                    warn!(
                        "Datum \"{}\" has no WGS 84 shift parameters; \
                         assuming identity (lenient)",
                        datum.name
                    );
                    lenient_substitution = true;
                    Ok(crate::crs::datum::BursaWolf::default())
                }
                None => Err(GeoError::Factory(format!(
                    "No transformation path from datum \"{}\" to datum \"{}\": \
                     \"{}\" has no WGS 84 shift parameters",
                    source.name, target.name, datum.name
                ))),
            }
        };
        let src_shift = resolve(source)?;
        let tgt_shift = resolve(target)?;
        let shift_applied = !src_shift.is_identity() || !tgt_shift.is_identity();

        let mut steps: Vec<Arc<dyn MathTransform>> = Vec::new();
        steps.push(GeocentricTransform::forward(&source.ellipsoid) as Arc<dyn MathTransform>);
        if !src_shift.is_identity() {
            steps.push(BursaWolfTransform::new(src_shift));
        }
        if !tgt_shift.is_identity() {
            steps.push(BursaWolfTransform::new(tgt_shift).inverse()?);
        }
        steps.push(GeocentricTransform::backward(&target.ellipsoid));
        Ok(DatumShiftPlan {
            steps,
            lenient_substitution,
            shift_applied,
        })
    }
}

impl Default for OperationFactory {
    fn default() -> Self {
        OperationFactory::new(false)
    }
}

/// Convenience wrapper: just the transform between two systems
pub fn find_math_transform(
    source: &Arc<Crs>,
    target: &Arc<Crs>,
    lenient: bool,
) -> GeoResult<Arc<dyn MathTransform>> {
    Ok(OperationFactory::new(lenient)
        .create_operation(source, target)?
        .transform)
}

fn check_horizontal(crs: &Crs) -> GeoResult<()> {
    match crs.kind {
        CrsKind::Geographic | CrsKind::Projected(_) => Ok(()),
        _ => Err(GeoError::Transform(format!(
            "Cannot create an operation involving \"{}\": only geographic \
             and projected systems are supported",
            crs.name
        ))),
    }
}

/// Affine taking CRS axis order and units to (east-ish, north-ish)
/// base-unit coordinates
fn normalize_axes(crs: &Crs) -> GeoResult<AffineTransform> {
    if crs.dimension() != 2 {
        return Err(GeoError::MismatchedDimension {
            expected: 2,
            actual: crs.dimension(),
        });
    }
    let east_index = crs
        .axes
        .iter()
        .position(|a| matches!(a.direction, AxisDirection::East | AxisDirection::West));
    let north_index = crs
        .axes
        .iter()
        .position(|a| matches!(a.direction, AxisDirection::North | AxisDirection::South));
    let (ei, ni) = match (east_index, north_index) {
        (Some(e), Some(n)) => (e, n),
        _ => {
            return Err(GeoError::Transform(format!(
                "No horizontal axis pair in \"{}\"", crs.name
            )))
        }
    };
    let e_axis = &crs.axes[ei];
    let n_axis = &crs.axes[ni];
    let e_factor = e_axis.unit.factor_to_base()
        * if e_axis.direction == AxisDirection::West { -1.0 } else { 1.0 };
    let n_factor = n_axis.unit.factor_to_base()
        * if n_axis.direction == AxisDirection::South { -1.0 } else { 1.0 };
    let mut m = AffineTransform::identity();
    m.m00 = if ei == 0 { e_factor } else { 0.0 };
    m.m01 = if ei == 1 { e_factor } else { 0.0 };
    m.m10 = if ni == 0 { n_factor } else { 0.0 };
    m.m11 = if ni == 1 { n_factor } else { 0.0 };
    Ok(m)
}

impl AffineTransform {
    /// Inverse as a concrete affine matrix
    fn inverse_affine(&self) -> GeoResult<AffineTransform> {
        let inverse = MathTransform::inverse(self)?;
        match inverse.as_affine() {
            Some(affine) => Ok(*affine),
            None => Err(GeoError::Transform(
                "Affine inverse lost its representation".to_string(),
            )),
        }
    }
}
