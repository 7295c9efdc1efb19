//! Point transformation command
//!
//! This module implements the command for transforming a coordinate
//! between two coordinate reference systems.

use clap::ArgMatches;
use log::info;

use crate::authority::decoder;
use crate::commands::command_traits::Command;
use crate::crs::errors::{GeoError, GeoResult};
use crate::operation::resolver::OperationFactory;
use crate::utils::angles::parse_ordinate_pair;
use crate::utils::logger::Logger;

/// Command for transforming a point between two CRS
pub struct TransformCommand<'a> {
    /// Source authority code
    source: String,
    /// Target authority code
    target: String,
    /// Point in source axis order
    point: (f64, f64),
    /// Whether to tolerate missing datum shift information
    lenient: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> TransformCommand<'a> {
    /// Create a new transform command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new TransformCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GeoResult<Self> {
        let source = args.get_one::<String>("source")
            .ok_or_else(|| GeoError::Factory("Missing --source code".to_string()))?
            .clone();
        let target = args.get_one::<String>("target")
            .ok_or_else(|| GeoError::Factory("Missing --target code".to_string()))?
            .clone();
        let point_str = args.get_one::<String>("point")
            .ok_or_else(|| GeoError::Factory("Missing --point".to_string()))?;
        let point = parse_ordinate_pair(point_str)?;
        let lenient = args.get_flag("lenient");

        Ok(TransformCommand { source, target, point, lenient, logger })
    }
}

impl<'a> Command for TransformCommand<'a> {
    fn execute(&self) -> GeoResult<()> {
        info!("Transforming point from {} to {}", self.source, self.target);

        let source = decoder::decode(&self.source)?;
        let target = decoder::decode(&self.target)?;
        let op = OperationFactory::new(self.lenient).create_operation(&source, &target)?;

        if let Some(accuracy) = op.accuracy {
            info!("Datum shift accuracy: {} m", accuracy);
        }

        let out = op.transform_point(&[self.point.0, self.point.1])?;
        info!("Input:  ({}, {})", self.point.0, self.point.1);
        info!("Output: ({}, {})", out[0], out[1]);

        self.logger.log(&format!(
            "Transformed ({}, {}) from {} to {}: ({}, {})",
            self.point.0, self.point.1, self.source, self.target, out[0], out[1]
        ))?;
        Ok(())
    }
}
