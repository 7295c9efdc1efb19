//! Bounding box reprojection command
//!
//! This module implements the command for reprojecting an envelope
//! between two coordinate reference systems with singularity handling.

use clap::ArgMatches;
use log::info;

use crate::authority::decoder;
use crate::commands::command_traits::Command;
use crate::crs::errors::{GeoError, GeoResult};
use crate::geometry::{transform_envelope, Envelope};
use crate::operation::resolver::OperationFactory;
use crate::utils::logger::Logger;

/// Command for reprojecting a bounding box between two CRS
pub struct BboxCommand<'a> {
    /// Source authority code
    source: String,
    /// Target authority code
    target: String,
    /// Envelope corners in source axis order
    bounds: (f64, f64, f64, f64),
    /// Whether to tolerate missing datum shift information
    lenient: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> BboxCommand<'a> {
    /// Create a new bbox command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new BboxCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GeoResult<Self> {
        let source = args.get_one::<String>("source")
            .ok_or_else(|| GeoError::Factory("Missing --source code".to_string()))?
            .clone();
        let target = args.get_one::<String>("target")
            .ok_or_else(|| GeoError::Factory("Missing --target code".to_string()))?
            .clone();
        let bbox_str = args.get_one::<String>("bbox")
            .ok_or_else(|| GeoError::Factory("Missing --bbox".to_string()))?;

        let parts: Vec<&str> = bbox_str.split(',').map(|s| s.trim()).collect();
        if parts.len() != 4 {
            return Err(GeoError::Factory(format!(
                "Bounding box must be 'x1,y1,x2,y2', got '{}'", bbox_str
            )));
        }
        let mut values = [0.0; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                GeoError::Factory(format!("Invalid ordinate: '{}'", part))
            })?;
        }

        Ok(BboxCommand {
            source,
            target,
            bounds: (values[0], values[1], values[2], values[3]),
            lenient: args.get_flag("lenient"),
            logger,
        })
    }
}

impl<'a> Command for BboxCommand<'a> {
    fn execute(&self) -> GeoResult<()> {
        info!("Reprojecting envelope from {} to {}", self.source, self.target);

        let source = decoder::decode(&self.source)?;
        let target = decoder::decode(&self.target)?;
        let op = OperationFactory::new(self.lenient).create_operation(&source, &target)?;

        let env = Envelope::new(self.bounds.0, self.bounds.1, self.bounds.2, self.bounds.3)?;
        let out = transform_envelope(&op, &env)?;

        info!("Input:  [{}, {}] .. [{}, {}]",
              env.minimum(0), env.minimum(1), env.maximum(0), env.maximum(1));
        info!("Output: [{}, {}] .. [{}, {}]",
              out.minimum(0), out.minimum(1), out.maximum(0), out.maximum(1));

        self.logger.log(&format!(
            "Reprojected envelope from {} to {}", self.source, self.target
        ))?;
        Ok(())
    }
}
