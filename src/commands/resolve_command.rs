//! CRS resolution command
//!
//! This module implements the command for resolving an authority code
//! and displaying the decoded coordinate reference system.

use clap::ArgMatches;
use log::{debug, info};

use crate::authority::decoder;
use crate::commands::command_traits::Command;
use crate::crs::errors::{GeoError, GeoResult};
use crate::crs::system::CrsKind;
use crate::crs::wkt::to_wkt;
use crate::utils::logger::Logger;

/// Command for resolving and describing a CRS
pub struct ResolveCommand<'a> {
    /// Authority code to resolve
    code: String,
    /// Whether to enable verbose output
    verbose: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ResolveCommand<'a> {
    /// Create a new resolve command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new ResolveCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GeoResult<Self> {
        let code = args.get_one::<String>("crs")
            .ok_or_else(|| GeoError::Factory("Missing CRS code".to_string()))?
            .clone();

        let verbose = args.get_flag("verbose");

        Ok(ResolveCommand { code, verbose, logger })
    }
}

impl<'a> Command for ResolveCommand<'a> {
    fn execute(&self) -> GeoResult<()> {
        info!("Resolving code: {}", self.code);

        let crs = decoder::decode(&self.code)?;

        info!("Name: {}", crs.name);
        if let Some(id) = &crs.identifier {
            info!("Identifier: {}", id);
        }
        match &crs.kind {
            CrsKind::Geographic => info!("Kind: Geographic"),
            CrsKind::Projected(spec) => {
                info!("Kind: Projected ({})", spec.method.wkt_name());
                if self.verbose {
                    debug!("  Central meridian: {}", spec.params.central_meridian);
                    debug!("  Scale factor: {}", spec.params.scale_factor);
                    debug!("  False easting: {}", spec.params.false_easting);
                    debug!("  False northing: {}", spec.params.false_northing);
                }
            }
            CrsKind::Vertical => info!("Kind: Vertical"),
            CrsKind::Engineering => info!("Kind: Engineering"),
            CrsKind::Compound(parts) => info!("Kind: Compound ({} components)", parts.len()),
        }
        info!("Datum: {}", crs.datum.name);
        info!("Ellipsoid: a={} 1/f={}",
              crs.datum.ellipsoid.semi_major,
              crs.datum.ellipsoid.inverse_flattening);
        for (i, axis) in crs.axes.iter().enumerate() {
            info!("Axis {}: {} ({}) {} [{}]",
                  i, axis.name, axis.abbreviation,
                  axis.direction.wkt_keyword(), axis.unit.wkt_name());
        }
        if self.verbose {
            if let Some(shift) = &crs.datum.to_wgs84 {
                debug!("ToWGS84: dx={} dy={} dz={}", shift.dx, shift.dy, shift.dz);
            }
        }
        info!("WKT: {}", to_wkt(&crs));

        self.logger.log(&format!("Resolved {}", self.code))?;
        Ok(())
    }
}
