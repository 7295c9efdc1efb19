//! Geodesic calculation command
//!
//! This module implements the command for solving the direct and
//! inverse geodetic problems on the WGS 84 ellipsoid.

use clap::ArgMatches;
use log::{info, warn};

use crate::commands::command_traits::Command;
use crate::crs::errors::{GeoError, GeoResult};
use crate::geodesy::GeodeticCalculator;
use crate::utils::angles::parse_ordinate_pair;
use crate::utils::logger::Logger;

/// The problem a geodesic command solves
enum Problem {
    /// Azimuth and distance between two points
    Inverse { end: (f64, f64), segments: Option<usize> },
    /// Destination from azimuth and distance
    Direct { azimuth: f64, distance: f64 },
}

/// Command for geodesic calculations
pub struct GeodesicCommand<'a> {
    /// Start point as (longitude, latitude) in degrees
    start: (f64, f64),
    /// Which problem to solve
    problem: Problem,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> GeodesicCommand<'a> {
    /// Create a new geodesic command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    ///
    /// # Returns
    /// A new GeodesicCommand instance or an error
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> GeoResult<Self> {
        let start_str = args.get_one::<String>("start")
            .ok_or_else(|| GeoError::Factory("Missing --start point".to_string()))?;
        let start = parse_ordinate_pair(start_str)?;

        let problem = if let Some(end_str) = args.get_one::<String>("end") {
            let segments = args.get_one::<String>("segments")
                .map(|s| s.parse().map_err(|_| {
                    GeoError::Factory(format!("Invalid segment count: '{}'", s))
                }))
                .transpose()?;
            Problem::Inverse { end: parse_ordinate_pair(end_str)?, segments }
        } else {
            let azimuth_str = args.get_one::<String>("azimuth").ok_or_else(|| {
                GeoError::Factory("Need either --end or --azimuth with --distance".to_string())
            })?;
            let distance_str = args.get_one::<String>("distance").ok_or_else(|| {
                GeoError::Factory("Missing --distance".to_string())
            })?;
            Problem::Direct {
                azimuth: azimuth_str.parse().map_err(|_| {
                    GeoError::Factory(format!("Invalid azimuth: '{}'", azimuth_str))
                })?,
                distance: distance_str.parse().map_err(|_| {
                    GeoError::Factory(format!("Invalid distance: '{}'", distance_str))
                })?,
            }
        };

        Ok(GeodesicCommand { start, problem, logger })
    }
}

impl<'a> Command for GeodesicCommand<'a> {
    fn execute(&self) -> GeoResult<()> {
        let mut calc = GeodeticCalculator::wgs84();
        calc.set_start(self.start.0, self.start.1)?;

        match &self.problem {
            Problem::Inverse { end, segments } => {
                info!("Inverse geodesic from ({}, {}) to ({}, {})",
                      self.start.0, self.start.1, end.0, end.1);
                calc.set_destination(end.0, end.1)?;
                let azimuth = calc.azimuth()?;
                let distance = calc.orthodromic_distance()?;
                info!("Azimuth:  {} deg", azimuth);
                info!("Distance: {} m", distance);
                if !calc.is_precise() {
                    warn!("Solution is approximate for this geometry");
                }
                if let Some(n) = segments {
                    for (i, (lon, lat)) in calc.path(*n)?.iter().enumerate() {
                        info!("Vertex {}: ({}, {})", i, lon, lat);
                    }
                }
                self.logger.log(&format!(
                    "Inverse geodesic azimuth {} distance {}", azimuth, distance
                ))?;
            }
            Problem::Direct { azimuth, distance } => {
                info!("Direct geodesic from ({}, {}) azimuth {} distance {}",
                      self.start.0, self.start.1, azimuth, distance);
                calc.set_direction(*azimuth, *distance)?;
                let (lon, lat) = calc.destination()?;
                info!("Destination: ({}, {})", lon, lat);
                self.logger.log(&format!(
                    "Direct geodesic destination ({}, {})", lon, lat
                ))?;
            }
        }
        Ok(())
    }
}
