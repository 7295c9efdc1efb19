//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod resolve_command;
pub mod transform_command;
pub mod bbox_command;
pub mod geodesic_command;

pub use command_traits::{Command, CommandFactory};
pub use resolve_command::ResolveCommand;
pub use transform_command::TransformCommand;
pub use bbox_command::BboxCommand;
pub use geodesic_command::GeodesicCommand;

use clap::ArgMatches;
use crate::crs::errors::GeoResult;
use crate::utils::logger::Logger;

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
pub struct CrskitCommandFactory;

impl CrskitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        CrskitCommandFactory
    }
}

impl Default for CrskitCommandFactory {
    fn default() -> Self {
        CrskitCommandFactory::new()
    }
}

impl<'a> CommandFactory<'a> for CrskitCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> GeoResult<Box<dyn Command + 'a>> {
        // Determine which command to run based on args
        if args.get_flag("transform") {
            Ok(Box::new(TransformCommand::new(args, logger)?))
        } else if args.contains_id("bbox") {
            Ok(Box::new(BboxCommand::new(args, logger)?))
        } else if args.get_flag("geodesic") {
            Ok(Box::new(GeodesicCommand::new(args, logger)?))
        } else {
            // Default to resolving a CRS code
            Ok(Box::new(ResolveCommand::new(args, logger)?))
        }
    }
}
