use clap::{Arg, ArgAction, Command as ClapCommand};
use log::error;
use std::process;

// Import from your library
use crskit::authority::decoder;
use crskit::commands::{CommandFactory, CrskitCommandFactory};
use crskit::utils::logger::Logger;

fn main() {
    let matches = ClapCommand::new("CrsKit")
        .version("1.0")
        .about("Resolve coordinate reference systems and transform coordinates")
        .arg(
            Arg::new("crs")
                .help("CRS authority code to resolve (e.g. EPSG:4326)")
                .required(false)
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("transform")
                .short('t')
                .long("transform")
                .help("Transform a point between two CRS")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("source")
                .long("source")
                .help("Source CRS code for transformation")
                .value_name("CODE")
                .required(false),
        )
        .arg(
            Arg::new("target")
                .long("target")
                .help("Target CRS code for transformation")
                .value_name("CODE")
                .required(false),
        )
        .arg(
            Arg::new("point")
                .long("point")
                .help("Point to transform in 'x,y' format, source axis order")
                .value_name("POINT")
                .required(false),
        )
        .arg(
            Arg::new("bbox")
                .long("bbox")
                .help("Bounding box to reproject (x1,y1,x2,y2)")
                .value_name("BBOX")
                .required(false),
        )
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .help("Tolerate missing datum shift information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("force-xy")
                .long("force-xy")
                .help("Force longitude/easting-first axis order when decoding")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("geodesic")
                .short('g')
                .long("geodesic")
                .help("Solve a geodesic problem on WGS 84")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("start")
                .long("start")
                .help("Geodesic start point in 'lon,lat' format")
                .value_name("POINT")
                .required(false),
        )
        .arg(
            Arg::new("end")
                .long("end")
                .help("Geodesic end point in 'lon,lat' format")
                .value_name("POINT")
                .required(false),
        )
        .arg(
            Arg::new("azimuth")
                .long("azimuth")
                .help("Azimuth in degrees for the direct geodesic problem")
                .value_name("DEGREES")
                .required(false),
        )
        .arg(
            Arg::new("distance")
                .long("distance")
                .help("Distance in meters for the direct geodesic problem")
                .value_name("METERS")
                .required(false),
        )
        .arg(
            Arg::new("segments")
                .long("segments")
                .help("Number of segments when sampling the geodesic path")
                .value_name("COUNT")
                .required(false),
        )
        .get_matches();

    let log_file = "crskit.log";
    let logger = match Logger::new(log_file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Logger::init_global_logger("crskit-global.log") {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    if matches.get_flag("force-xy") {
        decoder::set_longitude_first_hint(Some(true));
    }

    let factory = CrskitCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
