use log::info;

use crate::authority::decoder;
use crate::crs::errors::GeoResult;
use crate::crs::wkt::to_wkt;
use crate::geodesy::GeodeticCalculator;
use crate::geometry::{transform_envelope, Envelope};
use crate::operation::resolver::OperationFactory;
use crate::utils::logger::Logger;

/// A tile or layer description published by an external catalog
///
/// Catalog object graphs stay on the caller's side; the library only
/// reads the declared CRS identifier and bounds through this trait.
pub trait TileSource {
    /// Declared CRS authority identifier, e.g. "EPSG:3857"
    fn crs_identifier(&self) -> &str;
    /// Declared bounds in the axis order of the declared CRS
    fn bounds(&self) -> Envelope;
}

/// Main interface to the CrsKit library
pub struct CrsKit {
    logger: Logger,
}

impl CrsKit {
    /// Create a new CrsKit instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "crskit.log"
    ///
    /// # Returns
    /// A CrsKit instance or an error if initialization fails
    pub fn new(log_file: Option<&str>) -> std::io::Result<Self> {
        let log_path = log_file.unwrap_or("crskit.log");
        let logger = Logger::new(log_path)?;
        Ok(CrsKit { logger })
    }

    /// Describe a coordinate reference system by authority code
    ///
    /// # Arguments
    /// * `code` - Authority code like "EPSG:4326"
    ///
    /// # Returns
    /// A formatted, multi-line description of the CRS
    pub fn describe(&self, code: &str) -> GeoResult<String> {
        let crs = decoder::decode(code)?;

        let mut result = format!("CRS: {}\n", crs.name);
        if let Some(id) = &crs.identifier {
            result.push_str(&format!("  Identifier: {}\n", id));
        }
        let kind = match &crs.kind {
            crate::crs::system::CrsKind::Geographic => "Geographic".to_string(),
            crate::crs::system::CrsKind::Projected(spec) => {
                format!("Projected ({})", spec.method.wkt_name())
            }
            crate::crs::system::CrsKind::Vertical => "Vertical".to_string(),
            crate::crs::system::CrsKind::Engineering => "Engineering".to_string(),
            crate::crs::system::CrsKind::Compound(parts) => {
                format!("Compound ({} components)", parts.len())
            }
        };
        result.push_str(&format!("  Kind: {}\n", kind));
        result.push_str(&format!("  Datum: {}\n", crs.datum.name));
        result.push_str(&format!(
            "  Ellipsoid: a={} 1/f={}\n",
            crs.datum.ellipsoid.semi_major, crs.datum.ellipsoid.inverse_flattening
        ));
        for (i, axis) in crs.axes.iter().enumerate() {
            result.push_str(&format!(
                "  Axis {}: {} ({}) {} [{}]\n",
                i,
                axis.name,
                axis.abbreviation,
                axis.direction.wkt_keyword(),
                axis.unit.wkt_name()
            ));
        }
        result.push_str(&format!("  WKT: {}\n", to_wkt(&crs)));

        self.logger.log(&format!("Described {}", code))?;
        Ok(result)
    }

    /// Look up the authority identifier of a CRS decoded from a code
    ///
    /// Returns the identifier string when the registry knows the CRS,
    /// scanning all registered codes if necessary.
    pub fn lookup(&self, code: &str) -> GeoResult<Option<String>> {
        let crs = decoder::decode(code)?;
        Ok(decoder::lookup_identifier(&crs, true))
    }

    /// Transform a point between two coordinate reference systems
    ///
    /// # Arguments
    /// * `source` - Source authority code
    /// * `target` - Target authority code
    /// * `x`, `y` - Ordinates in source axis order
    /// * `lenient` - Allow missing datum shift information
    ///
    /// # Returns
    /// The transformed ordinates in target axis order
    pub fn transform(
        &self,
        source: &str,
        target: &str,
        x: f64,
        y: f64,
        lenient: bool,
    ) -> GeoResult<(f64, f64)> {
        let source_crs = decoder::decode(source)?;
        let target_crs = decoder::decode(target)?;
        let op = OperationFactory::new(lenient).create_operation(&source_crs, &target_crs)?;
        if let Some(accuracy) = op.accuracy {
            info!("Transform accuracy: {} m", accuracy);
        }
        let out = op.transform_point(&[x, y])?;
        self.logger.log(&format!(
            "Transformed ({}, {}) from {} to {}: ({}, {})",
            x, y, source, target, out[0], out[1]
        ))?;
        Ok((out[0], out[1]))
    }

    /// Reproject a bounding box between two coordinate reference systems
    ///
    /// Uses grid sampling with singularity handling, so envelopes that
    /// cross poles or the antimeridian come out correctly widened.
    ///
    /// # Arguments
    /// * `source` - Source authority code
    /// * `target` - Target authority code
    /// * `bounds` - Two opposite corners (x1, y1, x2, y2) in source axis order
    /// * `lenient` - Allow missing datum shift information
    ///
    /// # Returns
    /// The (min x, min y, max x, max y) of the reprojected envelope
    pub fn transform_bounds(
        &self,
        source: &str,
        target: &str,
        bounds: (f64, f64, f64, f64),
        lenient: bool,
    ) -> GeoResult<(f64, f64, f64, f64)> {
        let source_crs = decoder::decode(source)?;
        let target_crs = decoder::decode(target)?;
        let op = OperationFactory::new(lenient).create_operation(&source_crs, &target_crs)?;
        let env = Envelope::new(bounds.0, bounds.1, bounds.2, bounds.3)?;
        let out = transform_envelope(&op, &env)?;
        self.logger.log(&format!(
            "Reprojected envelope from {} to {}", source, target
        ))?;
        Ok((out.minimum(0), out.minimum(1), out.maximum(0), out.maximum(1)))
    }

    /// Solve the inverse geodetic problem on WGS 84
    ///
    /// # Arguments
    /// * `lon1`, `lat1` - Start point in decimal degrees
    /// * `lon2`, `lat2` - Destination point in decimal degrees
    ///
    /// # Returns
    /// The (azimuth in degrees, distance in metres) from start to
    /// destination
    pub fn geodesic_inverse(
        &self,
        lon1: f64,
        lat1: f64,
        lon2: f64,
        lat2: f64,
    ) -> GeoResult<(f64, f64)> {
        let mut calc = GeodeticCalculator::wgs84();
        calc.set_start(lon1, lat1)?;
        calc.set_destination(lon2, lat2)?;
        let azimuth = calc.azimuth()?;
        let distance = calc.orthodromic_distance()?;
        if !calc.is_precise() {
            info!("Geodesic solution is approximate for this geometry");
        }
        self.logger.log(&format!(
            "Inverse geodesic ({}, {}) -> ({}, {}): azimuth {} distance {}",
            lon1, lat1, lon2, lat2, azimuth, distance
        ))?;
        Ok((azimuth, distance))
    }

    /// Solve the direct geodetic problem on WGS 84
    ///
    /// # Arguments
    /// * `lon`, `lat` - Start point in decimal degrees
    /// * `azimuth` - Azimuth in degrees clockwise from north
    /// * `distance` - Distance in metres
    ///
    /// # Returns
    /// The destination (longitude, latitude) in decimal degrees
    pub fn geodesic_direct(
        &self,
        lon: f64,
        lat: f64,
        azimuth: f64,
        distance: f64,
    ) -> GeoResult<(f64, f64)> {
        let mut calc = GeodeticCalculator::wgs84();
        calc.set_start(lon, lat)?;
        calc.set_direction(azimuth, distance)?;
        let destination = calc.destination()?;
        self.logger.log(&format!(
            "Direct geodesic from ({}, {}) azimuth {} distance {}: ({}, {})",
            lon, lat, azimuth, distance, destination.0, destination.1
        ))?;
        Ok(destination)
    }

    /// Sample the geodesic path between two points on WGS 84
    ///
    /// Returns `segments + 1` (longitude, latitude) vertices including
    /// both endpoints.
    pub fn geodesic_path(
        &self,
        lon1: f64,
        lat1: f64,
        lon2: f64,
        lat2: f64,
        segments: usize,
    ) -> GeoResult<Vec<(f64, f64)>> {
        let mut calc = GeodeticCalculator::wgs84();
        calc.set_start(lon1, lat1)?;
        calc.set_destination(lon2, lat2)?;
        calc.path(segments)
    }

    /// Reproject the declared bounds of a tile source into another CRS
    ///
    /// # Arguments
    /// * `source` - Tile or layer description
    /// * `target` - Target authority code
    /// * `lenient` - Allow missing datum shift information
    ///
    /// # Returns
    /// The reprojected envelope
    pub fn source_bounds_in(
        &self,
        source: &dyn TileSource,
        target: &str,
        lenient: bool,
    ) -> GeoResult<Envelope> {
        let source_crs = decoder::decode(source.crs_identifier())?;
        let target_crs = decoder::decode(target)?;
        let op = OperationFactory::new(lenient).create_operation(&source_crs, &target_crs)?;
        transform_envelope(&op, &source.bounds())
    }

    /// Force or release the longitude-first axis order policy for all
    /// subsequent decodes
    pub fn set_longitude_first(&self, value: Option<bool>) {
        decoder::set_longitude_first_hint(value);
    }
}
