//! Built-in EPSG backend
//!
//! A small embedded subset of the EPSG registry covering the geographic,
//! projected, vertical and engineering systems this toolkit works with.
//! Definitions are constructed in the authority's native axis order
//! (latitude first for geographic codes); axis-order policy is applied
//! later by the decoder, never here.

use std::collections::HashMap;

use log::trace;

use crate::authority::aliases::{DatumFactory, DEFAULT_ALIAS_INDEX};
use crate::authority::registry::CrsAuthorityFactory;
use crate::crs::axis::Axis;
use crate::crs::datum::{BursaWolf, Ellipsoid, GeodeticDatum, PrimeMeridian};
use crate::crs::errors::{GeoError, GeoResult};
use crate::crs::system::{
    Crs, CrsKind, Identifier, ProjectionMethod, ProjectionParams, ProjectionSpec,
};

/// UTM northern hemisphere zone codes: 32601 + (zone - 1)
const UTM_NORTH_BASE: u32 = 32600;
/// UTM southern hemisphere zone codes: 32701 + (zone - 1)
const UTM_SOUTH_BASE: u32 = 32700;

/// Authority factory backed by the embedded EPSG subset
pub struct EpsgFactory {
    name_index: HashMap<String, String>,
}

impl EpsgFactory {
    /// Create the factory and build its name index
    pub fn new() -> Self {
        let mut name_index = HashMap::new();
        for code in Self::fixed_codes() {
            if let Ok(crs) = Self::build(code) {
                name_index.insert(crs.name.to_lowercase(), code.to_string());
            }
        }
        for zone in 1..=60u32 {
            name_index.insert(
                format!("wgs 84 / utm zone {}n", zone),
                (UTM_NORTH_BASE + zone).to_string(),
            );
            name_index.insert(
                format!("wgs 84 / utm zone {}s", zone),
                (UTM_SOUTH_BASE + zone).to_string(),
            );
        }
        EpsgFactory { name_index }
    }

    fn fixed_codes() -> [u32; 9] {
        [4326, 4269, 4230, 4267, 3857, 3031, 3032, 5714, 404000]
    }

    fn datum(name: &str, ellipsoid: Ellipsoid) -> GeoResult<GeodeticDatum> {
        DEFAULT_ALIAS_INDEX.create_geodetic_datum(name, ellipsoid, PrimeMeridian::greenwich())
    }

    fn wgs84_datum() -> GeoResult<GeodeticDatum> {
        Ok(Self::datum("World Geodetic System 1984", Ellipsoid::WGS84)?
            .with_to_wgs84(BursaWolf::default()))
    }

    fn geographic(code: u32, name: &str, datum: GeodeticDatum) -> Crs {
        Crs {
            identifier: Some(Identifier::new("EPSG", &code.to_string())),
            name: name.to_string(),
            kind: CrsKind::Geographic,
            axes: vec![Axis::latitude(), Axis::longitude()],
            datum,
        }
    }

    fn projected(
        code: u32,
        name: &str,
        datum: GeodeticDatum,
        method: ProjectionMethod,
        params: ProjectionParams,
    ) -> Crs {
        Crs {
            identifier: Some(Identifier::new("EPSG", &code.to_string())),
            name: name.to_string(),
            kind: CrsKind::Projected(ProjectionSpec { method, params }),
            axes: vec![Axis::easting(), Axis::northing()],
            datum,
        }
    }

    fn utm(code: u32, zone: u32, south: bool) -> GeoResult<Crs> {
        let params = ProjectionParams {
            central_meridian: f64::from(zone) * 6.0 - 183.0,
            scale_factor: 0.9996,
            false_easting: 500_000.0,
            false_northing: if south { 10_000_000.0 } else { 0.0 },
            ..Default::default()
        };
        let hemisphere = if south { 'S' } else { 'N' };
        Ok(Self::projected(
            code,
            &format!("WGS 84 / UTM zone {}{}", zone, hemisphere),
            Self::wgs84_datum()?,
            ProjectionMethod::TransverseMercator,
            params,
        ))
    }

    /// Build the CRS for a numeric code
    fn build(code: u32) -> GeoResult<Crs> {
        match code {
            4326 => Ok(Self::geographic(code, "WGS 84", Self::wgs84_datum()?)),
            4269 => Ok(Self::geographic(
                code,
                "NAD83",
                Self::datum("North American Datum 1983", Ellipsoid::GRS80)?
                    .with_to_wgs84(BursaWolf::default()),
            )),
            // ED50 publishes no single Bursa-Wolf set here; transforms
            // involving it require the lenient path
            4230 => Ok(Self::geographic(
                code,
                "ED50",
                Self::datum("European Datum 1950", Ellipsoid::INTERNATIONAL_1924)?,
            )),
            4267 => Ok(Self::geographic(
                code,
                "NAD27",
                Self::datum("North American Datum 1927", Ellipsoid::CLARKE_1866)?
                    .with_to_wgs84(BursaWolf::translation(-8.0, 160.0, 176.0)),
            )),
            3857 => Ok(Self::projected(
                code,
                "WGS 84 / Pseudo-Mercator",
                Self::wgs84_datum()?,
                ProjectionMethod::WebMercator,
                ProjectionParams::default(),
            )),
            3031 => Ok(Self::projected(
                code,
                "WGS 84 / Antarctic Polar Stereographic",
                Self::wgs84_datum()?,
                ProjectionMethod::PolarStereographic,
                ProjectionParams {
                    standard_parallel: -71.0,
                    ..Default::default()
                },
            )),
            3032 => Ok(Self::projected(
                code,
                "WGS 84 / Australian Antarctic Polar Stereographic",
                Self::wgs84_datum()?,
                ProjectionMethod::PolarStereographic,
                ProjectionParams {
                    standard_parallel: -71.0,
                    central_meridian: 70.0,
                    false_easting: 6_000_000.0,
                    false_northing: 6_000_000.0,
                    ..Default::default()
                },
            )),
            5714 => Ok(Crs {
                identifier: Some(Identifier::new("EPSG", "5714")),
                name: "MSL height".to_string(),
                kind: CrsKind::Vertical,
                axes: vec![Axis::height()],
                datum: Self::wgs84_datum()?,
            }),
            404000 => Ok(Crs {
                identifier: Some(Identifier::new("EPSG", "404000")),
                name: "Wildcard 2D cartesian plane in metric unit".to_string(),
                kind: CrsKind::Engineering,
                axes: vec![Axis::easting(), Axis::northing()],
                datum: Self::wgs84_datum()?,
            }),
            c if (UTM_NORTH_BASE + 1..=UTM_NORTH_BASE + 60).contains(&c) => {
                Self::utm(c, c - UTM_NORTH_BASE, false)
            }
            c if (UTM_SOUTH_BASE + 1..=UTM_SOUTH_BASE + 60).contains(&c) => {
                Self::utm(c, c - UTM_SOUTH_BASE, true)
            }
            _ => Err(GeoError::NoSuchAuthorityCode {
                authority: "EPSG".to_string(),
                code: code.to_string(),
            }),
        }
    }
}

impl Default for EpsgFactory {
    fn default() -> Self {
        EpsgFactory::new()
    }
}

impl CrsAuthorityFactory for EpsgFactory {
    fn authority(&self) -> &str {
        "EPSG"
    }

    fn create_crs(&self, code: &str) -> GeoResult<Crs> {
        trace!("EPSG backend creating code {}", code);
        let numeric: u32 = code.trim().parse().map_err(|_| GeoError::NoSuchAuthorityCode {
            authority: "EPSG".to_string(),
            code: code.to_string(),
        })?;
        Self::build(numeric)
    }

    fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = Self::fixed_codes()
            .iter()
            .map(|c| c.to_string())
            .collect();
        for zone in 1..=60u32 {
            codes.push((UTM_NORTH_BASE + zone).to_string());
            codes.push((UTM_SOUTH_BASE + zone).to_string());
        }
        codes
    }

    fn find_code_by_name(&self, name: &str) -> Option<String> {
        self.name_index.get(&name.to_lowercase()).cloned()
    }
}
