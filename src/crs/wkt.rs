//! WKT serialization and the parsed-definition input tree
//!
//! The WKT grammar itself is handled by an external parser; this module
//! only consumes the plain-data tree such a parser yields, and can
//! re-serialize a CRS back to WKT text for diagnostics and persistence.

use crate::crs::axis::{Axis, AxisDirection, Unit};
use crate::crs::datum::{BursaWolf, Ellipsoid, GeodeticDatum, PrimeMeridian};
use crate::crs::errors::{GeoError, GeoResult};
use crate::crs::system::{
    Crs, CrsKind, Identifier, ProjectionMethod, ProjectionParams, ProjectionSpec,
};

/// Datum node of a parsed WKT tree
#[derive(Debug, Clone)]
pub struct DatumDef {
    /// Datum name as written in the WKT
    pub name: String,
    /// Spheroid semi-major axis, metres
    pub semi_major: f64,
    /// Spheroid inverse flattening
    pub inverse_flattening: f64,
    /// TOWGS84 parameters, when present
    pub to_wgs84: Option<[f64; 7]>,
}

/// Axis node of a parsed WKT tree
#[derive(Debug, Clone)]
pub struct AxisDef {
    /// Axis name/abbreviation as written
    pub name: String,
    /// Direction keyword (EAST, NORTH, ...)
    pub direction: String,
}

/// The CRS definition tree an external WKT parser produces
#[derive(Debug, Clone)]
pub enum CrsDefinition {
    /// GEOGCS node
    Geographic {
        /// CRS name
        name: String,
        /// DATUM node
        datum: DatumDef,
        /// PRIMEM node: name and Greenwich longitude in degrees
        prime_meridian: (String, f64),
        /// AXIS nodes; defaults to (Lon, Lat) when the WKT has none
        axes: Option<Vec<AxisDef>>,
        /// AUTHORITY node
        authority: Option<(String, String)>,
    },
    /// PROJCS node
    Projected {
        /// CRS name
        name: String,
        /// Base GEOGCS
        base: Box<CrsDefinition>,
        /// PROJECTION method name
        method: String,
        /// PARAMETER nodes
        parameters: Vec<(String, f64)>,
        /// AXIS nodes; defaults to (E, N) when the WKT has none
        axes: Option<Vec<AxisDef>>,
        /// AUTHORITY node
        authority: Option<(String, String)>,
    },
}

fn axis_from_def(def: &AxisDef, angular: bool) -> GeoResult<Axis> {
    let direction = match def.direction.to_uppercase().as_str() {
        "EAST" => AxisDirection::East,
        "NORTH" => AxisDirection::North,
        "WEST" => AxisDirection::West,
        "SOUTH" => AxisDirection::South,
        "UP" => AxisDirection::Up,
        "DOWN" => AxisDirection::Down,
        other => {
            return Err(GeoError::Factory(format!(
                "Unknown axis direction keyword: {}", other
            )))
        }
    };
    let unit = if angular { Unit::Degree } else { Unit::Metre };
    Ok(Axis::new(&def.name, &def.name, direction, unit))
}

fn datum_from_def(def: &DatumDef) -> GeoResult<GeodeticDatum> {
    let ellipsoid = Ellipsoid::new(def.semi_major, def.inverse_flattening)?;
    let mut datum = GeodeticDatum::new(&def.name, ellipsoid, PrimeMeridian::greenwich());
    if let Some(p) = def.to_wgs84 {
        datum = datum.with_to_wgs84(BursaWolf {
            dx: p[0], dy: p[1], dz: p[2],
            ex: p[3], ey: p[4], ez: p[5],
            ppm: p[6],
        });
    }
    Ok(datum)
}

fn method_from_name(name: &str) -> GeoResult<ProjectionMethod> {
    match name.to_lowercase().replace([' ', '_'], "").as_str() {
        "transversemercator" => Ok(ProjectionMethod::TransverseMercator),
        "polarstereographic" => Ok(ProjectionMethod::PolarStereographic),
        "mercator1sp" => Ok(ProjectionMethod::Mercator1SP),
        "popularvisualisationpseudomercator" | "webmercator" => {
            Ok(ProjectionMethod::WebMercator)
        }
        _ => Err(GeoError::Factory(format!(
            "Unsupported projection method: {}", name
        ))),
    }
}

impl Crs {
    /// Build a CRS from a parsed WKT definition tree
    pub fn from_definition(def: &CrsDefinition) -> GeoResult<Crs> {
        match def {
            CrsDefinition::Geographic { name, datum, prime_meridian, axes, authority } => {
                let mut built = datum_from_def(datum)?;
                built.prime_meridian = PrimeMeridian {
                    name: prime_meridian.0.clone(),
                    greenwich_longitude: prime_meridian.1,
                };
                let axes = match axes {
                    Some(defs) => {
                        let mut list = Vec::with_capacity(defs.len());
                        for d in defs {
                            list.push(axis_from_def(d, true)?);
                        }
                        list
                    }
                    // WKT without AXIS elements implies (Lon, Lat)
                    None => vec![Axis::longitude(), Axis::latitude()],
                };
                Ok(Crs {
                    identifier: authority
                        .as_ref()
                        .map(|(a, c)| Identifier::new(a, c)),
                    name: name.clone(),
                    kind: CrsKind::Geographic,
                    axes,
                    datum: built,
                })
            }
            CrsDefinition::Projected { name, base, method, parameters, axes, authority } => {
                let base_crs = Crs::from_definition(base)?;
                let mut params = ProjectionParams::default();
                for (key, value) in parameters {
                    match key.to_lowercase().as_str() {
                        "latitude_of_origin" => params.latitude_of_origin = *value,
                        "central_meridian" => params.central_meridian = *value,
                        "standard_parallel_1" => params.standard_parallel = *value,
                        "scale_factor" => params.scale_factor = *value,
                        "false_easting" => params.false_easting = *value,
                        "false_northing" => params.false_northing = *value,
                        other => {
                            log::debug!("Ignoring WKT parameter {}", other);
                        }
                    }
                }
                let method = method_from_name(method)?;
                // Polar stereographic WKT carries the standard parallel
                // as latitude_of_origin
                if method == ProjectionMethod::PolarStereographic
                    && params.standard_parallel == 0.0
                {
                    params.standard_parallel = params.latitude_of_origin;
                }
                let axes = match axes {
                    Some(defs) => {
                        let mut list = Vec::with_capacity(defs.len());
                        for d in defs {
                            list.push(axis_from_def(d, false)?);
                        }
                        list
                    }
                    None => vec![Axis::easting(), Axis::northing()],
                };
                Ok(Crs {
                    identifier: authority
                        .as_ref()
                        .map(|(a, c)| Identifier::new(a, c)),
                    name: name.clone(),
                    kind: CrsKind::Projected(ProjectionSpec { method, params }),
                    axes,
                    datum: base_crs.datum,
                })
            }
        }
    }
}

fn format_datum(datum: &GeodeticDatum, out: &mut String) {
    out.push_str(&format!(
        "DATUM[\"{}\", SPHEROID[\"{}\", {}, {}]",
        datum.name, datum.name, datum.ellipsoid.semi_major, datum.ellipsoid.inverse_flattening
    ));
    if let Some(p) = &datum.to_wgs84 {
        out.push_str(&format!(
            ", TOWGS84[{}, {}, {}, {}, {}, {}, {}]",
            p.dx, p.dy, p.dz, p.ex, p.ey, p.ez, p.ppm
        ));
    }
    out.push(']');
}

fn format_axes(axes: &[Axis], out: &mut String) {
    for axis in axes {
        out.push_str(&format!(
            ", AXIS[\"{}\", {}]",
            axis.abbreviation,
            axis.direction.wkt_keyword()
        ));
    }
}

fn format_authority(crs: &Crs, out: &mut String) {
    if let Some(id) = &crs.identifier {
        out.push_str(&format!(
            ", AUTHORITY[\"{}\", \"{}\"]",
            id.authority, id.code
        ));
    }
}

fn format_geographic(crs: &Crs, out: &mut String) {
    out.push_str(&format!("GEOGCS[\"{}\", ", crs.name));
    format_datum(&crs.datum, out);
    out.push_str(&format!(
        ", PRIMEM[\"{}\", {}], UNIT[\"degree\", 0.017453292519943295]",
        crs.datum.prime_meridian.name, crs.datum.prime_meridian.greenwich_longitude
    ));
    format_axes(&crs.axes, out);
    format_authority(crs, out);
    out.push(']');
}

/// Serialize a CRS to WKT text
///
/// Produces the GeoTools-flavoured single-line WKT ordering:
/// DATUM, SPHEROID, TOWGS84, PRIMEM, UNIT, PROJECTION, PARAMETER,
/// AXIS, AUTHORITY.
pub fn to_wkt(crs: &Crs) -> String {
    let mut out = String::new();
    match &crs.kind {
        CrsKind::Geographic => format_geographic(crs, &mut out),
        CrsKind::Projected(spec) => {
            out.push_str(&format!("PROJCS[\"{}\", ", crs.name));
            // Base geographic CRS, reconstructed from the datum with
            // authority axis order
            let base = Crs {
                identifier: None,
                name: crs.datum.name.clone(),
                kind: CrsKind::Geographic,
                axes: vec![Axis::latitude(), Axis::longitude()],
                datum: crs.datum.clone(),
            };
            format_geographic(&base, &mut out);
            out.push_str(&format!(
                ", PROJECTION[\"{}\"]",
                spec.method.wkt_name()
            ));
            let p = &spec.params;
            out.push_str(&format!(
                ", PARAMETER[\"latitude_of_origin\", {}]\
                 , PARAMETER[\"central_meridian\", {}]\
                 , PARAMETER[\"standard_parallel_1\", {}]\
                 , PARAMETER[\"scale_factor\", {}]\
                 , PARAMETER[\"false_easting\", {}]\
                 , PARAMETER[\"false_northing\", {}]\
                 , UNIT[\"metre\", 1.0]",
                p.latitude_of_origin,
                p.central_meridian,
                p.standard_parallel,
                p.scale_factor,
                p.false_easting,
                p.false_northing
            ));
            format_axes(&crs.axes, &mut out);
            format_authority(crs, &mut out);
            out.push(']');
        }
        CrsKind::Vertical => {
            out.push_str(&format!(
                "VERT_CS[\"{}\", VERT_DATUM[\"{}\", 2005], UNIT[\"metre\", 1.0]",
                crs.name, crs.datum.name
            ));
            format_axes(&crs.axes, &mut out);
            format_authority(crs, &mut out);
            out.push(']');
        }
        CrsKind::Engineering => {
            out.push_str(&format!(
                "LOCAL_CS[\"{}\", LOCAL_DATUM[\"{}\", 0], UNIT[\"metre\", 1.0]",
                crs.name, crs.datum.name
            ));
            format_axes(&crs.axes, &mut out);
            format_authority(crs, &mut out);
            out.push(']');
        }
        CrsKind::Compound(components) => {
            out.push_str(&format!("COMPD_CS[\"{}\"", crs.name));
            for component in components {
                out.push_str(", ");
                out.push_str(&to_wkt(component));
            }
            format_authority(crs, &mut out);
            out.push(']');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ed50_definition(name: &str) -> CrsDefinition {
        CrsDefinition::Geographic {
            name: name.to_string(),
            datum: DatumDef {
                name: "European Datum 1950".to_string(),
                semi_major: 6378388.0,
                inverse_flattening: 297.0,
                to_wgs84: None,
            },
            prime_meridian: ("Greenwich".to_string(), 0.0),
            axes: None,
            authority: None,
        }
    }

    #[test]
    fn test_geographic_from_definition_defaults_lon_lat() {
        let crs = Crs::from_definition(&ed50_definition("ED50")).unwrap();
        assert!(crs.is_geographic());
        assert_eq!(crs.axes[0].direction, AxisDirection::East);
        assert_eq!(crs.axes[1].direction, AxisDirection::North);
        assert_eq!(crs.datum.ellipsoid.semi_major, 6378388.0);
    }

    #[test]
    fn test_unknown_method_is_factory_error() {
        let def = CrsDefinition::Projected {
            name: "bogus".to_string(),
            base: Box::new(ed50_definition("ED50")),
            method: "Van_der_Grinten_I".to_string(),
            parameters: vec![],
            axes: None,
            authority: None,
        };
        assert!(matches!(
            Crs::from_definition(&def),
            Err(GeoError::Factory(_))
        ));
    }

    #[test]
    fn test_wkt_round_trip_carries_authority() {
        let def = CrsDefinition::Geographic {
            name: "WGS 84".to_string(),
            datum: DatumDef {
                name: "World Geodetic System 1984".to_string(),
                semi_major: 6378137.0,
                inverse_flattening: 298.257223563,
                to_wgs84: Some([0.0; 7]),
            },
            prime_meridian: ("Greenwich".to_string(), 0.0),
            axes: None,
            authority: Some(("EPSG".to_string(), "4326".to_string())),
        };
        let crs = Crs::from_definition(&def).unwrap();
        let wkt = to_wkt(&crs);
        assert!(wkt.starts_with("GEOGCS[\"WGS 84\""));
        assert!(wkt.contains("TOWGS84[0, 0, 0"));
        assert!(wkt.contains("AUTHORITY[\"EPSG\", \"4326\"]"));
    }
}
