//! Authority code string parsing
//!
//! Accepts the compact "AUTHORITY:CODE" form (case-insensitive authority
//! token, bare numeric codes defaulting to EPSG) and the OGC URN form
//! "urn:ogc:def:crs:AUTHORITY:VERSION:CODE" where VERSION may be empty.
//! The historical "urn:x-ogc:" prefix is tolerated too.

use lazy_static::lazy_static;
use regex::Regex;

use crate::crs::errors::{GeoError, GeoResult};

lazy_static! {
    static ref URN_RE: Regex =
        Regex::new(r"(?i)^urn:(?:x-)?ogc:def:crs:([A-Za-z][A-Za-z0-9_-]*):([^:]*):([^:\s]+)$")
            .unwrap();
    static ref COMPACT_RE: Regex =
        Regex::new(r"^([A-Za-z][A-Za-z0-9_-]*):([^:\s]+)$").unwrap();
    static ref BARE_RE: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

/// A parsed authority code request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCode {
    /// Authority token, upper case
    pub authority: String,
    /// Requested authority version; None when not specified or empty
    pub version: Option<String>,
    /// Code within the authority namespace
    pub code: String,
}

impl ParsedCode {
    /// Compact "AUTHORITY:CODE" rendering of this request
    pub fn compact(&self) -> String {
        format!("{}:{}", self.authority, self.code)
    }
}

/// Parse an identifier string into its authority, version and code parts
///
/// # Arguments
/// * `text` - Identifier in compact, bare-numeric or URN form
///
/// # Returns
/// The parsed request, or a factory error for malformed input
pub fn parse(text: &str) -> GeoResult<ParsedCode> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GeoError::Factory("Empty authority code".to_string()));
    }
    if let Some(caps) = URN_RE.captures(trimmed) {
        let version = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        return Ok(ParsedCode {
            authority: caps[1].to_uppercase(),
            version: if version.is_empty() {
                None
            } else {
                Some(version.to_string())
            },
            code: caps[3].to_string(),
        });
    }
    if trimmed.to_lowercase().starts_with("urn:") {
        return Err(GeoError::Factory(format!("Malformed URN: \"{}\"", trimmed)));
    }
    if let Some(caps) = COMPACT_RE.captures(trimmed) {
        return Ok(ParsedCode {
            authority: caps[1].to_uppercase(),
            version: None,
            code: caps[2].to_string(),
        });
    }
    if BARE_RE.is_match(trimmed) {
        // Bare numeric codes default to the EPSG namespace
        return Ok(ParsedCode {
            authority: "EPSG".to_string(),
            version: None,
            code: trimmed.to_string(),
        });
    }
    Err(GeoError::Factory(format!(
        "Malformed authority code: \"{}\"", trimmed
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_form() {
        let parsed = parse("epsg:4326").unwrap();
        assert_eq!(parsed.authority, "EPSG");
        assert_eq!(parsed.version, None);
        assert_eq!(parsed.code, "4326");
    }

    #[test]
    fn test_bare_code_defaults_to_epsg() {
        let parsed = parse("3857").unwrap();
        assert_eq!(parsed.authority, "EPSG");
        assert_eq!(parsed.code, "3857");
    }

    #[test]
    fn test_urn_with_version() {
        let parsed = parse("urn:ogc:def:crs:EPSG:3.0:4326").unwrap();
        assert_eq!(parsed.authority, "EPSG");
        assert_eq!(parsed.version.as_deref(), Some("3.0"));
        assert_eq!(parsed.code, "4326");
    }

    #[test]
    fn test_urn_with_empty_version() {
        let parsed = parse("urn:ogc:def:crs:EPSG::4326").unwrap();
        assert_eq!(parsed.version, None);
        assert_eq!(parsed.code, "4326");
    }

    #[test]
    fn test_x_ogc_prefix() {
        let parsed = parse("urn:x-ogc:def:crs:EPSG::4326").unwrap();
        assert_eq!(parsed.authority, "EPSG");
    }

    #[test]
    fn test_malformed_inputs() {
        assert!(parse("").is_err());
        assert!(parse("EPSG:").is_err());
        assert!(parse("not a code").is_err());
        assert!(parse("urn:ogc:def:crs:EPSG").is_err());
    }
}
