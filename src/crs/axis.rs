//! Coordinate system axes and units

/// Direction of a coordinate system axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    /// Increasing toward geographic east
    East,
    /// Increasing toward geographic north
    North,
    /// Increasing upward (height)
    Up,
    /// Increasing toward future time
    Future,
    /// Increasing toward geographic west
    West,
    /// Increasing toward geographic south
    South,
    /// Increasing downward (depth)
    Down,
    /// Increasing toward past time
    Past,
}

impl AxisDirection {
    /// Get the opposite direction
    pub fn opposite(&self) -> AxisDirection {
        match self {
            AxisDirection::East => AxisDirection::West,
            AxisDirection::North => AxisDirection::South,
            AxisDirection::Up => AxisDirection::Down,
            AxisDirection::Future => AxisDirection::Past,
            AxisDirection::West => AxisDirection::East,
            AxisDirection::South => AxisDirection::North,
            AxisDirection::Down => AxisDirection::Up,
            AxisDirection::Past => AxisDirection::Future,
        }
    }

    /// Check whether this direction lies in the horizontal plane
    pub fn is_horizontal(&self) -> bool {
        matches!(
            self,
            AxisDirection::East | AxisDirection::North | AxisDirection::West | AxisDirection::South
        )
    }

    /// WKT keyword for this direction
    pub fn wkt_keyword(&self) -> &'static str {
        match self {
            AxisDirection::East => "EAST",
            AxisDirection::North => "NORTH",
            AxisDirection::Up => "UP",
            AxisDirection::Future => "FUTURE",
            AxisDirection::West => "WEST",
            AxisDirection::South => "SOUTH",
            AxisDirection::Down => "DOWN",
            AxisDirection::Past => "PAST",
        }
    }
}

/// Unit of measure for an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    /// Angular degree
    Degree,
    /// Angular radian
    Radian,
    /// Linear metre
    Metre,
    /// International foot
    Foot,
    /// Dimensionless
    Unity,
}

impl Unit {
    /// Conversion factor to the base unit of the same kind
    /// (degree for angles, metre for lengths)
    pub fn factor_to_base(&self) -> f64 {
        match self {
            Unit::Degree => 1.0,
            Unit::Radian => 180.0 / std::f64::consts::PI,
            Unit::Metre => 1.0,
            Unit::Foot => 0.3048,
            Unit::Unity => 1.0,
        }
    }

    /// Check whether this unit measures an angle
    pub fn is_angular(&self) -> bool {
        matches!(self, Unit::Degree | Unit::Radian)
    }

    /// WKT name for this unit
    pub fn wkt_name(&self) -> &'static str {
        match self {
            Unit::Degree => "degree",
            Unit::Radian => "radian",
            Unit::Metre => "metre",
            Unit::Foot => "foot",
            Unit::Unity => "unity",
        }
    }
}

/// A coordinate system axis
///
/// The position of an axis within the CRS axis sequence is semantically
/// load-bearing: it determines the axis-order classification of the CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// Full axis name (e.g. "Geodetic latitude")
    pub name: String,
    /// Short abbreviation (e.g. "Lat")
    pub abbreviation: String,
    /// Direction of increasing values
    pub direction: AxisDirection,
    /// Unit of measure
    pub unit: Unit,
}

impl Axis {
    /// Create a new axis
    pub fn new(name: &str, abbreviation: &str, direction: AxisDirection, unit: Unit) -> Self {
        Axis {
            name: name.to_string(),
            abbreviation: abbreviation.to_string(),
            direction,
            unit,
        }
    }

    /// Geodetic latitude axis, (North, degree)
    pub fn latitude() -> Self {
        Axis::new("Geodetic latitude", "Lat", AxisDirection::North, Unit::Degree)
    }

    /// Geodetic longitude axis, (East, degree)
    pub fn longitude() -> Self {
        Axis::new("Geodetic longitude", "Lon", AxisDirection::East, Unit::Degree)
    }

    /// Projected easting axis, (East, metre)
    pub fn easting() -> Self {
        Axis::new("Easting", "E", AxisDirection::East, Unit::Metre)
    }

    /// Projected northing axis, (North, metre)
    pub fn northing() -> Self {
        Axis::new("Northing", "N", AxisDirection::North, Unit::Metre)
    }

    /// Gravity-related height axis, (Up, metre)
    pub fn height() -> Self {
        Axis::new("Gravity-related height", "H", AxisDirection::Up, Unit::Metre)
    }

    /// Value range naturally bounded by this axis, if any
    ///
    /// Geographic axes are bounded (±90° latitude, ±180° longitude);
    /// projected and vertical axes extend to infinity.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        if !self.unit.is_angular() {
            return None;
        }
        match self.direction {
            AxisDirection::North | AxisDirection::South => Some((-90.0, 90.0)),
            AxisDirection::East | AxisDirection::West => Some((-180.0, 180.0)),
            _ => None,
        }
    }

    /// Structural comparison ignoring names and abbreviations
    pub fn equals_ignore_metadata(&self, other: &Axis) -> bool {
        self.direction == other.direction && self.unit == other.unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_opposite() {
        assert_eq!(AxisDirection::East.opposite(), AxisDirection::West);
        assert_eq!(AxisDirection::Up.opposite(), AxisDirection::Down);
        assert_eq!(AxisDirection::Past.opposite(), AxisDirection::Future);
    }

    #[test]
    fn test_latitude_range() {
        let lat = Axis::latitude();
        assert_eq!(lat.value_range(), Some((-90.0, 90.0)));
        let e = Axis::easting();
        assert_eq!(e.value_range(), None);
    }

    #[test]
    fn test_ignore_metadata_equality() {
        let a = Axis::new("Geodetic latitude", "Lat", AxisDirection::North, Unit::Degree);
        let b = Axis::new("lat", "phi", AxisDirection::North, Unit::Degree);
        assert!(a.equals_ignore_metadata(&b));
        assert!(!a.equals_ignore_metadata(&Axis::longitude()));
    }
}
