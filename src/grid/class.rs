//! Vehicle classes and their single-letter layout codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of vehicle a spot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VehicleClass {
    Bicycle,
    Motorcycle,
    Automobile,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown vehicle class: {0:?}")]
pub struct UnknownClass(pub String);

impl VehicleClass {
    /// All classes, in pool order.
    pub const ALL: [VehicleClass; 3] = [
        VehicleClass::Bicycle,
        VehicleClass::Motorcycle,
        VehicleClass::Automobile,
    ];

    /// Layout code used in templates ("B", "M", "A").
    pub fn code(self) -> &'static str {
        match self {
            Self::Bicycle => "B",
            Self::Motorcycle => "M",
            Self::Automobile => "A",
        }
    }

    /// Resolve a layout code. Returns None for anything unrecognized.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "B" => Some(Self::Bicycle),
            "M" => Some(Self::Motorcycle),
            "A" => Some(Self::Automobile),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Bicycle => "bicycle",
            Self::Motorcycle => "motorcycle",
            Self::Automobile => "automobile",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the layout code or the lowercase name.
impl FromStr for VehicleClass {
    type Err = UnknownClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(class) = Self::from_code(s) {
            return Ok(class);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownClass(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_resolve() {
        for class in VehicleClass::ALL {
            assert_eq!(VehicleClass::from_code(class.code()), Some(class));
        }
        assert_eq!(VehicleClass::from_code("X"), None);
        assert_eq!(VehicleClass::from_code("b"), None);
        assert_eq!(VehicleClass::from_code(""), None);
    }

    #[test]
    fn test_parse_accepts_names() {
        assert_eq!("Motorcycle".parse::<VehicleClass>(), Ok(VehicleClass::Motorcycle));
        assert_eq!("A".parse::<VehicleClass>(), Ok(VehicleClass::Automobile));
        assert!("truck".parse::<VehicleClass>().is_err());
    }
}
