//! Spot identity and per-spot occupancy.
//!
//! Each spot carries its own `parking_lot::Mutex` guarding occupancy only.
//! Identity, class and the active flag are fixed at construction and read
//! without locking.

use std::fmt;
use std::str::FromStr;

use parking_lot::{Mutex, MutexGuard};
use thiserror::Error;

use super::class::VehicleClass;

/// Position of a spot in the grid.
///
/// Displays as `"<floor>-<row>-<col>"`, which is the external spot key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpotCoord {
    pub floor: i64,
    pub row: i64,
    pub col: i64,
}

impl SpotCoord {
    pub fn new(floor: i64, row: i64, col: i64) -> Self {
        Self { floor, row, col }
    }

    /// External spot key. Total for any coordinate, negatives included.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SpotCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.floor, self.row, self.col)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Malformed spot key: {0:?}")]
pub struct SpotKeyError(pub String);

/// Parses `"<int>-<int>-<int>"`.
///
/// A `-` directly at the start of a number is its sign; any other `-` is a
/// separator. `"-1--2--3"` therefore reads back as `(-1, -2, -3)`.
impl FromStr for SpotCoord {
    type Err = SpotKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SpotKeyError(s.to_string());
        let mut rest = s;
        let mut parts = [0i64; 3];

        for (i, part) in parts.iter_mut().enumerate() {
            if i > 0 {
                rest = rest.strip_prefix('-').ok_or_else(err)?;
            }
            let sign_len = usize::from(rest.starts_with('-'));
            let digits = rest[sign_len..]
                .bytes()
                .take_while(u8::is_ascii_digit)
                .count();
            if digits == 0 {
                return Err(err());
            }
            let (number, tail) = rest.split_at(sign_len + digits);
            *part = number.parse().map_err(|_| err())?;
            rest = tail;
        }

        if !rest.is_empty() {
            return Err(err());
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

/// Mutable state of a spot. Occupied exactly when a vehicle id is held.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Occupancy {
    vehicle_id: Option<String>,
}

impl Occupancy {
    pub fn is_occupied(&self) -> bool {
        self.vehicle_id.is_some()
    }

    pub fn vehicle_id(&self) -> Option<&str> {
        self.vehicle_id.as_deref()
    }

    pub fn is_held_by(&self, vehicle_id: &str) -> bool {
        self.vehicle_id.as_deref() == Some(vehicle_id)
    }

    pub(crate) fn occupy(&mut self, vehicle_id: &str) {
        self.vehicle_id = Some(vehicle_id.to_string());
    }

    pub(crate) fn vacate(&mut self) -> Option<String> {
        self.vehicle_id.take()
    }
}

/// A single addressable parking location.
#[derive(Debug)]
pub struct Spot {
    coord: SpotCoord,
    class: Option<VehicleClass>,
    active: bool,
    occupancy: Mutex<Occupancy>,
}

impl Spot {
    /// Create a spot. A spot without a recognized class is never active.
    pub fn new(coord: SpotCoord, class: Option<VehicleClass>, active: bool) -> Self {
        Self {
            coord,
            class,
            active: active && class.is_some(),
            occupancy: Mutex::new(Occupancy::default()),
        }
    }

    pub fn coord(&self) -> SpotCoord {
        self.coord
    }

    /// External key, `"floor-row-col"`.
    pub fn id(&self) -> String {
        self.coord.key()
    }

    /// Class accepted here, `None` when the layout code was unrecognized.
    pub fn class(&self) -> Option<VehicleClass> {
        self.class
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_occupied(&self) -> bool {
        self.occupancy.lock().is_occupied()
    }

    /// Vehicle currently recorded on this spot.
    pub fn occupant(&self) -> Option<String> {
        self.occupancy.lock().vehicle_id().map(str::to_string)
    }

    /// Acquire this spot's lock.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Occupancy> {
        self.occupancy.lock()
    }
}
