//! Serializable availability report.

use serde::{Deserialize, Serialize};

use crate::grid::VehicleClass;

/// Free and total active spots for one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassAvailability {
    pub class: VehicleClass,
    pub free: usize,
    pub total: usize,
}

impl ClassAvailability {
    pub fn occupied(&self) -> usize {
        self.total.saturating_sub(self.free)
    }
}

/// Point-in-time view of the whole lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotSnapshot {
    pub floors: usize,
    pub rows: usize,
    pub columns: usize,
    pub classes: Vec<ClassAvailability>,
    /// Vehicles currently holding a spot.
    pub parked: usize,
    /// Vehicles with any recorded spot, parked or not.
    pub tracked_vehicles: usize,
}

impl LotSnapshot {
    pub fn class(&self, class: VehicleClass) -> Option<&ClassAvailability> {
        self.classes.iter().find(|c| c.class == class)
    }

    pub fn total_free(&self) -> usize {
        self.classes.iter().map(|c| c.free).sum()
    }
}
