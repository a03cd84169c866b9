//! Allocation error types.
//!
//! Every failure is detected before state is committed, so the engine stays
//! usable after any error.

use thiserror::Error;

use crate::grid::VehicleClass;

/// Errors returned by the allocation engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Vehicle already parked: {vehicle_id} at {spot}")]
    AlreadyParked { vehicle_id: String, spot: String },

    #[error("No available spot for {0}")]
    NoAvailableSpot(VehicleClass),

    #[error("Vehicle {vehicle_id} not found at spot {spot}")]
    VehicleSpotMismatch { vehicle_id: String, spot: String },

    #[error("Spot {spot} not occupied by vehicle {vehicle_id}")]
    SpotNotOccupiedByVehicle { vehicle_id: String, spot: String },

    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),
}

impl AllocationError {
    /// Returns true if the lot was simply full for the requested class.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::NoAvailableSpot(_))
    }

    /// Returns true if the engine index and a spot's own state disagreed.
    pub fn is_consistency_fault(&self) -> bool {
        matches!(self, Self::SpotNotOccupiedByVehicle { .. })
    }

    /// Short stable label for metrics and spans.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyParked { .. } => "already_parked",
            Self::NoAvailableSpot(_) => "no_available_spot",
            Self::VehicleSpotMismatch { .. } => "vehicle_spot_mismatch",
            Self::SpotNotOccupiedByVehicle { .. } => "spot_not_occupied_by_vehicle",
            Self::VehicleNotFound(_) => "vehicle_not_found",
        }
    }
}
