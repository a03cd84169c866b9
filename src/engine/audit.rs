//! Invariant audit over the engine indices and the grid.
//!
//! Runs under the engine read lock and takes one spot lock at a time.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::state::AllocationState;
use crate::grid::{Grid, SpotCoord, VehicleClass};

/// A single broken invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AuditFinding {
    /// Pool entry that does not name a real spot.
    UnknownSpotInPool { class: VehicleClass, spot: String },
    /// Pool entry for an inactive spot or one of another class.
    IneligibleSpotInPool { class: VehicleClass, spot: String },
    /// Same spot listed in more than one pool.
    DuplicatePoolEntry { spot: String },
    /// Pool entry for a spot that is occupied.
    OccupiedSpotInPool { spot: String, occupant: String },
    /// Current index entry whose spot does not hold that vehicle.
    IndexSpotMismatch { vehicle_id: String, spot: String },
    /// Two vehicles indexed to the same spot.
    SharedSpot { spot: String },
    /// Current index entry whose history points elsewhere.
    StaleHistory { vehicle_id: String },
    /// Occupied spot that no vehicle is indexed to.
    UntrackedOccupant { spot: String, occupant: String },
    /// Active, free spot absent from its pool.
    LostFreeSpot { spot: String },
}

impl fmt::Display for AuditFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSpotInPool { class, spot } => {
                write!(f, "{class} pool lists unknown spot {spot}")
            }
            Self::IneligibleSpotInPool { class, spot } => {
                write!(f, "{class} pool lists ineligible spot {spot}")
            }
            Self::DuplicatePoolEntry { spot } => write!(f, "spot {spot} is in several pools"),
            Self::OccupiedSpotInPool { spot, occupant } => {
                write!(f, "spot {spot} is pooled but held by {occupant}")
            }
            Self::IndexSpotMismatch { vehicle_id, spot } => {
                write!(f, "{vehicle_id} indexed at {spot} but not recorded there")
            }
            Self::SharedSpot { spot } => write!(f, "spot {spot} indexed to several vehicles"),
            Self::StaleHistory { vehicle_id } => write!(f, "{vehicle_id} history disagrees with index"),
            Self::UntrackedOccupant { spot, occupant } => {
                write!(f, "spot {spot} held by untracked {occupant}")
            }
            Self::LostFreeSpot { spot } => write!(f, "free spot {spot} missing from its pool"),
        }
    }
}

pub(crate) fn check(grid: &Grid, state: &AllocationState) -> Vec<AuditFinding> {
    let mut findings = Vec::new();
    let mut pooled: HashMap<SpotCoord, usize> = HashMap::new();

    for (&class, pool) in &state.free_pools {
        for &coord in pool {
            *pooled.entry(coord).or_default() += 1;
            let Some(spot) = grid.spot(coord) else {
                findings.push(AuditFinding::UnknownSpotInPool { class, spot: coord.key() });
                continue;
            };
            if !spot.is_active() || spot.class() != Some(class) {
                findings.push(AuditFinding::IneligibleSpotInPool { class, spot: coord.key() });
            }
            if let Some(occupant) = spot.occupant() {
                findings.push(AuditFinding::OccupiedSpotInPool { spot: coord.key(), occupant });
            }
        }
    }
    for (coord, count) in &pooled {
        if *count > 1 {
            findings.push(AuditFinding::DuplicatePoolEntry { spot: coord.key() });
        }
    }

    let mut indexed: HashMap<SpotCoord, &str> = HashMap::new();
    for (vehicle_id, &coord) in &state.current {
        let held = grid
            .spot(coord)
            .is_some_and(|spot| spot.lock().is_held_by(vehicle_id));
        if !held {
            findings.push(AuditFinding::IndexSpotMismatch {
                vehicle_id: vehicle_id.clone(),
                spot: coord.key(),
            });
        }
        if indexed.insert(coord, vehicle_id).is_some() {
            findings.push(AuditFinding::SharedSpot { spot: coord.key() });
        }
        if state.last.get(vehicle_id) != Some(&coord) {
            findings.push(AuditFinding::StaleHistory { vehicle_id: vehicle_id.clone() });
        }
    }

    for spot in grid.iter() {
        let coord = spot.coord();
        match spot.occupant() {
            Some(occupant) if !indexed.contains_key(&coord) => {
                findings.push(AuditFinding::UntrackedOccupant { spot: coord.key(), occupant });
            }
            None if spot.is_active() && !pooled.contains_key(&coord) => {
                findings.push(AuditFinding::LostFreeSpot { spot: coord.key() });
            }
            _ => {}
        }
    }

    findings
}
