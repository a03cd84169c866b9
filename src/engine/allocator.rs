//! The allocation engine.
//!
//! Two lock tiers:
//! 1. `state`: one `parking_lot::RwLock` over the free pools, the current
//!    index and the history index. Writers (`park`, `unpark`) hold it
//!    exclusively for the whole operation; readers share it.
//! 2. Each spot's own mutex, guarding occupancy only.
//!
//! The engine lock is always taken first and at most one spot lock is held
//! at a time, so no cycle can form.

use parking_lot::RwLock;
use tracing::{debug, warn};

use super::audit::{self, AuditFinding};
use super::error::AllocationError;
use super::snapshot::{ClassAvailability, LotSnapshot};
use super::state::AllocationState;
use crate::grid::{Grid, LayoutError, LayoutTemplate, SpotCoord, VehicleClass};
use crate::telemetry::{self, OperationSpan, SpanExt};

/// Thread-safe parking allocator over a fixed grid.
///
/// Share it between threads by reference or inside an `Arc`.
pub struct ParkingEngine {
    grid: Grid,
    state: RwLock<AllocationState>,
}

impl ParkingEngine {
    /// Take ownership of a grid and seed the free pools from its active spots.
    pub fn new(grid: Grid) -> Self {
        let state = AllocationState::from_grid(&grid);
        for class in VehicleClass::ALL {
            telemetry::record_free_spots(class, state.free_count(class));
        }
        debug!(spots = grid.len(), "allocation engine initialized");
        Self {
            grid,
            state: RwLock::new(state),
        }
    }

    /// Build the grid from a template and initialize the engine over it.
    pub fn with_layout(
        floors: usize,
        rows: usize,
        columns: usize,
        template: &LayoutTemplate,
    ) -> Result<Self, LayoutError> {
        Ok(Self::new(Grid::new(floors, rows, columns, template)?))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Park `vehicle_id` in any free spot of `class` and return the spot key.
    pub fn park(&self, class: VehicleClass, vehicle_id: &str) -> Result<String, AllocationError> {
        let span = OperationSpan::new("park", vehicle_id, class.name());
        let _enter = span.enter();

        let result = self.park_locked(class, vehicle_id);
        span.record_result(&result);
        match &result {
            Ok(key) => {
                debug!(%class, vehicle_id, spot = %key, "vehicle parked");
                telemetry::record_park(class, "ok");
            }
            Err(e) => {
                if e.is_capacity() {
                    warn!(%class, vehicle_id, "{}", e);
                } else {
                    debug!(%class, vehicle_id, "{}", e);
                }
                telemetry::record_park(class, e.kind());
            }
        }
        result
    }

    fn park_locked(&self, class: VehicleClass, vehicle_id: &str) -> Result<String, AllocationError> {
        let mut state = self.state.write();

        if let Some(coord) = state.current.get(vehicle_id) {
            return Err(AllocationError::AlreadyParked {
                vehicle_id: vehicle_id.to_string(),
                spot: coord.key(),
            });
        }

        let mut chosen = None;
        let mut stale = Vec::new();
        if let Some(pool) = state.free_pools.get(&class) {
            for &coord in pool {
                let Some(spot) = self.grid.spot(coord) else {
                    stale.push(coord);
                    continue;
                };
                let mut occupancy = spot.lock();
                if occupancy.is_occupied() {
                    stale.push(coord);
                    continue;
                }
                occupancy.occupy(vehicle_id);
                chosen = Some(coord);
                break;
            }
        }

        if !stale.is_empty() {
            warn!(%class, count = stale.len(), "dropping stale entries from free pool");
            if let Some(pool) = state.free_pools.get_mut(&class) {
                for coord in &stale {
                    pool.remove(coord);
                }
            }
        }

        let coord = chosen.ok_or(AllocationError::NoAvailableSpot(class))?;
        state.commit_park(class, coord, vehicle_id);
        telemetry::record_free_spots(class, state.free_count(class));
        Ok(coord.key())
    }

    /// Release `spot_key` held by `vehicle_id`.
    pub fn unpark(&self, spot_key: &str, vehicle_id: &str) -> Result<(), AllocationError> {
        let span = OperationSpan::new("unpark", vehicle_id, spot_key);
        let _enter = span.enter();

        let result = self.unpark_locked(spot_key, vehicle_id);
        span.record_result(&result);
        match &result {
            Ok(()) => {
                debug!(vehicle_id, spot = spot_key, "vehicle unparked");
                telemetry::record_unpark("ok");
            }
            Err(e) => {
                if e.is_consistency_fault() {
                    warn!(vehicle_id, spot = spot_key, "{}", e);
                } else {
                    debug!(vehicle_id, spot = spot_key, "{}", e);
                }
                telemetry::record_unpark(e.kind());
            }
        }
        result
    }

    fn unpark_locked(&self, spot_key: &str, vehicle_id: &str) -> Result<(), AllocationError> {
        let mismatch = || AllocationError::VehicleSpotMismatch {
            vehicle_id: vehicle_id.to_string(),
            spot: spot_key.to_string(),
        };

        let mut state = self.state.write();

        let coord = *state.current.get(vehicle_id).ok_or_else(mismatch)?;
        if coord.key() != spot_key {
            return Err(mismatch());
        }
        let spot = self.grid.spot(coord).ok_or_else(mismatch)?;
        let class = spot.class().ok_or_else(mismatch)?;

        {
            let mut occupancy = spot.lock();
            if !occupancy.is_held_by(vehicle_id) {
                return Err(AllocationError::SpotNotOccupiedByVehicle {
                    vehicle_id: vehicle_id.to_string(),
                    spot: spot_key.to_string(),
                });
            }
            occupancy.vacate();
        }

        state.commit_unpark(class, coord, vehicle_id);
        telemetry::record_free_spots(class, state.free_count(class));
        Ok(())
    }

    /// Number of free spots currently available for `class`.
    pub fn available_spot(&self, class: VehicleClass) -> usize {
        let span = OperationSpan::new("available", "", class.name());
        let _enter = span.enter();

        let free = self.state.read().free_count(class);
        span.record("status", "ok");
        free
    }

    /// Current spot of `vehicle_id`, or the last one it held.
    pub fn search_vehicle(&self, vehicle_id: &str) -> Result<String, AllocationError> {
        let span = OperationSpan::new("search", vehicle_id, "");
        let _enter = span.enter();

        let result = {
            let state = self.state.read();
            state
                .current
                .get(vehicle_id)
                .or_else(|| state.last.get(vehicle_id))
                .map(SpotCoord::key)
                .ok_or_else(|| AllocationError::VehicleNotFound(vehicle_id.to_string()))
        };
        span.record_result(&result);
        result
    }

    /// Vehicle recorded on the spot at `spot_key`, if any.
    pub fn occupant(&self, spot_key: &str) -> Option<String> {
        let _state = self.state.read();
        self.grid.spot_by_key(spot_key)?.occupant()
    }

    /// Point-in-time availability report.
    pub fn snapshot(&self) -> LotSnapshot {
        let state = self.state.read();
        let classes = VehicleClass::ALL
            .into_iter()
            .map(|class| ClassAvailability {
                class,
                free: state.free_count(class),
                total: self.grid.active_spots(class).count(),
            })
            .collect();
        LotSnapshot {
            floors: self.grid.floors(),
            rows: self.grid.rows(),
            columns: self.grid.columns(),
            classes,
            parked: state.current.len(),
            tracked_vehicles: state.last.len(),
        }
    }

    /// Re-check every index invariant against the grid. Empty when consistent.
    pub fn audit(&self) -> Vec<AuditFinding> {
        let state = self.state.read();
        audit::check(&self.grid, &state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_bike_lot() -> ParkingEngine {
        ParkingEngine::with_layout(1, 1, 1, &LayoutTemplate::new([["B-1"]])).unwrap()
    }

    #[test]
    fn test_park_single_spot_scenario() {
        let engine = single_bike_lot();

        assert_eq!(engine.park(VehicleClass::Bicycle, "BIKE1").unwrap(), "0-0-0");
        assert!(matches!(
            engine.park(VehicleClass::Bicycle, "BIKE1"),
            Err(AllocationError::AlreadyParked { .. })
        ));
        assert_eq!(
            engine.park(VehicleClass::Bicycle, "BIKE2"),
            Err(AllocationError::NoAvailableSpot(VehicleClass::Bicycle))
        );
    }

    #[test]
    fn test_park_wrong_class_has_no_spot() {
        let engine = single_bike_lot();
        assert_eq!(
            engine.park(VehicleClass::Automobile, "CAR1"),
            Err(AllocationError::NoAvailableSpot(VehicleClass::Automobile))
        );
        assert_eq!(engine.available_spot(VehicleClass::Bicycle), 1);
    }

    #[test]
    fn test_unpark_keeps_history() {
        let engine = single_bike_lot();
        let key = engine.park(VehicleClass::Bicycle, "BIKE1").unwrap();
        assert_eq!(engine.occupant(&key).as_deref(), Some("BIKE1"));

        engine.unpark(&key, "BIKE1").unwrap();
        assert_eq!(engine.available_spot(VehicleClass::Bicycle), 1);
        assert_eq!(engine.search_vehicle("BIKE1").unwrap(), "0-0-0");
        assert_eq!(engine.occupant(&key), None);
    }

    #[test]
    fn test_unpark_twice_fails_with_mismatch() {
        let engine = single_bike_lot();
        let key = engine.park(VehicleClass::Bicycle, "BIKE1").unwrap();
        engine.unpark(&key, "BIKE1").unwrap();
        assert!(matches!(
            engine.unpark(&key, "BIKE1"),
            Err(AllocationError::VehicleSpotMismatch { .. })
        ));
    }

    #[test]
    fn test_unpark_rejects_malformed_key() {
        let engine = single_bike_lot();
        engine.park(VehicleClass::Bicycle, "BIKE1").unwrap();
        for key in ["", "0-0", "9-9-9", "0-0-0-0", "x"] {
            assert!(
                matches!(
                    engine.unpark(key, "BIKE1"),
                    Err(AllocationError::VehicleSpotMismatch { .. })
                ),
                "{key:?}"
            );
        }
        assert_eq!(engine.search_vehicle("BIKE1").unwrap(), "0-0-0");
        assert_eq!(engine.available_spot(VehicleClass::Bicycle), 0);
    }

    #[test]
    fn test_diverged_spot_state_is_reported() {
        let engine = single_bike_lot();
        let key = engine.park(VehicleClass::Bicycle, "BIKE1").unwrap();

        // Simulate the spot losing its occupant behind the engine's back.
        let spot = engine.grid().spot_by_key(&key).unwrap();
        spot.lock().vacate();

        let err = engine.unpark(&key, "BIKE1").unwrap_err();
        assert!(err.is_consistency_fault());
        assert_eq!(engine.search_vehicle("BIKE1").unwrap(), key);
        assert!(!engine.audit().is_empty());
    }

    #[test]
    fn test_unpark_spot_held_by_other_vehicle() {
        let engine = single_bike_lot();
        let key = engine.park(VehicleClass::Bicycle, "BIKE1").unwrap();

        let spot = engine.grid().spot_by_key(&key).unwrap();
        spot.lock().vacate();
        spot.lock().occupy("BIKE999");

        assert_eq!(
            engine.unpark(&key, "BIKE1"),
            Err(AllocationError::SpotNotOccupiedByVehicle {
                vehicle_id: "BIKE1".to_string(),
                spot: key.clone(),
            })
        );
        assert_eq!(engine.occupant(&key).as_deref(), Some("BIKE999"));
        assert_eq!(engine.search_vehicle("BIKE1").unwrap(), key);
        assert_eq!(engine.available_spot(VehicleClass::Bicycle), 0);
    }

    #[test]
    fn test_stale_pool_entry_is_skipped() {
        let engine =
            ParkingEngine::with_layout(1, 1, 2, &LayoutTemplate::new([["A-1", "A-1"]])).unwrap();

        // Occupy one spot directly so its pool entry goes stale.
        engine.grid().spot_by_key("0-0-0").unwrap().lock().occupy("GHOST");

        assert_eq!(engine.park(VehicleClass::Automobile, "CAR1").unwrap(), "0-0-1");
        assert_eq!(
            engine.park(VehicleClass::Automobile, "CAR2"),
            Err(AllocationError::NoAvailableSpot(VehicleClass::Automobile))
        );
        assert_eq!(engine.available_spot(VehicleClass::Automobile), 0);
    }

    #[test]
    fn test_search_unknown_vehicle() {
        let engine = single_bike_lot();
        assert_eq!(
            engine.search_vehicle("NEVER_SEEN"),
            Err(AllocationError::VehicleNotFound("NEVER_SEEN".to_string()))
        );
    }

    #[test]
    fn test_snapshot_counts() {
        let template = LayoutTemplate::new([["B-1", "M-1", "A-1"], ["B-0", "M-1", "A-0"]]);
        let engine = ParkingEngine::with_layout(1, 2, 3, &template).unwrap();
        engine.park(VehicleClass::Motorcycle, "MOTO1").unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.parked, 1);
        assert_eq!(snapshot.tracked_vehicles, 1);
        let moto = snapshot.class(VehicleClass::Motorcycle).unwrap();
        assert_eq!((moto.free, moto.total), (1, 2));
        let bike = snapshot.class(VehicleClass::Bicycle).unwrap();
        assert_eq!((bike.free, bike.total), (1, 1));
    }
}
