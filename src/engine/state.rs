//! Index maps owned by the allocation engine.
//!
//! The three maps form one consistency unit and are only ever touched while
//! the engine-wide lock is held.

use std::collections::{HashMap, HashSet};

use crate::grid::{Grid, SpotCoord, VehicleClass};

#[derive(Debug, Default)]
pub(crate) struct AllocationState {
    /// Free, active spots per class. A coordinate sits in at most one pool.
    pub free_pools: HashMap<VehicleClass, HashSet<SpotCoord>>,
    /// Vehicle id -> spot it occupies now.
    pub current: HashMap<String, SpotCoord>,
    /// Vehicle id -> most recent spot it ever occupied. Never shrinks.
    pub last: HashMap<String, SpotCoord>,
}

impl AllocationState {
    /// Seed the free pools from every active spot in the grid.
    pub fn from_grid(grid: &Grid) -> Self {
        let mut free_pools: HashMap<VehicleClass, HashSet<SpotCoord>> = VehicleClass::ALL
            .into_iter()
            .map(|class| (class, HashSet::new()))
            .collect();

        for spot in grid.iter().filter(|s| s.is_active()) {
            if let Some(class) = spot.class() {
                free_pools.entry(class).or_default().insert(spot.coord());
            }
        }

        Self {
            free_pools,
            current: HashMap::new(),
            last: HashMap::new(),
        }
    }

    pub fn free_count(&self, class: VehicleClass) -> usize {
        self.free_pools.get(&class).map_or(0, HashSet::len)
    }

    /// Record a committed park.
    pub fn commit_park(&mut self, class: VehicleClass, coord: SpotCoord, vehicle_id: &str) {
        if let Some(pool) = self.free_pools.get_mut(&class) {
            pool.remove(&coord);
        }
        self.current.insert(vehicle_id.to_string(), coord);
        self.last.insert(vehicle_id.to_string(), coord);
    }

    /// Record a committed unpark. History is left in place.
    pub fn commit_unpark(&mut self, class: VehicleClass, coord: SpotCoord, vehicle_id: &str) {
        self.current.remove(vehicle_id);
        self.free_pools.entry(class).or_default().insert(coord);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LayoutTemplate;

    #[test]
    fn test_pools_seeded_from_active_spots() {
        let template = LayoutTemplate::new([["B-1", "M-1", "A-1"], ["B-0", "M-1", "X-1"]]);
        let grid = Grid::new(2, 2, 3, &template).unwrap();
        let state = AllocationState::from_grid(&grid);

        assert_eq!(state.free_count(VehicleClass::Bicycle), 2);
        assert_eq!(state.free_count(VehicleClass::Motorcycle), 4);
        assert_eq!(state.free_count(VehicleClass::Automobile), 2);
        assert!(state.current.is_empty());
        assert!(state.last.is_empty());
    }

    #[test]
    fn test_commit_park_then_unpark_keeps_history() {
        let grid = Grid::new(1, 1, 1, &LayoutTemplate::new([["A-1"]])).unwrap();
        let mut state = AllocationState::from_grid(&grid);
        let coord = SpotCoord::new(0, 0, 0);

        state.commit_park(VehicleClass::Automobile, coord, "CAR1");
        assert_eq!(state.free_count(VehicleClass::Automobile), 0);
        assert_eq!(state.current.get("CAR1"), Some(&coord));

        state.commit_unpark(VehicleClass::Automobile, coord, "CAR1");
        assert_eq!(state.free_count(VehicleClass::Automobile), 1);
        assert!(!state.current.contains_key("CAR1"));
        assert_eq!(state.last.get("CAR1"), Some(&coord));
    }
}
