//! PARK-CORE
//!
//! A concurrent allocation engine for multi-floor parking grids. Vehicles of
//! distinct classes are parked in, released from and located within a fixed
//! grid of spots while many threads call in at once.
//!
//! # Components
//!
//! - [`grid`]: the fixed floors x rows x columns arrangement of spots. Each
//!   spot has a static class and active flag, plus occupancy behind its own lock.
//! - [`engine`]: per-class free pools, the vehicle -> current spot index and the
//!   vehicle -> last spot index, all behind one engine-wide read/write lock.
//!
//! # Example
//!
//! ```
//! use park_core::engine::ParkingEngine;
//! use park_core::grid::{LayoutTemplate, VehicleClass};
//!
//! let template = LayoutTemplate::new([["B-1", "M-1", "A-1"]]);
//! let engine = ParkingEngine::with_layout(1, 1, 3, &template).unwrap();
//!
//! let spot = engine.park(VehicleClass::Automobile, "CAR1").unwrap();
//! assert_eq!(spot, "0-0-2");
//! engine.unpark(&spot, "CAR1").unwrap();
//! assert_eq!(engine.search_vehicle("CAR1").unwrap(), "0-0-2");
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod grid;
pub mod telemetry;

use engine::ParkingEngine;
use grid::LayoutError;

/// Build an engine from loaded configuration.
pub fn engine_from_config(config: &config::EnvConfig) -> Result<ParkingEngine, LayoutError> {
    ParkingEngine::with_layout(config.floors, config.rows(), config.columns(), &config.layout)
}
