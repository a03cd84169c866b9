// Copyright 2024-2026 PARK-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Demo walkthrough: each sample vehicle gets a fresh lot, parks, unparks,
//! and is then located from history.

use crate::config::EnvConfig;
use crate::engine::{AllocationError, ParkingEngine};
use crate::grid::{LayoutError, VehicleClass};

/// Vehicles driven through the demo.
pub const DEMO_VEHICLES: [(VehicleClass, &str); 3] = [
    (VehicleClass::Bicycle, "BIKE123"),
    (VehicleClass::Motorcycle, "MOTO123"),
    (VehicleClass::Automobile, "CAR123"),
];

/// What happened to one demo vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoOutcome {
    pub class: VehicleClass,
    pub vehicle_id: String,
    pub parked_at: Result<String, AllocationError>,
    pub unparked: Result<(), AllocationError>,
    pub available_after: usize,
    pub located_at: Result<String, AllocationError>,
}

/// Run one vehicle through park -> unpark -> available -> search on a new lot.
pub fn drive_vehicle(
    config: &EnvConfig,
    class: VehicleClass,
    vehicle_id: &str,
) -> Result<DemoOutcome, LayoutError> {
    let engine = crate::engine_from_config(config)?;
    Ok(drive(&engine, class, vehicle_id))
}

fn drive(engine: &ParkingEngine, class: VehicleClass, vehicle_id: &str) -> DemoOutcome {
    let parked_at = engine.park(class, vehicle_id);
    let unparked = match &parked_at {
        Ok(key) => engine.unpark(key, vehicle_id),
        Err(_) => engine.unpark("", vehicle_id),
    };
    DemoOutcome {
        class,
        vehicle_id: vehicle_id.to_string(),
        parked_at,
        unparked,
        available_after: engine.available_spot(class),
        located_at: engine.search_vehicle(vehicle_id),
    }
}

/// Print the demo walkthrough. Returns the process exit code.
pub fn run_demo(config: &EnvConfig) -> i32 {
    for (class, vehicle_id) in DEMO_VEHICLES {
        let outcome = match drive_vehicle(config, class, vehicle_id) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("Invalid layout: {}", e);
                return super::EXIT_CONFIG_ERROR;
            }
        };

        println!("Vehicle number: {}", outcome.vehicle_id);
        match &outcome.parked_at {
            Ok(key) => println!("{} parked at: {}", class, key),
            Err(e) => println!("Park failed: {}", e),
        }
        if let Err(e) = &outcome.unparked {
            println!("Unpark failed: {}", e);
        }
        println!("Available {} spots: {}", class, outcome.available_after);
        match &outcome.located_at {
            Ok(key) => println!("Vehicle location: {}\n", key),
            Err(e) => println!("Search failed: {}\n", e),
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EnvConfig, LayoutSource, SimulationConfig, DEFAULT_LAYOUT};
    use crate::grid::LayoutTemplate;
    use crate::telemetry::LogConfig;

    fn demo_config(layout: &str) -> EnvConfig {
        EnvConfig {
            floors: 2,
            layout: LayoutTemplate::parse_inline(layout),
            layout_source: LayoutSource::Default,
            log: LogConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }

    #[test]
    fn test_demo_vehicles_round_trip() {
        let config = demo_config(DEFAULT_LAYOUT);
        for (class, vehicle_id) in DEMO_VEHICLES {
            let outcome = drive_vehicle(&config, class, vehicle_id).unwrap();
            let key = outcome.parked_at.clone().unwrap();
            assert_eq!(outcome.unparked, Ok(()));
            assert_eq!(outcome.located_at, Ok(key));
        }
    }

    #[test]
    fn test_demo_reports_full_lot() {
        let config = demo_config("A-1");
        let outcome = drive_vehicle(&config, VehicleClass::Bicycle, "BIKE123").unwrap();
        assert_eq!(
            outcome.parked_at,
            Err(AllocationError::NoAvailableSpot(VehicleClass::Bicycle))
        );
        assert!(matches!(
            outcome.unparked,
            Err(AllocationError::VehicleSpotMismatch { .. })
        ));
        assert_eq!(outcome.available_after, 0);
        assert!(matches!(outcome.located_at, Err(AllocationError::VehicleNotFound(_))));
    }
}
