// Copyright 2024-2026 PARK-CORE Contributors
// SPDX-License-Identifier: Apache-2.0

//! Simulate command: concurrent random load against one shared engine,
//! followed by an invariant audit.

use std::collections::HashMap;
use std::time::Instant;

use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::config::EnvConfig;
use crate::engine::{AllocationError, AuditFinding, ParkingEngine};
use crate::grid::VehicleClass;

/// Vehicle ids every worker competes for.
const SHARED_VEHICLES: usize = 4;
/// Private vehicle ids per worker.
const OWN_VEHICLES: usize = 8;

/// Aggregated outcome counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SimulationReport {
    pub workers: usize,
    pub parked: u64,
    pub lot_full: u64,
    pub already_parked: u64,
    pub unparked: u64,
    pub unpark_rejected: u64,
    pub located: u64,
    pub not_found: u64,
    pub elapsed_ms: u128,
    pub findings: Vec<AuditFinding>,
}

impl SimulationReport {
    fn merge(&mut self, other: &SimulationReport) {
        self.parked += other.parked;
        self.lot_full += other.lot_full;
        self.already_parked += other.already_parked;
        self.unparked += other.unparked;
        self.unpark_rejected += other.unpark_rejected;
        self.located += other.located;
        self.not_found += other.not_found;
    }

    pub fn total_operations(&self) -> u64 {
        self.parked
            + self.lot_full
            + self.already_parked
            + self.unparked
            + self.unpark_rejected
            + self.located
            + self.not_found
    }
}

fn record_park(report: &mut SimulationReport, result: &Result<String, AllocationError>) {
    match result {
        Ok(_) => report.parked += 1,
        Err(AllocationError::AlreadyParked { .. }) => report.already_parked += 1,
        Err(_) => report.lot_full += 1,
    }
}

fn worker(engine: &ParkingEngine, id: usize, operations: usize) -> SimulationReport {
    let mut rng = rand::thread_rng();
    let mut report = SimulationReport::default();
    // Spots this worker believes its own vehicles hold.
    let mut held: HashMap<String, String> = HashMap::new();

    for _ in 0..operations {
        let class = VehicleClass::ALL[rng.gen_range(0..VehicleClass::ALL.len())];
        match rng.gen_range(0..10) {
            0..=3 => {
                let vehicle = format!("W{}-V{}", id, rng.gen_range(0..OWN_VEHICLES));
                let result = engine.park(class, &vehicle);
                record_park(&mut report, &result);
                if let Ok(key) = result {
                    held.insert(vehicle, key);
                }
            }
            4 => {
                let vehicle = format!("SHARED-{}", rng.gen_range(0..SHARED_VEHICLES));
                let result = engine.park(class, &vehicle);
                record_park(&mut report, &result);
            }
            5..=7 => {
                let Some((vehicle, key)) = held.iter().next().map(|(v, k)| (v.clone(), k.clone()))
                else {
                    continue;
                };
                held.remove(&vehicle);
                match engine.unpark(&key, &vehicle) {
                    Ok(()) => report.unparked += 1,
                    Err(_) => report.unpark_rejected += 1,
                }
            }
            8 => {
                // Shared vehicles race: the spot may move between search and unpark.
                let vehicle = format!("SHARED-{}", rng.gen_range(0..SHARED_VEHICLES));
                let result = engine
                    .search_vehicle(&vehicle)
                    .and_then(|key| engine.unpark(&key, &vehicle));
                match result {
                    Ok(()) => report.unparked += 1,
                    Err(_) => report.unpark_rejected += 1,
                }
            }
            _ => {
                let vehicle = format!("W{}-V{}", id, rng.gen_range(0..OWN_VEHICLES));
                match engine.search_vehicle(&vehicle) {
                    Ok(_) => report.located += 1,
                    Err(_) => report.not_found += 1,
                }
            }
        }
    }
    report
}

/// Drive `engine` from `workers` threads, then audit it.
pub fn simulate(engine: &ParkingEngine, workers: usize, operations_per_worker: usize) -> SimulationReport {
    let workers = workers.max(1);
    let start = Instant::now();

    let partials: Vec<SimulationReport> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|id| scope.spawn(move || worker(engine, id, operations_per_worker)))
            .collect();
        handles
            .into_iter()
            .filter_map(|handle| handle.join().ok())
            .collect()
    });

    let mut report = SimulationReport {
        workers,
        ..SimulationReport::default()
    };
    for partial in &partials {
        report.merge(partial);
    }
    report.elapsed_ms = start.elapsed().as_millis();
    report.findings = engine.audit();
    report
}

fn print_report(report: &SimulationReport) {
    println!("Workers:          {}", report.workers);
    println!("Operations:       {}", report.total_operations());
    println!("Parked:           {}", report.parked);
    println!("Lot full:         {}", report.lot_full);
    println!("Already parked:   {}", report.already_parked);
    println!("Unparked:         {}", report.unparked);
    println!("Unpark rejected:  {}", report.unpark_rejected);
    println!("Located:          {}", report.located);
    println!("Not found:        {}", report.not_found);
    println!("Elapsed:          {} ms", report.elapsed_ms);
    if report.findings.is_empty() {
        println!("Audit:            consistent");
    } else {
        println!("Audit:            {} finding(s)", report.findings.len());
        for finding in &report.findings {
            println!("  - {}", finding);
        }
    }
}

/// Run the simulation from configuration. Exit code 1 when the audit fails.
pub fn run_simulate(config: &EnvConfig, json_output: bool) -> i32 {
    let engine = match crate::engine_from_config(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Invalid layout: {}", e);
            return super::EXIT_CONFIG_ERROR;
        }
    };
    let operations_per_worker = config.simulation.operations_per_worker;
    let workers = config.simulation.effective_workers();

    info!(workers, operations_per_worker, "starting simulation");
    let report = simulate(&engine, workers, operations_per_worker);

    if json_output {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                return 1;
            }
        }
    } else {
        print_report(&report);
    }

    if report.findings.is_empty() {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LayoutTemplate;

    #[test]
    fn test_simulation_leaves_engine_consistent() {
        let template = LayoutTemplate::new([["B-1", "M-1", "A-1"], ["A-1", "X-1", "M-0"]]);
        let engine = ParkingEngine::with_layout(2, 2, 3, &template).unwrap();

        let report = simulate(&engine, 4, 200);

        assert_eq!(report.workers, 4);
        // Unpark draws with nothing held are skipped and not counted.
        assert!(report.total_operations() <= 800);
        assert!(report.parked > 0);
        assert!(report.findings.is_empty(), "{:?}", report.findings);
    }
}
