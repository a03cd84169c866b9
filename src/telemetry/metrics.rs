//! Metrics facade hooks.
//!
//! Recording is a no-op unless the host process installs a `metrics` recorder.

use crate::grid::VehicleClass;

/// Record the outcome of a park attempt. `outcome` is "ok" or an error kind.
pub fn record_park(class: VehicleClass, outcome: &'static str) {
    metrics::counter!(
        "park_core_park_total",
        "class" => class.name(),
        "outcome" => outcome,
    )
    .increment(1);
}

/// Record the outcome of an unpark attempt.
pub fn record_unpark(outcome: &'static str) {
    metrics::counter!("park_core_unpark_total", "outcome" => outcome).increment(1);
}

/// Publish the current free-pool size for a class.
pub fn record_free_spots(class: VehicleClass, free: usize) {
    metrics::gauge!("park_core_free_spots", "class" => class.name()).set(free as f64);
}
