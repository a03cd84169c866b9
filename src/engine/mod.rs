//! Allocation engine.
//!
//! Owns the per-class free pools, the vehicle -> current spot index and the
//! vehicle -> last spot index, and serves park, unpark, availability and
//! search requests from any number of threads.

mod allocator;
mod audit;
mod error;
mod snapshot;
mod state;

pub use allocator::ParkingEngine;
pub use audit::AuditFinding;
pub use error::AllocationError;
pub use snapshot::{ClassAvailability, LotSnapshot};
