//! Telemetry for the allocation engine.
//!
//! Structured logging, per-operation spans and metrics facade hooks.

mod logging;
mod metrics;
mod spans;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use metrics::{record_free_spots, record_park, record_unpark};
pub use spans::{OperationSpan, SpanExt};
