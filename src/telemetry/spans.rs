//! Span utilities for engine operations.

use tracing::{debug_span, Span};

/// Extension trait for recording an operation's outcome on its span.
pub trait SpanExt {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }
}

/// Factory for standardized operation spans.
///
/// Fields:
/// - `op`: operation name (`park`, `unpark`, `search`, `available`)
/// - `vehicle_id`: vehicle the call concerns, empty for `available`
/// - `target`: requested class for `park`/`available`, spot key for `unpark`,
///   empty for `search`
/// - `status`, `error.message`: filled by [`SpanExt::record_result`]
pub struct OperationSpan;

impl OperationSpan {
    pub fn new(op: &'static str, vehicle_id: &str, target: &str) -> Span {
        debug_span!(
            "lot_operation",
            op,
            vehicle_id = %vehicle_id,
            target = %target,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    }
}
