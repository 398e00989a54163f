//! Prometheus metrics and structured logging for the pulse dashboard.
//!
//! - Prometheus metrics for stream health, reconciliation and alerts
//! - Structured logging with tracing (JSON in production, pretty otherwise)

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, init_logging_with};
pub use metrics::Metrics;
