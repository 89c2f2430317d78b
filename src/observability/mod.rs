//! # Observability
//!
//! Observability modules for metrics and logging.
//!
//! - `metrics`: Prometheus metrics collection
//! - `logging`: tracing subscriber initialisation

pub mod logging;
pub mod metrics;

// Re-export for convenience
pub use logging::*;
pub use metrics::*;
