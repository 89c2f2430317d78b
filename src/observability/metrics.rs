//! # Metrics
//!
//! Prometheus metrics for monitoring registrations.
//!
//! ## Metrics Exposed
//!
//! - `target_registration_operations_total` - Lifecycle operations by operation
//! - `target_registration_operation_errors_total` - Failed lifecycle operations by operation
//! - `target_registration_operation_duration_seconds` - Duration of lifecycle operations
//! - `target_registration_targets_registered_total` - Targets registered
//! - `target_registration_targets_deregistered_total` - Targets deregistered
//! - `target_registration_targets_observed` - Targets seen by the last describe
//! - `target_registration_create_retries_total` - Retries of the initial add
//! - `target_registration_provider_operations_total` - Registry calls by provider and call
//! - `target_registration_provider_operation_duration_seconds` - Duration of registry calls
//! - `target_registration_provider_operation_errors_total` - Failed registry calls by provider

use anyhow::Result;
use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, Registry, TextEncoder,
};
use std::sync::LazyLock;

// Metrics
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "target_registration_operations_total",
            "Total number of lifecycle operations by operation",
        ),
        &["operation"],
    )
    .expect("Failed to create OPERATIONS_TOTAL metric - this should never happen")
});

static OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "target_registration_operation_errors_total",
            "Total number of failed lifecycle operations by operation",
        ),
        &["operation"],
    )
    .expect("Failed to create OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "target_registration_operation_duration_seconds",
            "Duration of lifecycle operations in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 120.0, 300.0]),
        &["operation"],
    )
    .expect("Failed to create OPERATION_DURATION metric - this should never happen")
});

static TARGETS_REGISTERED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "target_registration_targets_registered_total",
        "Total number of targets registered",
    )
    .expect("Failed to create TARGETS_REGISTERED_TOTAL metric - this should never happen")
});

static TARGETS_DEREGISTERED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "target_registration_targets_deregistered_total",
        "Total number of targets deregistered",
    )
    .expect("Failed to create TARGETS_DEREGISTERED_TOTAL metric - this should never happen")
});

static TARGETS_OBSERVED: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "target_registration_targets_observed",
        "Number of registered targets seen by the last describe",
    )
    .expect("Failed to create TARGETS_OBSERVED metric - this should never happen")
});

static CREATE_RETRIES_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "target_registration_create_retries_total",
        "Total number of retries of the initial add after transient client errors",
    )
    .expect("Failed to create CREATE_RETRIES_TOTAL metric - this should never happen")
});

// Provider-specific metrics with provider label
static PROVIDER_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "target_registration_provider_operations_total",
            "Total number of registry calls by provider and call",
        ),
        &["provider", "call"],
    )
    .expect("Failed to create PROVIDER_OPERATIONS_TOTAL metric - this should never happen")
});

static PROVIDER_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "target_registration_provider_operation_duration_seconds",
            "Duration of registry calls in seconds by provider",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["provider"],
    )
    .expect("Failed to create PROVIDER_OPERATION_DURATION metric - this should never happen")
});

static PROVIDER_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "target_registration_provider_operation_errors_total",
            "Total number of failed registry calls by provider",
        ),
        &["provider"],
    )
    .expect("Failed to create PROVIDER_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

/// Register all metrics with the registry
///
/// Registering twice is not an error.
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn register_metrics() -> Result<()> {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(OPERATIONS_TOTAL.clone()),
        Box::new(OPERATION_ERRORS_TOTAL.clone()),
        Box::new(OPERATION_DURATION.clone()),
        Box::new(TARGETS_REGISTERED_TOTAL.clone()),
        Box::new(TARGETS_DEREGISTERED_TOTAL.clone()),
        Box::new(TARGETS_OBSERVED.clone()),
        Box::new(CREATE_RETRIES_TOTAL.clone()),
        Box::new(PROVIDER_OPERATIONS_TOTAL.clone()),
        Box::new(PROVIDER_OPERATION_DURATION.clone()),
        Box::new(PROVIDER_OPERATION_ERRORS_TOTAL.clone()),
    ];

    for collector in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

/// Render registered metrics in the Prometheus text exposition format
#[allow(
    clippy::missing_errors_doc,
    reason = "Error documentation is provided in doc comments"
)]
pub fn render_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

pub fn increment_operations(operation: &str) {
    OPERATIONS_TOTAL.with_label_values(&[operation]).inc();
}

pub fn increment_operation_errors(operation: &str) {
    OPERATION_ERRORS_TOTAL.with_label_values(&[operation]).inc();
}

pub fn observe_operation_duration(operation: &str, duration: f64) {
    OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(duration);
}

pub fn increment_targets_registered(count: usize) {
    TARGETS_REGISTERED_TOTAL.inc_by(count as u64);
}

pub fn increment_targets_deregistered(count: usize) {
    TARGETS_DEREGISTERED_TOTAL.inc_by(count as u64);
}

pub fn set_targets_observed(count: usize) {
    TARGETS_OBSERVED.set(i64::try_from(count).unwrap_or(i64::MAX));
}

pub fn increment_create_retries() {
    CREATE_RETRIES_TOTAL.inc();
}

/// Record a registry call
pub fn record_provider_operation(provider: &str, call: &str, duration: f64) {
    PROVIDER_OPERATIONS_TOTAL
        .with_label_values(&[provider, call])
        .inc();
    PROVIDER_OPERATION_DURATION
        .with_label_values(&[provider])
        .observe(duration);
}

pub fn increment_provider_operation_errors(provider: &str) {
    PROVIDER_OPERATION_ERRORS_TOTAL
        .with_label_values(&[provider])
        .inc();
}
