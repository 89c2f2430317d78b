//! Common fixtures for reconciler integration tests
//!
//! Builds a reconciler wired to an in-memory registry with a target group
//! already created.

#![allow(dead_code, reason = "each test binary uses a different subset of fixtures")]

use std::sync::Arc;
use target_group_registration::config::ReconcilerConfig;
use target_group_registration::controller::reconciler::Reconciler;
use target_group_registration::provider::memory::{InMemoryRegistry, RegistryCall};
use target_group_registration::provider::ProviderError;
use target_group_registration::resource::{RegistrationSpec, TargetGroupArn, TargetSpec};

pub const GROUP_ARN: &str =
    "arn:aws:elasticloadbalancing:us-west-2:123456789012:targetgroup/web/73e2d6bc24d8a067";
pub const OTHER_GROUP_ARN: &str =
    "arn:aws:elasticloadbalancing:us-west-2:123456789012:targetgroup/api/0123456789abcdef";

pub fn group() -> TargetGroupArn {
    TargetGroupArn::parse(GROUP_ARN).expect("fixture ARN is valid")
}

pub fn other_group() -> TargetGroupArn {
    TargetGroupArn::parse(OTHER_GROUP_ARN).expect("fixture ARN is valid")
}

/// Short retry budget so paused-clock tests stay readable
pub fn test_config() -> ReconcilerConfig {
    ReconcilerConfig {
        create_retry_timeout_secs: 10,
        backoff_start_ms: 1000,
        backoff_max_ms: 30_000,
        ..ReconcilerConfig::default()
    }
}

/// Registry with `GROUP_ARN` created, and a reconciler using it
pub fn harness() -> (Arc<InMemoryRegistry>, Reconciler) {
    harness_with_config(test_config())
}

pub fn harness_with_config(config: ReconcilerConfig) -> (Arc<InMemoryRegistry>, Reconciler) {
    let registry = Arc::new(InMemoryRegistry::new());
    registry.create_group(&group());
    let reconciler = Reconciler::new(registry.clone(), registry.clone(), config);
    (registry, reconciler)
}

/// Desired state for `GROUP_ARN` with the given target IDs and no ports
pub fn spec(ids: &[&str]) -> RegistrationSpec {
    RegistrationSpec::new(GROUP_ARN, ids.iter().map(|id| TargetSpec::new(*id)).collect())
}

pub fn transient() -> ProviderError {
    ProviderError::TransientClient {
        code: "InvalidTarget".to_string(),
        message: "The following targets are not in a running state".to_string(),
    }
}

pub fn api_error() -> ProviderError {
    ProviderError::Api {
        code: "AccessDenied".to_string(),
        message: "User is not authorized to perform this action".to_string(),
    }
}

pub fn group_not_found() -> ProviderError {
    ProviderError::GroupNotFound {
        message: "One or more target groups not found".to_string(),
    }
}

pub fn add_calls(calls: &[RegistryCall]) -> usize {
    calls
        .iter()
        .filter(|call| matches!(call, RegistryCall::Add(_)))
        .count()
}

pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}
