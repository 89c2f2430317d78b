//! # ELBv2 Operations
//!
//! `RegisterTargets`, `DeregisterTargets` and `DescribeTargetHealth`, each in
//! its own span with provider metrics.

use crate::observability::metrics;
use crate::provider::aws::errors::from_sdk_error;
use crate::provider::{ProviderError, RegisteredTarget, TargetHealthState};
use crate::resource::{AttributeValue, Member, TargetGroupArn};
use aws_sdk_elasticloadbalancingv2::types::{TargetDescription, TargetHealthDescription};
use aws_sdk_elasticloadbalancingv2::Client as Elbv2Client;
use std::time::Instant;
use tracing::{debug, debug_span, field, info, info_span, Instrument, Span};

const PROVIDER: &str = "aws";

pub(super) async fn register_targets(
    client: &Elbv2Client,
    region: &str,
    group: &TargetGroupArn,
    members: &[Member],
) -> Result<(), ProviderError> {
    let span = info_span!(
        "elbv2.register_targets",
        target_group = %group,
        region = region,
        targets.count = members.len(),
        operation.success = field::Empty,
        operation.duration_ms = field::Empty,
        error.message = field::Empty,
    );
    let span_clone = span.clone();
    let start = Instant::now();

    async move {
        let targets = to_target_descriptions(members)?;
        info!("Registering {} target(s) with {}", targets.len(), group);
        let result = client
            .register_targets()
            .target_group_arn(group.as_str())
            .set_targets(Some(targets))
            .send()
            .await
            .map(|_| ())
            .map_err(|e| from_sdk_error(&e));

        finish(&span_clone, "register_targets", start, &result);
        result
    }
    .instrument(span)
    .await
}

pub(super) async fn deregister_targets(
    client: &Elbv2Client,
    region: &str,
    group: &TargetGroupArn,
    members: &[Member],
) -> Result<(), ProviderError> {
    let span = info_span!(
        "elbv2.deregister_targets",
        target_group = %group,
        region = region,
        targets.count = members.len(),
        operation.success = field::Empty,
        operation.duration_ms = field::Empty,
        error.message = field::Empty,
    );
    let span_clone = span.clone();
    let start = Instant::now();

    async move {
        let targets = to_target_descriptions(members)?;
        info!("Deregistering {} target(s) from {}", targets.len(), group);
        let result = client
            .deregister_targets()
            .target_group_arn(group.as_str())
            .set_targets(Some(targets))
            .send()
            .await
            .map(|_| ())
            .map_err(|e| from_sdk_error(&e));

        finish(&span_clone, "deregister_targets", start, &result);
        result
    }
    .instrument(span)
    .await
}

pub(super) async fn describe_target_health(
    client: &Elbv2Client,
    region: &str,
    group: &TargetGroupArn,
    scope: &[Member],
) -> Result<Option<Vec<RegisteredTarget>>, ProviderError> {
    let span = debug_span!(
        "elbv2.describe_target_health",
        target_group = %group,
        region = region,
        targets.count = scope.len(),
        operation.success = field::Empty,
        operation.duration_ms = field::Empty,
        error.message = field::Empty,
    );
    let span_clone = span.clone();
    let start = Instant::now();

    async move {
        let targets = if scope.is_empty() {
            None
        } else {
            Some(to_target_descriptions(scope)?)
        };

        let result = client
            .describe_target_health()
            .target_group_arn(group.as_str())
            .set_targets(targets)
            .send()
            .await
            .map(|output| {
                output.target_health_descriptions.map(|descriptions| {
                    descriptions
                        .iter()
                        .filter_map(from_health_description)
                        .collect::<Vec<_>>()
                })
            })
            .map_err(|e| from_sdk_error(&e));

        finish(&span_clone, "describe_target_health", start, &result);
        if let Ok(Some(described)) = &result {
            debug!("Described {} target(s) in {}", described.len(), group);
        }
        result
    }
    .instrument(span)
    .await
}

/// Record outcome on the span and in provider metrics
fn finish<T>(span: &Span, call: &str, start: Instant, result: &Result<T, ProviderError>) {
    span.record("operation.duration_ms", start.elapsed().as_millis() as u64);
    match result {
        Ok(_) => {
            span.record("operation.success", true);
            metrics::record_provider_operation(PROVIDER, call, start.elapsed().as_secs_f64());
        }
        Err(e) => {
            span.record("operation.success", false);
            span.record("error.message", field::display(e));
            metrics::increment_provider_operation_errors(PROVIDER);
        }
    }
}

fn to_target_descriptions(members: &[Member]) -> Result<Vec<TargetDescription>, ProviderError> {
    members.iter().map(to_target_description).collect()
}

fn to_target_description(member: &Member) -> Result<TargetDescription, ProviderError> {
    let port = match member.port.known() {
        Some(port) => Some(i32::try_from(*port).map_err(|e| ProviderError::Api {
            code: "ValidationError".to_string(),
            message: format!("port {port} of target {}: {e}", member.target_id),
        })?),
        None => None,
    };

    Ok(TargetDescription::builder()
        .id(&member.target_id)
        .set_port(port)
        .set_availability_zone(member.availability_zone.known().cloned())
        .build())
}

fn from_health_description(description: &TargetHealthDescription) -> Option<RegisteredTarget> {
    let target = description.target()?;
    let member = Member {
        target_id: target.id()?.to_string(),
        availability_zone: AttributeValue::optional(
            target.availability_zone().map(ToString::to_string),
        ),
        port: AttributeValue::optional(target.port().map(i64::from)),
    };

    let mut registered = RegisteredTarget::new(member);
    if let Some(health) = description.target_health() {
        registered.state = health
            .state()
            .and_then(|state| TargetHealthState::from_wire(state.as_str()));
        registered.reason = health.reason().map(|reason| reason.as_str().to_string());
    }
    Some(registered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_elasticloadbalancingv2::types::{
        TargetHealth, TargetHealthReasonEnum, TargetHealthStateEnum,
    };

    #[test]
    fn test_to_target_description_omits_unset_attributes() {
        let pending = to_target_description(&Member::new("i-1").with_unknown_port()).unwrap();
        assert_eq!(pending.id(), Some("i-1"));
        assert_eq!(pending.port(), None);
        assert_eq!(pending.availability_zone(), None);

        let explicit = to_target_description(
            &Member::new("10.0.0.1")
                .with_port(8080)
                .with_availability_zone("all"),
        )
        .unwrap();
        assert_eq!(explicit.port(), Some(8080));
        assert_eq!(explicit.availability_zone(), Some("all"));
    }

    #[test]
    fn test_from_health_description_maps_health() {
        let description = TargetHealthDescription::builder()
            .target(
                TargetDescription::builder()
                    .id("i-1")
                    .port(80)
                    .build(),
            )
            .target_health(
                TargetHealth::builder()
                    .state(TargetHealthStateEnum::from("unused"))
                    .reason(TargetHealthReasonEnum::from("Target.NotRegistered"))
                    .build(),
            )
            .build();

        let registered = from_health_description(&description).unwrap();
        assert_eq!(registered.member, Member::new("i-1").with_port(80));
        assert_eq!(registered.state, Some(TargetHealthState::Unused));
        assert_eq!(registered.reason.as_deref(), Some("Target.NotRegistered"));
    }

    #[test]
    fn test_from_health_description_without_target() {
        let description = TargetHealthDescription::builder().build();
        assert!(from_health_description(&description).is_none());
    }

    #[test]
    fn test_from_health_description_without_target_id() {
        let description = TargetHealthDescription::builder()
            .target(TargetDescription::builder().port(80).build())
            .build();
        assert!(from_health_description(&description).is_none());
    }
}
