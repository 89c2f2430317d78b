//! # Desired State
//!
//! Configuration supplied by the orchestrator, and its validation. Validation
//! runs before any remote call is made.

use crate::constants::{MAX_PORT, MIN_PORT};
use crate::resource::attribute::AttributeValue;
use crate::resource::group::TargetGroupArn;
use crate::resource::member::{Member, MembershipSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired registration of targets with a target group
///
/// # Example
///
/// ```yaml
/// target_group_arn: arn:aws:elasticloadbalancing:us-west-2:123456789012:targetgroup/web/73e2d6bc24d8a067
/// target:
///   - target_id: i-0123456789abcdef0
///   - target_id: 10.0.1.15
///     availability_zone: us-west-2a
///     port: 8080
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RegistrationSpec {
    /// ARN of the target group. Changing it forces a new registration.
    pub target_group_arn: String,
    /// Targets to register. Unordered; each `target_id` may appear once.
    #[serde(default, rename = "target", alias = "targets")]
    pub targets: Vec<TargetSpec>,
}

/// A target to register
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TargetSpec {
    /// Instance ID, IP address, Lambda ARN or ALB ARN
    pub target_id: String,
    /// Availability zone, or `all` for IP targets outside the target group's VPC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    /// Port the target listens on. Defaults to the target group's port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
}

impl TargetSpec {
    pub fn new(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            availability_zone: None,
            port: None,
        }
    }

    /// Member as planned from configuration; an unset port is pending assignment
    #[must_use]
    pub fn to_member(&self) -> Member {
        Member {
            target_id: self.target_id.trim().to_string(),
            availability_zone: AttributeValue::optional(self.availability_zone.clone()),
            port: AttributeValue::computed(self.port),
        }
    }
}

/// Malformed desired state
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Desired state that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSpec {
    pub group: TargetGroupArn,
    pub members: MembershipSet,
}

impl RegistrationSpec {
    pub fn new(target_group_arn: impl Into<String>, targets: Vec<TargetSpec>) -> Self {
        Self {
            target_group_arn: target_group_arn.into(),
            targets,
        }
    }

    /// Validate shape and build the planned membership
    pub fn validate(&self, max_targets: usize) -> Result<ValidatedSpec, ValidationError> {
        let group = TargetGroupArn::parse(&self.target_group_arn)
            .map_err(|e| ValidationError::new("target_group_arn", e.to_string()))?;

        if self.targets.len() > max_targets {
            return Err(ValidationError::new(
                "target",
                format!(
                    "{} targets exceed the limit of {max_targets} per registration",
                    self.targets.len()
                ),
            ));
        }

        let mut members = MembershipSet::new();
        for (index, target) in self.targets.iter().enumerate() {
            validate_target(index, target)?;
            let member = target.to_member();
            if members.contains(member.id()) {
                return Err(ValidationError::new(
                    format!("target[{index}].target_id"),
                    format!("duplicate target_id {:?}", member.target_id),
                ));
            }
            members.insert(member);
        }

        Ok(ValidatedSpec { group, members })
    }
}

fn validate_target(index: usize, target: &TargetSpec) -> Result<(), ValidationError> {
    if target.target_id.trim().is_empty() {
        return Err(ValidationError::new(
            format!("target[{index}].target_id"),
            "target_id is required",
        ));
    }

    if let Some(port) = target.port {
        if !(MIN_PORT..=MAX_PORT).contains(&port) {
            return Err(ValidationError::new(
                format!("target[{index}].port"),
                format!("port {port} is outside {MIN_PORT}-{MAX_PORT}"),
            ));
        }
    }

    if let Some(zone) = &target.availability_zone {
        if zone.trim().is_empty() {
            return Err(ValidationError::new(
                format!("target[{index}].availability_zone"),
                "availability_zone must not be empty when set",
            ));
        }
    }

    Ok(())
}
