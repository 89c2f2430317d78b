//! # Provider Modules
//!
//! Interfaces to the remote target registry and their implementations.
//!
//! The reconciler consumes two traits:
//! - `MembershipMutator` registers and deregisters targets
//! - `MembershipQuery` describes the currently registered targets
//!
//! Both report a missing target group as `ProviderError::GroupNotFound` so the
//! reconciler can treat it as "already absent".

use crate::resource::{Member, TargetGroupArn};
use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The target group does not exist
    #[error("target group not found: {message}")]
    GroupNotFound { message: String },
    /// Client error expected to resolve on its own (e.g. a target not yet visible)
    #[error("{code}: {message}")]
    TransientClient { code: String, message: String },
    /// Any other error returned by the registry
    #[error("{code}: {message}")]
    Api { code: String, message: String },
    /// The request did not produce a service response
    #[error("request failed: {0}")]
    Transport(String),
}

impl ProviderError {
    #[must_use]
    pub fn is_group_not_found(&self) -> bool {
        matches!(self, Self::GroupNotFound { .. })
    }

    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientClient { .. })
    }
}

/// Health state reported for a described target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetHealthState {
    Initial,
    Healthy,
    Unhealthy,
    UnhealthyDraining,
    Unused,
    Draining,
    Unavailable,
}

impl TargetHealthState {
    /// Parse the registry's wire value
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "initial" => Some(Self::Initial),
            "healthy" => Some(Self::Healthy),
            "unhealthy" => Some(Self::Unhealthy),
            "unhealthy.draining" => Some(Self::UnhealthyDraining),
            "unused" => Some(Self::Unused),
            "draining" => Some(Self::Draining),
            "unavailable" => Some(Self::Unavailable),
            _ => None,
        }
    }
}

/// One entry of a describe payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredTarget {
    pub member: Member,
    pub state: Option<TargetHealthState>,
    /// Reason code, e.g. `Target.NotRegistered`
    pub reason: Option<String>,
}

impl RegisteredTarget {
    #[must_use]
    pub fn new(member: Member) -> Self {
        Self {
            member,
            state: None,
            reason: None,
        }
    }

    #[must_use]
    pub fn with_health(mut self, state: TargetHealthState, reason: Option<&str>) -> Self {
        self.state = Some(state);
        self.reason = reason.map(ToString::to_string);
        self
    }
}

/// Registers and deregisters targets
#[async_trait]
pub trait MembershipMutator: Send + Sync {
    /// Provider name used in logs and metrics (e.g. "aws", "memory")
    fn name(&self) -> &'static str;

    /// Register members with the group
    async fn add_members(
        &self,
        group: &TargetGroupArn,
        members: &[Member],
    ) -> Result<(), ProviderError>;

    /// Deregister members from the group
    async fn remove_members(
        &self,
        group: &TargetGroupArn,
        members: &[Member],
    ) -> Result<(), ProviderError>;
}

/// Describes registered targets
#[async_trait]
pub trait MembershipQuery: Send + Sync {
    /// Describe targets of the group, optionally narrowed to `scope`
    ///
    /// `Ok(None)` means the registry answered without a target list, which is
    /// different from `Ok(Some(vec![]))` (a group with no targets).
    async fn describe_members(
        &self,
        group: &TargetGroupArn,
        scope: &[Member],
    ) -> Result<Option<Vec<RegisteredTarget>>, ProviderError>;
}

// Provider implementations
pub mod aws;
pub mod memory;
