//! # ELBv2 Target Registry
//!
//! Target registration against Elastic Load Balancing v2.
//!
//! This module provides functionality to:
//! - Register and deregister targets with a target group
//! - Describe registered targets and their health
//! - Map service error codes to `ProviderError` kinds
//!
//! Connection settings come from an explicit `ClientContext` passed to the
//! constructor.

mod auth;
pub mod errors;
mod operations;

use crate::provider::{MembershipMutator, MembershipQuery, ProviderError, RegisteredTarget};
use crate::resource::{Member, TargetGroupArn};
use async_trait::async_trait;
use aws_sdk_elasticloadbalancingv2::Client as Elbv2Client;

pub use errors::classify_error;

/// Provider-wide connection settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    pub region: Option<String>,
    pub profile: Option<String>,
    /// Endpoint override for local emulators
    pub endpoint_url: Option<String>,
}

impl ClientContext {
    /// Load from `AWS_REGION`, `AWS_PROFILE` and `AWS_ENDPOINT_URL_ELASTIC_LOAD_BALANCING_V2`
    #[must_use]
    pub fn from_env() -> Self {
        let var = |key: &str| std::env::var(key).ok().filter(|v| !v.is_empty());
        Self {
            region: var("AWS_REGION"),
            profile: var("AWS_PROFILE"),
            endpoint_url: var("AWS_ENDPOINT_URL_ELASTIC_LOAD_BALANCING_V2"),
        }
    }

    /// Overlay explicitly provided settings
    #[must_use]
    pub fn with_overrides(
        mut self,
        region: Option<String>,
        profile: Option<String>,
        endpoint_url: Option<String>,
    ) -> Self {
        self.region = region.or(self.region);
        self.profile = profile.or(self.profile);
        self.endpoint_url = endpoint_url.or(self.endpoint_url);
        self
    }
}

/// ELBv2 registry implementation
pub struct Elbv2Registry {
    client: Elbv2Client,
    region: String,
}

impl std::fmt::Debug for Elbv2Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Elbv2Registry")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl Elbv2Registry {
    /// Create a new ELBv2 client from the given context
    pub async fn new(context: &ClientContext) -> Self {
        let sdk_config = auth::create_sdk_config(context).await;
        let region = sdk_config
            .region()
            .map_or_else(|| "unset".to_string(), ToString::to_string);

        Self {
            client: Elbv2Client::new(&sdk_config),
            region,
        }
    }

    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl MembershipMutator for Elbv2Registry {
    fn name(&self) -> &'static str {
        "aws"
    }

    async fn add_members(
        &self,
        group: &TargetGroupArn,
        members: &[Member],
    ) -> Result<(), ProviderError> {
        operations::register_targets(&self.client, &self.region, group, members).await
    }

    async fn remove_members(
        &self,
        group: &TargetGroupArn,
        members: &[Member],
    ) -> Result<(), ProviderError> {
        operations::deregister_targets(&self.client, &self.region, group, members).await
    }
}

#[async_trait]
impl MembershipQuery for Elbv2Registry {
    async fn describe_members(
        &self,
        group: &TargetGroupArn,
        scope: &[Member],
    ) -> Result<Option<Vec<RegisteredTarget>>, ProviderError> {
        operations::describe_target_health(&self.client, &self.region, group, scope).await
    }
}
