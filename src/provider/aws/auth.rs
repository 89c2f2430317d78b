//! # ELBv2 Authentication
//!
//! Builds the AWS SDK configuration from an explicit `ClientContext`.

use crate::provider::aws::ClientContext;
use aws_config::SdkConfig;
use tracing::info;

/// Create AWS SDK config using the default credential chain
///
/// Region, profile and endpoint come from the context when set; otherwise the
/// SDK resolves them from the environment and shared config files.
pub async fn create_sdk_config(context: &ClientContext) -> SdkConfig {
    let mut builder = aws_config::defaults(aws_config::BehaviorVersion::latest());

    if let Some(region) = &context.region {
        builder = builder.region(aws_config::Region::new(region.clone()));
    }
    if let Some(profile) = &context.profile {
        info!("Using AWS profile: {}", profile);
        builder = builder.profile_name(profile);
    }
    // Used for local emulators (e.g. LocalStack)
    if let Some(endpoint) = &context.endpoint_url {
        info!("Using ELBv2 endpoint override: {}", endpoint);
        builder = builder.endpoint_url(endpoint);
    }

    builder.load().await
}
