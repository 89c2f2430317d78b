//! # Constants
//!
//! Shared constants used throughout the reconciler.
//!
//! These values represent reasonable defaults and can be overridden via
//! configuration or environment variables where applicable.

/// Resource type name as declared to the orchestrator
pub const RESOURCE_TYPE_NAME: &str = "aws_lb_target_group_registration";

/// Human-readable resource name used in error messages
pub const RESOURCE_DISPLAY_NAME: &str = "Target Group Registration";

/// Service name prefixed to error messages
pub const SERVICE_NAME: &str = "ELBv2";

/// Default budget for retrying transient client errors on the initial add (seconds)
/// Newly launched targets take a few minutes to become visible to the registry
pub const DEFAULT_CREATE_RETRY_TIMEOUT_SECS: u64 = 240;

/// Default retry backoff starting value (milliseconds)
pub const DEFAULT_BACKOFF_START_MS: u64 = 1000;

/// Default retry backoff maximum value (milliseconds)
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 30_000;

/// Maximum number of targets accepted in a single register/deregister request
pub const DEFAULT_MAX_TARGETS_PER_REQUEST: usize = 500;

/// Lowest valid target port
pub const MIN_PORT: i64 = 1;

/// Highest valid target port
pub const MAX_PORT: i64 = 65_535;

/// Remote error code reported when the target group does not exist
pub const ERR_CODE_TARGET_GROUP_NOT_FOUND: &str = "TargetGroupNotFound";

/// Remote error codes treated as transient client errors on the initial add
pub const TRANSIENT_CLIENT_ERROR_CODES: &[&str] = &["InvalidTarget"];

/// Health reason reported for a target that is described but not registered
pub const HEALTH_REASON_NOT_REGISTERED: &str = "Target.NotRegistered";

/// Current version of the persisted state document
pub const STATE_FORMAT_VERSION: u32 = 1;

/// Default path of the persisted state document
pub const DEFAULT_STATE_FILE: &str = "registration.tfstate.json";
