//! # Types
//!
//! Core types for the reconciler.

use crate::config::ReconcilerConfig;
use crate::provider::{MembershipMutator, MembershipQuery, ProviderError};
use crate::resource::{TargetGroupArn, ValidationError};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Lifecycle action, used in error messages, spans and metric labels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Creating,
    Reading,
    Updating,
    Deleting,
    Importing,
}

impl Action {
    /// Metric label for the action
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Action::Creating => "create",
            Action::Reading => "read",
            Action::Updating => "update",
            Action::Deleting => "delete",
            Action::Importing => "import",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Creating => "creating",
            Action::Reading => "reading",
            Action::Updating => "updating",
            Action::Deleting => "deleting",
            Action::Importing => "importing",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ReconcilerError {
    /// Desired state rejected before any remote call
    #[error("validating ELBv2 Target Group Registration: {0}")]
    Validation(#[from] ValidationError),

    /// The target group does not exist
    #[error("ELBv2 Target Group Registration ({group}) not found")]
    NotFound { group: TargetGroupArn },

    /// The describe call answered without a target list
    #[error("{action} ELBv2 Target Group Registration ({group}): empty result")]
    EmptyResult {
        action: Action,
        group: TargetGroupArn,
    },

    #[error("{action} ELBv2 Target Group Registration ({group}): {source}")]
    Remote {
        action: Action,
        group: TargetGroupArn,
        #[source]
        source: ProviderError,
    },

    /// Transient client errors outlasted the create retry budget
    #[error(
        "creating ELBv2 Target Group Registration ({group}): still failing after {elapsed:?}: {source}"
    )]
    RetryExhausted {
        group: TargetGroupArn,
        elapsed: Duration,
        #[source]
        source: ProviderError,
    },

    /// `target_group_arn` changed; the registration must be destroyed and created again
    #[error(
        "updating ELBv2 Target Group Registration ({from}): changing target_group_arn to {to} requires replacement"
    )]
    RequiresReplacement {
        from: TargetGroupArn,
        to: TargetGroupArn,
    },

    /// Persisted state is inconsistent
    #[error("invalid ELBv2 Target Group Registration state: {0}")]
    State(String),
}

impl ReconcilerError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Set reconciler for one kind of registration
///
/// Collaborators are injected at construction; the reconciler holds no
/// state between lifecycle calls.
#[derive(Clone)]
pub struct Reconciler {
    pub(crate) mutator: Arc<dyn MembershipMutator>,
    pub(crate) query: Arc<dyn MembershipQuery>,
    pub(crate) config: ReconcilerConfig,
}

impl fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("provider", &self.mutator.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    #[must_use]
    pub fn new(
        mutator: Arc<dyn MembershipMutator>,
        query: Arc<dyn MembershipQuery>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            mutator,
            query,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }
}
