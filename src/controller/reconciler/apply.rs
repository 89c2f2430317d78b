//! # Apply
//!
//! Applies a membership diff: deregister first, then register. A group that
//! disappears during the deregister step leaves nothing to do.

use crate::controller::reconciler::types::{Action, Reconciler, ReconcilerError};
use crate::observability::metrics;
use crate::resource::{Member, TargetGroupArn};
use tracing::{debug, info, warn};

/// Result of applying a diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Every mutation was accepted
    Applied,
    /// The target group no longer exists; the add step was skipped
    GroupGone,
}

impl Reconciler {
    /// Deregister `to_remove`, then register `to_add`
    ///
    /// Failures other than a missing group abort before the add step.
    pub async fn apply(
        &self,
        action: Action,
        group: &TargetGroupArn,
        to_remove: &[Member],
        to_add: &[Member],
    ) -> Result<ApplyOutcome, ReconcilerError> {
        if !to_remove.is_empty() {
            match self.mutator.remove_members(group, to_remove).await {
                Ok(()) => {
                    info!("Deregistered {} target(s) from {group}", to_remove.len());
                    metrics::increment_targets_deregistered(to_remove.len());
                }
                Err(e) if e.is_group_not_found() => {
                    warn!("Target group {group} not found while deregistering, nothing left to apply");
                    return Ok(ApplyOutcome::GroupGone);
                }
                Err(source) => {
                    return Err(ReconcilerError::Remote {
                        action,
                        group: group.clone(),
                        source,
                    })
                }
            }
        }

        if to_add.is_empty() {
            debug!("No targets to register with {group}");
            return Ok(ApplyOutcome::Applied);
        }

        self.mutator
            .add_members(group, to_add)
            .await
            .map_err(|source| ReconcilerError::Remote {
                action,
                group: group.clone(),
                source,
            })?;
        info!("Registered {} target(s) with {group}", to_add.len());
        metrics::increment_targets_registered(to_add.len());

        Ok(ApplyOutcome::Applied)
    }
}
