//! # Describe
//!
//! Re-derives observed membership from the registry. Entries for targets that
//! are not registered, or are draining after deregistration, are not members.

use crate::constants::HEALTH_REASON_NOT_REGISTERED;
use crate::controller::reconciler::types::{Action, Reconciler, ReconcilerError};
use crate::observability::metrics;
use crate::provider::{RegisteredTarget, TargetHealthState};
use crate::resource::{Member, MembershipSet, TargetGroupArn};
use tracing::{debug, warn};

/// True when a described entry counts as a member
#[must_use]
pub fn is_member(target: &RegisteredTarget) -> bool {
    if target.reason.as_deref() == Some(HEALTH_REASON_NOT_REGISTERED) {
        return false;
    }
    !matches!(target.state, Some(TargetHealthState::Draining))
}

impl Reconciler {
    /// Describe the group's members, optionally narrowed to `scope`
    ///
    /// An absent target list is `EmptyResult`; an empty list is zero members.
    pub async fn describe(
        &self,
        action: Action,
        group: &TargetGroupArn,
        scope: &[Member],
    ) -> Result<MembershipSet, ReconcilerError> {
        let described = match self.query.describe_members(group, scope).await {
            Ok(Some(described)) => described,
            Ok(None) => {
                return Err(ReconcilerError::EmptyResult {
                    action,
                    group: group.clone(),
                })
            }
            Err(e) if e.is_group_not_found() => {
                return Err(ReconcilerError::NotFound {
                    group: group.clone(),
                })
            }
            Err(source) => {
                return Err(ReconcilerError::Remote {
                    action,
                    group: group.clone(),
                    source,
                })
            }
        };

        let mut observed = MembershipSet::new();
        for target in described {
            if !is_member(&target) {
                debug!(
                    "Skipping {} in {group} (state: {:?}, reason: {:?})",
                    target.member.target_id, target.state, target.reason
                );
                continue;
            }
            if let Some(previous) = observed.insert(target.member) {
                warn!(
                    "Target {} is registered with {group} more than once, keeping the last entry",
                    previous.target_id
                );
            }
        }

        metrics::set_targets_observed(observed.len());
        Ok(observed)
    }
}
