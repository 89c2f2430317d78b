//! # Converge
//!
//! Drives a persisted registration to desired state: refresh the state file
//! against the load balancer, plan, then create, update or replace and
//! persist the result.

use crate::controller::reconciler::plan::{plan, Plan, PlanAction};
use crate::controller::reconciler::types::{Reconciler, ReconcilerError};
use crate::resource::store::{load_state, remove_state, save_state, StoreError};
use crate::resource::{RegistrationSpec, RegistrationState};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConvergeError {
    #[error(transparent)]
    Reconciler(#[from] ReconcilerError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of a converge run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Convergence {
    /// Plan computed against the refreshed state
    pub plan: Plan,
    /// State written to the state file
    pub state: RegistrationState,
}

impl Reconciler {
    /// Bring the registration in `state_path` to `desired`
    ///
    /// State whose target group no longer exists is dropped and the
    /// registration is created again. A changed `target_group_arn` deletes
    /// the prior registration and clears the state file before creating.
    pub async fn converge(
        &self,
        desired: &RegistrationSpec,
        state_path: &Path,
    ) -> Result<Convergence, ConvergeError> {
        let validated = desired
            .validate(self.config.max_targets_per_request)
            .map_err(ReconcilerError::from)?;

        let prior = match load_state(state_path)? {
            Some(prior) => {
                let refreshed = self.read(&prior).await?;
                if refreshed.is_none() {
                    info!("Target group {} is gone, dropping state", prior.id);
                    remove_state(state_path)?;
                }
                refreshed
            }
            None => None,
        };

        let plan = plan(&validated, prior.as_ref());
        info!(
            "Planned {} for {}: {} to add, {} to remove",
            plan.action,
            plan.planned.target_group_arn,
            plan.to_add.len(),
            plan.to_remove.len()
        );

        let state = match (plan.action, prior) {
            (PlanAction::NoOp, Some(prior)) => prior,
            (PlanAction::Update, Some(prior)) => self.update(desired, &prior).await?,
            (PlanAction::Replace, Some(prior)) => {
                self.delete(&prior).await?;
                remove_state(state_path)?;
                self.create(desired).await?
            }
            _ => self.create(desired).await?,
        };

        save_state(state_path, &state)?;
        Ok(Convergence { plan, state })
    }
}
