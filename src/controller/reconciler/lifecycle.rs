//! # Lifecycle
//!
//! Create, read, update, delete and import of a registration. Each operation
//! runs in its own span and is recorded in the operation metrics.

use crate::controller::reconciler::apply::ApplyOutcome;
use crate::controller::reconciler::plan::{plan, resolve_observed};
use crate::controller::reconciler::types::{Action, Reconciler, ReconcilerError};
use crate::observability::metrics;
use crate::resource::{
    RegistrationSpec, RegistrationState, TargetGroupArn, ValidatedSpec, ValidationError,
};
use std::future::Future;
use std::time::Instant;
use tracing::{field, info, info_span, warn, Instrument, Span};

impl Reconciler {
    /// Register every desired target and return the resulting state
    pub async fn create(
        &self,
        desired: &RegistrationSpec,
    ) -> Result<RegistrationState, ReconcilerError> {
        let validated = self.validate(desired)?;
        let span = operation_span(Action::Creating, &validated.group);

        self.observe(Action::Creating, span, async {
            let ValidatedSpec { group, members } = &validated;
            if members.is_empty() {
                info!("No targets to register with {group}");
                return Ok(RegistrationState::from_identifier(group.clone()));
            }

            let to_add = members.to_vec();
            self.add_with_retry(group, &to_add).await?;

            let observed = self.describe(Action::Creating, group, &to_add).await?;
            Ok(RegistrationState::new(
                group.clone(),
                resolve_observed(members, &observed),
            ))
        })
        .await
    }

    /// Refresh state from the registry
    ///
    /// Returns `None` when the target group no longer exists, in which case
    /// the caller drops the state.
    pub async fn read(
        &self,
        prior: &RegistrationState,
    ) -> Result<Option<RegistrationState>, ReconcilerError> {
        check_state(prior)?;
        let group = prior.group();
        let span = operation_span(Action::Reading, group);

        self.observe(Action::Reading, span, async {
            let scope = prior.targets.to_vec();
            match self.describe(Action::Reading, group, &scope).await {
                Ok(observed) => Ok(Some(RegistrationState::new(group.clone(), observed))),
                Err(e) if e.is_not_found() => {
                    warn!("Target group {group} not found, removing registration from state");
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        })
        .await
    }

    /// Move the registration from `prior` to `desired`
    ///
    /// The diff is taken against the prior observed state, so targets dropped
    /// from configuration are deregistered.
    pub async fn update(
        &self,
        desired: &RegistrationSpec,
        prior: &RegistrationState,
    ) -> Result<RegistrationState, ReconcilerError> {
        check_state(prior)?;
        let validated = self.validate(desired)?;
        if prior.group() != &validated.group {
            return Err(ReconcilerError::RequiresReplacement {
                from: prior.group().clone(),
                to: validated.group,
            });
        }
        let span = operation_span(Action::Updating, &validated.group);

        self.observe(Action::Updating, span, async {
            let plan = plan(&validated, Some(prior));
            if !plan.has_changes() {
                info!("Targets of {} already match", validated.group);
                return Ok(plan.planned);
            }

            let group = &validated.group;
            let outcome = self
                .apply(Action::Updating, group, &plan.to_remove, &plan.to_add)
                .await?;
            if outcome == ApplyOutcome::GroupGone {
                return Ok(plan.planned);
            }

            let scope = plan.planned.targets.to_vec();
            let observed = self.describe(Action::Updating, group, &scope).await?;
            Ok(RegistrationState::new(
                group.clone(),
                resolve_observed(&plan.planned.targets, &observed),
            ))
        })
        .await
    }

    /// Deregister every target held in state
    ///
    /// Succeeds when the target group is already gone, so deleting twice is fine.
    pub async fn delete(&self, prior: &RegistrationState) -> Result<(), ReconcilerError> {
        check_state(prior)?;
        let group = prior.group();
        let span = operation_span(Action::Deleting, group);

        self.observe(Action::Deleting, span, async {
            let to_remove = prior.targets.to_vec();
            let outcome = self
                .apply(Action::Deleting, group, &to_remove, &[])
                .await?;
            if outcome == ApplyOutcome::GroupGone {
                info!("Target group {group} already deleted");
            }
            Ok(())
        })
        .await
    }

    /// Adopt an existing target group's registration by its ARN
    pub async fn import(&self, identifier: &str) -> Result<RegistrationState, ReconcilerError> {
        let group = TargetGroupArn::parse(identifier.trim())
            .map_err(|e| ValidationError::new("id", e.to_string()))?;
        let span = operation_span(Action::Importing, &group);

        self.observe(Action::Importing, span, async {
            let observed = self.describe(Action::Importing, &group, &[]).await?;
            Ok(RegistrationState::new(group.clone(), observed))
        })
        .await
    }

    fn validate(&self, desired: &RegistrationSpec) -> Result<ValidatedSpec, ReconcilerError> {
        let validated = desired.validate(self.config.max_targets_per_request)?;
        Ok(validated)
    }

    /// Run `operation` inside `span`, recording duration, outcome and metrics
    async fn observe<T, F>(
        &self,
        action: Action,
        span: Span,
        operation: F,
    ) -> Result<T, ReconcilerError>
    where
        F: Future<Output = Result<T, ReconcilerError>>,
    {
        let start = Instant::now();
        metrics::increment_operations(action.operation());

        let result = operation.instrument(span.clone()).await;

        let elapsed = start.elapsed();
        metrics::observe_operation_duration(action.operation(), elapsed.as_secs_f64());
        span.record("operation.duration_ms", elapsed.as_millis() as u64);
        match &result {
            Ok(_) => {
                span.record("operation.success", true);
            }
            Err(e) => {
                span.record("operation.success", false);
                span.record("error.message", field::display(e));
                metrics::increment_operation_errors(action.operation());
            }
        }
        result
    }
}

fn operation_span(action: Action, group: &TargetGroupArn) -> Span {
    macro_rules! lifecycle_span {
        ($name:literal) => {
            info_span!(
                $name,
                target_group = %group,
                operation.success = field::Empty,
                operation.duration_ms = field::Empty,
                error.message = field::Empty,
            )
        };
    }

    match action {
        Action::Creating => lifecycle_span!("registration.create"),
        Action::Reading => lifecycle_span!("registration.read"),
        Action::Updating => lifecycle_span!("registration.update"),
        Action::Deleting => lifecycle_span!("registration.delete"),
        Action::Importing => lifecycle_span!("registration.import"),
    }
}

/// Reject state whose identifier drifted from its target group
fn check_state(state: &RegistrationState) -> Result<(), ReconcilerError> {
    if state.id != state.target_group_arn.as_str() {
        return Err(ReconcilerError::State(format!(
            "id {} does not match target_group_arn {}",
            state.id, state.target_group_arn
        )));
    }
    Ok(())
}
