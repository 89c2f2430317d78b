//! # Create Retry
//!
//! Registering targets right after they are launched can fail with a client
//! error until the load balancer sees them. The initial add during create is
//! retried on those errors with Fibonacci backoff, bounded by
//! `ReconcilerConfig::create_retry_timeout`. Everything else fails fast.

use crate::controller::backoff::FibonacciBackoff;
use crate::controller::reconciler::types::{Action, Reconciler, ReconcilerError};
use crate::observability::metrics;
use crate::resource::{Member, TargetGroupArn};
use tokio::time::Instant;
use tracing::{info, warn};

impl Reconciler {
    /// Register `members`, retrying transient client errors until the budget runs out
    pub(crate) async fn add_with_retry(
        &self,
        group: &TargetGroupArn,
        members: &[Member],
    ) -> Result<(), ReconcilerError> {
        let started = Instant::now();
        let deadline = started + self.config.create_retry_timeout();
        let mut backoff = FibonacciBackoff::new(
            self.config.backoff_start_duration(),
            self.config.backoff_max_duration(),
        );
        let mut attempt: u32 = 1;

        loop {
            let source = match self.mutator.add_members(group, members).await {
                Ok(()) => {
                    info!(
                        "Registered {} target(s) with {group} (attempt {attempt})",
                        members.len()
                    );
                    metrics::increment_targets_registered(members.len());
                    return Ok(());
                }
                Err(e) if e.is_transient() => e,
                Err(source) => {
                    return Err(ReconcilerError::Remote {
                        action: Action::Creating,
                        group: group.clone(),
                        source,
                    })
                }
            };

            let now = Instant::now();
            if now >= deadline {
                return Err(ReconcilerError::RetryExhausted {
                    group: group.clone(),
                    elapsed: now.duration_since(started),
                    source,
                });
            }

            let delay = backoff.next_backoff().min(deadline - now);
            warn!(
                "Registering targets with {group} failed with {source} (attempt {attempt}), retrying in {delay:?}"
            );
            metrics::increment_create_retries();
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
