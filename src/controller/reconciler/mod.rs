//! # Reconciler
//!
//! Reconciles a target group's registered targets against desired state.
//!
//! The reconciler:
//! - Computes the identity-based difference between desired and observed targets
//! - Deregisters removed targets, then registers added targets
//! - Re-derives observed state by describing the target group
//! - Persists state only through `converge`, which owns a state file
//!
//! ## Lifecycle
//!
//! ```text
//! ABSENT  --create(D)-->  PRESENT(D)
//! PRESENT --read------->  PRESENT(remote) | ABSENT
//! PRESENT --update(D')->  PRESENT(D')
//! PRESENT --delete----->  ABSENT
//! ```

pub mod apply;
pub mod converge;
pub mod describe;
pub mod diff;
pub mod lifecycle;
pub mod plan;
pub mod retry;
pub mod types;

// Re-export public API
pub use apply::ApplyOutcome;
pub use converge::{ConvergeError, Convergence};
pub use diff::{diff, MembershipDiff};
pub use plan::{plan, Plan, PlanAction};
pub use types::{Action, Reconciler, ReconcilerError};
