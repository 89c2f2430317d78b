//! Common imports for library consumers.

pub use crate::config::ReconcilerConfig;
pub use crate::controller::reconciler::{
    diff, plan, Action, ApplyOutcome, MembershipDiff, Plan, PlanAction, Reconciler,
    ReconcilerError,
};
pub use crate::provider::aws::{ClientContext, Elbv2Registry};
pub use crate::provider::memory::InMemoryRegistry;
pub use crate::provider::{MembershipMutator, MembershipQuery, ProviderError, RegisteredTarget};
pub use crate::resource::{
    AttributeValue, Member, MembershipSet, RegistrationSpec, RegistrationState, TargetGroupArn,
    TargetSpec,
};
