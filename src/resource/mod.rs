//! # Resource Model
//!
//! Types describing a target group registration: the desired configuration
//! supplied by the orchestrator, the members being reconciled, and the state
//! persisted between invocations.
//!
//! - `attribute`: three-state attribute values (known, unknown, null)
//! - `member`: a registered target and the membership set keyed by target ID
//! - `group`: the target group ARN that owns the membership
//! - `spec`: desired-state input and its validation
//! - `state`: persisted state
//! - `store`: JSON state document on disk

pub mod attribute;
pub mod group;
pub mod member;
pub mod spec;
pub mod state;
pub mod store;

pub use attribute::AttributeValue;
pub use group::TargetGroupArn;
pub use member::{DuplicateMember, Member, MembershipSet};
pub use spec::{RegistrationSpec, TargetSpec, ValidatedSpec, ValidationError};
pub use state::RegistrationState;
