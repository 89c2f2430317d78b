//! # Persisted State
//!
//! State stored between invocations. The state is a cache of the registry's
//! membership and is refreshed by every read.

use crate::resource::group::TargetGroupArn;
use crate::resource::member::MembershipSet;
use serde::{Deserialize, Serialize};

/// Persisted state of one registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationState {
    /// Always equal to `target_group_arn`
    pub id: String,
    pub target_group_arn: TargetGroupArn,
    /// Last observed membership
    #[serde(default, rename = "target")]
    pub targets: MembershipSet,
}

impl RegistrationState {
    #[must_use]
    pub fn new(group: TargetGroupArn, targets: MembershipSet) -> Self {
        Self {
            id: group.to_string(),
            target_group_arn: group,
            targets,
        }
    }

    /// State derived from an identifier alone, before the first read
    #[must_use]
    pub fn from_identifier(group: TargetGroupArn) -> Self {
        Self::new(group, MembershipSet::new())
    }

    #[must_use]
    pub fn group(&self) -> &TargetGroupArn {
        &self.target_group_arn
    }
}
