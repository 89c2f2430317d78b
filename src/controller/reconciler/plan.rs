//! # Plan
//!
//! Computes the action and planned state for desired state against prior
//! state, before anything is applied.
//!
//! - A port left unset in configuration keeps the value already held in
//!   prior state for the same target.
//! - Changing `target_group_arn` replaces the registration.

use crate::controller::reconciler::diff::diff;
use crate::resource::{Member, MembershipSet, RegistrationState, ValidatedSpec};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanAction {
    Create,
    Update,
    /// Destroy the prior registration, then create the desired one
    Replace,
    NoOp,
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlanAction::Create => "create",
            PlanAction::Update => "update",
            PlanAction::Replace => "replace",
            PlanAction::NoOp => "no-op",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub action: PlanAction,
    /// State expected after apply; ports may still be unknown
    pub planned: RegistrationState,
    pub to_add: Vec<Member>,
    pub to_remove: Vec<Member>,
}

impl Plan {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.action != PlanAction::NoOp
    }
}

/// Plan desired state against prior state (`None` when absent)
#[must_use]
pub fn plan(desired: &ValidatedSpec, prior: Option<&RegistrationState>) -> Plan {
    let Some(prior) = prior else {
        return Plan {
            action: PlanAction::Create,
            planned: RegistrationState::new(desired.group.clone(), desired.members.clone()),
            to_add: desired.members.to_vec(),
            to_remove: Vec::new(),
        };
    };

    if prior.group() != &desired.group {
        return Plan {
            action: PlanAction::Replace,
            planned: RegistrationState::new(desired.group.clone(), desired.members.clone()),
            to_add: desired.members.to_vec(),
            to_remove: prior.targets.to_vec(),
        };
    }

    let planned = use_state_for_unknown(&desired.members, &prior.targets);
    let changes = diff(&planned, &prior.targets);
    let action = if changes.is_empty() {
        PlanAction::NoOp
    } else {
        PlanAction::Update
    };

    Plan {
        action,
        planned: RegistrationState::new(desired.group.clone(), planned),
        to_add: changes.to_add,
        to_remove: changes.to_remove,
    }
}

/// Carry known prior ports into members whose port is still unknown
#[must_use]
pub fn use_state_for_unknown(desired: &MembershipSet, prior: &MembershipSet) -> MembershipSet {
    desired
        .iter()
        .map(|member| match prior.get(member.id()) {
            Some(previous) => Member {
                port: member.port.clone().or_prior(&previous.port),
                ..member.clone()
            },
            None => member.clone(),
        })
        .collect()
}

/// Resolve planned members against observed ones after apply
///
/// Configured attributes win; an unknown port takes the observed value.
/// Planned members the registry does not report yet keep their planned form.
#[must_use]
pub fn resolve_observed(planned: &MembershipSet, observed: &MembershipSet) -> MembershipSet {
    planned
        .iter()
        .map(|member| match observed.get(member.id()) {
            Some(seen) if member.port.is_unknown() => Member {
                port: seen.port.clone(),
                ..member.clone()
            },
            _ => member.clone(),
        })
        .collect()
}
