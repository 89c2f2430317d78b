//! # In-Memory Registry
//!
//! A target registry held in process memory. Used by tests and dry runs in
//! place of the remote service.
//!
//! - Assigns the group's default port to targets registered without one
//! - Reports unknown groups as `ProviderError::GroupNotFound`
//! - Replays injected faults per call kind, in order
//! - Can answer describes without a target list
//! - Records every call for ordering assertions

use crate::provider::{
    MembershipMutator, MembershipQuery, ProviderError, RegisteredTarget, TargetHealthState,
};
use crate::resource::{AttributeValue, Member, MembershipSet, TargetGroupArn};
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Port assigned when neither the target nor the group specifies one
pub const DEFAULT_GROUP_PORT: i64 = 80;

/// A call received by the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    Add(Vec<String>),
    Remove(Vec<String>),
    Describe(Vec<String>),
}

#[derive(Debug, Default)]
struct Group {
    port: i64,
    targets: MembershipSet,
    draining: MembershipSet,
}

#[derive(Debug, Default)]
struct Inner {
    groups: BTreeMap<String, Group>,
    add_faults: VecDeque<ProviderError>,
    remove_faults: VecDeque<ProviderError>,
    describe_faults: VecDeque<ProviderError>,
    absent_payload: bool,
    calls: Vec<RegistryCall>,
}

/// In-memory implementation of both registry traits
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    inner: Mutex<Inner>,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create an empty group with the default port
    pub fn create_group(&self, group: &TargetGroupArn) {
        self.create_group_with_port(group, DEFAULT_GROUP_PORT);
    }

    pub fn create_group_with_port(&self, group: &TargetGroupArn, port: i64) {
        self.lock().groups.insert(
            group.to_string(),
            Group {
                port,
                ..Group::default()
            },
        );
    }

    /// Delete a group and everything registered with it
    pub fn delete_group(&self, group: &TargetGroupArn) {
        self.lock().groups.remove(group.as_str());
    }

    /// Register members directly, bypassing the call log
    pub fn seed(&self, group: &TargetGroupArn, members: &[Member]) {
        let mut inner = self.lock();
        if let Some(entry) = inner.groups.get_mut(group.as_str()) {
            let port = entry.port;
            for member in members {
                entry.targets.insert(assign_port(member, port));
            }
        }
    }

    /// Move a registered member to the draining list
    pub fn start_draining(&self, group: &TargetGroupArn, target_id: &str) {
        let mut inner = self.lock();
        if let Some(entry) = inner.groups.get_mut(group.as_str()) {
            if let Some(member) = entry.targets.remove(target_id) {
                entry.draining.insert(member);
            }
        }
    }

    /// Members currently registered with the group, `None` if the group does not exist
    #[must_use]
    pub fn registered(&self, group: &TargetGroupArn) -> Option<MembershipSet> {
        self.lock()
            .groups
            .get(group.as_str())
            .map(|entry| entry.targets.clone())
    }

    /// Fail the next add with `error`
    pub fn fail_next_add(&self, error: ProviderError) {
        self.lock().add_faults.push_back(error);
    }

    /// Fail the next remove with `error`
    pub fn fail_next_remove(&self, error: ProviderError) {
        self.lock().remove_faults.push_back(error);
    }

    /// Fail the next describe with `error`
    pub fn fail_next_describe(&self, error: ProviderError) {
        self.lock().describe_faults.push_back(error);
    }

    /// Answer describes without a target list
    pub fn set_absent_payload(&self, absent: bool) {
        self.lock().absent_payload = absent;
    }

    /// Calls received so far
    #[must_use]
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

fn ids(members: &[Member]) -> Vec<String> {
    members.iter().map(|m| m.target_id.clone()).collect()
}

fn assign_port(member: &Member, group_port: i64) -> Member {
    let port = match &member.port {
        AttributeValue::Known(port) => *port,
        AttributeValue::Unknown | AttributeValue::Null => group_port,
    };
    Member {
        port: AttributeValue::Known(port),
        ..member.clone()
    }
}

fn group_not_found(group: &TargetGroupArn) -> ProviderError {
    ProviderError::GroupNotFound {
        message: format!("One or more target groups not found: {group}"),
    }
}

#[async_trait]
impl MembershipMutator for InMemoryRegistry {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn add_members(
        &self,
        group: &TargetGroupArn,
        members: &[Member],
    ) -> Result<(), ProviderError> {
        let mut inner = self.lock();
        inner.calls.push(RegistryCall::Add(ids(members)));
        if let Some(fault) = inner.add_faults.pop_front() {
            return Err(fault);
        }

        let entry = inner
            .groups
            .get_mut(group.as_str())
            .ok_or_else(|| group_not_found(group))?;
        let port = entry.port;
        for member in members {
            entry.draining.remove(member.id());
            entry.targets.insert(assign_port(member, port));
        }
        Ok(())
    }

    async fn remove_members(
        &self,
        group: &TargetGroupArn,
        members: &[Member],
    ) -> Result<(), ProviderError> {
        let mut inner = self.lock();
        inner.calls.push(RegistryCall::Remove(ids(members)));
        if let Some(fault) = inner.remove_faults.pop_front() {
            return Err(fault);
        }

        let entry = inner
            .groups
            .get_mut(group.as_str())
            .ok_or_else(|| group_not_found(group))?;
        for member in members {
            entry.targets.remove(member.id());
        }
        Ok(())
    }
}

#[async_trait]
impl MembershipQuery for InMemoryRegistry {
    async fn describe_members(
        &self,
        group: &TargetGroupArn,
        scope: &[Member],
    ) -> Result<Option<Vec<RegisteredTarget>>, ProviderError> {
        let mut inner = self.lock();
        inner.calls.push(RegistryCall::Describe(ids(scope)));
        if let Some(fault) = inner.describe_faults.pop_front() {
            return Err(fault);
        }

        let absent_payload = inner.absent_payload;
        let entry = inner
            .groups
            .get(group.as_str())
            .ok_or_else(|| group_not_found(group))?;
        if absent_payload {
            return Ok(None);
        }

        let registered = entry
            .targets
            .iter()
            .map(|m| RegisteredTarget::new(m.clone()).with_health(TargetHealthState::Healthy, None));
        let draining = entry.draining.iter().map(|m| {
            RegisteredTarget::new(m.clone()).with_health(
                TargetHealthState::Draining,
                Some("Target.DeregistrationInProgress"),
            )
        });
        let all: Vec<RegisteredTarget> = registered.chain(draining).collect();

        if scope.is_empty() {
            return Ok(Some(all));
        }

        // A scoped describe answers for every requested target, registered or not
        let described = scope
            .iter()
            .map(|wanted| {
                all.iter()
                    .find(|t| t.member.same_identity(wanted))
                    .cloned()
                    .unwrap_or_else(|| {
                        RegisteredTarget::new(wanted.clone()).with_health(
                            TargetHealthState::Unused,
                            Some(crate::constants::HEALTH_REASON_NOT_REGISTERED),
                        )
                    })
            })
            .collect();
        Ok(Some(described))
    }
}
