//! # Members
//!
//! A member is a registered target. Identity is the target ID alone: the zone
//! hint and port travel with the member to the registry but never decide
//! whether two members are the same.

use crate::resource::attribute::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;

/// A single target registered with a target group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Instance ID, IP address, Lambda ARN or ALB ARN
    pub target_id: String,
    /// Zone hint, fixed at registration time
    #[serde(default)]
    pub availability_zone: AttributeValue<String>,
    /// Port, assigned by the registry when not configured
    #[serde(default)]
    pub port: AttributeValue<i64>,
}

impl Member {
    pub fn new(target_id: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            availability_zone: AttributeValue::Null,
            port: AttributeValue::Null,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: i64) -> Self {
        self.port = AttributeValue::Known(port);
        self
    }

    /// Mark the port as pending assignment by the registry
    #[must_use]
    pub fn with_unknown_port(mut self) -> Self {
        self.port = AttributeValue::Unknown;
        self
    }

    #[must_use]
    pub fn with_availability_zone(mut self, zone: impl Into<String>) -> Self {
        self.availability_zone = AttributeValue::Known(zone.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.target_id
    }

    /// True when both members refer to the same target
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.target_id == other.target_id
    }
}

/// Error returned when a set would contain the same target twice
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("duplicate target_id {0:?}")]
pub struct DuplicateMember(pub String);

/// Members unique by target ID
///
/// Ordered by target ID so that requests, logs and persisted state are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Member>", into = "Vec<Member>")]
pub struct MembershipSet {
    members: BTreeMap<String, Member>,
}

impl MembershipSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, rejecting duplicate target IDs
    pub fn from_members<I>(members: I) -> Result<Self, DuplicateMember>
    where
        I: IntoIterator<Item = Member>,
    {
        let mut set = Self::new();
        for member in members {
            if set.contains(member.id()) {
                return Err(DuplicateMember(member.target_id));
            }
            set.insert(member);
        }
        Ok(set)
    }

    /// Insert a member, replacing any member with the same identity
    pub fn insert(&mut self, member: Member) -> Option<Member> {
        self.members.insert(member.target_id.clone(), member)
    }

    pub fn remove(&mut self, target_id: &str) -> Option<Member> {
        self.members.remove(target_id)
    }

    #[must_use]
    pub fn get(&self, target_id: &str) -> Option<&Member> {
        self.members.get(target_id)
    }

    #[must_use]
    pub fn contains(&self, target_id: &str) -> bool {
        self.members.contains_key(target_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> btree_map::Values<'_, String, Member> {
        self.members.values()
    }

    /// Target IDs in the set
    #[must_use]
    pub fn ids(&self) -> BTreeSet<&str> {
        self.members.keys().map(String::as_str).collect()
    }

    /// Members of `self` whose identity is absent from `other`
    #[must_use]
    pub fn difference(&self, other: &Self) -> Vec<Member> {
        self.iter()
            .filter(|member| !other.contains(member.id()))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Member> {
        self.iter().cloned().collect()
    }
}

impl TryFrom<Vec<Member>> for MembershipSet {
    type Error = DuplicateMember;

    fn try_from(value: Vec<Member>) -> Result<Self, Self::Error> {
        Self::from_members(value)
    }
}

impl From<MembershipSet> for Vec<Member> {
    fn from(value: MembershipSet) -> Self {
        value.members.into_values().collect()
    }
}

impl FromIterator<Member> for MembershipSet {
    /// Collect members; a later member replaces an earlier one with the same ID
    fn from_iter<I: IntoIterator<Item = Member>>(iter: I) -> Self {
        let mut set = Self::new();
        for member in iter {
            set.insert(member);
        }
        set
    }
}

impl<'a> IntoIterator for &'a MembershipSet {
    type Item = &'a Member;
    type IntoIter = btree_map::Values<'a, String, Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
