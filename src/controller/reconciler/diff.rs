//! # Membership Diff
//!
//! Identity-based difference between desired and observed membership.
//! Attribute drift on a member present on both sides is not a change:
//! attributes are fixed when the member is registered.

use crate::resource::{Member, MembershipSet};

/// Mutations needed to move `observed` to `desired`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    /// Members to register, with their desired attributes
    pub to_add: Vec<Member>,
    /// Members to deregister, with their observed attributes
    pub to_remove: Vec<Member>,
}

impl MembershipDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Compute the members to add and remove
#[must_use]
pub fn diff(desired: &MembershipSet, observed: &MembershipSet) -> MembershipDiff {
    MembershipDiff {
        to_add: desired.difference(observed),
        to_remove: observed.difference(desired),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[&str]) -> MembershipSet {
        ids.iter().map(|id| Member::new(*id)).collect()
    }

    #[test]
    fn test_diff_adds_and_removes() {
        let result = diff(&set(&["A", "B"]), &set(&["B", "C"]));
        assert_eq!(result.to_add, vec![Member::new("A")]);
        assert_eq!(result.to_remove, vec![Member::new("C")]);
    }

    #[test]
    fn test_diff_empty_desired_removes_everything() {
        let result = diff(&set(&[]), &set(&["X"]));
        assert!(result.to_add.is_empty());
        assert_eq!(result.to_remove, vec![Member::new("X")]);
    }

    #[test]
    fn test_diff_against_mirror_is_empty() {
        let members = set(&["A", "B", "C"]);
        assert!(diff(&members, &members.clone()).is_empty());
    }

    #[test]
    fn test_diff_ignores_attribute_drift() {
        let desired: MembershipSet = vec![Member::new("i-1")
            .with_availability_zone("us-west-2a")
            .with_port(80)]
        .into_iter()
        .collect();
        let observed: MembershipSet = vec![Member::new("i-1")
            .with_availability_zone("us-west-2b")
            .with_port(8080)]
        .into_iter()
        .collect();

        assert!(diff(&desired, &observed).is_empty());
    }

    #[test]
    fn test_diff_keeps_side_attributes() {
        let desired: MembershipSet = vec![Member::new("new").with_port(81)].into_iter().collect();
        let observed: MembershipSet = vec![Member::new("old").with_port(8443)].into_iter().collect();

        let result = diff(&desired, &observed);
        assert_eq!(result.to_add, vec![Member::new("new").with_port(81)]);
        assert_eq!(result.to_remove, vec![Member::new("old").with_port(8443)]);
    }
}
