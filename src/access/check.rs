//! Access decisions over a single rights model
//!
//! Answers "may `user` exercise `right`" for one parsed Access file. Finding
//! which Access file governs a path is the caller's job, and so is loading
//! groups: membership comes from an injected [`GroupMembers`] lookup.

use crate::access::names::GranteeKind;
use crate::access::types::{Grantee, RightKind, RightsModel};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Group membership lookup supplied by the caller
pub trait GroupMembers {
    /// Member names listed by the group file at `group`, or `None` if it
    /// cannot be loaded. Members may themselves be groups or `*`.
    fn members(&self, group: &str) -> Option<Vec<String>>;
}

impl<F> GroupMembers for F
where
    F: Fn(&str) -> Option<Vec<String>>,
{
    fn members(&self, group: &str) -> Option<Vec<String>> {
        self(group)
    }
}

/// A lookup that knows no groups; group grantees never match
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGroups;

impl GroupMembers for NoGroups {
    fn members(&self, _group: &str) -> Option<Vec<String>> {
        None
    }
}

/// Result of access check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access is allowed
    Allowed,
    /// Access is denied with a reason
    Denied(String),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessDecision::Denied(_))
    }
}

impl RightsModel {
    /// Decide whether `user` holds `right` under this model.
    ///
    /// `user` matches a grantee that is `*`, the same user name, or a group
    /// that (transitively) lists the user. Groups that fail to load are
    /// treated as empty.
    pub fn check(&self, user: &str, right: RightKind, groups: &dyn GroupMembers) -> AccessDecision {
        let mut visited = HashSet::new();
        for grantee in self.grantees(right) {
            if matches_grantee(grantee.as_str(), user, groups, &mut visited) {
                debug!(user, %right, via = %grantee, "Access allowed");
                return AccessDecision::Allowed;
            }
        }

        debug!(user, %right, "Access denied");
        AccessDecision::Denied(format!("{user} does not hold the {right} right"))
    }
}

fn matches_grantee(
    name: &str,
    user: &str,
    groups: &dyn GroupMembers,
    visited: &mut HashSet<String>,
) -> bool {
    let Ok(grantee) = Grantee::new(name) else {
        trace!(name, "Ignoring malformed group member");
        return false;
    };

    match grantee.kind() {
        GranteeKind::Everyone => true,
        GranteeKind::User => grantee.as_str() == user,
        GranteeKind::Group => {
            // Each group is expanded at most once per check.
            if !visited.insert(grantee.to_string()) {
                return false;
            }
            let Some(members) = groups.members(grantee.as_str()) else {
                debug!(group = %grantee, "Group could not be loaded");
                return false;
            };
            members
                .iter()
                .any(|member| matches_grantee(member, user, groups, visited))
        }
    }
}
