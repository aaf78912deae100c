//! Role derivation from GitLab identity and group membership.
//!
//! GitLab groups map one-to-one onto repository-manager roles: the role
//! name is the group's path. GitLab administrators may additionally be
//! mapped onto the fixed admin role.

use nexus_gitlab_auth_gitlab::GitlabGroup;
use std::collections::BTreeSet;

/// Role granted to GitLab administrators when admin mapping is enabled.
pub const ADMIN_ROLE: &str = "nx-admin";

/// Returns the role name for a GitLab group.
#[must_use]
pub fn role_for_group(group: &GitlabGroup) -> &str {
    &group.path
}

/// Deduplicated set of role names accumulated during authorization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet {
    roles: BTreeSet<String>,
}

impl RoleSet {
    /// Creates an empty role set.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Adds a single role.
    pub fn grant(&mut self, role: impl Into<String>) {
        self.roles.insert(role.into());
    }

    /// Adds the admin role.
    pub fn grant_admin(&mut self) {
        self.grant(ADMIN_ROLE);
    }

    /// Adds one role per group, named after the group path.
    pub fn grant_groups<'a>(&mut self, groups: impl IntoIterator<Item = &'a GitlabGroup>) {
        self.roles
            .extend(groups.into_iter().map(|g| role_for_group(g).to_string()));
    }

    /// Returns true if the set contains `role`.
    #[must_use]
    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Returns true if no role has been granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Returns the number of distinct roles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Consumes the set, returning `None` when it is empty.
    #[must_use]
    pub fn into_non_empty(self) -> Option<BTreeSet<String>> {
        if self.roles.is_empty() {
            None
        } else {
            Some(self.roles)
        }
    }
}
