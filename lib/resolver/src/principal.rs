//! The authorization principal handed back to the host.

use crate::role::RoleSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A verified GitLab identity plus the roles derived for it.
///
/// `groups` is `None` when no role was derived; it is never an empty set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    groups: Option<BTreeSet<String>>,
}

impl Principal {
    /// Creates a principal from a verified username and derived roles.
    #[must_use]
    pub fn new(username: impl Into<String>, roles: RoleSet) -> Self {
        Self {
            username: username.into(),
            groups: roles.into_non_empty(),
        }
    }

    /// Returns the verified username (the email GitLab reported).
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the derived roles, or `None` if there are none.
    #[must_use]
    pub fn groups(&self) -> Option<&BTreeSet<String>> {
        self.groups.as_ref()
    }

    /// Returns true if the principal holds `role`.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.groups.as_ref().is_some_and(|g| g.contains(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roles_are_absent() {
        let principal = Principal::new("alice@example.com", RoleSet::none());
        assert!(principal.groups().is_none());
        assert!(!principal.has_role("qa"));
    }

    #[test]
    fn roles_are_kept() {
        let mut roles = RoleSet::none();
        roles.grant("qa");
        let principal = Principal::new("alice@example.com", roles);
        assert!(principal.has_role("qa"));
        assert_eq!(principal.groups().map(BTreeSet::len), Some(1));
    }

    #[test]
    fn serialization_omits_absent_groups() {
        let principal = Principal::new("alice@example.com", RoleSet::none());
        let json = serde_json::to_string(&principal).expect("serialize");
        assert_eq!(json, r#"{"username":"alice@example.com"}"#);

        let parsed: Principal = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, principal);
    }
}
