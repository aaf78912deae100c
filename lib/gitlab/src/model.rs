//! GitLab API records.
//!
//! Only the fields the resolver reads are modelled; unknown fields in the
//! API response are ignored.

use serde::{Deserialize, Serialize};

/// A user as returned by `GET /user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitlabUser {
    /// Numeric user ID.
    pub id: u64,
    /// GitLab-native username (used for sudo lookups).
    pub username: String,
    /// Primary email address. Absent when GitLab withholds it.
    #[serde(default)]
    pub email: Option<String>,
    /// Whether the user is an instance administrator.
    /// GitLab only includes this field for some token scopes.
    #[serde(default)]
    pub is_admin: Option<bool>,
}

impl GitlabUser {
    /// Returns true if GitLab reported the user as an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin.unwrap_or(false)
    }
}

/// A group as returned by `GET /groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitlabGroup {
    /// Numeric group ID.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// URL path segment of the group.
    pub path: String,
    /// Full namespace path including parent groups.
    #[serde(default)]
    pub full_path: Option<String>,
}
