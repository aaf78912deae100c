//! Identity provider trait.
//!
//! The resolver depends on this trait rather than on `GitlabClient`
//! directly, so hosts can wrap the client and tests can substitute it.

use crate::error::{GroupLookupError, IdentityLookupError};
use crate::model::{GitlabGroup, GitlabUser};
use async_trait::async_trait;
use rootcause::prelude::Report;
use secrecy::SecretString;

/// Remote source of user identities and group memberships.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolves the user that owns `token`.
    ///
    /// The request is authenticated with `token` itself, never with the
    /// service credential. Returns `None` if GitLab answers without a user
    /// record.
    ///
    /// # Errors
    ///
    /// Returns `IdentityLookupError` if the token is invalid, the provider
    /// rejects the request, or the network call fails.
    async fn resolve_user_by_token(
        &self,
        token: &SecretString,
    ) -> Result<Option<GitlabUser>, Report<IdentityLookupError>>;

    /// Lists every group `username` belongs to.
    ///
    /// The request is authenticated with the service credential and
    /// executed on the user's behalf. All pages are fetched.
    ///
    /// # Errors
    ///
    /// Returns `GroupLookupError` on any failure. Callers must not treat a
    /// failure as "no groups".
    async fn list_groups_for_user(
        &self,
        username: &str,
    ) -> Result<Vec<GitlabGroup>, Report<GroupLookupError>>;
}
