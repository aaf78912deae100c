//! Error types for the resolver crate.
//!
//! `AuthenticationError` is the only failure kind callers see. Lower-level
//! GitLab errors are kept as the child of the report for diagnostics.

use std::fmt;

/// Errors from authorizing a (login, token) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationError {
    /// GitLab could not resolve the owner of the token.
    IdentityLookup,
    /// The token's owner is not the claimed login.
    IdentityMismatch { login: String },
    /// The token's owner was verified but their groups could not be listed.
    GroupLookup { username: String },
    /// The authorizer could not be constructed from its configuration.
    Configuration,
}

impl fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdentityLookup => {
                write!(f, "could not verify token with GitLab")
            }
            Self::IdentityMismatch { login } => {
                write!(f, "login '{login}' does not match the GitLab identity of the token")
            }
            Self::GroupLookup { username } => {
                write!(f, "could not fetch groups for GitLab user '{username}'")
            }
            Self::Configuration => {
                write!(f, "invalid GitLab authorization configuration")
            }
        }
    }
}

impl std::error::Error for AuthenticationError {}
