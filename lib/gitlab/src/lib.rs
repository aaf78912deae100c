//! GitLab identity client for nexus-gitlab-auth.
//!
//! This crate is a thin adapter over the GitLab REST API. It answers two
//! questions, each under its own credential:
//! - "who owns this token", authenticated with the caller's personal token
//! - "which groups is this user in", authenticated with the service API key
//!   and executed via sudo on the user's behalf

mod client;
mod error;
mod model;
mod provider;

pub use client::{GitlabClient, MAX_ITEMS_PER_PAGE};
pub use error::{ClientError, GroupLookupError, IdentityLookupError};
pub use model::{GitlabGroup, GitlabUser};
pub use provider::IdentityProvider;
