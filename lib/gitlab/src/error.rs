//! Error types for the GitLab identity client.
//!
//! Errors are designed for layered context using rootcause:
//! - `IdentityLookupError`: Failures resolving the owner of a user token
//! - `GroupLookupError`: Failures listing a user's group memberships
//! - `ClientError`: Failures constructing the client itself

use std::fmt;

/// Errors from building a `GitlabClient`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The configured base URL is unusable.
    InvalidBaseUrl { url: String },
    /// The service API key cannot be sent as a header value.
    InvalidApiKey,
    /// The underlying HTTP client could not be created.
    HttpClient { reason: String },
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl { url } => write!(f, "invalid GitLab base URL: {url}"),
            Self::InvalidApiKey => write!(f, "service API key is not a valid header value"),
            Self::HttpClient { reason } => {
                write!(f, "failed to create HTTP client: {reason}")
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// Errors from resolving "who am I" for a user token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityLookupError {
    /// The token cannot be sent as a header value.
    MalformedToken,
    /// The request never produced a response (connect, TLS, timeout).
    Transport { reason: String },
    /// GitLab answered with a non-success status (401 for a bad token).
    Rejected { status: u16 },
    /// The response body was not a user record.
    InvalidResponse { reason: String },
}

impl fmt::Display for IdentityLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedToken => write!(f, "token is not a valid header value"),
            Self::Transport { reason } => {
                write!(f, "identity lookup transport failure: {reason}")
            }
            Self::Rejected { status } => {
                write!(f, "identity lookup rejected with status {status}")
            }
            Self::InvalidResponse { reason } => {
                write!(f, "identity lookup returned an invalid response: {reason}")
            }
        }
    }
}

impl std::error::Error for IdentityLookupError {}

/// Errors from listing the groups of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupLookupError {
    /// The request never produced a response (connect, TLS, timeout).
    Transport { reason: String },
    /// GitLab answered with a non-success status.
    Rejected { status: u16, page: u32 },
    /// A page of the response was not a list of groups.
    InvalidResponse { page: u32, reason: String },
}

impl fmt::Display for GroupLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { reason } => {
                write!(f, "group lookup transport failure: {reason}")
            }
            Self::Rejected { status, page } => {
                write!(f, "group lookup rejected with status {status} on page {page}")
            }
            Self::InvalidResponse { page, reason } => {
                write!(f, "group lookup page {page} was invalid: {reason}")
            }
        }
    }
}

impl std::error::Error for GroupLookupError {}
