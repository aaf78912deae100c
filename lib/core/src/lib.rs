//! Core types shared by the nexus-gitlab-auth crates.
//!
//! This crate provides the credential presented by a caller, the digest
//! used to key cached authorization results, and the `Result` alias used
//! across the workspace.

pub mod credential;
pub mod error;

pub use credential::{Credential, CredentialDigest};
pub use error::Result;
