//! Credentials presented for a single authorization attempt.
//!
//! A `Credential` lives only for the duration of one `authorize` call. The
//! token is held as a `SecretString` so `Debug` output never contains it.

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::fmt;

/// A login name paired with the token that claims to prove it.
#[derive(Debug)]
pub struct Credential {
    login: String,
    token: SecretString,
}

impl Credential {
    /// Creates a new credential.
    #[must_use]
    pub fn new(login: impl Into<String>, token: SecretString) -> Self {
        Self {
            login: login.into(),
            token,
        }
    }

    /// Returns the login the caller claims.
    #[must_use]
    pub fn login(&self) -> &str {
        &self.login
    }

    /// Returns the secret token.
    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Returns the digest identifying this (login, token) pair.
    #[must_use]
    pub fn digest(&self) -> CredentialDigest {
        CredentialDigest::of(&self.login, &self.token)
    }
}

/// SHA-256 digest of a length-prefixed (login, token) pair.
///
/// Each component is prefixed with its byte length, so no choice of login
/// or token can collide with a different split of the same bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialDigest([u8; 32]);

impl CredentialDigest {
    /// Computes the digest of a login and token.
    #[must_use]
    pub fn of(login: &str, token: &SecretString) -> Self {
        let token = token.expose_secret();
        let mut hasher = Sha256::new();
        hasher.update((login.len() as u64).to_be_bytes());
        hasher.update(login.as_bytes());
        hasher.update((token.len() as u64).to_be_bytes());
        hasher.update(token.as_bytes());
        Self(hasher.finalize().into())
    }
}

impl fmt::Debug for CredentialDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialDigest(")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "..)")
    }
}
