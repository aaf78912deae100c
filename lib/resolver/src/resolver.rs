//! Authorization resolver with a time-bounded principal cache.

use crate::config::AuthConfig;
use crate::error::AuthenticationError;
use crate::principal::Principal;
use crate::role::RoleSet;
use moka::future::Cache;
use nexus_gitlab_auth_core::{Credential, CredentialDigest};
use nexus_gitlab_auth_gitlab::{GitlabClient, GitlabUser, IdentityProvider};
use rootcause::prelude::Report;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Verifies GitLab credentials and derives principals.
///
/// Construct one per process and share it between callers; all methods take
/// `&self`. Successful results are cached per (login, token) pair for the
/// configured TTL and served without contacting GitLab. Failures are never
/// cached.
pub struct Authorizer {
    provider: Arc<dyn IdentityProvider>,
    config: AuthConfig,
    cache: Cache<CredentialDigest, Principal>,
}

impl Authorizer {
    /// Creates an authorizer backed by a `GitlabClient` built from `config`.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationError::Configuration` if the GitLab client
    /// cannot be built from the configured URL and API key.
    pub fn from_config(config: AuthConfig) -> Result<Self, Report<AuthenticationError>> {
        let client = GitlabClient::new(config.api_url(), config.api_key(), config.request_timeout())
            .map_err(|report| report.context(AuthenticationError::Configuration))?;
        Ok(Self::with_provider(Arc::new(client), config))
    }

    /// Creates an authorizer backed by an arbitrary identity provider.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn IdentityProvider>, config: AuthConfig) -> Self {
        let cache = Cache::builder().time_to_live(config.cache_ttl()).build();
        Self {
            provider,
            config,
            cache,
        }
    }

    /// Returns the configuration this authorizer was built with.
    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Returns the approximate number of live cache entries.
    pub async fn cached_entries(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    /// Authorizes `login` using a GitLab personal access `token`.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationError` if GitLab rejects the token, the token
    /// belongs to someone other than `login`, or group lookup fails.
    #[instrument(skip(self, token))]
    pub async fn authorize(
        &self,
        login: &str,
        token: SecretString,
    ) -> Result<Principal, Report<AuthenticationError>> {
        self.authorize_credential(&Credential::new(login, token))
            .await
    }

    /// Authorizes a credential, serving from cache when possible.
    ///
    /// # Errors
    ///
    /// See [`Authorizer::authorize`].
    #[instrument(skip_all, fields(login = %credential.login()))]
    pub async fn authorize_credential(
        &self,
        credential: &Credential,
    ) -> Result<Principal, Report<AuthenticationError>> {
        let key = credential.digest();

        if let Some(principal) = self.cache.get(&key).await {
            debug!("using cached principal");
            return Ok(principal);
        }

        let principal = self.verify_and_derive(credential).await?;
        self.cache.insert(key, principal.clone()).await;
        debug!(username = %principal.username(), "cached new principal");
        Ok(principal)
    }

    async fn verify_and_derive(
        &self,
        credential: &Credential,
    ) -> Result<Principal, Report<AuthenticationError>> {
        let user = self
            .provider
            .resolve_user_by_token(credential.token())
            .await
            .map_err(|report| report.context(AuthenticationError::IdentityLookup))?;

        let Some(user) = user else {
            warn!("token does not resolve to a GitLab user");
            return Err(mismatch(credential));
        };

        let Some(email) = verified_email(&user, credential.login()) else {
            warn!(gitlab_user = %user.username, "login does not match token owner");
            return Err(mismatch(credential));
        };

        let roles = self.derive_roles(&user).await?;
        debug!(roles = roles.len(), "derived roles");
        Ok(Principal::new(email, roles))
    }

    async fn derive_roles(&self, user: &GitlabUser) -> Result<RoleSet, Report<AuthenticationError>> {
        let mut roles = RoleSet::none();

        if user.is_admin() && self.config.admin_mapping_enabled() {
            roles.grant_admin();
        }

        if let Some(default_role) = self.config.default_role() {
            roles.grant(default_role);
            return Ok(roles);
        }

        let groups = self
            .provider
            .list_groups_for_user(&user.username)
            .await
            .map_err(|report| {
                report.context(AuthenticationError::GroupLookup {
                    username: user.username.clone(),
                })
            })?;
        roles.grant_groups(&groups);
        Ok(roles)
    }
}

fn mismatch(credential: &Credential) -> Report<AuthenticationError> {
    AuthenticationError::IdentityMismatch {
        login: credential.login().to_string(),
    }
    .into()
}

/// Returns the user's email if it matches `login`, ignoring case.
fn verified_email<'a>(user: &'a GitlabUser, login: &str) -> Option<&'a str> {
    user.email
        .as_deref()
        .filter(|email| email.to_lowercase() == login.to_lowercase())
}
