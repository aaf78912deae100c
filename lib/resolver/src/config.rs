//! Authorizer configuration.
//!
//! Loaded once at startup via the `config` crate and treated as read-only
//! for the lifetime of the `Authorizer`.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Environment variable prefix, e.g. `GITLAB_AUTH_API_URL`.
pub const ENV_PREFIX: &str = "GITLAB_AUTH";

/// Configuration for GitLab-backed authorization.
///
/// Fields with defaults can be omitted when loading from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// GitLab base URL (e.g., "https://gitlab.example.com").
    api_url: String,
    /// Service API key used for sudo group lookups.
    #[serde(deserialize_with = "deserialize_secret")]
    api_key: SecretString,
    /// Role granted to every authenticated user instead of group roles.
    #[serde(default)]
    default_role: Option<String>,
    /// Whether GitLab administrators receive the admin role.
    /// Default: false
    #[serde(default)]
    admin_mapping_enabled: bool,
    /// How long an authorized principal is served from cache.
    /// Read from `cache_ttl_seconds`. Default: 60s
    #[serde(
        rename = "cache_ttl_seconds",
        default = "default_cache_ttl",
        deserialize_with = "deserialize_seconds"
    )]
    cache_ttl: Duration,
    /// Timeout for each request to GitLab.
    /// Read from `request_timeout_seconds`. Default: 30s
    #[serde(
        rename = "request_timeout_seconds",
        default = "default_request_timeout",
        deserialize_with = "deserialize_seconds"
    )]
    request_timeout: Duration,
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(60)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl AuthConfig {
    /// Creates a configuration with defaults for optional fields.
    #[must_use]
    pub fn new(api_url: String, api_key: SecretString) -> Self {
        Self {
            api_url,
            api_key,
            default_role: None,
            admin_mapping_enabled: false,
            cache_ttl: default_cache_ttl(),
            request_timeout: default_request_timeout(),
        }
    }

    /// Loads configuration from `GITLAB_AUTH_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_environment(Self::environment())
    }

    /// Loads configuration from an explicit environment source.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_environment(environment: config::Environment) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    /// Returns the environment source used by [`AuthConfig::from_env`].
    #[must_use]
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Sets the default role.
    #[must_use]
    pub fn with_default_role(mut self, default_role: Option<String>) -> Self {
        self.default_role = default_role;
        self
    }

    /// Enables or disables admin role mapping.
    #[must_use]
    pub fn with_admin_mapping(mut self, enabled: bool) -> Self {
        self.admin_mapping_enabled = enabled;
        self
    }

    /// Sets the principal cache TTL.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Sets the GitLab request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Returns the GitLab base URL.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the service API key.
    #[must_use]
    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// Returns the default role, treating a blank value as unset.
    #[must_use]
    pub fn default_role(&self) -> Option<&str> {
        self.default_role
            .as_deref()
            .map(str::trim)
            .filter(|role| !role.is_empty())
    }

    /// Returns true if GitLab administrators receive the admin role.
    #[must_use]
    pub fn admin_mapping_enabled(&self) -> bool {
        self.admin_mapping_enabled
    }

    /// Returns the principal cache TTL.
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// Returns the GitLab request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}
