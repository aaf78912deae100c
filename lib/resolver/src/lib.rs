//! GitLab-backed authorization for a repository manager.
//!
//! This crate provides:
//! - `Authorizer`: verifies a (login, token) pair against GitLab and derives
//!   a `Principal`, caching results for a fixed TTL
//! - Role derivation (`RoleSet`, `ADMIN_ROLE`)
//! - Configuration (`AuthConfig`) loaded via the `config` crate
//! - The single caller-visible failure kind, `AuthenticationError`
//!
//! # Role Derivation
//!
//! Roles are derived in order:
//! - GitLab administrators receive `nx-admin` when admin mapping is enabled
//! - A configured default role is granted instead of looking up groups
//! - Otherwise every GitLab group path the user belongs to becomes a role
//!
//! # Example
//!
//! ```no_run
//! use nexus_gitlab_auth_resolver::{AuthConfig, Authorizer};
//! use secrecy::SecretString;
//!
//! # async fn run() {
//! let config = AuthConfig::new(
//!     "https://gitlab.example.com".to_string(),
//!     SecretString::from("service-api-key".to_string()),
//! )
//! .with_default_role(Some("nx-developer".to_string()));
//! let authorizer = Authorizer::from_config(config).expect("valid configuration");
//!
//! let token = SecretString::from("glpat-user-token".to_string());
//! match authorizer.authorize("alice@example.com", token).await {
//!     Ok(principal) => println!("{} has roles {:?}", principal.username(), principal.groups()),
//!     Err(report) => eprintln!("authorization failed: {report}"),
//! }
//! # }
//! ```

pub mod config;
pub mod error;
pub mod principal;
pub mod resolver;
pub mod role;

// Re-export main types at crate root
pub use config::AuthConfig;
pub use error::AuthenticationError;
pub use principal::Principal;
pub use resolver::Authorizer;
pub use role::{ADMIN_ROLE, RoleSet};
