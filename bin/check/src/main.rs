//! Operator check for GitLab-backed authorization.
//!
//! Loads `GITLAB_AUTH_*` configuration, reads a token from stdin, and prints
//! the principal the authorizer derives for the login given as argument.
//!
//! ```text
//! $ echo "$GITLAB_TOKEN" | nexus-gitlab-auth-check alice@example.com
//! ```

use nexus_gitlab_auth_core::Result;
use nexus_gitlab_auth_resolver::{AuthConfig, Authorizer};
use secrecy::SecretString;
use std::fmt;
use std::io::BufRead;
use std::process::ExitCode;

#[derive(Debug)]
enum CheckError {
    Usage,
    Configuration { reason: String },
    TokenInput { reason: String },
    Authorization { login: String },
    Output { reason: String },
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Usage => write!(f, "usage: nexus-gitlab-auth-check <login> (token on stdin)"),
            Self::Configuration { reason } => write!(f, "failed to load configuration: {reason}"),
            Self::TokenInput { reason } => write!(f, "failed to read token from stdin: {reason}"),
            Self::Authorization { login } => write!(f, "authorization failed for {login}"),
            Self::Output { reason } => write!(f, "failed to render principal: {reason}"),
        }
    }
}

impl std::error::Error for CheckError {}

#[tokio::main]
async fn main() -> ExitCode {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(report) => {
            eprintln!("{report}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), CheckError> {
    let login = std::env::args().nth(1).ok_or(CheckError::Usage)?;

    let config = AuthConfig::from_env().map_err(|e| CheckError::Configuration {
        reason: e.to_string(),
    })?;
    tracing::info!(api_url = config.api_url(), "Loaded configuration");

    let token = read_token()?;

    let authorizer = Authorizer::from_config(config).map_err(|report| {
        report.context(CheckError::Configuration {
            reason: "could not build GitLab client".to_string(),
        })
    })?;

    let principal = authorizer
        .authorize(&login, token)
        .await
        .map_err(|report| report.context(CheckError::Authorization { login: login.clone() }))?;

    let rendered = serde_json::to_string_pretty(&principal).map_err(|e| CheckError::Output {
        reason: e.to_string(),
    })?;
    println!("{rendered}");
    Ok(())
}

fn read_token() -> Result<SecretString, CheckError> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CheckError::TokenInput {
            reason: e.to_string(),
        })?;

    let token = line.trim_end_matches(['\r', '\n']).to_string();
    if token.is_empty() {
        return Err(CheckError::TokenInput {
            reason: "no token given".to_string(),
        }
        .into());
    }
    Ok(SecretString::from(token))
}
