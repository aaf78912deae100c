//! GitLab REST client for identity and group lookups.

use crate::error::{ClientError, GroupLookupError, IdentityLookupError};
use crate::model::{GitlabGroup, GitlabUser};
use crate::provider::IdentityProvider;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Response, Url};
use rootcause::prelude::Report;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

/// Largest page size GitLab accepts for list endpoints.
pub const MAX_ITEMS_PER_PAGE: u32 = 100;

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// Client for a single GitLab instance.
///
/// One HTTP connection pool is shared by both credentials: the service API
/// key, stored at construction, and the per-call user token.
pub struct GitlabClient {
    http: reqwest::Client,
    api_base: String,
    api_key: HeaderValue,
}

impl GitlabClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `api_url` - The GitLab base URL (e.g., "https://gitlab.example.com")
    /// * `api_key` - Service token used for sudo group lookups
    /// * `timeout` - Per-request timeout applied to every call
    ///
    /// # Errors
    ///
    /// Returns `ClientError` if the URL is not http(s), the key is not a
    /// valid header value, or the HTTP client cannot be built.
    pub fn new(
        api_url: &str,
        api_key: &SecretString,
        timeout: Duration,
    ) -> Result<Self, Report<ClientError>> {
        let parsed = Url::parse(api_url).map_err(|_| ClientError::InvalidBaseUrl {
            url: api_url.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: api_url.to_string(),
            }
            .into());
        }

        let api_key = sensitive_header(api_key).ok_or(ClientError::InvalidApiKey)?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::HttpClient {
                reason: e.to_string(),
            })?;

        Ok(Self {
            http,
            api_base: format!("{}/api/v4", api_url.trim_end_matches('/')),
            api_key,
        })
    }

    /// Returns the REST API base, including the `/api/v4` suffix.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    async fn fetch_groups_page(
        &self,
        username: &str,
        page: u32,
    ) -> Result<(Vec<GitlabGroup>, Option<u32>), Report<GroupLookupError>> {
        let response = self
            .http
            .get(format!("{}/groups", self.api_base))
            .header(TOKEN_HEADER, self.api_key.clone())
            .query(&[("sudo", username)])
            .query(&[("per_page", MAX_ITEMS_PER_PAGE), ("page", page)])
            .send()
            .await
            .map_err(|e| GroupLookupError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GroupLookupError::Rejected {
                status: status.as_u16(),
                page,
            }
            .into());
        }

        let next_page = next_page(&response).filter(|next| *next > page);
        let groups = decode::<Vec<GitlabGroup>>(response)
            .await
            .map_err(|reason| GroupLookupError::InvalidResponse { page, reason })?;

        Ok((groups, next_page))
    }
}

#[async_trait]
impl IdentityProvider for GitlabClient {
    #[instrument(skip(self, token))]
    async fn resolve_user_by_token(
        &self,
        token: &SecretString,
    ) -> Result<Option<GitlabUser>, Report<IdentityLookupError>> {
        let token = sensitive_header(token).ok_or(IdentityLookupError::MalformedToken)?;

        let response = self
            .http
            .get(format!("{}/user", self.api_base))
            .header(TOKEN_HEADER, token)
            .send()
            .await
            .map_err(|e| IdentityLookupError::Transport {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "token owner lookup rejected");
            return Err(IdentityLookupError::Rejected {
                status: status.as_u16(),
            }
            .into());
        }

        let user = decode::<Option<GitlabUser>>(response)
            .await
            .map_err(|reason| IdentityLookupError::InvalidResponse { reason })?;

        match &user {
            Some(user) => debug!(username = %user.username, "resolved token owner"),
            None => debug!("token owner lookup returned no user"),
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn list_groups_for_user(
        &self,
        username: &str,
    ) -> Result<Vec<GitlabGroup>, Report<GroupLookupError>> {
        let mut groups = Vec::new();
        let mut page = 1;

        loop {
            let (batch, next) = self.fetch_groups_page(username, page).await?;
            groups.extend(batch);
            match next {
                Some(next) => page = next,
                None => break,
            }
        }

        debug!(count = groups.len(), pages = page, "listed groups via sudo");
        Ok(groups)
    }
}

fn sensitive_header(secret: &SecretString) -> Option<HeaderValue> {
    let mut value = HeaderValue::from_str(secret.expose_secret()).ok()?;
    value.set_sensitive(true);
    Some(value)
}

fn next_page(response: &Response) -> Option<u32> {
    response
        .headers()
        .get(NEXT_PAGE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    let body = response.bytes().await.map_err(|e| e.to_string())?;
    serde_json::from_slice(&body).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    fn client_for(server: &Server) -> GitlabClient {
        GitlabClient::new(&server.url(), &secret("service-key"), Duration::from_secs(5))
            .expect("client")
    }

    fn groups_query(page: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("sudo".into(), "alice".into()),
            Matcher::UrlEncoded("per_page".into(), "100".into()),
            Matcher::UrlEncoded("page".into(), page.into()),
        ])
    }

    #[test]
    fn new_appends_api_prefix() {
        let client = GitlabClient::new(
            "https://gitlab.example.com/",
            &secret("key"),
            Duration::from_secs(1),
        )
        .expect("client");
        assert_eq!(client.api_base(), "https://gitlab.example.com/api/v4");
    }

    #[test]
    fn new_rejects_non_http_url() {
        let err = GitlabClient::new("ftp://gitlab.example.com", &secret("key"), Duration::from_secs(1))
            .err()
            .expect("should fail");
        assert!(matches!(
            err.current_context(),
            ClientError::InvalidBaseUrl { .. }
        ));
    }

    #[test]
    fn new_rejects_unparseable_url() {
        assert!(GitlabClient::new("not a url", &secret("key"), Duration::from_secs(1)).is_err());
    }

    #[test]
    fn new_rejects_api_key_with_newline() {
        let err = GitlabClient::new(
            "https://gitlab.example.com",
            &secret("bad\nkey"),
            Duration::from_secs(1),
        )
        .err()
        .expect("should fail");
        assert_eq!(err.current_context(), &ClientError::InvalidApiKey);
    }

    #[tokio::test]
    async fn resolve_user_sends_user_token() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/user")
            .match_header("private-token", "user-token")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id": 7, "username": "alice", "email": "Alice@Example.com", "is_admin": false}"#,
            )
            .create_async()
            .await;

        let user = client_for(&server)
            .resolve_user_by_token(&secret("user-token"))
            .await
            .expect("lookup")
            .expect("user");

        mock.assert_async().await;
        assert_eq!(user.username, "alice");
        assert_eq!(user.email.as_deref(), Some("Alice@Example.com"));
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn resolve_user_unauthorized_is_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v4/user")
            .with_status(401)
            .with_body(r#"{"message": "401 Unauthorized"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .resolve_user_by_token(&secret("expired"))
            .await
            .expect_err("should fail");

        assert_eq!(
            err.current_context(),
            &IdentityLookupError::Rejected { status: 401 }
        );
    }

    #[tokio::test]
    async fn resolve_user_null_body_is_no_user() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v4/user")
            .with_status(200)
            .with_body("null")
            .create_async()
            .await;

        let user = client_for(&server)
            .resolve_user_by_token(&secret("user-token"))
            .await
            .expect("lookup");

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn resolve_user_garbage_body_is_invalid() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v4/user")
            .with_status(200)
            .with_body(r#"{"message": "not a user"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .resolve_user_by_token(&secret("user-token"))
            .await
            .expect_err("should fail");

        assert!(matches!(
            err.current_context(),
            IdentityLookupError::InvalidResponse { .. }
        ));
    }

    #[tokio::test]
    async fn resolve_user_malformed_token_never_hits_network() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/user")
            .expect(0)
            .create_async()
            .await;

        let err = client_for(&server)
            .resolve_user_by_token(&secret("line\nbreak"))
            .await
            .expect_err("should fail");

        mock.assert_async().await;
        assert_eq!(err.current_context(), &IdentityLookupError::MalformedToken);
    }

    #[tokio::test]
    async fn resolve_user_connection_refused_is_transport() {
        let client = GitlabClient::new(
            "http://127.0.0.1:1",
            &secret("service-key"),
            Duration::from_secs(2),
        )
        .expect("client");

        let err = client
            .resolve_user_by_token(&secret("user-token"))
            .await
            .expect_err("should fail");

        assert!(matches!(
            err.current_context(),
            IdentityLookupError::Transport { .. }
        ));
    }

    #[tokio::test]
    async fn list_groups_uses_service_key_and_follows_pages() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/api/v4/groups")
            .match_header("private-token", "service-key")
            .match_query(groups_query("1"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("x-next-page", "2")
            .with_body(r#"[{"id": 1, "name": "Dev Team", "path": "dev-team"}]"#)
            .create_async()
            .await;
        let second = server
            .mock("GET", "/api/v4/groups")
            .match_header("private-token", "service-key")
            .match_query(groups_query("2"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_header("x-next-page", "")
            .with_body(r#"[{"id": 2, "name": "QA", "path": "qa", "full_path": "org/qa"}]"#)
            .create_async()
            .await;

        let groups = client_for(&server)
            .list_groups_for_user("alice")
            .await
            .expect("groups");

        first.assert_async().await;
        second.assert_async().await;
        let paths: Vec<&str> = groups.iter().map(|g| g.path.as_str()).collect();
        assert_eq!(paths, vec!["dev-team", "qa"]);
    }

    #[tokio::test]
    async fn list_groups_empty_membership() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v4/groups")
            .match_query(groups_query("1"))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let groups = client_for(&server)
            .list_groups_for_user("alice")
            .await
            .expect("groups");

        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn list_groups_failure_on_later_page_fails_whole_call() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v4/groups")
            .match_query(groups_query("1"))
            .with_status(200)
            .with_header("x-next-page", "2")
            .with_body(r#"[{"id": 1, "name": "Dev Team", "path": "dev-team"}]"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v4/groups")
            .match_query(groups_query("2"))
            .with_status(500)
            .create_async()
            .await;

        let err = client_for(&server)
            .list_groups_for_user("alice")
            .await
            .expect_err("should fail");

        assert_eq!(
            err.current_context(),
            &GroupLookupError::Rejected {
                status: 500,
                page: 2
            }
        );
    }

    #[tokio::test]
    async fn list_groups_invalid_body() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v4/groups")
            .match_query(groups_query("1"))
            .with_status(200)
            .with_body(r#"{"message": "not a list"}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .list_groups_for_user("alice")
            .await
            .expect_err("should fail");

        assert!(matches!(
            err.current_context(),
            GroupLookupError::InvalidResponse { page: 1, .. }
        ));
    }
}
