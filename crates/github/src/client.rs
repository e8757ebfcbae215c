//! Minimal GraphQL-over-HTTPS client for the GitHub API.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::requests::GraphQlRequest;
use crate::GithubError;

/// Public GitHub GraphQL endpoint. GitHub Enterprise runners expose theirs as
/// `GITHUB_GRAPHQL_URL`.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("sponsor-gate/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------

/// A GitHub token. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw secret, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorMessage {
    message: String,
}

impl GraphQlResponse {
    /// Errors win over partial data: GitHub may return both, and a partial
    /// result would silently drop whatever failed.
    fn into_data(self) -> Result<serde_json::Value, GithubError> {
        if !self.errors.is_empty() {
            return Err(GithubError::GraphQl {
                messages: self.errors.into_iter().map(|e| e.message).collect(),
            });
        }
        self.data.ok_or(GithubError::MissingData)
    }
}

/// Decodes a GraphQL response body into its `data` object.
pub(crate) fn decode_response(body: &[u8]) -> Result<serde_json::Value, GithubError> {
    serde_json::from_slice::<GraphQlResponse>(body)?.into_data()
}

// ---------------------------------------------------------------------------

/// Sends [`GraphQlRequest`]s with one token.
///
/// Sponsor queries and mutations use different tokens (a personal access token
/// can read the owner's sponsorships, the workflow token acts on the
/// repository), so the runner builds one client per token.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    endpoint: String,
    token: AccessToken,
}

impl GithubClient {
    /// Creates a client for `endpoint` authenticating with `token`.
    pub fn new(token: AccessToken, endpoint: impl Into<String>) -> Result<Self, GithubError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token,
        })
    }

    /// Executes `request` and returns the `data` object of the response.
    #[instrument(skip_all, fields(operation = request.operation))]
    pub async fn execute(
        &self,
        request: &GraphQlRequest,
    ) -> Result<serde_json::Value, GithubError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(self.token.expose())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "GraphQL response received");

        if !status.is_success() {
            return Err(GithubError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        decode_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn token_debug_is_redacted() {
        let token = AccessToken::new("ghp_secret");
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
        assert_eq!(token.expose(), "ghp_secret");
    }

    #[test]
    fn returns_data_object() {
        let body = br#"{"data":{"viewer":{"login":"octocat"}}}"#;
        assert_eq!(
            decode_response(body).unwrap(),
            json!({ "viewer": { "login": "octocat" } })
        );
    }

    #[test]
    fn errors_take_precedence_over_partial_data() {
        let body = br#"{"data":{"viewer":null},"errors":[{"message":"Resource not accessible by integration","type":"FORBIDDEN"}]}"#;
        let err = decode_response(body).unwrap_err();
        assert!(matches!(
            err,
            GithubError::GraphQl { ref messages } if messages == &["Resource not accessible by integration"]
        ));
    }

    #[test]
    fn missing_data_is_an_error() {
        assert!(matches!(
            decode_response(b"{}").unwrap_err(),
            GithubError::MissingData
        ));
    }

    #[test]
    fn non_json_body_is_a_decode_error() {
        assert!(matches!(
            decode_response(b"<html>").unwrap_err(),
            GithubError::Decode(_)
        ));
    }

    #[test]
    fn client_builds() {
        let client = GithubClient::new(AccessToken::new("ghs_x"), DEFAULT_GRAPHQL_URL).unwrap();
        assert_eq!(client.endpoint, DEFAULT_GRAPHQL_URL);
    }
}
