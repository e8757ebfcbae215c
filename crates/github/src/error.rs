//! Transport-level errors for the GitHub GraphQL API.

use moderation::ModerationError;
use thiserror::Error;

/// Failures talking to `api.github.com/graphql`.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with a non-success status code.
    #[error("GitHub returned HTTP {status}: {body}")]
    Status {
        /// Numeric HTTP status.
        status: u16,
        /// Response body, as returned (usually a JSON error document).
        body: String,
    },

    /// The response carried a GraphQL `errors` array.
    #[error("GraphQL errors: {}", .messages.join("; "))]
    GraphQl {
        /// `message` of every reported error.
        messages: Vec<String>,
    },

    /// The response had neither `data` nor `errors`.
    #[error("GraphQL response contained no data")]
    MissingData,

    /// The response body was not a GraphQL JSON envelope.
    #[error("Could not decode GraphQL response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GithubError {
    /// Converts into the domain error for the given operation.
    pub fn into_moderation(self, operation: &'static str) -> ModerationError {
        ModerationError::Api {
            operation,
            message: self.to_string(),
        }
    }
}
