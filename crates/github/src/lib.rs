//! Sponsor Gate GitHub infrastructure adapter.
//!
//! Implements the port traits defined in the [`moderation`] crate
//! ([`moderation::SponsorshipSource`] and [`moderation::IssueMutator`]) over
//! GitHub's GraphQL API using `reqwest`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! Authentication, request construction, and response envelopes are handled
//! here; the [`moderation`] crate never sees them. Pagination and validation
//! of sponsorship pages stay in the domain so the degrade-to-partial-results
//! behaviour is testable without a network.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`client`] | `GithubClient`, `AccessToken`, response envelope handling |
//! | [`requests`] | Typed query and mutation builders |
//! | [`error`] | `GithubError` |

pub mod client;
pub mod error;
pub mod requests;

use async_trait::async_trait;
use moderation::{IssueMutator, ModerationError, NodeId, SponsorshipQuery, SponsorshipSource};

pub use client::{AccessToken, GithubClient, DEFAULT_GRAPHQL_URL};
pub use error::GithubError;
pub use requests::GraphQlRequest;

impl GithubClient {
    async fn run(&self, request: GraphQlRequest) -> Result<serde_json::Value, ModerationError> {
        let operation = request.operation;
        self.execute(&request)
            .await
            .map_err(|e| e.into_moderation(operation))
    }
}

#[async_trait]
impl SponsorshipSource for GithubClient {
    async fn sponsorships_page(
        &self,
        query: &SponsorshipQuery,
    ) -> Result<serde_json::Value, ModerationError> {
        self.run(requests::sponsorships(query)).await
    }
}

#[async_trait]
impl IssueMutator for GithubClient {
    async fn add_comment(&self, subject_id: &NodeId, body: &str) -> Result<(), ModerationError> {
        self.run(requests::add_comment(subject_id, body)).await?;
        Ok(())
    }

    async fn close_issue(&self, issue_id: &NodeId) -> Result<(), ModerationError> {
        self.run(requests::close_issue(issue_id)).await?;
        Ok(())
    }

    async fn lock_lockable(&self, lockable_id: &NodeId) -> Result<(), ModerationError> {
        self.run(requests::lock_lockable(lockable_id)).await?;
        Ok(())
    }

    async fn delete_issue_comment(&self, comment_id: &NodeId) -> Result<(), ModerationError> {
        self.run(requests::delete_issue_comment(comment_id)).await?;
        Ok(())
    }
}
