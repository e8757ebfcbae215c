//! Port traits implemented by infrastructure crates.
//!
//! The domain defines *what* it needs from GitHub; the `github` crate defines
//! *how* to supply it. Tests supply in-memory fakes.

use async_trait::async_trait;

use crate::{Login, ModerationError, NodeId};

/// Number of sponsorships requested per page.
pub const SPONSORSHIP_PAGE_SIZE: u32 = 100;

/// Whose sponsorships to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SponsorScope {
    /// The account that owns the query token.
    Viewer,
    /// The named organization.
    Organization(Login),
}

impl SponsorScope {
    /// Top-level GraphQL field the sponsorship connection hangs off.
    pub fn root_field(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Organization(_) => "organization",
        }
    }
}

/// Arguments for one page of `sponsorshipsAsMaintainer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorshipQuery {
    /// Account whose sponsors are listed.
    pub scope: SponsorScope,
    /// Page size.
    pub first: u32,
    /// Exclude sponsorships that have ended.
    pub active_only: bool,
    /// `endCursor` of the previous page; `None` for the first page.
    pub after: Option<String>,
}

/// Source of raw sponsorship pages.
///
/// Implementations return the GraphQL `data` object as-is. Shape validation is
/// done by the resolver so that a malformed page degrades to partial results
/// instead of failing the run; transport failures are returned as errors.
#[async_trait]
pub trait SponsorshipSource: Send + Sync {
    async fn sponsorships_page(
        &self,
        query: &SponsorshipQuery,
    ) -> Result<serde_json::Value, ModerationError>;
}

/// The four GitHub mutations the policies can request.
#[async_trait]
pub trait IssueMutator: Send + Sync {
    /// Posts a comment with `body` on the subject.
    async fn add_comment(&self, subject_id: &NodeId, body: &str) -> Result<(), ModerationError>;

    /// Closes an issue.
    async fn close_issue(&self, issue_id: &NodeId) -> Result<(), ModerationError>;

    /// Locks an issue or pull request.
    async fn lock_lockable(&self, lockable_id: &NodeId) -> Result<(), ModerationError>;

    /// Deletes an issue comment.
    async fn delete_issue_comment(&self, comment_id: &NodeId) -> Result<(), ModerationError>;
}
