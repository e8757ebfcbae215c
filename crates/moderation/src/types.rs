//! Shared value types for the moderation domain.
//!
//! Sponsors and the roster built from them, the mutation intents produced by the
//! policy engine, and the [`Decision`] that wraps them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Login, NodeId};

// ---------------------------------------------------------------------------
// Money
// ---------------------------------------------------------------------------

/// A monthly sponsorship amount in US cents.
///
/// GitHub reports tier prices as `monthlyPriceInCents`; the configured
/// minimum uses the same unit so the two compare directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(u64);

impl Cents {
    /// Creates a [`Cents`] amount from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Cents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ---------------------------------------------------------------------------
// Sponsors
// ---------------------------------------------------------------------------

/// Where a [`Sponsor`] entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SponsorSource {
    /// Listed in the local exempt file.
    ExemptFile,
    /// Returned by the GitHub sponsorships API.
    GithubApi,
}

/// One entity permitted to open issues without restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsor {
    /// Origin of this entry.
    #[serde(rename = "type")]
    pub source: SponsorSource,

    /// Login matched against issue openers.
    pub login: Login,

    /// Monthly tier price. `None` for exempt-file entries.
    pub amount: Option<Cents>,
}

impl Sponsor {
    /// Creates an entry backed by an API sponsorship at the given tier price.
    pub fn from_github(login: Login, amount: Cents) -> Self {
        Self {
            source: SponsorSource::GithubApi,
            login,
            amount: Some(amount),
        }
    }

    /// Creates an entry backed by a line of the exempt file.
    pub fn exempt(login: Login) -> Self {
        Self {
            source: SponsorSource::ExemptFile,
            login,
            amount: None,
        }
    }
}

// ---------------------------------------------------------------------------

/// The merged list of sponsors for one run.
///
/// Entries keep their source order (API pages first, then exempt entries) and
/// are not de-duplicated: a login present in both sources appears twice. All
/// policy checks go through [`SponsorRoster::contains`], which only cares about
/// membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SponsorRoster {
    entries: Vec<Sponsor>,
    #[serde(skip)]
    logins: HashSet<Login>,
}

impl SponsorRoster {
    /// Builds a roster by concatenating API results and exempt entries, in that order.
    pub fn merge(github: Vec<Sponsor>, exempt: Vec<Sponsor>) -> Self {
        github.into_iter().chain(exempt).collect()
    }

    /// Returns `true` if `login` matches any entry exactly.
    pub fn contains(&self, login: &Login) -> bool {
        self.logins.contains(login)
    }

    /// Returns every entry in roster order.
    pub fn entries(&self) -> &[Sponsor] {
        &self.entries
    }

    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the roster has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Sponsor> for SponsorRoster {
    fn from_iter<I: IntoIterator<Item = Sponsor>>(iter: I) -> Self {
        let entries: Vec<Sponsor> = iter.into_iter().collect();
        let logins = entries.iter().map(|s| s.login.clone()).collect();
        Self { entries, logins }
    }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// A decided, not-yet-executed GitHub mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MutationIntent {
    /// `addComment(subjectId, body)`.
    AddComment {
        /// Issue (or other commentable) the comment is posted on.
        subject_id: NodeId,
        /// Markdown body of the comment.
        body: String,
    },
    /// `closeIssue(issueId)`.
    CloseIssue {
        /// Issue to close.
        issue_id: NodeId,
    },
    /// `lockLockable(lockableId)`.
    LockLockable {
        /// Issue or pull request to lock.
        lockable_id: NodeId,
    },
    /// `deleteIssueComment(id)`.
    DeleteIssueComment {
        /// Comment to delete.
        comment_id: NodeId,
    },
}

impl MutationIntent {
    /// GraphQL mutation name, used for logging and error context.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::AddComment { .. } => "addComment",
            Self::CloseIssue { .. } => "closeIssue",
            Self::LockLockable { .. } => "lockLockable",
            Self::DeleteIssueComment { .. } => "deleteIssueComment",
        }
    }

    /// Node the mutation targets.
    pub fn target(&self) -> &NodeId {
        match self {
            Self::AddComment { subject_id, .. } => subject_id,
            Self::CloseIssue { issue_id } => issue_id,
            Self::LockLockable { lockable_id } => lockable_id,
            Self::DeleteIssueComment { comment_id } => comment_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Decisions
// ---------------------------------------------------------------------------

/// Why a supported event produced no mutations.
///
/// Skips are successful outcomes; conditions that must fail the run are
/// [`crate::ModerationError`] values instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The issue carries none of the configured labels.
    LabelFilterMismatch,
    /// The comment author opened the issue or owns the repository.
    CommenterIsAuthorOrOwner,
    /// The closed issue is already locked.
    AlreadyLocked,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::LabelFilterMismatch => "issue does not carry any of the configured labels",
            Self::CommenterIsAuthorOrOwner => {
                "comment was written by the issue author or the repository owner"
            }
            Self::AlreadyLocked => "issue is already locked",
        };
        f.write_str(text)
    }
}

/// Outcome of running a policy over one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "detail", rename_all = "snake_case")]
pub enum Decision {
    /// Nothing to do; the run still succeeds.
    Skip(SkipReason),
    /// Execute these intents in order.
    Apply(Vec<MutationIntent>),
}

impl Decision {
    /// Intents to execute. Empty for [`Decision::Skip`].
    pub fn intents(&self) -> &[MutationIntent] {
        match self {
            Self::Skip(_) => &[],
            Self::Apply(intents) => intents,
        }
    }

    /// Consumes the decision, returning its intents.
    pub fn into_intents(self) -> Vec<MutationIntent> {
        match self {
            Self::Skip(_) => Vec::new(),
            Self::Apply(intents) => intents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(value: &str) -> Login {
        Login::new(value).unwrap()
    }

    #[test]
    fn merge_keeps_source_order_and_duplicates() {
        let roster = SponsorRoster::merge(
            vec![
                Sponsor::from_github(login("alice"), Cents::new(500)),
                Sponsor::from_github(login("carol"), Cents::new(100)),
            ],
            vec![Sponsor::exempt(login("alice")), Sponsor::exempt(login("bob"))],
        );

        let logins: Vec<&str> = roster.entries().iter().map(|s| s.login.as_str()).collect();
        assert_eq!(logins, ["alice", "carol", "alice", "bob"]);
        assert_eq!(roster.len(), 4);
        assert!(roster.contains(&login("bob")));
        assert!(!roster.contains(&login("Bob")));
    }

    #[test]
    fn cents_display_as_dollars() {
        assert_eq!(Cents::new(499).to_string(), "$4.99");
        assert_eq!(Cents::new(10_000).to_string(), "$100.00");
    }

    #[test]
    fn sponsor_serialises_with_source_tag() {
        let json = serde_json::to_value(Sponsor::exempt(login("bob"))).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "exempt-file", "login": "bob", "amount": null })
        );
    }

    #[test]
    fn skip_has_no_intents() {
        assert!(Decision::Skip(SkipReason::AlreadyLocked).intents().is_empty());
    }
}
