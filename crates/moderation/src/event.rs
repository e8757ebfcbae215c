//! Typed webhook payloads for the `issue_comment` and `issues` events.
//!
//! Deserialisation is the validation boundary: a payload that does not match
//! these shapes (unknown action, unknown author association, missing field) is
//! rejected by [`WebhookEvent::parse`] and never reaches the policy engine.
//! Only the fields the policies read are modelled; everything else in the
//! webhook body is ignored.

use serde::{Deserialize, Serialize};

use crate::{Login, ModerationError, NodeId};

/// `GITHUB_EVENT_NAME` for issue comment webhooks.
pub const ISSUE_COMMENT_EVENT: &str = "issue_comment";

/// `GITHUB_EVENT_NAME` for issue webhooks.
pub const ISSUES_EVENT: &str = "issues";

// ---------------------------------------------------------------------------
// Shared payload fragments
// ---------------------------------------------------------------------------

/// The relationship GitHub reports between a user and the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorAssociation {
    Collaborator,
    Contributor,
    FirstTimer,
    FirstTimeContributor,
    Mannequin,
    Member,
    #[serde(rename = "NONE")]
    NoAssociation,
    Owner,
}

/// The `user` object attached to issues and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: Login,
}

/// An issue label as delivered in webhook payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: u64,
    pub node_id: String,
    pub url: String,
    pub name: String,
    pub color: String,
    pub default: bool,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// issue_comment
// ---------------------------------------------------------------------------

/// `action` values of the `issue_comment` webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCommentAction {
    Created,
    Edited,
    Deleted,
}

impl IssueCommentAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Edited => "edited",
            Self::Deleted => "deleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub author_association: AuthorAssociation,
    pub node_id: NodeId,
    /// `null` when the account that wrote the comment has been deleted.
    pub user: Option<User>,
}

/// The issue a comment belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentedIssue {
    pub labels: Vec<Label>,
    pub user: Option<User>,
}

/// Payload of an `issue_comment` webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCommentEvent {
    pub action: IssueCommentAction,
    pub comment: Comment,
    pub issue: CommentedIssue,
}

// ---------------------------------------------------------------------------
// issues
// ---------------------------------------------------------------------------

/// `action` values of the `issues` webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssuesAction {
    Assigned,
    Closed,
    Deleted,
    Demilestoned,
    Edited,
    Labeled,
    Locked,
    Milestoned,
    Opened,
    Pinned,
    Reopened,
    Transferred,
    Unassigned,
    Unlabeled,
    Unlocked,
    Unpinned,
}

impl IssuesAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Closed => "closed",
            Self::Deleted => "deleted",
            Self::Demilestoned => "demilestoned",
            Self::Edited => "edited",
            Self::Labeled => "labeled",
            Self::Locked => "locked",
            Self::Milestoned => "milestoned",
            Self::Opened => "opened",
            Self::Pinned => "pinned",
            Self::Reopened => "reopened",
            Self::Transferred => "transferred",
            Self::Unassigned => "unassigned",
            Self::Unlabeled => "unlabeled",
            Self::Unlocked => "unlocked",
            Self::Unpinned => "unpinned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub author_association: AuthorAssociation,
    pub labels: Vec<Label>,
    pub locked: bool,
    pub node_id: NodeId,
    pub user: Option<User>,
}

/// Payload of an `issues` webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuesEvent {
    pub action: IssuesAction,
    pub issue: Issue,
}

// ---------------------------------------------------------------------------
// Dispatch on event name
// ---------------------------------------------------------------------------

/// A validated webhook payload for one of the supported events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    IssueComment(IssueCommentEvent),
    Issues(IssuesEvent),
}

impl WebhookEvent {
    /// Validates `payload` against the schema for `event_name`.
    ///
    /// # Errors
    ///
    /// - [`ModerationError::UnsupportedEvent`] for any event other than
    ///   `issue_comment` and `issues`.
    /// - [`ModerationError::EmptyPayload`] when the payload is an empty object.
    /// - [`ModerationError::InvalidPayload`] when the payload does not match
    ///   the event schema.
    pub fn parse(event_name: &str, payload: serde_json::Value) -> Result<Self, ModerationError> {
        let event: &'static str = match event_name {
            ISSUE_COMMENT_EVENT => ISSUE_COMMENT_EVENT,
            ISSUES_EVENT => ISSUES_EVENT,
            other => {
                return Err(ModerationError::UnsupportedEvent {
                    event: other.to_string(),
                })
            }
        };

        let is_empty = match &payload {
            serde_json::Value::Null => true,
            serde_json::Value::Object(map) => map.is_empty(),
            _ => false,
        };
        if is_empty {
            return Err(ModerationError::EmptyPayload { event });
        }

        let invalid = |source: serde_json::Error| ModerationError::InvalidPayload {
            event,
            message: source.to_string(),
        };

        if event == ISSUE_COMMENT_EVENT {
            serde_json::from_value(payload)
                .map(Self::IssueComment)
                .map_err(invalid)
        } else {
            serde_json::from_value(payload)
                .map(Self::Issues)
                .map_err(invalid)
        }
    }

    /// The `GITHUB_EVENT_NAME` this payload belongs to.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IssueComment(_) => ISSUE_COMMENT_EVENT,
            Self::Issues(_) => ISSUES_EVENT,
        }
    }
}
