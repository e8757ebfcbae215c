//! Policy engine: maps a validated webhook event to a [`Decision`].
//!
//! Both entry points are pure. They never perform I/O; the returned intents
//! are executed afterwards by [`crate::dispatch::apply`].
//!
//! Outcomes fall into three groups:
//!
//! - `Ok(Decision::Apply(..))`: mutations to run, in order.
//! - `Ok(Decision::Skip(..))`: the event is in scope but needs no action.
//! - `Err(..)`: unsupported actions, disabled policies, and missing users.
//!   These fail the run without mutating anything.

use tracing::debug;

use crate::event::{
    AuthorAssociation, IssueCommentAction, IssueCommentEvent, IssuesAction, IssuesEvent,
};
use crate::{
    Decision, ModerationConfig, ModerationError, MutationIntent, SkipReason, SponsorRoster,
    Subject, ISSUES_EVENT, ISSUE_COMMENT_EVENT,
};

/// Decides what to do with an `issue_comment` event.
///
/// Comments are deleted when `limit_commenter` is on, the issue passes the
/// label filter, and the commenter is neither the issue author nor the
/// repository owner.
pub fn decide_for_comment(
    event: &IssueCommentEvent,
    config: &ModerationConfig,
) -> Result<Decision, ModerationError> {
    match event.action {
        IssueCommentAction::Created | IssueCommentAction::Edited => {}
        other => {
            return Err(ModerationError::UnsupportedAction {
                event: ISSUE_COMMENT_EVENT,
                action: other.as_str(),
            })
        }
    }

    if !config.limit_commenter {
        return Err(ModerationError::PolicyDisabled {
            policy: "ISSUE_LIMIT_COMMENTER",
        });
    }

    if !config.issue_labels.matches(&event.issue.labels) {
        return Ok(Decision::Skip(SkipReason::LabelFilterMismatch));
    }

    let commenter = event
        .comment
        .user
        .as_ref()
        .ok_or(ModerationError::MissingUser {
            subject: Subject::Comment,
        })?;
    let author = event.issue.user.as_ref().ok_or(ModerationError::MissingUser {
        subject: Subject::Issue,
    })?;

    if commenter.login == author.login
        || event.comment.author_association == AuthorAssociation::Owner
    {
        debug!(commenter = %commenter.login, "Comment allowed");
        return Ok(Decision::Skip(SkipReason::CommenterIsAuthorOrOwner));
    }

    debug!(commenter = %commenter.login, author = %author.login, "Comment will be removed");
    Ok(Decision::Apply(vec![MutationIntent::DeleteIssueComment {
        comment_id: event.comment.node_id.clone(),
    }]))
}

/// Decides what to do with an `issues` event.
///
/// - `opened`: sponsors and the owner get the welcome comment; everyone else
///   gets the rejection comment and the issue is closed and locked.
/// - `closed`: the issue is locked when `lock_on_close` is on and it is not
///   locked already.
pub fn decide_for_issue(
    event: &IssuesEvent,
    config: &ModerationConfig,
    sponsors: &SponsorRoster,
) -> Result<Decision, ModerationError> {
    if !matches!(event.action, IssuesAction::Opened | IssuesAction::Closed) {
        return Err(ModerationError::UnsupportedAction {
            event: ISSUES_EVENT,
            action: event.action.as_str(),
        });
    }

    let issue = &event.issue;

    if !config.issue_labels.matches(&issue.labels) {
        return Ok(Decision::Skip(SkipReason::LabelFilterMismatch));
    }

    if event.action == IssuesAction::Opened {
        let opener = issue.user.as_ref().ok_or(ModerationError::MissingUser {
            subject: Subject::Issue,
        })?;

        let is_sponsor = sponsors.contains(&opener.login);
        let is_owner = issue.author_association == AuthorAssociation::Owner;
        debug!(opener = %opener.login, is_sponsor, is_owner, "Evaluated issue opener");

        if is_sponsor || is_owner {
            return Ok(Decision::Apply(vec![MutationIntent::AddComment {
                subject_id: issue.node_id.clone(),
                body: config.messages.welcome.clone(),
            }]));
        }

        return Ok(Decision::Apply(vec![
            MutationIntent::AddComment {
                subject_id: issue.node_id.clone(),
                body: config.messages.not_sponsor.clone(),
            },
            MutationIntent::CloseIssue {
                issue_id: issue.node_id.clone(),
            },
            MutationIntent::LockLockable {
                lockable_id: issue.node_id.clone(),
            },
        ]));
    }

    if !config.lock_on_close {
        return Err(ModerationError::PolicyDisabled {
            policy: "ISSUE_LOCK_ON_CLOSE",
        });
    }

    if issue.locked {
        return Ok(Decision::Skip(SkipReason::AlreadyLocked));
    }

    Ok(Decision::Apply(vec![MutationIntent::LockLockable {
        lockable_id: issue.node_id.clone(),
    }]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Comment, CommentedIssue, Issue, Label, User};
    use crate::{Cents, LabelFilter, Login, Messages, NodeId, Sponsor, SponsorSettings};

    fn config() -> ModerationConfig {
        ModerationConfig {
            issue_labels: LabelFilter::any(),
            limit_commenter: true,
            lock_on_close: true,
            messages: Messages {
                welcome: "welcome".into(),
                not_sponsor: "sponsor first".into(),
            },
            sponsors: SponsorSettings::default(),
        }
    }

    fn user(login: &str) -> Option<User> {
        Some(User {
            login: Login::new(login).unwrap(),
        })
    }

    fn label(name: &str) -> Label {
        Label {
            id: 1,
            node_id: "LA_1".into(),
            url: "https://example.invalid".into(),
            name: name.into(),
            color: "ffffff".into(),
            default: false,
            description: None,
        }
    }

    fn issue_id() -> NodeId {
        NodeId::new("I_1").unwrap()
    }

    fn issues_event(
        action: IssuesAction,
        opener: &str,
        association: AuthorAssociation,
    ) -> IssuesEvent {
        IssuesEvent {
            action,
            issue: Issue {
                author_association: association,
                labels: vec![label("support")],
                locked: false,
                node_id: issue_id(),
                user: user(opener),
            },
        }
    }

    fn comment_event(
        commenter: &str,
        author: &str,
        association: AuthorAssociation,
    ) -> IssueCommentEvent {
        IssueCommentEvent {
            action: IssueCommentAction::Created,
            comment: Comment {
                author_association: association,
                node_id: NodeId::new("IC_1").unwrap(),
                user: user(commenter),
            },
            issue: CommentedIssue {
                labels: vec![label("support")],
                user: user(author),
            },
        }
    }

    fn roster(logins: &[&str]) -> SponsorRoster {
        logins
            .iter()
            .map(|l| Sponsor::from_github(Login::new(*l).unwrap(), Cents::new(500)))
            .collect()
    }

    // -----------------------------------------------------------------------
    // issues: opened
    // -----------------------------------------------------------------------

    #[test]
    fn sponsor_opening_issue_is_welcomed() {
        let event = issues_event(IssuesAction::Opened, "alice", AuthorAssociation::NoAssociation);

        let decision = decide_for_issue(&event, &config(), &roster(&["alice"])).unwrap();

        assert_eq!(
            decision,
            Decision::Apply(vec![MutationIntent::AddComment {
                subject_id: issue_id(),
                body: "welcome".into(),
            }])
        );
    }

    #[test]
    fn owner_opening_issue_is_welcomed_without_sponsoring() {
        let event = issues_event(IssuesAction::Opened, "maintainer", AuthorAssociation::Owner);

        let decision = decide_for_issue(&event, &config(), &SponsorRoster::default()).unwrap();

        assert_eq!(decision.intents().len(), 1);
        assert!(matches!(
            &decision.intents()[0],
            MutationIntent::AddComment { body, .. } if body == "welcome"
        ));
    }

    #[test]
    fn non_sponsor_issue_is_commented_closed_and_locked_in_order() {
        let event = issues_event(IssuesAction::Opened, "mallory", AuthorAssociation::Contributor);

        let decision = decide_for_issue(&event, &config(), &roster(&["alice"])).unwrap();

        assert_eq!(
            decision.into_intents(),
            vec![
                MutationIntent::AddComment {
                    subject_id: issue_id(),
                    body: "sponsor first".into(),
                },
                MutationIntent::CloseIssue { issue_id: issue_id() },
                MutationIntent::LockLockable { lockable_id: issue_id() },
            ]
        );
    }

    #[test]
    fn sponsor_match_is_case_sensitive() {
        let event = issues_event(IssuesAction::Opened, "Alice", AuthorAssociation::NoAssociation);

        let decision = decide_for_issue(&event, &config(), &roster(&["alice"])).unwrap();

        assert_eq!(decision.intents().len(), 3);
    }

    #[test]
    fn opened_issue_without_user_fails() {
        let mut event = issues_event(IssuesAction::Opened, "alice", AuthorAssociation::Owner);
        event.issue.user = None;

        let err = decide_for_issue(&event, &config(), &roster(&["alice"])).unwrap_err();

        assert!(matches!(
            err,
            ModerationError::MissingUser { subject: Subject::Issue }
        ));
    }

    // -----------------------------------------------------------------------
    // issues: closed
    // -----------------------------------------------------------------------

    #[test]
    fn closed_issue_is_locked() {
        let event = issues_event(IssuesAction::Closed, "alice", AuthorAssociation::NoAssociation);

        let decision = decide_for_issue(&event, &config(), &SponsorRoster::default()).unwrap();

        assert_eq!(
            decision,
            Decision::Apply(vec![MutationIntent::LockLockable { lockable_id: issue_id() }])
        );
    }

    #[test]
    fn closed_issue_with_lock_on_close_disabled_fails_without_intents() {
        let event = issues_event(IssuesAction::Closed, "alice", AuthorAssociation::NoAssociation);
        let config = ModerationConfig {
            lock_on_close: false,
            ..config()
        };

        let err = decide_for_issue(&event, &config, &SponsorRoster::default()).unwrap_err();

        assert!(matches!(err, ModerationError::PolicyDisabled { .. }));
    }

    #[test]
    fn closed_and_already_locked_issue_is_skipped_every_time() {
        let mut event =
            issues_event(IssuesAction::Closed, "alice", AuthorAssociation::NoAssociation);
        event.issue.locked = true;

        for _ in 0..2 {
            let decision = decide_for_issue(&event, &config(), &SponsorRoster::default()).unwrap();
            assert_eq!(decision, Decision::Skip(SkipReason::AlreadyLocked));
        }
    }

    #[test]
    fn closed_issue_without_user_is_still_locked() {
        let mut event =
            issues_event(IssuesAction::Closed, "alice", AuthorAssociation::NoAssociation);
        event.issue.user = None;

        let decision = decide_for_issue(&event, &config(), &SponsorRoster::default()).unwrap();

        assert_eq!(decision.intents().len(), 1);
    }

    #[test]
    fn other_issue_actions_are_unsupported() {
        let event = issues_event(IssuesAction::Labeled, "alice", AuthorAssociation::Owner);

        let err = decide_for_issue(&event, &config(), &SponsorRoster::default()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Unsupported action \"labeled\" for \"issues\" events"
        );
    }

    #[test]
    fn label_filter_mismatch_skips_issue_events() {
        let config = ModerationConfig {
            issue_labels: ["bug"].into_iter().collect(),
            ..config()
        };
        let mut event =
            issues_event(IssuesAction::Opened, "mallory", AuthorAssociation::NoAssociation);
        event.issue.labels = vec![label("docs")];

        let decision = decide_for_issue(&event, &config, &SponsorRoster::default()).unwrap();

        assert_eq!(decision, Decision::Skip(SkipReason::LabelFilterMismatch));
    }

    // -----------------------------------------------------------------------
    // issue_comment
    // -----------------------------------------------------------------------

    #[test]
    fn stranger_comment_is_deleted() {
        let event = comment_event("mallory", "alice", AuthorAssociation::Member);

        let decision = decide_for_comment(&event, &config()).unwrap();

        assert_eq!(
            decision,
            Decision::Apply(vec![MutationIntent::DeleteIssueComment {
                comment_id: NodeId::new("IC_1").unwrap(),
            }])
        );
    }

    #[test]
    fn edited_comment_is_handled_like_created() {
        let mut event = comment_event("mallory", "alice", AuthorAssociation::NoAssociation);
        event.action = IssueCommentAction::Edited;

        let decision = decide_for_comment(&event, &config()).unwrap();

        assert_eq!(decision.intents().len(), 1);
    }

    #[test]
    fn issue_author_may_comment_regardless_of_association() {
        let event = comment_event("alice", "alice", AuthorAssociation::NoAssociation);

        let decision = decide_for_comment(&event, &config()).unwrap();

        assert_eq!(decision, Decision::Skip(SkipReason::CommenterIsAuthorOrOwner));
    }

    #[test]
    fn owner_may_comment_on_any_issue() {
        let event = comment_event("maintainer", "alice", AuthorAssociation::Owner);

        let decision = decide_for_comment(&event, &config()).unwrap();

        assert!(decision.intents().is_empty());
    }

    #[test]
    fn comment_policy_disabled_fails_without_intents() {
        let event = comment_event("mallory", "alice", AuthorAssociation::NoAssociation);
        let config = ModerationConfig {
            limit_commenter: false,
            ..config()
        };

        let err = decide_for_comment(&event, &config).unwrap_err();

        assert_eq!(err.to_string(), "ISSUE_LIMIT_COMMENTER is disabled");
    }

    #[test]
    fn deleted_comment_action_is_unsupported() {
        let mut event = comment_event("mallory", "alice", AuthorAssociation::NoAssociation);
        event.action = IssueCommentAction::Deleted;

        let err = decide_for_comment(&event, &config()).unwrap_err();

        assert!(matches!(
            err,
            ModerationError::UnsupportedAction { action: "deleted", .. }
        ));
    }

    #[test]
    fn label_filter_mismatch_skips_comment_events() {
        let config = ModerationConfig {
            issue_labels: ["bug"].into_iter().collect(),
            ..config()
        };
        let mut event = comment_event("mallory", "alice", AuthorAssociation::NoAssociation);
        event.issue.labels = vec![label("docs")];

        let decision = decide_for_comment(&event, &config).unwrap();

        assert_eq!(decision, Decision::Skip(SkipReason::LabelFilterMismatch));
    }

    #[test]
    fn comment_without_user_fails() {
        let mut event = comment_event("mallory", "alice", AuthorAssociation::NoAssociation);
        event.comment.user = None;

        let err = decide_for_comment(&event, &config()).unwrap_err();
        assert!(matches!(
            err,
            ModerationError::MissingUser { subject: Subject::Comment }
        ));

        let mut event = comment_event("mallory", "alice", AuthorAssociation::Owner);
        event.issue.user = None;

        let err = decide_for_comment(&event, &config()).unwrap_err();
        assert!(matches!(
            err,
            ModerationError::MissingUser { subject: Subject::Issue }
        ));
    }
}
