//! Typed GraphQL request builders.
//!
//! Each builder produces a fixed document plus a `variables` object. User data
//! (comment bodies, node ids, logins, cursors) only ever travels in
//! `variables`, never spliced into the document text.

use moderation::{NodeId, SponsorScope, SponsorshipQuery};
use serde::Serialize;
use serde_json::json;

/// A GraphQL document with its variables, ready to POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub variables: serde_json::Value,

    /// Query or mutation name, for logs and errors.
    #[serde(skip)]
    pub operation: &'static str,
}

// ---------------------------------------------------------------------------
// Sponsorships
// ---------------------------------------------------------------------------

// The fragment must travel in the same document as the operation using it,
// so it is spliced in at compile time.
macro_rules! sponsorship_page_fragment {
    () => {
        r#"
fragment SponsorshipPage on SponsorshipConnection {
  nodes {
    sponsorEntity {
      ... on User { login }
      ... on Organization { login }
    }
    tier { monthlyPriceInCents }
  }
  pageInfo { endCursor hasNextPage }
  totalCount
}
"#
    };
}

const VIEWER_SPONSORSHIPS: &str = concat!(
    r#"
query ViewerSponsorships($first: Int!, $after: String, $activeOnly: Boolean!) {
  viewer {
    sponsorshipsAsMaintainer(first: $first, after: $after, includePrivate: true, activeOnly: $activeOnly) {
      ...SponsorshipPage
    }
  }
}
"#,
    sponsorship_page_fragment!()
);

const ORGANIZATION_SPONSORSHIPS: &str = concat!(
    r#"
query OrganizationSponsorships($login: String!, $first: Int!, $after: String, $activeOnly: Boolean!) {
  organization(login: $login) {
    sponsorshipsAsMaintainer(first: $first, after: $after, includePrivate: true, activeOnly: $activeOnly) {
      ...SponsorshipPage
    }
  }
}
"#,
    sponsorship_page_fragment!()
);

/// One page of `sponsorshipsAsMaintainer` for the viewer or an organization.
pub fn sponsorships(query: &SponsorshipQuery) -> GraphQlRequest {
    let document = match query.scope {
        SponsorScope::Viewer => VIEWER_SPONSORSHIPS,
        SponsorScope::Organization(_) => ORGANIZATION_SPONSORSHIPS,
    };

    let mut variables = json!({
        "first": query.first,
        "after": query.after,
        "activeOnly": query.active_only,
    });
    if let SponsorScope::Organization(login) = &query.scope {
        variables["login"] = json!(login.as_str());
    }

    GraphQlRequest {
        query: document,
        variables,
        operation: "sponsorshipsAsMaintainer",
    }
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// `addComment(input: {subjectId, body})`.
pub fn add_comment(subject_id: &NodeId, body: &str) -> GraphQlRequest {
    GraphQlRequest {
        query: r#"
mutation AddComment($subjectId: ID!, $body: String!) {
  addComment(input: {subjectId: $subjectId, body: $body}) {
    subject { id }
  }
}
"#,
        variables: json!({ "subjectId": subject_id.as_str(), "body": body }),
        operation: "addComment",
    }
}

/// `closeIssue(input: {issueId})`.
pub fn close_issue(issue_id: &NodeId) -> GraphQlRequest {
    GraphQlRequest {
        query: r#"
mutation CloseIssue($issueId: ID!) {
  closeIssue(input: {issueId: $issueId}) {
    issue { id }
  }
}
"#,
        variables: json!({ "issueId": issue_id.as_str() }),
        operation: "closeIssue",
    }
}

/// `lockLockable(input: {lockableId})`.
pub fn lock_lockable(lockable_id: &NodeId) -> GraphQlRequest {
    GraphQlRequest {
        query: r#"
mutation LockLockable($lockableId: ID!) {
  lockLockable(input: {lockableId: $lockableId}) {
    lockedRecord { locked }
  }
}
"#,
        variables: json!({ "lockableId": lockable_id.as_str() }),
        operation: "lockLockable",
    }
}

/// `deleteIssueComment(input: {id})`.
pub fn delete_issue_comment(comment_id: &NodeId) -> GraphQlRequest {
    GraphQlRequest {
        query: r#"
mutation DeleteIssueComment($id: ID!) {
  deleteIssueComment(input: {id: $id}) {
    clientMutationId
  }
}
"#,
        variables: json!({ "id": comment_id.as_str() }),
        operation: "deleteIssueComment",
    }
}
