//! Resolved, immutable configuration consumed by the policy engine and the
//! sponsor resolver.
//!
//! Parsing action inputs into these types happens in the `cli` crate; by the
//! time a [`ModerationConfig`] exists every value has been validated and every
//! default applied.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use crate::event::Label;
use crate::{Cents, Login};

/// Comment posted on issues opened by a sponsor or the owner.
pub const DEFAULT_WELCOME_MESSAGE: &str = "Thank you for your support! We appreciate your sponsorship and are here to help. We will review your issue and get back to you as soon as possible.";

/// Comment posted on issues opened by anyone else, before closing them.
pub const DEFAULT_NOT_SPONSOR_MESSAGE: &str = "Apologies! Only sponsoring users are allowed to open issues. Please sponsor the owner of this repository, then try again.";

/// Label an issue must carry when `ISSUE_LABELS` is left empty.
pub const DEFAULT_ISSUE_LABEL: &str = "support";

/// Exempt file location used when the input is left empty.
pub const DEFAULT_EXEMPT_FILE_LOCATION: &str = "./SPONSOR_EXEMPT";

// ---------------------------------------------------------------------------

/// Everything the policies and resolver need to know about this repository's setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModerationConfig {
    /// Labels an issue must carry (any one of) for the action to touch it.
    /// Empty means every issue is in scope.
    pub issue_labels: LabelFilter,

    /// Delete comments from anyone except the issue author and the owner.
    pub limit_commenter: bool,

    /// Lock issues when they are closed.
    pub lock_on_close: bool,

    /// Comment bodies posted by the issues policy.
    pub messages: Messages,

    /// How the sponsor roster is assembled.
    pub sponsors: SponsorSettings,
}

/// Comment bodies posted on newly opened issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Messages {
    /// Posted on issues opened by a sponsor or the owner.
    pub welcome: String,

    /// Posted on issues opened by anyone else, before they are closed.
    pub not_sponsor: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            welcome: DEFAULT_WELCOME_MESSAGE.to_string(),
            not_sponsor: DEFAULT_NOT_SPONSOR_MESSAGE.to_string(),
        }
    }
}

/// Sponsor roster settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SponsorSettings {
    /// Query the repository owner organization's sponsorships instead of the
    /// token owner's (`viewer`).
    pub is_organization: bool,

    /// Only count sponsorships that are currently active.
    pub active_only: bool,

    /// Path of the exempt list, one login per line.
    pub exempt_file: PathBuf,

    /// Sponsorships with a lower monthly tier price are ignored.
    pub minimum: Cents,
}

impl Default for SponsorSettings {
    fn default() -> Self {
        Self {
            is_organization: false,
            active_only: false,
            exempt_file: PathBuf::from(DEFAULT_EXEMPT_FILE_LOCATION),
            minimum: Cents::default(),
        }
    }
}

// ---------------------------------------------------------------------------

/// The set of labels that puts an issue in scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelFilter(BTreeSet<String>);

impl LabelFilter {
    /// A filter that matches every issue.
    pub fn any() -> Self {
        Self::default()
    }

    /// Returns `true` when no labels are configured.
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if the filter is unrestricted or any of `labels` is in it.
    pub fn matches(&self, labels: &[Label]) -> bool {
        self.is_unrestricted() || labels.iter().any(|label| self.0.contains(&label.name))
    }
}

impl<S: Into<String>> FromIterator<S> for LabelFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------

/// Facts about the current workflow run that come from the runner
/// environment rather than from action inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationContext {
    /// `GITHUB_EVENT_NAME`.
    pub event_name: String,

    /// `GITHUB_REPOSITORY_OWNER`. Required only in organization mode.
    pub repository_owner: Option<Login>,
}
