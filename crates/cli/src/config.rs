//! Action inputs → [`ActionConfig`].
//!
//! GitHub Actions exposes each `with:` input as an `INPUT_<NAME>` environment
//! variable. Parsing goes through an injectable lookup so tests never touch
//! the process environment.

use std::path::PathBuf;

use github::AccessToken;
use moderation::{
    Cents, LabelFilter, Messages, ModerationConfig, ModerationError, SponsorSettings,
    DEFAULT_EXEMPT_FILE_LOCATION, DEFAULT_ISSUE_LABEL, DEFAULT_NOT_SPONSOR_MESSAGE,
    DEFAULT_WELCOME_MESSAGE,
};

/// Fully validated configuration for one run.
#[derive(Debug, Clone)]
pub struct ActionConfig {
    /// Reads the owner's sponsorships.
    pub personal_access_token: AccessToken,

    /// Comments on, closes, and locks issues; deletes comments.
    pub workflow_token: AccessToken,

    pub moderation: ModerationConfig,

    /// Log decided mutations instead of executing them.
    pub dry_run: bool,
}

impl ActionConfig {
    /// Reads inputs from `INPUT_*` environment variables.
    pub fn from_env() -> Result<Self, ModerationError> {
        Self::from_inputs(|name| std::env::var(format!("INPUT_{name}")).ok())
    }

    /// Builds the config from a lookup keyed by input name
    /// (e.g. `"ISSUE_LABELS"`). Values are trimmed; absent and empty are
    /// treated alike.
    pub fn from_inputs<F>(lookup: F) -> Result<Self, ModerationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let input = |name: &str| lookup(name).map(|v| v.trim().to_string()).unwrap_or_default();

        let personal_access_token = token(
            "GITHUB_PERSONAL_ACCESS_TOKEN",
            input("GITHUB_PERSONAL_ACCESS_TOKEN"),
            &["ghp_", "github_pat_"],
        )?;
        let workflow_token = token(
            "GITHUB_WORKFLOW_TOKEN",
            input("GITHUB_WORKFLOW_TOKEN"),
            &["ghs_"],
        )?;

        let issue_labels: LabelFilter = or_default(input("ISSUE_LABELS"), DEFAULT_ISSUE_LABEL)
            .split(',')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .collect();

        let moderation = ModerationConfig {
            issue_labels,
            limit_commenter: boolean("ISSUE_LIMIT_COMMENTER", &input("ISSUE_LIMIT_COMMENTER"))?,
            lock_on_close: boolean("ISSUE_LOCK_ON_CLOSE", &input("ISSUE_LOCK_ON_CLOSE"))?,
            messages: Messages {
                welcome: or_default(input("ISSUE_MESSAGE_WELCOME"), DEFAULT_WELCOME_MESSAGE),
                not_sponsor: or_default(
                    input("ISSUE_MESSAGE_NOT_SPONSOR"),
                    DEFAULT_NOT_SPONSOR_MESSAGE,
                ),
            },
            sponsors: SponsorSettings {
                is_organization: boolean("IS_ORGANIZATION", &input("IS_ORGANIZATION"))?,
                active_only: boolean("SPONSOR_ACTIVE_ONLY", &input("SPONSOR_ACTIVE_ONLY"))?,
                exempt_file: PathBuf::from(or_default(
                    input("SPONSOR_EXEMPT_FILE_LOCATION"),
                    DEFAULT_EXEMPT_FILE_LOCATION,
                )),
                minimum: cents("SPONSOR_MINIMUM", &input("SPONSOR_MINIMUM"))?,
            },
        };

        let dry_run = match input("DRY_RUN").as_str() {
            "" => false,
            value => boolean("DRY_RUN", value)?,
        };

        Ok(Self {
            personal_access_token,
            workflow_token,
            moderation,
            dry_run,
        })
    }
}

fn invalid(name: &str, problem: impl std::fmt::Display) -> ModerationError {
    ModerationError::Configuration {
        message: format!("{name} {problem}"),
    }
}

fn token(name: &str, value: String, prefixes: &[&str]) -> Result<AccessToken, ModerationError> {
    if value.is_empty() {
        return Err(invalid(name, "is required"));
    }
    if !prefixes.iter().any(|prefix| value.starts_with(prefix)) {
        return Err(invalid(
            name,
            format_args!("must start with {}", prefixes.join(" or ")),
        ));
    }
    Ok(AccessToken::new(value))
}

fn boolean(name: &str, value: &str) -> Result<bool, ModerationError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(invalid(
            name,
            format_args!("must be \"true\" or \"false\", got {other:?}"),
        )),
    }
}

fn cents(name: &str, value: &str) -> Result<Cents, ModerationError> {
    if value.is_empty() {
        return Ok(Cents::default());
    }
    value
        .parse::<u64>()
        .map(Cents::new)
        .map_err(|_| invalid(name, format_args!("must be a whole number of cents, got {value:?}")))
}

fn or_default(value: String, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}
