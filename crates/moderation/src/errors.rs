//! Top-level error type for the moderation domain.
//!
//! Every variant is fatal for the current run: the runner reports
//! `result=false` with the variant's message and exits non-zero. Recoverable
//! conditions (a sponsorship page that fails validation, a missing exempt file)
//! never surface as errors; they are handled where they occur.
//!
//! Transport-level errors are defined in the `github` crate and converted into
//! [`ModerationError::Api`] at the port boundary.

use thiserror::Error;

/// The webhook object whose `user` is required but missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Issue,
    Comment,
}

impl std::fmt::Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Issue => f.write_str("issue"),
            Self::Comment => f.write_str("comment"),
        }
    }
}

/// Conditions that abort the run.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// An action input is missing or malformed.
    ///
    /// Produced at load time; no event is processed with an invalid config.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// Organization mode is enabled but no repository owner login was supplied.
    #[error("Organization mode enabled, but the repository owner login is not available")]
    OrganizationOwnerMissing,

    /// The run was triggered by an event this action does not handle.
    #[error("Unknown or unsupported event ({event})")]
    UnsupportedEvent {
        /// `GITHUB_EVENT_NAME` of the run.
        event: String,
    },

    /// The event payload is an empty object.
    #[error("The payload for \"{event}\" is empty")]
    EmptyPayload {
        /// Event name the payload was read for.
        event: &'static str,
    },

    /// The event payload does not match the expected schema.
    #[error("The payload for \"{event}\" is invalid: {message}")]
    InvalidPayload {
        /// Event name the payload was read for.
        event: &'static str,
        /// Deserialiser diagnostic.
        message: String,
    },

    /// The webhook action is valid but not one the policy acts on.
    ///
    /// Reported as a failure rather than a skip so that a workflow subscribed
    /// to more action types than needed fails loudly.
    #[error("Unsupported action \"{action}\" for \"{event}\" events")]
    UnsupportedAction {
        /// Event name.
        event: &'static str,
        /// Webhook `action` value.
        action: &'static str,
    },

    /// The policy that would handle this event is switched off in the config.
    #[error("{policy} is disabled")]
    PolicyDisabled {
        /// Action input controlling the policy.
        policy: &'static str,
    },

    /// The payload has no `user` where ownership must be established.
    #[error("The {subject} has no user, cannot determine its author")]
    MissingUser {
        /// Object whose user is missing.
        subject: Subject,
    },

    /// A GitHub API call failed.
    #[error("GitHub API call {operation} failed: {message}")]
    Api {
        /// GraphQL query or mutation name.
        operation: &'static str,
        /// Underlying transport or GraphQL error.
        message: String,
    },
}
