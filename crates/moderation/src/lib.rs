//! Core moderation domain for Sponsor Gate.
//!
//! This crate contains every domain concept used to moderate issues and issue
//! comments by sponsorship status: typed webhook payloads, the resolved
//! configuration, the sponsor resolver, the policy engine, and the dispatcher
//! that executes decided mutations. Infrastructure crates implement the port
//! traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`Login`, `NodeId`) |
//! | [`types`] | Sponsors, roster, mutation intents, decisions |
//! | [`event`] | `issue_comment` / `issues` webhook payloads |
//! | [`config`] | Resolved configuration and invocation context |
//! | [`sponsors`] | Paginated sponsor fetch and exempt list parsing |
//! | [`policy`] | Comment and issues decisions |
//! | [`dispatch`] | Ordered execution of mutation intents |
//! | [`ports`] | `SponsorshipSource` and `IssueMutator` traits |
//! | [`errors`] | Run-fatal error type |

pub mod config;
pub mod dispatch;
pub mod errors;
pub mod event;
pub mod identifiers;
pub mod policy;
pub mod ports;
pub mod sponsors;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::{
    InvocationContext, LabelFilter, Messages, ModerationConfig, SponsorSettings,
    DEFAULT_EXEMPT_FILE_LOCATION, DEFAULT_ISSUE_LABEL, DEFAULT_NOT_SPONSOR_MESSAGE,
    DEFAULT_WELCOME_MESSAGE,
};
pub use errors::{ModerationError, Subject};
pub use event::{WebhookEvent, ISSUES_EVENT, ISSUE_COMMENT_EVENT};
pub use identifiers::{Login, NodeId};
pub use policy::{decide_for_comment, decide_for_issue};
pub use ports::{IssueMutator, SponsorScope, SponsorshipQuery, SponsorshipSource};
pub use sponsors::{fetch_github_sponsors, parse_exempt_sponsors, sponsor_scope};
pub use types::{
    Cents, Decision, MutationIntent, SkipReason, Sponsor, SponsorRoster, SponsorSource,
};
