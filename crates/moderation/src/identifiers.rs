//! Newtype identifiers for GitHub entities.
//!
//! A GitHub login and a GraphQL node id are both strings on the wire, but they
//! are never interchangeable: logins are matched against the sponsor roster,
//! node ids are the targets of mutations. Wrapping each in its own newtype keeps
//! a [`Login`] from ever being passed where a [`NodeId`] is expected.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display, and
// serde impls that reject empty strings the same way new() does.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = &'static str;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value).ok_or(concat!(stringify!($name), " must not be empty"))
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id! {
    /// A GitHub user or organization login (e.g. `"octocat"`).
    ///
    /// Comparison is case-sensitive. GitHub reports logins in their canonical
    /// casing in both webhook payloads and the sponsorship API, so no
    /// normalisation is applied.
    Login
}

string_id! {
    /// A GraphQL global node id (e.g. `"I_kwDOABCD5M5abc"`).
    ///
    /// Issues, issue comments, and other lockables are all addressed by node id
    /// in mutations.
    NodeId
}
