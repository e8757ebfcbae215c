//! Runner-provided facts about the current workflow run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use github::DEFAULT_GRAPHQL_URL;
use moderation::{InvocationContext, Login};

/// Everything read from `GITHUB_*` variables (as opposed to action inputs).
#[derive(Debug, Clone)]
pub struct RunnerEnvironment {
    pub context: InvocationContext,

    /// `GITHUB_EVENT_PATH`: JSON file holding the webhook payload.
    pub event_path: PathBuf,

    /// `GITHUB_GRAPHQL_URL`, falling back to the public API.
    pub graphql_url: String,
}

impl RunnerEnvironment {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|value| !value.is_empty());

        let event_name = present("GITHUB_EVENT_NAME").context("GITHUB_EVENT_NAME is not set")?;
        let event_path = present("GITHUB_EVENT_PATH").context("GITHUB_EVENT_PATH is not set")?;

        Ok(Self {
            context: InvocationContext {
                event_name,
                repository_owner: present("GITHUB_REPOSITORY_OWNER").and_then(Login::new),
            },
            event_path: PathBuf::from(event_path),
            graphql_url: present("GITHUB_GRAPHQL_URL")
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
        })
    }
}

/// Reads the webhook payload JSON.
pub fn read_event_payload(path: &Path) -> Result<serde_json::Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read event payload {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("event payload {} is not valid JSON", path.display()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_context_and_defaults_graphql_url() {
        let env = RunnerEnvironment::from_lookup(lookup(&[
            ("GITHUB_EVENT_NAME", "issues"),
            ("GITHUB_EVENT_PATH", "/tmp/event.json"),
            ("GITHUB_REPOSITORY_OWNER", "acme"),
        ]))
        .unwrap();

        assert_eq!(env.context.event_name, "issues");
        assert_eq!(env.context.repository_owner, Login::new("acme"));
        assert_eq!(env.event_path, PathBuf::from("/tmp/event.json"));
        assert_eq!(env.graphql_url, DEFAULT_GRAPHQL_URL);
    }

    #[test]
    fn owner_is_optional() {
        let env = RunnerEnvironment::from_lookup(lookup(&[
            ("GITHUB_EVENT_NAME", "issue_comment"),
            ("GITHUB_EVENT_PATH", "/tmp/event.json"),
            ("GITHUB_REPOSITORY_OWNER", ""),
            ("GITHUB_GRAPHQL_URL", "https://ghe.example.com/api/graphql"),
        ]))
        .unwrap();

        assert!(env.context.repository_owner.is_none());
        assert_eq!(env.graphql_url, "https://ghe.example.com/api/graphql");
    }

    #[test]
    fn event_name_is_required() {
        let err = RunnerEnvironment::from_lookup(lookup(&[("GITHUB_EVENT_PATH", "/tmp/e.json")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "GITHUB_EVENT_NAME is not set");
    }

    #[test]
    fn reads_payload_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"action":"opened"}}"#).unwrap();

        let payload = read_event_payload(file.path()).unwrap();

        assert_eq!(payload["action"], "opened");
    }

    #[test]
    fn missing_payload_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_event_payload(&dir.path().join("absent.json")).is_err());
    }
}
