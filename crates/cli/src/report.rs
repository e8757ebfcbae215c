//! GitHub Actions workflow commands and step outputs.
//!
//! Workflow commands (`::error::`, `::group::`) go to stdout, where the runner
//! scans for them. Step outputs are appended to the file named by
//! `GITHUB_OUTPUT`.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

/// Escapes a workflow command message so multi-line text stays one command.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Marks the step as failed with `message` in the run summary.
pub fn error(message: &str) {
    println!("::error::{}", escape_data(message));
}

/// Opens a collapsible log group. Groups do not nest.
pub fn start_group<W: Write + ?Sized>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "::group::{}", escape_data(title))
}

pub fn end_group<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out, "::endgroup::")
}

/// Logs a failed workflow command write. The run itself carries on.
pub fn emit(result: io::Result<()>) {
    if let Err(error) = result {
        warn!(%error, "Could not write workflow command");
    }
}

/// Runs `f` inside a collapsible log group on stdout.
pub fn group<T>(title: &str, f: impl FnOnce() -> T) -> T {
    let mut stdout = io::stdout();
    emit(start_group(&mut stdout, title));
    let value = f();
    emit(end_group(&mut stdout));
    value
}

/// Writer for step outputs.
#[derive(Debug, Clone, Default)]
pub struct StepOutputs {
    path: Option<PathBuf>,
}

impl StepOutputs {
    pub fn from_env() -> Self {
        Self {
            path: std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from),
        }
    }

    #[cfg(test)]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Appends `name=value`. A no-op outside of Actions (no `GITHUB_OUTPUT`).
    pub fn set(&self, name: &str, value: impl std::fmt::Display) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        writeln!(file, "{name}={value}")
            .with_context(|| format!("failed to write output {name}"))?;
        Ok(())
    }

    /// Sets the `result` output.
    pub fn set_result(&self, success: bool) -> Result<()> {
        self.set("result", success)
    }
}
