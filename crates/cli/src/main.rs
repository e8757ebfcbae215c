//! Sponsor Gate action entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Wire observability**: configure `tracing-subscriber` (compact or JSON
//!    on stderr) and, when an OTLP endpoint is configured, an OpenTelemetry
//!    exporter. All `tracing` spans and events emitted by every crate in the
//!    workspace flow through this layer.
//! 2. **Parse configuration**: read action inputs (`INPUT_*`) and the runner
//!    context (`GITHUB_*`), and validate the webhook payload.
//! 3. **Construct infrastructure**: one [`github::GithubClient`] per token:
//!    the personal access token reads sponsorships, the workflow token mutates
//!    issues.
//! 4. **Run and report**: resolve sponsors, decide, dispatch, then set the
//!    `result` output and exit code. Any error becomes `result=false`, an
//!    `::error::` annotation, and exit code 1.

mod config;
mod context;
mod exempt;
mod observability;
mod report;
mod runner;

use std::process::ExitCode;

use anyhow::{Context, Result};
use github::GithubClient;
use moderation::WebhookEvent;
use tracing::{error, info};

use crate::config::ActionConfig;
use crate::context::{read_event_payload, RunnerEnvironment};
use crate::report::StepOutputs;
use crate::runner::RunOutcome;

#[tokio::main]
async fn main() -> ExitCode {
    let telemetry = observability::init();
    let outputs = StepOutputs::from_env();

    let (success, code) = match execute().await {
        Ok(outcome) => {
            info!(%outcome, "Run complete");
            (true, ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "Run failed");
            report::error(&format!("{err:#}"));
            (false, ExitCode::FAILURE)
        }
    };

    if let Err(err) = outputs.set_result(success) {
        error!(error = %format!("{err:#}"), "Could not write step output");
    }

    telemetry.shutdown();
    code
}

async fn execute() -> Result<RunOutcome> {
    let config = ActionConfig::from_env()?;
    let environment = RunnerEnvironment::from_env()?;

    report::group("Configuration", || info!(?config, "Configuration"));
    report::group("Context", || info!(?environment, "Context"));

    let payload = read_event_payload(&environment.event_path)?;
    let event = WebhookEvent::parse(&environment.context.event_name, payload)?;

    let sponsor_client = GithubClient::new(
        config.personal_access_token.clone(),
        environment.graphql_url.clone(),
    )
    .context("failed to build GitHub client")?;
    let mutation_client = GithubClient::new(
        config.workflow_token.clone(),
        environment.graphql_url.clone(),
    )
    .context("failed to build GitHub client")?;

    let outcome = runner::run(
        &config,
        &environment.context,
        event,
        &sponsor_client,
        &mutation_client,
        &mut std::io::stdout(),
    )
    .await?;

    Ok(outcome)
}
