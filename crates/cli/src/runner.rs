//! One run: resolve sponsors, decide, dispatch.

use std::io::{self, Write};

use moderation::dispatch;
use moderation::{
    decide_for_comment, decide_for_issue, fetch_github_sponsors, Decision, InvocationContext,
    IssueMutator, ModerationError, SponsorRoster, SponsorSettings, SponsorshipSource,
    WebhookEvent,
};
use tracing::{debug, info, info_span, Instrument};

use crate::config::ActionConfig;
use crate::exempt::load_exempt_sponsors;
use crate::report;

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub event: &'static str,
    pub decision: Decision,
    /// Intents executed. Zero for skips and dry runs.
    pub applied: usize,
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.decision {
            Decision::Skip(reason) => write!(f, "Skipped {} event: {reason}", self.event),
            Decision::Apply(intents) if self.applied < intents.len() => write!(
                f,
                "Dry run for {} event, {} mutation(s) not applied",
                self.event,
                intents.len()
            ),
            Decision::Apply(_) => write!(
                f,
                "Applied {} mutation(s) for {} event",
                self.applied, self.event
            ),
        }
    }
}

/// Builds the sponsor roster: API sponsors first, then exempt-file entries.
pub async fn resolve_sponsors<S>(
    source: &S,
    settings: &SponsorSettings,
    context: &InvocationContext,
) -> Result<SponsorRoster, ModerationError>
where
    S: SponsorshipSource + ?Sized,
{
    let github = fetch_github_sponsors(source, settings, context).await?;
    let exempt = load_exempt_sponsors(&settings.exempt_file);
    debug!(
        github = github.len(),
        exempt = exempt.len(),
        "Resolved sponsor sources"
    );
    Ok(SponsorRoster::merge(github, exempt))
}

/// Writes the roster as a `Sponsors` group, one entry per line.
fn write_sponsors<W: Write + ?Sized>(out: &mut W, roster: &SponsorRoster) -> io::Result<()> {
    report::start_group(out, "Sponsors")?;
    for sponsor in roster.entries() {
        match sponsor.amount {
            Some(amount) => {
                writeln!(out, "{} (GitHub Sponsors, {amount}/month)", sponsor.login)?
            }
            None => writeln!(out, "{} (exempt list)", sponsor.login)?,
        }
    }
    if roster.is_empty() {
        writeln!(out, "No sponsors")?;
    }
    report::end_group(out)
}

async fn decide_and_apply<M>(
    config: &ActionConfig,
    event: &WebhookEvent,
    sponsors: &SponsorRoster,
    mutator: &M,
) -> Result<(Decision, usize), ModerationError>
where
    M: IssueMutator + ?Sized,
{
    let decision = match event {
        WebhookEvent::IssueComment(comment) => decide_for_comment(comment, &config.moderation)?,
        WebhookEvent::Issues(issues) => decide_for_issue(issues, &config.moderation, sponsors)?,
    };
    info!(?decision, "Decision");

    let applied = if config.dry_run {
        for intent in decision.intents() {
            info!(
                operation = intent.operation(),
                node = %intent.target(),
                "Dry run, not applying"
            );
        }
        0
    } else {
        dispatch::apply(mutator, decision.intents()).await?
    };
    Ok((decision, applied))
}

/// Processes one validated event, writing workflow command groups to `out`.
///
/// Sponsors are only resolved for `issues` events; the comment policy does
/// not consult them. The roster is dumped in a `Sponsors` group, then the
/// decision and its mutations run inside a `Running` group.
pub async fn run<S, M>(
    config: &ActionConfig,
    context: &InvocationContext,
    event: WebhookEvent,
    source: &S,
    mutator: &M,
    out: &mut (dyn Write + Send),
) -> Result<RunOutcome, ModerationError>
where
    S: SponsorshipSource + ?Sized,
    M: IssueMutator + ?Sized,
{
    let name = event.name();
    let span = info_span!("run", event = name);

    async move {
        let sponsors = match &event {
            WebhookEvent::Issues(_) => {
                let roster =
                    resolve_sponsors(source, &config.moderation.sponsors, context).await?;
                info!(count = roster.len(), "Sponsor roster resolved");
                report::emit(write_sponsors(out, &roster));
                roster
            }
            WebhookEvent::IssueComment(_) => SponsorRoster::default(),
        };

        report::emit(report::start_group(out, "Running"));
        let result = decide_and_apply(config, &event, &sponsors, mutator).await;
        report::emit(report::end_group(out));
        let (decision, applied) = result?;

        Ok::<_, ModerationError>(RunOutcome {
            event: name,
            decision,
            applied,
        })
    }
    .instrument(span)
    .await
}
