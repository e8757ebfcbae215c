//! Sponsor resolution: paginated API fetch plus the exempt list.
//!
//! [`fetch_github_sponsors`] walks `sponsorshipsAsMaintainer` one page at a
//! time through a [`SponsorshipSource`]. Pages are requested strictly in
//! sequence; results keep page order.
//!
//! A page whose body does not match the expected shape ends pagination and
//! the sponsors gathered so far are returned. This is the only place the
//! resolver degrades instead of failing; transport errors still propagate.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::ports::{SponsorScope, SponsorshipQuery, SponsorshipSource, SPONSORSHIP_PAGE_SIZE};
use crate::{Cents, InvocationContext, Login, ModerationError, Sponsor, SponsorSettings};

// ---------------------------------------------------------------------------
// Page shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsorshipPage {
    nodes: Vec<SponsorshipNode>,
    page_info: PageInfo,
    total_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsorshipNode {
    sponsor_entity: Option<SponsorEntity>,
    tier: Option<Tier>,
}

#[derive(Debug, Deserialize)]
struct SponsorEntity {
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Tier {
    monthly_price_in_cents: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

impl SponsorshipNode {
    /// Converts the node into a sponsor, or `None` when it lacks a login or a
    /// tier price, or falls below `minimum`.
    fn into_sponsor(self, minimum: Cents) -> Option<Sponsor> {
        let login = self.sponsor_entity?.login.and_then(Login::new)?;
        let amount = Cents::new(self.tier?.monthly_price_in_cents?);
        if amount < minimum {
            return None;
        }
        Some(Sponsor::from_github(login, amount))
    }
}

/// Picks `<root>.sponsorshipsAsMaintainer` out of the response and validates it.
fn parse_page(data: &serde_json::Value, scope: &SponsorScope) -> Result<SponsorshipPage, String> {
    let connection = data
        .get(scope.root_field())
        .and_then(|root| root.get("sponsorshipsAsMaintainer"))
        .ok_or_else(|| format!("missing {}.sponsorshipsAsMaintainer", scope.root_field()))?;
    SponsorshipPage::deserialize(connection).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Determines whose sponsorships to query.
///
/// # Errors
///
/// [`ModerationError::OrganizationOwnerMissing`] when organization mode is on
/// but the context carries no repository owner.
pub fn sponsor_scope(
    settings: &SponsorSettings,
    context: &InvocationContext,
) -> Result<SponsorScope, ModerationError> {
    if !settings.is_organization {
        return Ok(SponsorScope::Viewer);
    }
    context
        .repository_owner
        .clone()
        .map(SponsorScope::Organization)
        .ok_or(ModerationError::OrganizationOwnerMissing)
}

/// Fetches every qualifying sponsor from the GitHub API.
///
/// Nodes without a login or tier price, and nodes whose tier price is below
/// `settings.minimum`, are dropped.
pub async fn fetch_github_sponsors<S>(
    source: &S,
    settings: &SponsorSettings,
    context: &InvocationContext,
) -> Result<Vec<Sponsor>, ModerationError>
where
    S: SponsorshipSource + ?Sized,
{
    let scope = sponsor_scope(settings, context)?;
    let mut sponsors = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_number = 0_u32;

    loop {
        page_number += 1;
        let query = SponsorshipQuery {
            scope: scope.clone(),
            first: SPONSORSHIP_PAGE_SIZE,
            active_only: settings.active_only,
            after: cursor.take(),
        };

        let data = source.sponsorships_page(&query).await?;
        let page = match parse_page(&data, &scope) {
            Ok(page) => page,
            Err(reason) => {
                warn!(
                    page = page_number,
                    reason = %reason,
                    kept = sponsors.len(),
                    "Sponsorship page failed validation, keeping earlier results"
                );
                break;
            }
        };

        let fetched = page.nodes.len();
        sponsors.extend(
            page.nodes
                .into_iter()
                .filter_map(|node| node.into_sponsor(settings.minimum)),
        );
        debug!(
            page = page_number,
            fetched,
            accumulated = sponsors.len(),
            total_count = page.total_count,
            "Fetched sponsorship page"
        );

        match (page.page_info.has_next_page, page.page_info.end_cursor) {
            (true, Some(end_cursor)) => cursor = Some(end_cursor),
            (true, None) => {
                warn!(page = page_number, "hasNextPage without endCursor, stopping");
                break;
            }
            (false, _) => break,
        }
    }

    Ok(sponsors)
}

/// Parses the exempt list: one login per line, blank lines ignored.
pub fn parse_exempt_sponsors(contents: &str) -> Vec<Sponsor> {
    contents
        .lines()
        .filter_map(|line| Login::new(line.trim()))
        .map(Sponsor::exempt)
        .collect()
}
