//! Per-project credit accounting derived from indexed events.
//!
//! The contract only exposes current balances; the summary replays the
//! event history to show how much was ever minted, moved and retired.

use serde::Serialize;

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, EventRecord};

/// Amounts are `i128` on-chain, so they are serialised as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub project_id: String,
    pub total_credits: Option<String>,
    pub verified: bool,
    pub minted: String,
    pub transferred: String,
    pub retired: String,
    /// Credits still in circulation: minted minus retired.
    pub outstanding: String,
    pub event_count: usize,
}

/// Fold a project's events (in ledger order) into a [`ProjectSummary`].
pub fn summarize(project_id: &str, events: &[EventRecord]) -> Result<ProjectSummary> {
    let mut total_credits = None;
    let mut verified = false;
    let mut minted: i128 = 0;
    let mut transferred: i128 = 0;
    let mut retired: i128 = 0;

    for event in events {
        match EventKind::from_stored(&event.event_type) {
            EventKind::ProjectCreated => total_credits = Some(parse_amount(event)?),
            EventKind::ProjectVerified => verified = true,
            EventKind::CreditsMinted => {
                minted = checked(minted.checked_add(parse_amount(event)?), event)?;
            }
            EventKind::CreditsTransferred => {
                transferred = checked(transferred.checked_add(parse_amount(event)?), event)?;
            }
            EventKind::CreditsRetired => {
                retired = checked(retired.checked_add(parse_amount(event)?), event)?;
            }
            EventKind::Unknown => {}
        }
    }

    Ok(ProjectSummary {
        project_id: project_id.to_string(),
        total_credits: total_credits.map(|c: i128| c.to_string()),
        verified,
        minted: minted.to_string(),
        transferred: transferred.to_string(),
        retired: retired.to_string(),
        outstanding: (minted - retired).to_string(),
        event_count: events.len(),
    })
}

fn parse_amount(event: &EventRecord) -> Result<i128> {
    let raw = event.amount.as_deref().ok_or_else(|| {
        IndexerError::EventParse(format!("{} without amount", event.event_id))
    })?;
    raw.parse()
        .map_err(|_| IndexerError::EventParse(format!("{}: bad amount {raw:?}", event.event_id)))
}

fn checked(sum: Option<i128>, event: &EventRecord) -> Result<i128> {
    sum.ok_or_else(|| IndexerError::EventParse(format!("{}: amount overflow", event.event_id)))
}
