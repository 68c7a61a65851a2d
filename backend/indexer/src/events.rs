//! Canonical event types emitted by the carbon credit ledger contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/carbon_credit/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the ledger contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A project was registered (`created` topic).
    ProjectCreated,
    /// The owner verified a project (`verified` topic).
    ProjectVerified,
    /// Credits were issued to a holder (`minted` topic).
    CreditsMinted,
    /// Credits moved between holders (`transfer` topic).
    CreditsTransferred,
    /// Credits were permanently retired (`retired` topic).
    CreditsRetired,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::ProjectCreated,
            "verified" => Self::ProjectVerified,
            "minted" => Self::CreditsMinted,
            "transfer" => Self::CreditsTransferred,
            "retired" => Self::CreditsRetired,
            _ => Self::Unknown,
        }
    }

    /// Inverse of [`EventKind::as_str`], for rows read back from the database.
    pub fn from_stored(event_type: &str) -> Self {
        match event_type {
            "project_created" => Self::ProjectCreated,
            "project_verified" => Self::ProjectVerified,
            "credits_minted" => Self::CreditsMinted,
            "credits_transferred" => Self::CreditsTransferred,
            "credits_retired" => Self::CreditsRetired,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectCreated => "project_created",
            Self::ProjectVerified => "project_verified",
            Self::CreditsMinted => "credits_minted",
            Self::CreditsTransferred => "credits_transferred",
            Self::CreditsRetired => "credits_retired",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded ledger event, ready to be stored in the database.
///
/// `actor` is the address the event is primarily about (recipient of a
/// mint, sender of a transfer, holder of a retirement, verifier);
/// `counterparty` is only set for transfers and holds the receiver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarbonEvent {
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    pub actor: Option<String>,
    pub counterparty: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// An event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    pub actor: Option<String>,
    pub counterparty: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
