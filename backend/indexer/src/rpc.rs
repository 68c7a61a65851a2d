//! Soroban RPC client: polls `getEvents` and decodes carbon credit ledger events.
//!
//! Events are requested with `xdrFormat: "json"`, so topics and data arrive
//! as JSON-encoded `ScVal`s (`{"symbol":"minted"}`, `{"u64":"1"}`, and
//! contract structs as `{"map":[{"key":..,"val":..}]}`) instead of base64 XDR.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or rate-limit
//!   response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried silently.
//! * Events from contract calls that ultimately failed are dropped during decoding.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{CarbonEvent, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// JSON-RPC "invalid request" and "method not found": retrying cannot help.
const HARD_RPC_ERRORS: [i64; 2] = [-32600, -32601];

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// Topic list as JSON-encoded `ScVal`s.
    #[serde(rename = "topicJson", default)]
    pub topic_json: Vec<Value>,
    /// Event data as a JSON-encoded `ScVal`.
    #[serde(rename = "valueJson", default)]
    pub value_json: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch a page of events from the RPC.
///
/// * `start_ledger`: the ledger sequence to scan from (inclusive).
/// * `cursor`: optional opaque pagination cursor from a previous response.
/// * `limit`: maximum number of events to return.
///
/// Returns the page of events together with the next pagination cursor and
/// the latest ledger the RPC knows about.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventsResult> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let params = build_params(contract_id, start_ledger, cursor, limit);

        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params,
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                back_off(&mut backoff).await;
                continue;
            }
            Ok(resp) => {
                let status = resp.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    warn!("Rate-limited by RPC (will retry in {backoff}s)");
                    back_off(&mut backoff).await;
                    continue;
                }

                let body: RpcResponse = resp.json().await?;

                if let Some(err) = body.error {
                    if HARD_RPC_ERRORS.contains(&err.code) {
                        return Err(IndexerError::EventParse(format!(
                            "RPC hard error {}: {}",
                            err.code, err.message
                        )));
                    }
                    warn!(
                        "RPC soft error (will retry in {backoff}s): {} {}",
                        err.code, err.message
                    );
                    back_off(&mut backoff).await;
                    continue;
                }

                let result = body.result.ok_or_else(|| {
                    IndexerError::EventParse("Empty result from getEvents".to_string())
                })?;

                debug!(
                    "Fetched {} events (latest_ledger={:?})",
                    result.events.len(),
                    result.latest_ledger
                );

                return Ok(result);
            }
        }
    }
}

/// Sleep for the current back-off period, then double it (capped).
async fn back_off(backoff: &mut u64) {
    tokio::time::sleep(Duration::from_secs(*backoff)).await;
    *backoff = next_backoff(*backoff);
}

fn next_backoff(current: u64) -> u64 {
    (current * 2).min(MAX_BACKOFF_SECS)
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`CarbonEvent`] structs.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<CarbonEvent> {
    raw.iter()
        .enumerate()
        .filter(|(_, e)| e.in_successful_contract_call != Some(false))
        .filter_map(|(index, e)| decode_single(e, contract_id, index))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str, index: usize) -> Option<CarbonEvent> {
    // The leading topic symbol determines the event type.
    let first_topic = raw.topic_json.first()?;
    let kind = scalar(first_topic)
        .map(|symbol| EventKind::from_topic(&symbol))
        .unwrap_or(EventKind::Unknown);

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    // The RPC id is unique per event; the paging token is its older alias.
    let event_id = raw
        .id
        .clone()
        .or_else(|| raw.paging_token.clone())
        .unwrap_or_else(|| {
            format!(
                "{ledger}-{}-{index}",
                raw.tx_hash.as_deref().unwrap_or("notx")
            )
        });

    let project_id = raw.topic_json.get(1).and_then(scalar);

    let (actor, counterparty, amount) = decode_data(&raw.value_json, &kind);

    Some(CarbonEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        project_id,
        actor,
        counterparty,
        amount,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

type DecodedData = (Option<String>, Option<String>, Option<String>);

/// Pull `(actor, counterparty, amount)` out of the event data. Contract
/// event structs arrive as `ScVal` maps keyed by field-name symbols.
fn decode_data(value: &Value, kind: &EventKind) -> DecodedData {
    match kind {
        EventKind::ProjectCreated => (None, None, map_field(value, "total_credits")),
        EventKind::ProjectVerified => (map_field(value, "verifier"), None, None),
        EventKind::CreditsMinted => (
            map_field(value, "recipient"),
            None,
            map_field(value, "amount"),
        ),
        EventKind::CreditsTransferred => (
            map_field(value, "from"),
            map_field(value, "to"),
            map_field(value, "amount"),
        ),
        EventKind::CreditsRetired => (
            map_field(value, "holder"),
            None,
            map_field(value, "amount"),
        ),
        EventKind::Unknown => (None, None, None),
    }
}

/// Look up `key` in an `ScVal` map and render its value with [`scalar`].
fn map_field(value: &Value, key: &str) -> Option<String> {
    value
        .get("map")?
        .as_array()?
        .iter()
        .find(|entry| entry.get("key").and_then(scalar).as_deref() == Some(key))?
        .get("val")
        .and_then(scalar)
}

/// Render a scalar `ScVal` (`{"<type>": <value>}`) as a plain string.
///
/// Integers may be encoded as strings or numbers; 128-bit integers may also
/// arrive split into `{"hi":..,"lo":..}` parts.
fn scalar(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    let (tag, inner) = map.iter().next()?;
    match (tag.as_str(), inner) {
        ("symbol" | "string" | "address", Value::String(s)) => Some(s.clone()),
        ("u32" | "i32" | "u64" | "i64" | "u128" | "i128", Value::String(s)) => Some(s.clone()),
        ("u32" | "i32" | "u64" | "i64", Value::Number(n)) => Some(n.to_string()),
        ("i128", Value::Object(parts)) => {
            let hi = parts.get("hi")?.as_i64()?;
            let lo = parts.get("lo")?.as_u64()?;
            Some((((hi as i128) << 64) | lo as i128).to_string())
        }
        ("u128", Value::Object(parts)) => {
            let hi = parts.get("hi")?.as_u64()?;
            let lo = parts.get("lo")?.as_u64()?;
            Some((((hi as u128) << 64) | lo as u128).to_string())
        }
        _ => None,
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
