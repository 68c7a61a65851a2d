//! Long-running background task that polls the Soroban RPC and writes
//! decoded ledger events to the database.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::rpc;

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Where the next poll starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub ledger: u32,
    pub cursor: Option<String>,
}

/// Run the indexer loop until `shutdown` is cancelled.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) {
    info!("Indexer starting for contract {}", state.config.contract_id);

    let mut position = resume_position(&state.pool, state.config.start_ledger).await;
    info!("Resuming from ledger {}", position.ledger);

    loop {
        let result = tokio::select! {
            _ = shutdown.cancelled() => break,
            result = poll_once(&state.pool, &state.client, &state.config, &position) => result,
        };
        match result {
            Ok(next) => position = next,
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }

    info!("Indexer stopped at ledger {}", position.ledger);
}

/// Load the saved cursor from the DB, falling back to `start_ledger`.
async fn resume_position(pool: &SqlitePool, start_ledger: u32) -> Position {
    let last_ledger = db::get_last_ledger(pool).await.unwrap_or(0);
    let cursor = db::get_cursor_string(pool).await.unwrap_or(None);

    Position {
        ledger: if last_ledger > 0 {
            last_ledger as u32
        } else {
            start_ledger
        },
        cursor,
    }
}

/// Perform a single poll iteration and return the next position.
async fn poll_once(
    pool: &SqlitePool,
    client: &Client,
    config: &Config,
    position: &Position,
) -> crate::errors::Result<Position> {
    let page = rpc::fetch_events(
        client,
        &config.rpc_url,
        &config.contract_id,
        position.ledger,
        position.cursor.as_deref(),
        config.events_per_page,
    )
    .await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, &config.contract_id);
        let inserted = db::insert_events(pool, &decoded).await?;
        info!(
            "Polled {} raw events → {} new records stored",
            page.events.len(),
            inserted
        );
    }

    let next = next_position(position.ledger, page.latest_ledger, page.cursor);

    // Persist cursor so restarts are deterministic.
    db::save_cursor(pool, next.ledger as i64, next.cursor.as_deref()).await?;

    Ok(next)
}

/// The ledger never moves backwards. When the RPC hands back a cursor the
/// next request paginates with it; otherwise it scans from the latest ledger.
fn next_position(start_ledger: u32, latest_ledger: Option<u64>, cursor: Option<String>) -> Position {
    let ledger = latest_ledger
        .map(|l| (l.min(u32::MAX as u64) as u32).max(start_ledger))
        .unwrap_or(start_ledger);
    Position { ledger, cursor }
}
