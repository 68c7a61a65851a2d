//! Indexer error types. Handlers and the polling loop share one enum;
//! `main` converts it into `anyhow::Error` at the process boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// An RPC reply or stored event could not be interpreted.
    #[error("Event parse error: {0}")]
    EventParse(String),

    /// Nothing has been indexed for the requested project.
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, IndexerError>;
