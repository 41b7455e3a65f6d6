//! SQLite connection pool wrapper for the storage crate.

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::info;

use crate::error::StorageError;

const MEMORY_URLS: [&str; 2] = [":memory:", "sqlite::memory:"];

/// Manages a single-connection SQLite pool; creates the DB file if missing.
///
/// One connection means every write to the file is serialized through the pool.
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given file path, or an in-memory database for
    /// `:memory:` / `sqlite::memory:`.
    pub async fn new(location: &str) -> Result<Self, StorageError> {
        info!("Initializing SQLite pool: {}", location);

        let in_memory = MEMORY_URLS.contains(&location);
        let options = if in_memory {
            SqliteConnectOptions::from_str("sqlite::memory:")?
        } else if location.trim().is_empty() {
            return Err(StorageError::InvalidLocation(
                "database path is empty".to_string(),
            ));
        } else {
            SqliteConnectOptions::new()
                .filename(location)
                .create_if_missing(true)
        };

        let mut pool_options = SqlitePoolOptions::new().max_connections(1);
        if in_memory {
            // An in-memory database lives only as long as its connection.
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
