//! Transcript repository: users and the append-only message log.
//!
//! Implements the core `TranscriptStore` port on top of `SqlitePoolManager`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use gamebot_core::{domain::UserId, ports::TranscriptStore};

use crate::error::StorageError;
use crate::models::{MessageRecord, UserRecord};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct SqliteTranscript {
    pool_manager: SqlitePoolManager,
}

impl SqliteTranscript {
    pub async fn new(location: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(location).await?;
        let repo = Self { pool_manager };
        repo.init().await?;
        Ok(repo)
    }

    async fn init(&self) -> Result<(), StorageError> {
        info!("Creating database tables if not exist");

        let pool = self.pool_manager.pool();

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                username TEXT,
                first_name TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                text TEXT NOT NULL,
                is_bot BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_messages_user_id ON messages(user_id)")
            .execute(pool)
            .await?;

        info!("Database tables created successfully");
        Ok(())
    }

    /// Insert the user unless the id already exists. Returns whether a row was added.
    pub async fn insert_user(
        &self,
        user_id: i64,
        username: Option<&str>,
        first_name: &str,
    ) -> Result<bool, StorageError> {
        let res = sqlx::query(
            r#"
            INSERT OR IGNORE INTO users (user_id, username, first_name, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(username)
        .bind(first_name)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;

        Ok(res.rows_affected() > 0)
    }

    /// Append one message and return its sequence id.
    pub async fn insert_message(
        &self,
        user_id: i64,
        text: &str,
        is_bot: bool,
    ) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r#"
            INSERT INTO messages (user_id, text, is_bot, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(text)
        .bind(is_bot)
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;

        Ok(res.last_insert_rowid())
    }

    pub async fn get_user(&self, user_id: i64) -> Result<Option<UserRecord>, StorageError> {
        let row: Option<(i64, Option<String>, String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT user_id, username, first_name, created_at FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(self.pool_manager.pool())
        .await?;

        Ok(row.map(|(user_id, username, first_name, created_at)| UserRecord {
            user_id,
            username,
            first_name,
            created_at,
        }))
    }

    /// All messages of one user, oldest first.
    pub async fn messages_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<MessageRecord>, StorageError> {
        let rows: Vec<(i64, i64, String, bool, DateTime<Utc>)> = sqlx::query_as(
            r#"
            SELECT id, user_id, text, is_bot, created_at
            FROM messages
            WHERE user_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool_manager.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, user_id, text, is_bot, created_at)| MessageRecord {
                id,
                user_id,
                text,
                is_bot,
                created_at,
            })
            .collect())
    }

    pub async fn message_count(&self) -> Result<i64, StorageError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count.0)
    }
}

#[async_trait]
impl TranscriptStore for SqliteTranscript {
    async fn upsert_user(
        &self,
        id: UserId,
        handle: Option<&str>,
        first_name: &str,
    ) -> gamebot_core::Result<()> {
        let inserted = self.insert_user(id.0, handle, first_name).await?;
        debug!(user_id = id.0, inserted, "upsert user");
        Ok(())
    }

    async fn append_message(
        &self,
        user_id: UserId,
        text: &str,
        is_bot: bool,
    ) -> gamebot_core::Result<()> {
        let seq = self.insert_message(user_id.0, text, is_bot).await?;
        debug!(user_id = user_id.0, seq, is_bot, "append message");
        Ok(())
    }
}
