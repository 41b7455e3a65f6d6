use async_trait::async_trait;

use crate::{domain::UserId, Result};

/// Hexagonal port for the conversation transcript.
///
/// Backed by SQLite in `gamebot-storage`. Both calls may suspend; callers await
/// them before treating a message as handled.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Insert the user if unknown. An existing row is never modified.
    async fn upsert_user(&self, id: UserId, handle: Option<&str>, first_name: &str)
        -> Result<()>;

    /// Append one transcript line with a store-assigned timestamp.
    async fn append_message(&self, user_id: UserId, text: &str, is_bot: bool) -> Result<()>;
}

/// Source of uniform random integers.
pub trait RandomSource: Send + Sync {
    /// Uniform integer in `low..=high`.
    fn uniform(&self, low: u32, high: u32) -> u32;
}
