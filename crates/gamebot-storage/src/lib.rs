//! Storage crate: SQLite-backed conversation transcript.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – UserRecord, MessageRecord
//! - [`sqlite_pool`] – SqlitePoolManager
//! - [`transcript`] – SqliteTranscript (implements `TranscriptStore`)

mod error;
mod models;
mod sqlite_pool;
mod transcript;


pub use error::StorageError;
pub use models::{MessageRecord, UserRecord};
pub use sqlite_pool::SqlitePoolManager;
pub use transcript::SqliteTranscript;
