use chrono::{DateTime, Utc};

/// Row of the `users` table.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub created_at: DateTime<Utc>,
}

/// Row of the `messages` table. `id` grows with insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub is_bot: bool,
    pub created_at: DateTime<Utc>,
}
