use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSession {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Minutes.
    pub duration: i32,
    pub book: Option<String>,
    pub author: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReadingSession {
    pub started_at: DateTime<Utc>,
    pub duration: i32,
    pub book: Option<String>,
    pub author: Option<String>,
}
