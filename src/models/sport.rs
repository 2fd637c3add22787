use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SportSession {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub sport: String,
    pub intensity: i32,
    #[serde(rename = "type")]
    pub kind: SportKind,
    pub duration: Option<i32>,
    pub series: Option<i32>,
    pub reps_per_serie: Option<i32>,
    pub same_reps: Option<bool>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default)]
#[sqlx(type_name = "sport_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SportKind {
    #[default]
    Duration,
    // Older clients send "pompes" for push-up sets
    #[serde(alias = "pompes")]
    Reps,
}

#[derive(Debug, Clone)]
pub struct NewSportSession {
    pub started_at: DateTime<Utc>,
    pub sport: String,
    pub intensity: i32,
    pub kind: SportKind,
    pub duration: Option<i32>,
    pub series: Option<i32>,
    pub reps_per_serie: Option<i32>,
    pub same_reps: Option<bool>,
}

impl SportSession {
    /// Minutes spent, zero for rep-based sets recorded without a duration.
    pub fn minutes(&self) -> i64 {
        self.duration.map(i64::from).unwrap_or(0)
    }
}
