//! Persistence seam for accounts, moods and sessions.
//!
//! Every method that touches user data takes the owner id explicitly; handlers
//! pass the id resolved from the bearer token and never one from the request.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::dto::Page;
use crate::error::AppResult;
use crate::models::mood::{MoodEntry, MoodFilter};
use crate::models::reading::{NewReadingSession, ReadingSession};
use crate::models::sport::{NewSportSession, SportSession};
use crate::models::user::{NewUser, User};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result of an upsert: the stored row and whether it was newly inserted.
#[derive(Debug, Clone)]
pub struct Upserted<T> {
    pub record: T,
    pub created: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionQuery {
    /// Only sessions started at or after this instant.
    pub since: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Readiness probe.
    async fn ping(&self) -> AppResult<()>;

    /// Fails with `Conflict` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> AppResult<User>;
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Insert or overwrite the mood for `(owner, date)`, atomically.
    async fn upsert_mood(
        &self,
        owner: Uuid,
        date: NaiveDate,
        mood: &str,
        note: Option<&str>,
    ) -> AppResult<Upserted<MoodEntry>>;
    /// Newest date first.
    async fn list_moods(&self, owner: Uuid, filter: &MoodFilter) -> AppResult<Vec<MoodEntry>>;

    async fn insert_reading(
        &self,
        owner: Uuid,
        session: NewReadingSession,
    ) -> AppResult<ReadingSession>;
    /// Most recent first.
    async fn list_reading(
        &self,
        owner: Uuid,
        query: SessionQuery,
        page: Page,
    ) -> AppResult<Vec<ReadingSession>>;

    async fn insert_sport(&self, owner: Uuid, session: NewSportSession)
        -> AppResult<SportSession>;
    /// Most recent first.
    async fn list_sport(
        &self,
        owner: Uuid,
        query: SessionQuery,
        page: Page,
    ) -> AppResult<Vec<SportSession>>;

    /// Release connections on shutdown.
    async fn close(&self) {}
}
