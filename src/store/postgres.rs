use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{SessionQuery, Store, Upserted};
use crate::dto::Page;
use crate::error::{AppError, AppResult};
use crate::models::mood::{MoodEntry, MoodFilter};
use crate::models::reading::{NewReadingSession, ReadingSession};
use crate::models::sport::{NewSportSession, SportSession};
use crate::models::user::{NewUser, User};

const UNIQUE_VIOLATION: &str = "23505";

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(FromRow)]
struct UpsertedMoodRow {
    #[sqlx(flatten)]
    entry: MoodEntry,
    inserted: bool,
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await;

        match created {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(AppError::Conflict("Email already registered".into()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn upsert_mood(
        &self,
        owner: Uuid,
        date: NaiveDate,
        mood: &str,
        note: Option<&str>,
    ) -> AppResult<Upserted<MoodEntry>> {
        // xmax is 0 only for rows created by this statement
        let row = sqlx::query_as::<_, UpsertedMoodRow>(
            r#"
            INSERT INTO mood_entries (id, user_id, entry_date, mood, note)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, entry_date) DO UPDATE SET
                mood = EXCLUDED.mood,
                note = EXCLUDED.note,
                updated_at = NOW()
            RETURNING *, (xmax = 0) AS inserted
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(date)
        .bind(mood)
        .bind(note)
        .fetch_one(&self.db)
        .await?;

        Ok(Upserted {
            record: row.entry,
            created: row.inserted,
        })
    }

    async fn list_moods(&self, owner: Uuid, filter: &MoodFilter) -> AppResult<Vec<MoodEntry>> {
        let entries = sqlx::query_as::<_, MoodEntry>(
            r#"
            SELECT * FROM mood_entries
            WHERE user_id = $1
              AND ($2::date IS NULL OR entry_date = $2)
              AND ($3::date IS NULL OR entry_date >= $3)
              AND ($4::date IS NULL OR entry_date <= $4)
            ORDER BY entry_date DESC
            "#,
        )
        .bind(owner)
        .bind(filter.date)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_all(&self.db)
        .await?;
        Ok(entries)
    }

    async fn insert_reading(
        &self,
        owner: Uuid,
        session: NewReadingSession,
    ) -> AppResult<ReadingSession> {
        let created = sqlx::query_as::<_, ReadingSession>(
            r#"
            INSERT INTO reading_sessions (id, user_id, started_at, duration, book, author)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(session.started_at)
        .bind(session.duration)
        .bind(&session.book)
        .bind(&session.author)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn list_reading(
        &self,
        owner: Uuid,
        query: SessionQuery,
        page: Page,
    ) -> AppResult<Vec<ReadingSession>> {
        let sessions = sqlx::query_as::<_, ReadingSession>(
            r#"
            SELECT * FROM reading_sessions
            WHERE user_id = $1 AND ($2::timestamptz IS NULL OR started_at >= $2)
            ORDER BY started_at DESC, created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner)
        .bind(query.since)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;
        Ok(sessions)
    }

    async fn insert_sport(
        &self,
        owner: Uuid,
        session: NewSportSession,
    ) -> AppResult<SportSession> {
        let created = sqlx::query_as::<_, SportSession>(
            r#"
            INSERT INTO sport_sessions
                (id, user_id, started_at, sport, intensity, kind, duration, series, reps_per_serie, same_reps)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(session.started_at)
        .bind(&session.sport)
        .bind(session.intensity)
        .bind(session.kind)
        .bind(session.duration)
        .bind(session.series)
        .bind(session.reps_per_serie)
        .bind(session.same_reps)
        .fetch_one(&self.db)
        .await?;
        Ok(created)
    }

    async fn list_sport(
        &self,
        owner: Uuid,
        query: SessionQuery,
        page: Page,
    ) -> AppResult<Vec<SportSession>> {
        let sessions = sqlx::query_as::<_, SportSession>(
            r#"
            SELECT * FROM sport_sessions
            WHERE user_id = $1 AND ($2::timestamptz IS NULL OR started_at >= $2)
            ORDER BY started_at DESC, created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner)
        .bind(query.since)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;
        Ok(sessions)
    }

    async fn close(&self) {
        self.db.close().await;
    }
}
