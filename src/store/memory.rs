use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SessionQuery, Store, Upserted};
use crate::dto::Page;
use crate::error::{AppError, AppResult};
use crate::models::mood::{MoodEntry, MoodFilter};
use crate::models::reading::{NewReadingSession, ReadingSession};
use crate::models::sport::{NewSportSession, SportSession};
use crate::models::user::{NewUser, User};

/// Process-local store for development and tests (single instance only).
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    moods: HashMap<(Uuid, NaiveDate), MoodEntry>,
    reading: Vec<ReadingSession>,
    sport: Vec<SportSession>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T: Clone>(rows: Vec<&T>, page: Page) -> Vec<T> {
    let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    rows.into_iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect()
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email already registered".into()));
        }
        let created = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        inner.users.push(created.clone());
        Ok(created)
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn upsert_mood(
        &self,
        owner: Uuid,
        date: NaiveDate,
        mood: &str,
        note: Option<&str>,
    ) -> AppResult<Upserted<MoodEntry>> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let mut created = false;
        let entry = inner.moods.entry((owner, date)).or_insert_with(|| {
            created = true;
            MoodEntry {
                id: Uuid::new_v4(),
                user_id: owner,
                date,
                mood: String::new(),
                note: None,
                created_at: now,
                updated_at: now,
            }
        });
        entry.mood = mood.to_string();
        entry.note = note.map(str::to_string);
        entry.updated_at = now;

        Ok(Upserted {
            record: entry.clone(),
            created,
        })
    }

    async fn list_moods(&self, owner: Uuid, filter: &MoodFilter) -> AppResult<Vec<MoodEntry>> {
        let inner = self.inner.read().await;
        let mut entries: Vec<MoodEntry> = inner
            .moods
            .values()
            .filter(|e| e.user_id == owner && filter.matches(e.date))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(entries)
    }

    async fn insert_reading(
        &self,
        owner: Uuid,
        session: NewReadingSession,
    ) -> AppResult<ReadingSession> {
        let created = ReadingSession {
            id: Uuid::new_v4(),
            user_id: owner,
            started_at: session.started_at,
            duration: session.duration,
            book: session.book,
            author: session.author,
            created_at: Utc::now(),
        };
        self.inner.write().await.reading.push(created.clone());
        Ok(created)
    }

    async fn list_reading(
        &self,
        owner: Uuid,
        query: SessionQuery,
        page: Page,
    ) -> AppResult<Vec<ReadingSession>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<&ReadingSession> = inner
            .reading
            .iter()
            .filter(|s| s.user_id == owner && query.since.map_or(true, |t| s.started_at >= t))
            .collect();
        rows.sort_by(|a, b| {
            b.started_at
                .cmp(&a.started_at)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(paginate(rows, page))
    }

    async fn insert_sport(
        &self,
        owner: Uuid,
        session: NewSportSession,
    ) -> AppResult<SportSession> {
        let created = SportSession {
            id: Uuid::new_v4(),
            user_id: owner,
            started_at: session.started_at,
            sport: session.sport,
            intensity: session.intensity,
            kind: session.kind,
            duration: session.duration,
            series: session.series,
            reps_per_serie: session.reps_per_serie,
            same_reps: session.same_reps,
            created_at: Utc::now(),
        };
        self.inner.write().await.sport.push(created.clone());
        Ok(created)
    }

    async fn list_sport(
        &self,
        owner: Uuid,
        query: SessionQuery,
        page: Page,
    ) -> AppResult<Vec<SportSession>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<&SportSession> = inner
            .sport
            .iter()
            .filter(|s| s.user_id == owner && query.since.map_or(true, |t| s.started_at >= t))
            .collect();
        rows.sort_by(|a, b| {
            b.started_at
                .cmp(&a.started_at)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(paginate(rows, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            username: "reader".into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    fn reading(minutes_ago: i64, duration: i32) -> NewReadingSession {
        NewReadingSession {
            started_at: Utc::now() - Duration::minutes(minutes_ago),
            duration,
            book: None,
            author: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user(new_user("a@example.com")).await.unwrap();
        let err = store.create_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_mood_upsert_overwrites_same_day() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let day = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();

        let first = store.upsert_mood(owner, day, "🙂", Some("ok")).await.unwrap();
        assert!(first.created);
        let second = store.upsert_mood(owner, day, "😡", None).await.unwrap();
        assert!(!second.created);
        assert_eq!(second.record.id, first.record.id);

        let all = store.list_moods(owner, &MoodFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].mood, "😡");
        assert_eq!(all[0].note, None);
    }

    #[tokio::test]
    async fn test_moods_are_scoped_to_owner_and_sorted() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        for day in [3, 1, 2] {
            let date = NaiveDate::from_ymd_opt(2025, 4, day).unwrap();
            store.upsert_mood(alice, date, "😐", None).await.unwrap();
        }
        store
            .upsert_mood(bob, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(), "😢", None)
            .await
            .unwrap();

        let alice_moods = store.list_moods(alice, &MoodFilter::default()).await.unwrap();
        let days: Vec<u32> = alice_moods.iter().map(|e| chrono::Datelike::day(&e.date)).collect();
        assert_eq!(days, vec![3, 2, 1]);
        assert_eq!(store.list_moods(bob, &MoodFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sessions_append_and_paginate() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        for i in 0..5 {
            store.insert_reading(owner, reading(i * 10, 5)).await.unwrap();
        }
        store.insert_reading(Uuid::new_v4(), reading(0, 99)).await.unwrap();

        let all = store
            .list_reading(owner, SessionQuery::default(), Page::ALL)
            .await
            .unwrap();
        assert_eq!(all.len(), 5);
        assert!(all.windows(2).all(|w| w[0].started_at >= w[1].started_at));

        let page = store
            .list_reading(owner, SessionQuery::default(), Page { limit: 2, offset: 4 })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, all[4].id);
    }

    #[tokio::test]
    async fn test_since_filter() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let old = NewReadingSession {
            started_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            duration: 1,
            book: None,
            author: None,
        };
        store.insert_reading(owner, old).await.unwrap();
        store.insert_reading(owner, reading(1, 2)).await.unwrap();

        let query = SessionQuery {
            since: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
        };
        let recent = store.list_reading(owner, query, Page::ALL).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].duration, 2);
    }
}
