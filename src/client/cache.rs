use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::mood::MoodEntry;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CacheData {
    token: Option<String>,
    #[serde(default)]
    account: Option<String>,
    #[serde(default)]
    moods: BTreeMap<NaiveDate, String>,
}

/// On-device key-value cache: the bearer token and a per-day mood copy.
///
/// Mood values here are for display when the server is unreachable. They are
/// only ever written after the server accepted or returned them.
#[derive(Debug, Default)]
pub struct LocalCache {
    path: Option<PathBuf>,
    data: CacheData,
}

impl LocalCache {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load from `path`; a missing or unreadable file starts an empty cache.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Discarding corrupt cache");
                CacheData::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => CacheData::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cache unreadable");
                CacheData::default()
            }
        };
        Self {
            path: Some(path),
            data,
        }
    }

    pub async fn save(&self) -> std::io::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(&self.data)?;
        tokio::fs::write(path, bytes).await
    }

    pub fn token(&self) -> Option<&str> {
        self.data.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.data.token = token;
    }

    /// Email of the account the cached data belongs to.
    pub fn account(&self) -> Option<&str> {
        self.data.account.as_deref()
    }

    /// Bind the cache to `email`. Data left by a different account is dropped
    /// so it never shows up as another user's fallback.
    pub fn switch_account(&mut self, email: &str) {
        let email = email.trim().to_lowercase();
        if self.data.account.as_deref() != Some(email.as_str()) {
            if self.data.account.is_some() {
                tracing::debug!("Cache belonged to another account, clearing");
            }
            self.data = CacheData::default();
            self.data.account = Some(email);
        }
    }

    pub fn mood_for(&self, date: NaiveDate) -> Option<&str> {
        self.data.moods.get(&date).map(String::as_str)
    }

    pub fn remember_mood(&mut self, date: NaiveDate, mood: &str) {
        self.data.moods.insert(date, mood.to_string());
    }

    pub fn remember_moods(&mut self, entries: &[MoodEntry]) {
        for entry in entries {
            self.remember_mood(entry.date, &entry.mood);
        }
    }

    pub fn moods(&self) -> HashMap<NaiveDate, String> {
        self.data
            .moods
            .iter()
            .map(|(d, m)| (*d, m.clone()))
            .collect()
    }

    /// Drop everything tied to the current account.
    pub fn clear(&mut self) {
        self.data = CacheData::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn temp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!(
            "flownest_cache_{}_{}_{}.json",
            name,
            std::process::id(),
            nanos
        ))
    }

    #[tokio::test]
    async fn test_persists_across_open() {
        let path = temp_path("persist");
        let mut cache = LocalCache::open(&path).await;
        assert!(cache.token().is_none());
        cache.set_token(Some("abc".into()));
        cache.remember_mood(date(3), "🙂");
        cache.save().await.unwrap();

        let reopened = LocalCache::open(&path).await;
        assert_eq!(reopened.token(), Some("abc"));
        assert_eq!(reopened.mood_for(date(3)), Some("🙂"));
        assert_eq!(reopened.mood_for(date(4)), None);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let path = temp_path("corrupt");
        tokio::fs::write(&path, b"{ not json").await.unwrap();
        let cache = LocalCache::open(&path).await;
        assert!(cache.token().is_none());
        assert!(cache.moods().is_empty());
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[test]
    fn test_switching_account_drops_previous_data() {
        let mut cache = LocalCache::in_memory();
        cache.switch_account("A@example.com");
        cache.set_token(Some("token-a".into()));
        cache.remember_mood(date(2), "😢");

        cache.switch_account("a@example.com ");
        assert_eq!(cache.mood_for(date(2)), Some("😢"));
        assert_eq!(cache.token(), Some("token-a"));

        cache.switch_account("b@example.com");
        assert_eq!(cache.account(), Some("b@example.com"));
        assert!(cache.token().is_none());
        assert!(cache.moods().is_empty());
    }

    #[tokio::test]
    async fn test_in_memory_save_is_noop() {
        let mut cache = LocalCache::in_memory();
        cache.remember_mood(date(1), "😐");
        cache.save().await.unwrap();
        cache.clear();
        assert!(cache.moods().is_empty());
    }
}
