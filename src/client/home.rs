use chrono::NaiveDate;

use super::api::{ApiClient, ClientError, ClientResult};
use super::cache::LocalCache;
use super::fetch::{fetch_or_fallback, Source};
use crate::calendar::overlay::{mood_color, TRANSPARENT};
use crate::dto::RecordMoodRequest;
use crate::models::mood::{Mood, MoodEntry, MoodFilter};

/// Today's mood as the home screen shows it.
#[derive(Debug, Clone)]
pub struct HomeView {
    pub today: NaiveDate,
    pub mood: Option<String>,
    pub source: Source,
}

impl HomeView {
    pub async fn load(client: &ApiClient, cache: &mut LocalCache, today: NaiveDate) -> Self {
        let filter = MoodFilter {
            date: Some(today),
            ..Default::default()
        };
        let fetched = fetch_or_fallback(
            "today's mood",
            async {
                let entries = client.moods(&filter).await?;
                Ok::<_, ClientError>(entries.into_iter().next().map(|e| e.mood))
            },
            || cache.mood_for(today).map(str::to_string),
        )
        .await;

        if let (Source::Network, Some(mood)) = (fetched.source, &fetched.value) {
            cache.remember_mood(today, mood);
        }

        Self {
            today,
            mood: fetched.value,
            source: fetched.source,
        }
    }

    pub fn has_mood(&self) -> bool {
        self.mood.is_some()
    }

    pub fn color(&self) -> &'static str {
        self.mood.as_deref().map_or(TRANSPARENT, mood_color)
    }

    /// Send the mood to the server; the cache is only touched once it accepted it.
    pub async fn record_mood(
        &mut self,
        client: &ApiClient,
        cache: &mut LocalCache,
        mood: Mood,
        note: Option<String>,
    ) -> ClientResult<MoodEntry> {
        let entry = client
            .record_mood(&RecordMoodRequest {
                mood: mood.symbol().to_string(),
                note,
                date: Some(self.today.format("%Y-%m-%d").to_string()),
            })
            .await?;

        cache.remember_mood(entry.date, &entry.mood);
        self.mood = Some(entry.mood.clone());
        self.source = Source::Network;
        Ok(entry)
    }
}
