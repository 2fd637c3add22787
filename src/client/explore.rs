use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};

use super::api::{ApiClient, ClientError};
use super::cache::LocalCache;
use super::fetch::{fetch_or_fallback, Source};
use crate::calendar::grid::{month_window, MonthGrid, DEFAULT_WINDOW_MONTHS};
use crate::calendar::overlay::{mood_map, overlay, Cell, Theme};
use crate::calendar::stats::{period_stats, sport_stats, Periods, PeriodStats, SportStats};
use crate::models::mood::MoodFilter;

/// Mood heatmap over a window of months plus this month's reading and sport totals.
#[derive(Debug, Clone)]
pub struct ExploreView {
    pub months: Vec<MonthGrid>,
    pub active: usize,
    pub moods: HashMap<NaiveDate, String>,
    pub mood_source: Source,
    pub reading: PeriodStats,
    pub sport: SportStats,
    pub theme: Theme,
}

impl ExploreView {
    /// Empty view centered on the month containing `today`.
    pub fn new(today: NaiveDate, theme: Theme) -> Self {
        let months = month_window(today, DEFAULT_WINDOW_MONTHS, DEFAULT_WINDOW_MONTHS);
        let active = months
            .iter()
            .position(|m| m.contains(today))
            .unwrap_or(0);
        Self {
            months,
            active,
            moods: HashMap::new(),
            mood_source: Source::Fallback,
            reading: PeriodStats::default(),
            sport: SportStats::default(),
            theme,
        }
    }

    pub async fn load(
        client: &ApiClient,
        cache: &mut LocalCache,
        now: DateTime<Utc>,
        theme: Theme,
    ) -> Self {
        let mut view = Self::new(now.date_naive(), theme);
        view.refresh(client, cache, now).await;
        view
    }

    /// Refetch everything. Stats are recomputed from scratch; a failed fetch
    /// keeps whatever was shown before.
    pub async fn refresh(&mut self, client: &ApiClient, cache: &mut LocalCache, now: DateTime<Utc>) {
        let fetched = fetch_or_fallback(
            "mood history",
            async {
                let entries = client.moods(&MoodFilter::default()).await?;
                Ok::<_, ClientError>(entries)
            },
            Vec::new,
        )
        .await;
        if fetched.is_fresh() {
            cache.remember_moods(&fetched.value);
            self.moods = mood_map(&fetched.value);
            self.mood_source = Source::Network;
        } else if self.moods.is_empty() {
            self.moods = cache.moods();
            self.mood_source = Source::Fallback;
        }

        let since = Periods::around(now).prior_start;

        let reading = fetch_or_fallback(
            "reading sessions",
            async { client.reading_since(since).await.map(Some) },
            || None,
        )
        .await;
        if let Some(sessions) = reading.value {
            self.reading = period_stats(&sessions, now);
        }

        let sport = fetch_or_fallback(
            "sport sessions",
            async { client.sport_since(since).await.map(Some) },
            || None,
        )
        .await;
        if let Some(sessions) = sport.value {
            self.sport = sport_stats(&sessions, now);
        }
    }

    pub fn active_month(&self) -> Option<&MonthGrid> {
        self.months.get(self.active)
    }

    pub fn label(&self) -> &str {
        self.active_month().map_or("", |m| m.label.as_str())
    }

    /// Move one month back; false at the start of the window.
    pub fn prev(&mut self) -> bool {
        if self.active == 0 {
            return false;
        }
        self.active -= 1;
        true
    }

    /// Move one month forward; false at the end of the window.
    pub fn next(&mut self) -> bool {
        if self.active + 1 >= self.months.len() {
            return false;
        }
        self.active += 1;
        true
    }

    /// Heatmap cells for the active month.
    pub fn cells(&self) -> Vec<[Cell; 7]> {
        self.active_month()
            .map(|grid| overlay(grid, &self.moods, self.theme))
            .unwrap_or_default()
    }
}
