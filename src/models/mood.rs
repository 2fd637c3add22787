use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One mood per user per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[sqlx(rename = "entry_date")]
    pub date: NaiveDate,
    pub mood: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The closed set of moods a user can record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Euphoric,
    Happy,
    Neutral,
    Uneasy,
    Stressed,
    Sad,
    Angry,
    Tired,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Euphoric,
        Mood::Happy,
        Mood::Neutral,
        Mood::Uneasy,
        Mood::Stressed,
        Mood::Sad,
        Mood::Angry,
        Mood::Tired,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Mood::Euphoric => "🤩",
            Mood::Happy => "🙂",
            Mood::Neutral => "😐",
            Mood::Uneasy => "😕",
            Mood::Stressed => "😣",
            Mood::Sad => "😢",
            Mood::Angry => "😡",
            Mood::Tired => "🥱",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.symbol() == symbol)
    }

    /// Heatmap fill color.
    pub fn color(self) -> &'static str {
        match self {
            Mood::Euphoric => "#22c55e",
            Mood::Happy => "#a3e635",
            Mood::Neutral => "#facc15",
            Mood::Uneasy => "#fcd34d",
            Mood::Stressed => "#f97316",
            Mood::Sad => "#ef4444",
            Mood::Angry => "#dc2626",
            Mood::Tired => "#94a3b8",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoodFilter {
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl MoodFilter {
    pub fn matches(&self, date: NaiveDate) -> bool {
        self.date.map_or(true, |d| d == date)
            && self.from.map_or(true, |f| date >= f)
            && self.to.map_or(true, |t| date <= t)
    }
}
