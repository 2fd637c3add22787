use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::models::reading::ReadingSession;
use crate::models::sport::SportSession;

/// A record with a start instant and a duration in minutes.
pub trait Timed {
    fn started_at(&self) -> DateTime<Utc>;
    fn minutes(&self) -> i64;
}

impl Timed for ReadingSession {
    fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    fn minutes(&self) -> i64 {
        i64::from(self.duration)
    }
}

impl Timed for SportSession {
    fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    fn minutes(&self) -> i64 {
        SportSession::minutes(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStats {
    pub count: u32,
    pub total_minutes: i64,
    pub prior_total_minutes: i64,
    /// `total_minutes - prior_total_minutes`
    pub delta: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SportStats {
    #[serde(flatten)]
    pub period: PeriodStats,
    pub favorite_sport: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub reading: PeriodStats,
    pub sport: SportStats,
}

/// Calendar-month windows around an instant, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Periods {
    pub prior_start: DateTime<Utc>,
    pub current_start: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Current,
    Prior,
}

impl Periods {
    pub fn around(now: DateTime<Utc>) -> Self {
        let current = month_floor(now.date_naive());
        let prior = current.pred_opt().map_or(current, month_floor);
        Self {
            prior_start: midnight(prior),
            current_start: midnight(current),
        }
    }

    /// Start-of-month instants belong to the period they open.
    pub fn classify(&self, at: DateTime<Utc>) -> Option<Period> {
        if at >= self.current_start {
            Some(Period::Current)
        } else if at >= self.prior_start {
            Some(Period::Prior)
        } else {
            None
        }
    }
}

pub fn period_stats<'a, T, I>(records: I, now: DateTime<Utc>) -> PeriodStats
where
    T: Timed + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let periods = Periods::around(now);
    let mut stats = PeriodStats::default();

    for record in records {
        match periods.classify(record.started_at()) {
            Some(Period::Current) => {
                stats.count += 1;
                stats.total_minutes += record.minutes();
            }
            Some(Period::Prior) => stats.prior_total_minutes += record.minutes(),
            None => {}
        }
    }

    stats.delta = stats.total_minutes - stats.prior_total_minutes;
    stats
}

pub fn sport_stats(records: &[SportSession], now: DateTime<Utc>) -> SportStats {
    SportStats {
        period: period_stats(records, now),
        favorite_sport: favorite_sport(records, Periods::around(now)),
    }
}

pub fn monthly_stats(
    reading: &[ReadingSession],
    sport: &[SportSession],
    now: DateTime<Utc>,
) -> MonthlyStats {
    MonthlyStats {
        reading: period_stats(reading, now),
        sport: sport_stats(sport, now),
    }
}

// Most frequent sport this month; on a tie, the one that got there first.
fn favorite_sport(records: &[SportSession], periods: Periods) -> Option<String> {
    let mut current: Vec<&SportSession> = records
        .iter()
        .filter(|s| periods.classify(s.started_at) == Some(Period::Current))
        .collect();
    current.sort_by_key(|s| s.started_at);

    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut best: Option<(&str, u32)> = None;
    for session in current {
        let count = counts.entry(session.sport.as_str()).or_insert(0);
        *count += 1;
        if best.map_or(true, |(_, n)| *count > n) {
            best = Some((session.sport.as_str(), *count));
        }
    }
    best.map(|(name, _)| name.to_string())
}

fn month_floor(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sport::SportKind;
    use uuid::Uuid;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn reading(started_at: DateTime<Utc>, duration: i32) -> ReadingSession {
        ReadingSession {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            started_at,
            duration,
            book: None,
            author: None,
            created_at: started_at,
        }
    }

    fn sport(started_at: DateTime<Utc>, name: &str, duration: Option<i32>) -> SportSession {
        SportSession {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            started_at,
            sport: name.to_string(),
            intensity: 3,
            kind: if duration.is_some() {
                SportKind::Duration
            } else {
                SportKind::Reps
            },
            duration,
            series: duration.is_none().then_some(3),
            reps_per_serie: duration.is_none().then_some(10),
            same_reps: None,
            created_at: started_at,
        }
    }

    #[test]
    fn test_current_vs_prior_totals() {
        let now = at(2025, 6, 20, 12);
        let sessions = vec![
            reading(at(2025, 6, 2, 8), 10),
            reading(at(2025, 6, 18, 21), 20),
            reading(at(2025, 5, 11, 7), 15),
        ];
        let stats = period_stats(&sessions, now);
        assert_eq!(
            stats,
            PeriodStats {
                count: 2,
                total_minutes: 30,
                prior_total_minutes: 15,
                delta: 15,
            }
        );
    }

    #[test]
    fn test_boundaries_belong_to_the_period_they_open() {
        let now = at(2025, 6, 20, 12);
        let sessions = vec![
            reading(at(2025, 6, 1, 0), 5),
            reading(at(2025, 5, 1, 0), 7),
            reading(at(2025, 4, 30, 23), 100),
        ];
        let stats = period_stats(&sessions, now);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.total_minutes, 5);
        assert_eq!(stats.prior_total_minutes, 7);
        assert_eq!(stats.delta, -2);
    }

    #[test]
    fn test_prior_period_crosses_year_boundary() {
        let periods = Periods::around(at(2025, 1, 10, 9));
        assert_eq!(periods.prior_start, at(2024, 12, 1, 0));
        assert_eq!(periods.current_start, at(2025, 1, 1, 0));
        assert_eq!(periods.classify(at(2024, 12, 31, 23)), Some(Period::Prior));
        assert_eq!(periods.classify(at(2024, 11, 30, 23)), None);
    }

    #[test]
    fn test_empty_input() {
        let none: Vec<ReadingSession> = Vec::new();
        assert_eq!(period_stats(&none, Utc::now()), PeriodStats::default());
    }

    #[test]
    fn test_sport_stats_favorite_and_rep_sessions() {
        let now = at(2025, 3, 15, 12);
        let sessions = vec![
            sport(at(2025, 3, 2, 8), "Course", Some(30)),
            sport(at(2025, 3, 3, 8), "Pompes", None),
            sport(at(2025, 3, 4, 8), "Pompes", None),
            sport(at(2025, 3, 5, 8), "Course", Some(20)),
            sport(at(2025, 2, 5, 8), "Natation", Some(45)),
            sport(at(2025, 2, 6, 8), "Natation", Some(45)),
            sport(at(2025, 2, 7, 8), "Natation", Some(45)),
        ];
        let stats = sport_stats(&sessions, now);
        assert_eq!(stats.period.count, 4);
        assert_eq!(stats.period.total_minutes, 50);
        assert_eq!(stats.period.prior_total_minutes, 135);
        assert_eq!(stats.period.delta, -85);
        // Pompes reaches two sessions before Course does
        assert_eq!(stats.favorite_sport.as_deref(), Some("Pompes"));
    }

    #[test]
    fn test_sport_stats_serializes_flat() {
        let stats = SportStats {
            period: PeriodStats {
                count: 1,
                total_minutes: 10,
                prior_total_minutes: 0,
                delta: 10,
            },
            favorite_sport: Some("Course".into()),
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["totalMinutes"], 10);
        assert_eq!(json["favoriteSport"], "Course");
    }
}
