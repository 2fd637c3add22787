//! # Flownest: Request/Response DTOs
//!
//! API contract types shared by the server handlers and the client library.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - Field-level rules are expressed via `validator` derive macros; rules
//!   that depend on several fields live in `check` and `into_new`

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::mood::{Mood, MoodFilter};
use crate::models::reading::NewReadingSession;
use crate::models::sport::{NewSportSession, SportKind};

pub const DEFAULT_PAGE_SIZE: i64 = 100;
pub const MAX_PAGE_SIZE: i64 = 500;

// ============================================================================
// Common
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `?limit=&offset=` on list endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl PageQuery {
    pub fn resolve(&self) -> AppResult<Page> {
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(AppError::Validation("offset must not be negative".into()));
        }
        Ok(Page { limit, offset })
    }
}

impl Page {
    /// Everything, for aggregation over a bounded time window.
    pub const ALL: Page = Page {
        limit: i64::MAX,
        offset: 0,
    };
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/auth/signup
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 254, message = "Email too long"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

impl SignupRequest {
    /// Field rules plus a username that is more than whitespace.
    pub fn check(&self) -> AppResult<()> {
        self.validate()?;
        if self.username.trim().is_empty() {
            return Err(AppError::Validation("Username must not be blank".into()));
        }
        Ok(())
    }
}

/// POST /api/auth/login
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: i64,
}

// ============================================================================
// Moods
// ============================================================================

/// POST /api/mood
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RecordMoodRequest {
    pub mood: String,

    #[validate(length(max = 500, message = "Note must be under 500 characters"))]
    pub note: Option<String>,

    /// "YYYY-MM-DD". Default: today (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl RecordMoodRequest {
    /// Validate and resolve the mood symbol and the target date.
    pub fn check(&self, today: NaiveDate) -> AppResult<(Mood, NaiveDate)> {
        self.validate()?;
        let mood = Mood::from_symbol(&self.mood)
            .ok_or_else(|| AppError::Validation(format!("Unknown mood: {}", self.mood)))?;
        let date = match self.date.as_deref() {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::Validation(format!("Malformed date: {raw}")))?,
            None => today,
        };
        Ok((mood, date))
    }
}

/// GET /api/moods
pub type MoodQuery = MoodFilter;

// ============================================================================
// Sessions
// ============================================================================

/// POST /api/reading-session
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReadingRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[validate(range(min = 0, message = "Duration must not be negative"))]
    pub duration: i32,

    #[validate(length(max = 200))]
    pub book: Option<String>,

    #[validate(length(max = 200))]
    pub author: Option<String>,
}

impl CreateReadingRequest {
    pub fn into_new(self, now: DateTime<Utc>) -> AppResult<NewReadingSession> {
        self.validate()?;
        Ok(NewReadingSession {
            started_at: self.started_at.unwrap_or(now),
            duration: self.duration,
            book: self.book,
            author: self.author,
        })
    }
}

/// POST /api/sport-session
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSportRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 100, message = "Sport must be 1-100 characters"))]
    pub sport: String,

    #[validate(range(min = 1, max = 5, message = "Intensity must be between 1 and 5"))]
    pub intensity: i32,

    #[serde(rename = "type", default)]
    pub kind: SportKind,

    #[validate(range(min = 0))]
    pub duration: Option<i32>,

    #[validate(range(min = 1))]
    pub series: Option<i32>,

    #[validate(range(min = 1))]
    pub reps_per_serie: Option<i32>,

    pub same_reps: Option<bool>,
}

impl CreateSportRequest {
    pub fn into_new(self, now: DateTime<Utc>) -> AppResult<NewSportSession> {
        self.validate()?;
        let sport = self.sport.trim();
        if sport.is_empty() {
            return Err(AppError::Validation("Sport must not be blank".into()));
        }
        match self.kind {
            SportKind::Duration if self.duration.is_none() => {
                return Err(AppError::Validation(
                    "Duration sessions require a duration".into(),
                ));
            }
            SportKind::Reps if self.series.is_none() || self.reps_per_serie.is_none() => {
                return Err(AppError::Validation(
                    "Rep sessions require series and repsPerSerie".into(),
                ));
            }
            _ => {}
        }
        Ok(NewSportSession {
            started_at: self.started_at.unwrap_or(now),
            sport: sport.to_string(),
            intensity: self.intensity,
            kind: self.kind,
            duration: self.duration,
            series: self.series,
            reps_per_serie: self.reps_per_serie,
            same_reps: self.same_reps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_mood_request_defaults_to_today() {
        let req = RecordMoodRequest {
            mood: "🙂".into(),
            note: None,
            date: None,
        };
        assert_eq!(req.check(today()).unwrap(), (Mood::Happy, today()));
    }

    #[test]
    fn test_mood_request_rejects_unknown_symbol_and_bad_date() {
        let unknown = RecordMoodRequest {
            mood: "🐙".into(),
            note: None,
            date: None,
        };
        assert!(matches!(unknown.check(today()), Err(AppError::Validation(_))));

        let bad_date = RecordMoodRequest {
            mood: "😐".into(),
            note: None,
            date: Some("2025-13-40".into()),
        };
        assert!(matches!(bad_date.check(today()), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_sport_request_shape_rules() {
        let json = serde_json::json!({
            "sport": "Pompes",
            "intensity": 3,
            "type": "pompes",
            "series": 3,
            "repsPerSerie": 15,
            "sameReps": true,
        });
        let req: CreateSportRequest = serde_json::from_value(json).unwrap();
        let new = req.into_new(Utc::now()).unwrap();
        assert_eq!(new.kind, SportKind::Reps);
        assert_eq!(new.series, Some(3));

        let missing_duration: CreateSportRequest = serde_json::from_value(serde_json::json!({
            "sport": "Course",
            "intensity": 2,
        }))
        .unwrap();
        assert!(missing_duration.into_new(Utc::now()).is_err());

        let too_intense: CreateSportRequest = serde_json::from_value(serde_json::json!({
            "sport": "Course",
            "intensity": 6,
            "duration": 30,
        }))
        .unwrap();
        assert!(matches!(
            too_intense.into_new(Utc::now()),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_blank_names_are_rejected() {
        let blank_sport: CreateSportRequest = serde_json::from_value(serde_json::json!({
            "sport": "   ",
            "intensity": 3,
            "duration": 10,
        }))
        .unwrap();
        assert!(matches!(
            blank_sport.into_new(Utc::now()),
            Err(AppError::Validation(_))
        ));

        let padded: CreateSportRequest = serde_json::from_value(serde_json::json!({
            "sport": "  Swim ",
            "intensity": 3,
            "duration": 10,
        }))
        .unwrap();
        assert_eq!(padded.into_new(Utc::now()).unwrap().sport, "Swim");

        let signup = SignupRequest {
            username: " \t ".into(),
            email: "a@example.com".into(),
            password: "long-enough".into(),
        };
        assert!(matches!(signup.check(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_page_query_bounds() {
        assert_eq!(
            PageQuery::default().resolve().unwrap(),
            Page {
                limit: DEFAULT_PAGE_SIZE,
                offset: 0
            }
        );
        let zero = PageQuery {
            limit: Some(0),
            offset: None,
        };
        assert!(zero.resolve().is_err());
        let negative = PageQuery {
            limit: None,
            offset: Some(-1),
        };
        assert!(negative.resolve().is_err());
    }
}
