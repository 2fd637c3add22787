use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::dto::{MoodQuery, RecordMoodRequest};
use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::models::mood::MoodEntry;
use crate::AppState;

/// One mood per day: a second call for the same date overwrites mood and note.
pub async fn record_mood(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<RecordMoodRequest>,
) -> AppResult<(StatusCode, Json<MoodEntry>)> {
    let (mood, date) = body.check(Utc::now().date_naive())?;

    let upserted = state
        .store
        .upsert_mood(auth_user.id, date, mood.symbol(), body.note.as_deref())
        .await?;

    tracing::debug!(
        user_id = %auth_user.id,
        %date,
        created = upserted.created,
        "Mood recorded"
    );

    let status = if upserted.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(upserted.record)))
}

pub async fn list_moods(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<MoodQuery>,
) -> AppResult<Json<Vec<MoodEntry>>> {
    let moods = state.store.list_moods(auth_user.id, &query).await?;
    Ok(Json(moods))
}
