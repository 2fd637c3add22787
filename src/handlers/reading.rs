use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::dto::{CreateReadingRequest, PageQuery};
use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::models::reading::ReadingSession;
use crate::store::SessionQuery;
use crate::AppState;

pub async fn create_reading_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateReadingRequest>,
) -> AppResult<(StatusCode, Json<ReadingSession>)> {
    let new = body.into_new(Utc::now())?;
    let session = state.store.insert_reading(auth_user.id, new).await?;

    tracing::debug!(user_id = %auth_user.id, session_id = %session.id, "Reading session recorded");
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn list_reading_sessions(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Vec<ReadingSession>>> {
    let page = query.resolve()?;
    let sessions = state
        .store
        .list_reading(auth_user.id, SessionQuery::default(), page)
        .await?;
    Ok(Json(sessions))
}
