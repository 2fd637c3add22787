use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::dto::{CreateSportRequest, PageQuery};
use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::models::sport::SportSession;
use crate::store::SessionQuery;
use crate::AppState;

pub async fn create_sport_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<CreateSportRequest>,
) -> AppResult<(StatusCode, Json<SportSession>)> {
    let new = body.into_new(Utc::now())?;
    let session = state.store.insert_sport(auth_user.id, new).await?;

    tracing::debug!(
        user_id = %auth_user.id,
        session_id = %session.id,
        sport = %session.sport,
        "Sport session recorded"
    );
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn list_sport_sessions(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppQuery(query): AppQuery<PageQuery>,
) -> AppResult<Json<Vec<SportSession>>> {
    let page = query.resolve()?;
    let sessions = state
        .store
        .list_sport(auth_user.id, SessionQuery::default(), page)
        .await?;
    Ok(Json(sessions))
}
