use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::calendar::stats::{monthly_stats as aggregate, MonthlyStats, Periods};
use crate::dto::Page;
use crate::error::AppResult;
use crate::store::SessionQuery;
use crate::AppState;

/// This month vs last month, recomputed from the stored sessions on every call.
pub async fn monthly_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MonthlyStats>> {
    let now = Utc::now();
    let query = SessionQuery {
        since: Some(Periods::around(now).prior_start),
    };

    let reading = state
        .store
        .list_reading(auth_user.id, query, Page::ALL)
        .await?;
    let sport = state.store.list_sport(auth_user.id, query, Page::ALL).await?;

    Ok(Json(aggregate(&reading, &sport, now)))
}
