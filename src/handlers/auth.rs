use axum::{extract::State, http::StatusCode, Extension, Json};
use validator::Validate;

use crate::auth::{
    jwt::create_access_token,
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::dto::{LoginRequest, MessageResponse, SignupRequest, TokenResponse};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::models::user::{NewUser, UserProfile};
use crate::AppState;

pub async fn signup(
    State(state): State<AppState>,
    AppJson(body): AppJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    body.check()?;

    let email = body.email.trim().to_lowercase();
    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = hash_password(&body.password)?;
    let user = state
        .store
        .create_user(NewUser {
            username: body.username.trim().to_string(),
            email,
            password_hash,
        })
        .await?;

    tracing::info!(user_id = %user.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Account created".into(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    body.validate()?;

    let email = body.email.trim().to_lowercase();
    let user = state
        .store
        .find_user_by_email(&email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Password mismatch");
        return Err(AppError::Unauthorized);
    }

    let token = create_access_token(user.id, &user.email, &state.config)?;
    Ok(Json(TokenResponse {
        token,
        expires_in: state.config.jwt_ttl_secs,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = state
        .store
        .find_user(auth_user.id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}
