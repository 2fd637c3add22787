use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::cache::LocalCache;
use crate::calendar::stats::MonthlyStats;
use crate::dto::{
    CreateReadingRequest, CreateSportRequest, LoginRequest, MessageResponse, PageQuery,
    RecordMoodRequest, SignupRequest, TokenResponse, MAX_PAGE_SIZE,
};
use crate::models::mood::{MoodEntry, MoodFilter};
use crate::models::reading::ReadingSession;
use crate::models::sport::SportSession;
use crate::models::user::UserProfile;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Authentication rejected")]
    Unauthorized,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] std::io::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Where to talk to and as whom. Handed to the client explicitly.
#[derive(Debug, Clone)]
pub struct Session {
    pub base_url: String,
    pub token: Option<String>,
}

impl Session {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    session: Session,
}

impl ApiClient {
    pub fn new(session: Session) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self { http, session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.session.token = token;
    }

    pub async fn signup(&self, body: &SignupRequest) -> ClientResult<MessageResponse> {
        let resp = self
            .http
            .post(self.url("/api/auth/signup"))
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }

    /// Log in and keep the issued token on this client's session.
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<TokenResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp = self
            .http
            .post(self.url("/api/auth/login"))
            .json(&body)
            .send()
            .await?;
        let tokens: TokenResponse = decode(resp).await?;
        self.session.token = Some(tokens.token.clone());
        Ok(tokens)
    }

    /// Log in and persist the token. A cache left by another account is
    /// wiped first.
    pub async fn login_with_cache(
        &mut self,
        cache: &mut LocalCache,
        email: &str,
        password: &str,
    ) -> ClientResult<TokenResponse> {
        let tokens = self.login(email, password).await?;
        cache.switch_account(email);
        cache.set_token(Some(tokens.token.clone()));
        cache.save().await?;
        Ok(tokens)
    }

    /// Forget the token here and everything stored on the device.
    pub async fn logout(&mut self, cache: &mut LocalCache) -> ClientResult<()> {
        self.session.token = None;
        cache.clear();
        cache.save().await?;
        Ok(())
    }

    pub async fn me(&self) -> ClientResult<UserProfile> {
        let resp = self.authed(self.http.get(self.url("/api/me")))?.send().await?;
        decode(resp).await
    }

    pub async fn record_mood(&self, body: &RecordMoodRequest) -> ClientResult<MoodEntry> {
        let resp = self
            .authed(self.http.post(self.url("/api/mood")))?
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn moods(&self, filter: &MoodFilter) -> ClientResult<Vec<MoodEntry>> {
        let resp = self
            .authed(self.http.get(self.url("/api/moods")))?
            .query(filter)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn record_reading(&self, body: &CreateReadingRequest) -> ClientResult<ReadingSession> {
        let resp = self
            .authed(self.http.post(self.url("/api/reading-session")))?
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn reading_sessions(&self, page: &PageQuery) -> ClientResult<Vec<ReadingSession>> {
        let resp = self
            .authed(self.http.get(self.url("/api/reading-sessions")))?
            .query(page)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn record_sport(&self, body: &CreateSportRequest) -> ClientResult<SportSession> {
        let resp = self
            .authed(self.http.post(self.url("/api/sport-session")))?
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }

    pub async fn sport_sessions(&self, page: &PageQuery) -> ClientResult<Vec<SportSession>> {
        let resp = self
            .authed(self.http.get(self.url("/api/sport-sessions")))?
            .query(page)
            .send()
            .await?;
        decode(resp).await
    }

    /// Reading sessions started at or after `since`, walking pages newest first.
    pub async fn reading_since(&self, since: DateTime<Utc>) -> ClientResult<Vec<ReadingSession>> {
        let mut out = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.reading_sessions(&full_page(offset)).await?;
            let done = page.len() < MAX_PAGE_SIZE as usize
                || page.last().map_or(true, |s| s.started_at < since);
            offset += page.len() as i64;
            out.extend(page.into_iter().filter(|s| s.started_at >= since));
            if done {
                return Ok(out);
            }
        }
    }

    /// Sport sessions started at or after `since`, walking pages newest first.
    pub async fn sport_since(&self, since: DateTime<Utc>) -> ClientResult<Vec<SportSession>> {
        let mut out = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.sport_sessions(&full_page(offset)).await?;
            let done = page.len() < MAX_PAGE_SIZE as usize
                || page.last().map_or(true, |s| s.started_at < since);
            offset += page.len() as i64;
            out.extend(page.into_iter().filter(|s| s.started_at >= since));
            if done {
                return Ok(out);
            }
        }
    }

    pub async fn monthly_stats(&self) -> ClientResult<MonthlyStats> {
        let resp = self
            .authed(self.http.get(self.url("/api/stats/monthly")))?
            .send()
            .await?;
        decode(resp).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.session.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> ClientResult<RequestBuilder> {
        let token = self.session.token.as_deref().ok_or(ClientError::NotLoggedIn)?;
        Ok(req.bearer_auth(token))
    }
}

fn full_page(offset: i64) -> PageQuery {
    PageQuery {
        limit: Some(MAX_PAGE_SIZE),
        offset: Some(offset),
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> ClientResult<T> {
    let status = resp.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::Unauthorized);
    }
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or(text);
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(resp.json().await?)
}
