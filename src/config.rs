use std::env;

use anyhow::Context;

/// One year.
pub const MAX_JWT_TTL_SECS: i64 = 365 * 24 * 3600;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When unset the server runs on the in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,

    pub jwt_secret: String,
    pub jwt_ttl_secs: i64,

    // Keep-alive for hosts that idle out sleeping instances
    pub self_ping_url: Option<String>,
    pub self_ping_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: parse_or("PORT", 5000)?,
            cors_origins: non_empty("CORS_ORIGINS")
                .map(|list| {
                    list.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),

            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_ttl_secs: checked_ttl(parse_or("JWT_TTL_SECS", 604_800)?)?,

            self_ping_url: non_empty("SELF_PING_URL"),
            self_ping_interval_secs: parse_or("SELF_PING_INTERVAL_SECS", 600)?,
        })
    }

    /// Configuration for tests and local tooling: in-memory store, given secret.
    pub fn for_secret(secret: &str) -> Self {
        Self {
            database_url: None,
            host: "127.0.0.1".into(),
            port: 0,
            cors_origins: Vec::new(),
            jwt_secret: secret.to_string(),
            jwt_ttl_secs: 3600,
            self_ping_url: None,
            self_ping_interval_secs: 600,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn checked_ttl(secs: i64) -> anyhow::Result<i64> {
    if !(1..=MAX_JWT_TTL_SECS).contains(&secs) {
        anyhow::bail!("JWT_TTL_SECS must be between 1 and {MAX_JWT_TTL_SECS}, got {secs}");
    }
    Ok(secs)
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listen_addr() {
        let mut config = Config::for_secret("s");
        config.port = 5000;
        assert_eq!(config.listen_addr(), "127.0.0.1:5000");
    }

    #[test]
    fn test_parse_or_default_when_unset() {
        let value: u16 = parse_or("FLOWNEST_TEST_UNSET_PORT", 5000).unwrap();
        assert_eq!(value, 5000);
    }

    #[test]
    fn test_ttl_must_be_positive_and_bounded() {
        assert_eq!(checked_ttl(604_800).unwrap(), 604_800);
        assert_eq!(checked_ttl(MAX_JWT_TTL_SECS).unwrap(), MAX_JWT_TTL_SECS);
        assert!(checked_ttl(0).is_err());
        assert!(checked_ttl(-60).is_err());
        assert!(checked_ttl(i64::MAX).is_err());
    }
}
