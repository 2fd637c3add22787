use std::future::Future;

use super::api::ClientResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Network,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub value: T,
    pub source: Source,
}

impl<T> Fetched<T> {
    pub fn is_fresh(&self) -> bool {
        self.source == Source::Network
    }
}

/// The one fetch policy every view uses: a single request, no retry. On
/// failure the error is logged and the caller's fallback is shown instead;
/// the user refreshes to try again.
pub async fn fetch_or_fallback<T, Fut, F>(what: &str, request: Fut, fallback: F) -> Fetched<T>
where
    Fut: Future<Output = ClientResult<T>>,
    F: FnOnce() -> T,
{
    match request.await {
        Ok(value) => Fetched {
            value,
            source: Source::Network,
        },
        Err(e) => {
            tracing::warn!(what, error = %e, "Fetch failed, showing fallback");
            Fetched {
                value: fallback(),
                source: Source::Fallback,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::api::ClientError;

    #[tokio::test]
    async fn test_success_is_fresh() {
        let fetched = fetch_or_fallback("n", async { Ok(3) }, || 0).await;
        assert_eq!(fetched.value, 3);
        assert!(fetched.is_fresh());
    }

    #[tokio::test]
    async fn test_failure_uses_fallback() {
        let fetched =
            fetch_or_fallback("n", async { Err::<i32, _>(ClientError::NotLoggedIn) }, || 7).await;
        assert_eq!(fetched.value, 7);
        assert_eq!(fetched.source, Source::Fallback);
    }
}
