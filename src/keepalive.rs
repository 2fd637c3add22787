use std::time::Duration;

use tokio::task::JoinHandle;

/// Periodically GET `url` so hosts that sleep idle instances keep this one warm.
pub fn spawn_self_ping(url: String, every: Duration) -> anyhow::Result<JoinHandle<()>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    Ok(tokio::spawn(async move {
        let mut interval = tokio::time::interval(every.max(Duration::from_secs(1)));
        // The first tick completes immediately; skip it so startup isn't pinged
        interval.tick().await;
        loop {
            interval.tick().await;
            match ping_once(&client, &url).await {
                Ok(()) => tracing::debug!(%url, "Self-ping ok"),
                Err(e) => tracing::warn!(%url, error = %e, "Self-ping failed"),
            }
        }
    }))
}

async fn ping_once(client: &reqwest::Client, url: &str) -> Result<(), reqwest::Error> {
    client.get(url).send().await?.error_for_status()?;
    Ok(())
}
