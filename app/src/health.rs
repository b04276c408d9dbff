// In app/src/health.rs

use std::time::Duration;

/// The HTTP client used for pings. A ping slower than `timeout` counts as failed.
pub fn health_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Pings `url` every `interval` and logs what came back. Runs until the
/// process exits; a failed ping is logged and the next tick tries again.
pub async fn run_health_check(client: reqwest::Client, url: String, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;
        match ping(&client, &url).await {
            Ok((status, body)) => tracing::info!(%url, status, %body, "Health check response."),
            Err(e) => tracing::error!(%url, error = %e, "Health check failed."),
        }
    }
}

async fn ping(client: &reqwest::Client, url: &str) -> reqwest::Result<(u16, String)> {
    let response = client.get(url).send().await?;
    let status = response.status().as_u16();
    let body = response.text().await?;
    Ok((status, body))
}
