use std::time::Duration;

use anyhow::Result;
use bytes::Bytes;
use reqwest::Client;

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// `RFEED_FETCH_TIMEOUT_SECS`, falling back to the default on absence or garbage.
pub fn timeout_secs_from_env() -> u64 {
    std::env::var("RFEED_FETCH_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("rfeed/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

pub async fn fetch_feed(client: &Client, url: &str) -> Result<Bytes> {
    let bytes = client.get(url).send().await?.error_for_status()?.bytes().await?;
    Ok(bytes)
}
