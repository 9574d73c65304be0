use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;

use super::fetch;
use super::parse;
use super::types::FetchOutcome;

/// Where refresh gets entries from. Implementations never fail: problems are
/// reported as `FetchOutcome::Failed`.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchOutcome;
}

pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(HttpFeedSource { client: fetch::build_client(timeout)? })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> FetchOutcome {
        let xml = match fetch::fetch_feed(&self.client, url).await {
            Ok(xml) => xml,
            Err(e) => return FetchOutcome::Failed(format!("fetch: {e:#}")),
        };
        match parse::parse_entries(&xml) {
            Ok(entries) => FetchOutcome::Entries(entries),
            Err(e) => FetchOutcome::Failed(format!("parse: {e:#}")),
        }
    }
}
