use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;
use tracing::Instrument;

use crate::error::FeedError;
use crate::keywords::{self, Vocabulary};
use crate::relevance;
use crate::store::{Feed, FeedStore, NewFeedItem};
use crate::telemetry::{self};
use crate::telemetry::ops::refresh::Phase as RefreshPhase;

pub mod fetch;
pub mod image;
pub mod parse;
pub mod source;
pub mod types;

pub use source::{FeedSource, HttpFeedSource};
pub use types::RefreshReport;

#[derive(Args)]
pub struct RefreshCmd {
    /// Refresh a single feed; omit to refresh every stored feed
    #[arg(long)] pub feed: Option<i32>,
    #[arg(long, default_value_t = false)] pub apply: bool,
    #[arg(long, default_value_t = 10)] pub plan_limit: usize,
    /// Per-request timeout in seconds (default: RFEED_FETCH_TIMEOUT_SECS or 20)
    #[arg(long)] pub fetch_timeout: Option<u64>,
}

pub async fn run(store: &dyn FeedStore, args: RefreshCmd) -> Result<()> {
    let started = Instant::now();
    let log = telemetry::refresh();
    let timeout_secs = args.fetch_timeout.unwrap_or_else(fetch::timeout_secs_from_env);
    let _g = log.root_span_kv([
        ("apply", args.apply.to_string()),
        ("feed", format!("{:?}", args.feed)),
        ("plan_limit", args.plan_limit.to_string()),
        ("fetch_timeout_secs", timeout_secs.to_string()),
    ]).entered();

    let feeds = match args.feed {
        Some(id) => vec![store.find_feed_by_id(id).await?.ok_or(FeedError::FeedNotFound(id))?],
        None => store.list_feeds().await?,
    };

    if !args.apply {
        let _s = log.span(&RefreshPhase::Plan).entered();
        log.info(format!("📝 Refresh plan — feeds={} fetch_timeout={}s", feeds.len(), timeout_secs));
        for f in feeds.iter().take(args.plan_limit) { log.info(format!("  feed_id={} url={} title={:?}", f.id, f.url, f.title)); }
        if feeds.len() > args.plan_limit { log.info(format!("  ... ({} more)", feeds.len() - args.plan_limit)); }
        log.info("   Use --apply to execute.");
        use types::{FeedSample, RefreshPlan};
        let sample_feeds = feeds.iter().take(args.plan_limit)
            .map(|f| FeedSample { feed_id: f.id, url: f.url.clone(), title: f.title.clone() })
            .collect();
        log.plan(&RefreshPlan { feeds: feeds.len(), fetch_timeout_secs: timeout_secs, sample_feeds })?;
        return Ok(());
    }

    let source = HttpFeedSource::new(Duration::from_secs(timeout_secs))?;
    let vocab = keywords::active();

    let mut per_feed: Vec<RefreshReport> = Vec::with_capacity(feeds.len());
    for f in &feeds {
        per_feed.push(refresh_feed(store, &source, vocab, f.id).await?);
    }

    use types::{RefreshApply, RefreshTotals};
    let totals = RefreshTotals {
        feeds: per_feed.len(),
        inserted: per_feed.iter().map(|r| r.items.len()).sum(),
        existing: per_feed.iter().map(|r| r.skipped_existing).sum(),
        irrelevant: per_feed.iter().map(|r| r.skipped_irrelevant).sum(),
        fetch_errors: per_feed.iter().filter(|r| r.fetch_error.is_some()).count(),
    };
    log.totals(totals.feeds, totals.inserted, totals.existing, totals.irrelevant, totals.fetch_errors);
    log.result_timed(&RefreshApply { totals, per_feed }, started)?;
    Ok(())
}

/// Fetch one feed and store every new, relevant entry.
///
/// Entries are handled in source order and each insert is visible to the next
/// duplicate check, so a link repeated within the same fetch is stored once.
/// Fetch and parse failures produce an empty report with `fetch_error` set.
pub async fn refresh_feed(
    store: &dyn FeedStore,
    source: &dyn FeedSource,
    vocab: &Vocabulary,
    feed_id: i32,
) -> Result<RefreshReport, FeedError> {
    let log = telemetry::refresh();
    let feed = store.find_feed_by_id(feed_id).await?.ok_or(FeedError::FeedNotFound(feed_id))?;
    let span = log.span_kv(&RefreshPhase::Feed, [("feed_id", feed.id.to_string()), ("url", feed.url.clone())]);
    refresh_entries(store, source, vocab, &feed).instrument(span).await
}

async fn refresh_entries(
    store: &dyn FeedStore,
    source: &dyn FeedSource,
    vocab: &Vocabulary,
    feed: &Feed,
) -> Result<RefreshReport, FeedError> {
    let log = telemetry::refresh();
    let mut report = RefreshReport::new(feed.id);

    let outcome = source.fetch(&feed.url).instrument(log.span(&RefreshPhase::Fetch)).await;
    if let Some(reason) = outcome.error() {
        log.warn_kv("⚠️ fetch failed, treating feed as empty", [("url", feed.url.clone()), ("reason", reason.to_string())]);
        report.fetch_error = Some(reason.to_string());
    }
    let entries = outcome.into_entries();
    report.entries = entries.len();

    for entry in &entries {
        let Some(link) = entry.link.as_deref() else {
            report.skipped_no_link += 1;
            log.debug_kv("↩️ skip", [("reason", "no-link".to_string()), ("title", entry.title.clone())]);
            continue;
        };

        if store.find_item_by_link(feed.id, link).await?.is_some() {
            report.skipped_existing += 1;
            log.debug_kv("↩️ skip", [("reason", "existing".to_string()), ("url", link.to_string())]);
            continue;
        }

        let summary = entry.summary.as_deref().unwrap_or("");
        let relevance = relevance::check(vocab, &entry.title, summary);
        if !relevance.is_match() {
            report.skipped_irrelevant += 1;
            log.debug_kv("↩️ skip", [("reason", relevance.reason().to_string()), ("url", link.to_string())]);
            continue;
        }

        let image = image::resolve(entry);
        let new_item = NewFeedItem {
            feed_id: feed.id,
            title: entry.title.clone(),
            link: link.to_string(),
            summary: summary.to_string(),
            published: entry.published.clone().unwrap_or_default(),
            image_url: image.as_ref().map(|i| i.url.clone()),
        };

        match store.create_item(&new_item).instrument(log.span(&RefreshPhase::WriteItem)).await? {
            Some(item) => {
                log.info_kv("➕ insert", [
                    ("url", item.link.clone()),
                    ("title", item.title.clone()),
                    ("image", image.map(|i| i.strategy).unwrap_or("none").to_string()),
                ]);
                report.items.push(item);
            }
            None => {
                // unique link held by another feed or a concurrent refresh
                report.skipped_existing += 1;
                log.info_kv("↩️ skip", [("reason", "link-conflict".to_string()), ("url", link.to_string())]);
            }
        }
    }

    log.feed_summary(feed.id, report.items.len(), report.skipped_existing, report.skipped_irrelevant, report.fetch_error.is_some());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::ingestion::types::{FeedEntry, FetchOutcome, MediaContent};
    use crate::store::memory::MemoryStore;

    struct CannedSource(FetchOutcome);

    #[async_trait]
    impl FeedSource for CannedSource {
        async fn fetch(&self, _url: &str) -> FetchOutcome { self.0.clone() }
    }

    fn entry(title: &str, summary: &str, link: &str) -> FeedEntry {
        FeedEntry {
            title: title.to_string(),
            summary: Some(summary.to_string()),
            link: Some(link.to_string()),
            published: Some("Mon, 06 Jan 2025 10:00:00 -0600".to_string()),
            ..Default::default()
        }
    }

    fn relevant(link: &str) -> FeedEntry {
        entry("Oklahoma City homeless shelter expansion", "OKC officials announced...", link)
    }

    async fn store_with_feed(url: &str) -> (MemoryStore, Feed) {
        let store = MemoryStore::new();
        let feed = store.create_feed(url, "KFOR News").await.unwrap().unwrap();
        (store, feed)
    }

    #[tokio::test]
    async fn stores_relevant_entries_in_source_order() {
        let (store, feed) = store_with_feed("https://kfor.com/feed/").await;
        let mut with_media = relevant("https://kfor.com/a");
        with_media.media = vec![MediaContent { url: Some("https://kfor.com/a.jpg".into()), mime_type: None }];
        let mut no_date = entry("Tulsa jail reform bill", "", "https://kfor.com/c");
        no_date.published = None;
        no_date.summary = None;
        let source = CannedSource(FetchOutcome::Entries(vec![
            with_media,
            entry("Local weather forecast", "Sunny skies in Dallas", "https://kfor.com/b"),
            no_date,
        ]));

        let report = refresh_feed(&store, &source, &Vocabulary::builtin(), feed.id).await.unwrap();

        assert_eq!(report.entries, 3);
        assert_eq!(report.skipped_irrelevant, 1);
        let links: Vec<&str> = report.items.iter().map(|i| i.link.as_str()).collect();
        assert_eq!(links, vec!["https://kfor.com/a", "https://kfor.com/c"]);
        assert_eq!(report.items[0].image_url.as_deref(), Some("https://kfor.com/a.jpg"));
        assert!(!report.items[0].is_read);
        assert_eq!(report.items[1].published, "");
        assert_eq!(report.items[1].summary, "");
        assert_eq!(report.items[1].image_url, None);
    }

    #[tokio::test]
    async fn second_refresh_creates_nothing() {
        let (store, feed) = store_with_feed("https://kfor.com/feed/").await;
        let source = CannedSource(FetchOutcome::Entries(vec![relevant("https://kfor.com/a"), relevant("https://kfor.com/b")]));
        let vocab = Vocabulary::builtin();

        let first = refresh_feed(&store, &source, &vocab, feed.id).await.unwrap();
        let second = refresh_feed(&store, &source, &vocab, feed.id).await.unwrap();

        assert_eq!(first.items.len(), 2);
        assert!(second.items.is_empty());
        assert_eq!(second.skipped_existing, 2);
        assert_eq!(store.list_items_by_feed(feed.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn repeated_link_within_one_fetch_is_stored_once() {
        let (store, feed) = store_with_feed("https://kfor.com/feed/").await;
        let mut dup = relevant("https://kfor.com/same");
        dup.title = "Oklahoma City homeless shelter expansion, updated".into();
        let source = CannedSource(FetchOutcome::Entries(vec![relevant("https://kfor.com/same"), dup]));

        let report = refresh_feed(&store, &source, &Vocabulary::builtin(), feed.id).await.unwrap();

        assert_eq!(report.items.len(), 1);
        assert_eq!(report.items[0].title, "Oklahoma City homeless shelter expansion");
        assert_eq!(report.skipped_existing, 1);
    }

    #[tokio::test]
    async fn link_owned_by_another_feed_is_skipped() {
        let (store, first) = store_with_feed("https://kfor.com/feed/").await;
        let second = store.create_feed("https://www.koco.com/topstories-rss", "KOCO").await.unwrap().unwrap();
        let source = CannedSource(FetchOutcome::Entries(vec![relevant("https://shared.test/story")]));
        let vocab = Vocabulary::builtin();

        let a = refresh_feed(&store, &source, &vocab, first.id).await.unwrap();
        let b = refresh_feed(&store, &source, &vocab, second.id).await.unwrap();

        assert_eq!(a.items.len(), 1);
        assert!(b.items.is_empty());
        assert_eq!(b.skipped_existing, 1);
        assert!(store.list_items_by_feed(second.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_reads_as_empty_feed() {
        let (store, feed) = store_with_feed("https://www.https://feeds.texastribune.org/feeds/main/").await;
        let source = CannedSource(FetchOutcome::Failed("fetch: dns error".into()));

        let report = refresh_feed(&store, &source, &Vocabulary::builtin(), feed.id).await.unwrap();

        assert!(report.items.is_empty());
        assert_eq!(report.entries, 0);
        assert_eq!(report.fetch_error.as_deref(), Some("fetch: dns error"));
    }

    #[tokio::test]
    async fn entries_without_link_are_skipped() {
        let (store, feed) = store_with_feed("https://kfor.com/feed/").await;
        let mut no_link = relevant("unused");
        no_link.link = None;
        let source = CannedSource(FetchOutcome::Entries(vec![no_link]));

        let report = refresh_feed(&store, &source, &Vocabulary::builtin(), feed.id).await.unwrap();

        assert!(report.items.is_empty());
        assert_eq!(report.skipped_no_link, 1);
    }

    #[tokio::test]
    async fn unknown_feed_is_not_found() {
        let store = MemoryStore::new();
        let source = CannedSource(FetchOutcome::Entries(vec![]));
        let err = refresh_feed(&store, &source, &Vocabulary::builtin(), 42).await.unwrap_err();
        assert!(matches!(err, FeedError::FeedNotFound(42)));
    }

    #[tokio::test]
    async fn deleting_feed_drops_its_items() {
        let (store, feed) = store_with_feed("https://kfor.com/feed/").await;
        let source = CannedSource(FetchOutcome::Entries(vec![relevant("https://kfor.com/a")]));
        refresh_feed(&store, &source, &Vocabulary::builtin(), feed.id).await.unwrap();

        store.delete_feed(feed.id).await.unwrap();

        assert!(store.list_items().await.unwrap().is_empty());
    }
}
