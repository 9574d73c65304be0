use anyhow::Result;
use clap::{Args, Subcommand};
use url::Url;

use crate::error::FeedError;
use crate::store::{Feed, FeedStore};
use crate::telemetry::{self};
use crate::telemetry::ops::feed::Phase as FeedPhase;

pub mod defaults;
pub mod types;

use defaults::DEFAULT_FEEDS;

/// rfeed feed add/ls/rm/seed
#[derive(Args)]
pub struct FeedCmd {
    #[command(subcommand)]
    pub cmd: FeedSub,
}

#[derive(Subcommand)]
pub enum FeedSub {
    // add a new feed (plan-only by default; use --apply to write)
    Add {
        url: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value_t = false)]
        apply: bool,
    },
    // list feeds
    Ls,
    /// Remove a feed and every item it owns
    Rm {
        id: i32,
        #[arg(long, default_value_t = false)]
        apply: bool,
    },
    /// Insert the built-in regional feeds that are not stored yet
    Seed {
        #[arg(long, default_value_t = false)]
        apply: bool,
    },
}

pub async fn run(store: &dyn FeedStore, args: FeedCmd) -> Result<()> {
    let log = telemetry::feed();
    let _g = log.root_span().entered();
    match args.cmd {
        FeedSub::Add { url, title, apply } => add_cmd(store, url, title, apply).await?,
        FeedSub::Ls => ls_cmd(store).await?,
        FeedSub::Rm { id, apply } => rm_cmd(store, id, apply).await?,
        FeedSub::Seed { apply } => seed_cmd(store, apply).await?,
    }
    Ok(())
}

/// Validate and insert a feed. A url already stored is `DuplicateFeed`.
pub async fn add_feed(store: &dyn FeedStore, url: &str, title: &str) -> Result<Feed, FeedError> {
    if Url::parse(url).is_err() {
        return Err(FeedError::InvalidUrl(url.to_string()));
    }
    if store.find_feed_by_url(url).await?.is_some() {
        return Err(FeedError::DuplicateFeed(url.to_string()));
    }
    // a concurrent insert can still win between the lookup and here
    store.create_feed(url, title).await?.ok_or_else(|| FeedError::DuplicateFeed(url.to_string()))
}

pub async fn remove_feed(store: &dyn FeedStore, id: i32) -> Result<Feed, FeedError> {
    store.delete_feed(id).await?.ok_or(FeedError::FeedNotFound(id))
}

/// Insert every default feed whose url is not stored yet; returns the new rows.
pub async fn seed_defaults(store: &dyn FeedStore) -> Result<Vec<Feed>, FeedError> {
    let mut inserted = Vec::new();
    for d in DEFAULT_FEEDS {
        if store.find_feed_by_url(d.url).await?.is_some() {
            continue;
        }
        if let Some(feed) = store.create_feed(d.url, d.title).await? {
            inserted.push(feed);
        }
    }
    Ok(inserted)
}

async fn add_cmd(store: &dyn FeedStore, url: String, title: String, apply: bool) -> Result<()> {
    let log = telemetry::feed();
    let _g = log.root_span_kv([
        ("mode", if apply { "apply".to_string() } else { "plan".to_string() }),
        ("url", url.clone()),
        ("title", format!("{:?}", title)),
    ]).entered();

    if !apply {
        let _s = log.span(&FeedPhase::Plan).entered();
        if Url::parse(&url).is_err() { return Err(FeedError::InvalidUrl(url).into()); }
        let exists = store.find_feed_by_url(&url).await?.is_some();
        log.info(format!("📝 Feed plan — add url={} title={:?} exists={}", url, title, exists));
        log.info("   Use --apply to execute.");
        log.plan(&types::FeedAddPlan { action: "add", url, title, exists })?;
        return Ok(());
    }
    let _s = log.span(&FeedPhase::Add).entered();
    let feed = add_feed(store, &url, &title).await?;
    log.info_kv("➕ Feed added", [("feed_id", feed.id.to_string()), ("url", feed.url.clone())]);
    log.result(&feed)?;
    Ok(())
}

async fn ls_cmd(store: &dyn FeedStore) -> Result<()> {
    let log = telemetry::feed();
    let _s = log.span(&FeedPhase::List).entered();
    let feeds = store.list_feeds().await?;
    log.info("📡 Feeds:");
    for f in &feeds {
        log.info(format!("[{}] {} ({:?})", f.id, f.url, f.title));
    }
    log.result(&types::FeedList { feeds })?;
    Ok(())
}

async fn rm_cmd(store: &dyn FeedStore, id: i32, apply: bool) -> Result<()> {
    let log = telemetry::feed();
    let _g = log.root_span_kv([
        ("mode", if apply { "apply".to_string() } else { "plan".to_string() }),
        ("feed_id", id.to_string()),
    ]).entered();

    if !apply {
        let _s = log.span(&FeedPhase::Plan).entered();
        let feed = store.find_feed_by_id(id).await?.ok_or(FeedError::FeedNotFound(id))?;
        let items = store.list_items_by_feed(id).await?.len();
        log.info(format!("📝 Feed plan — remove [{}] {} with {} items", feed.id, feed.url, items));
        log.info("   Use --apply to execute.");
        log.plan(&types::FeedRemovePlan { action: "remove", feed, items })?;
        return Ok(());
    }
    let _s = log.span(&FeedPhase::Remove).entered();
    let feed = remove_feed(store, id).await?;
    log.info_kv("🗑️ Feed removed", [("feed_id", feed.id.to_string()), ("url", feed.url.clone())]);
    log.result(&feed)?;
    Ok(())
}

async fn seed_cmd(store: &dyn FeedStore, apply: bool) -> Result<()> {
    let log = telemetry::feed();
    let _s = log.span(&FeedPhase::Seed).entered();

    if !apply {
        let mut missing = Vec::new();
        for d in DEFAULT_FEEDS {
            if store.find_feed_by_url(d.url).await?.is_none() { missing.push(d.url.to_string()); }
        }
        log.info(format!("📝 Seed plan — {} of {} default feeds missing", missing.len(), DEFAULT_FEEDS.len()));
        for url in &missing { log.info(format!("  {}", url)); }
        log.info("   Use --apply to execute.");
        log.plan(&types::FeedSeedPlan { action: "seed", missing })?;
        return Ok(());
    }
    let inserted = seed_defaults(store).await?;
    log.info(format!("🌱 Seeded {} feeds", inserted.len()));
    log.result(&types::FeedSeedResult { inserted })?;
    Ok(())
}
