use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::error::FeedError;
use crate::store::{FeedItem, FeedStore};
use crate::telemetry::{self};
use crate::telemetry::ops::items::Phase as ItemsPhase;

/// rfeed items ls/read
#[derive(Args)]
pub struct ItemsCmd {
    #[command(subcommand)]
    pub cmd: ItemsSub,
}

#[derive(Subcommand)]
pub enum ItemsSub {
    /// List stored items, newest `published` first
    Ls {
        #[arg(long)]
        feed: Option<i32>,
        #[arg(long, default_value_t = false)]
        unread: bool,
    },
    /// Mark an item read (or unread with --unread)
    Read {
        id: i32,
        #[arg(long, default_value_t = false)]
        unread: bool,
    },
}

#[derive(Serialize)]
struct ItemList {
    items: Vec<FeedItem>,
}

pub async fn run(store: &dyn FeedStore, args: ItemsCmd) -> Result<()> {
    let log = telemetry::items();
    let _g = log.root_span().entered();
    match args.cmd {
        ItemsSub::Ls { feed, unread } => {
            let _s = log.span(&ItemsPhase::List).entered();
            let mut items = list_items(store, feed).await?;
            if unread { items.retain(|i| !i.is_read); }
            for i in &items {
                log.info(format!(
                    "[{}] feed={} {} {} — {}",
                    i.id, i.feed_id, if i.is_read { "·" } else { "●" }, i.published, i.title
                ));
            }
            log.info(format!("{} items", items.len()));
            log.result(&ItemList { items })?;
        }
        ItemsSub::Read { id, unread } => {
            let _s = log.span_kv(&ItemsPhase::Update, [("item_id", id.to_string()), ("is_read", (!unread).to_string())]).entered();
            let item = mark_read(store, id, !unread).await?;
            log.info(format!("✔️ item {} is_read={}", item.id, item.is_read));
            log.result(&item)?;
        }
    }
    Ok(())
}

/// Items of one feed or of all feeds, `published` descending. An unknown feed
/// id lists nothing.
pub async fn list_items(store: &dyn FeedStore, feed: Option<i32>) -> Result<Vec<FeedItem>, FeedError> {
    match feed {
        Some(feed_id) => store.list_items_by_feed(feed_id).await,
        None => store.list_items().await,
    }
}

pub async fn mark_read(store: &dyn FeedStore, item_id: i32, is_read: bool) -> Result<FeedItem, FeedError> {
    store.set_item_read(item_id, is_read).await?.ok_or(FeedError::ItemNotFound(item_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewFeedItem;
    use crate::store::memory::MemoryStore;

    fn new_item(feed_id: i32, link: &str, published: &str) -> NewFeedItem {
        NewFeedItem {
            feed_id,
            title: format!("item {link}"),
            link: link.to_string(),
            summary: String::new(),
            published: published.to_string(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn lists_by_published_descending() {
        let store = MemoryStore::new();
        let a = store.create_feed("https://a.test/rss", "A").await.unwrap().unwrap();
        let b = store.create_feed("https://b.test/rss", "B").await.unwrap().unwrap();
        store.create_item(&new_item(a.id, "https://a.test/1", "2025-01-01")).await.unwrap();
        store.create_item(&new_item(a.id, "https://a.test/2", "2025-03-01")).await.unwrap();
        store.create_item(&new_item(b.id, "https://b.test/1", "2025-02-01")).await.unwrap();

        let for_a: Vec<String> = list_items(&store, Some(a.id)).await.unwrap().into_iter().map(|i| i.link).collect();
        assert_eq!(for_a, vec!["https://a.test/2", "https://a.test/1"]);

        let all: Vec<String> = list_items(&store, None).await.unwrap().into_iter().map(|i| i.published).collect();
        assert_eq!(all, vec!["2025-03-01", "2025-02-01", "2025-01-01"]);

        assert!(list_items(&store, Some(99)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_read_toggles_and_reports_missing() {
        let store = MemoryStore::new();
        let feed = store.create_feed("https://a.test/rss", "A").await.unwrap().unwrap();
        let item = store.create_item(&new_item(feed.id, "https://a.test/1", "")).await.unwrap().unwrap();
        assert!(!item.is_read);

        assert!(mark_read(&store, item.id, true).await.unwrap().is_read);
        assert!(!mark_read(&store, item.id, false).await.unwrap().is_read);
        assert!(matches!(mark_read(&store, 404, true).await.unwrap_err(), FeedError::ItemNotFound(404)));
    }
}
