use async_trait::async_trait;
use serde::Serialize;

use crate::error::FeedError;

mod pg;
#[cfg(test)]
pub mod memory;

pub use pg::PgStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Feed {
    pub id: i32,
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct FeedItem {
    pub id: i32,
    pub feed_id: i32,
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: String,
    pub image_url: Option<String>,
    pub is_read: bool,
}

/// Insert payload for `FeedStore::create_item`; new items always start unread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedItem {
    pub feed_id: i32,
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: String,
    pub image_url: Option<String>,
}

/// Persistence for feeds and their items.
///
/// `feeds.url` and `feed_items.link` are unique across the whole store. The
/// `create_*` methods return `None` instead of an error when they would break
/// that constraint, so concurrent writers simply lose the race.
#[async_trait]
pub trait FeedStore: Send + Sync {
    async fn find_feed_by_url(&self, url: &str) -> Result<Option<Feed>, FeedError>;
    async fn find_feed_by_id(&self, id: i32) -> Result<Option<Feed>, FeedError>;
    async fn create_feed(&self, url: &str, title: &str) -> Result<Option<Feed>, FeedError>;
    /// Removes the feed and all of its items.
    async fn delete_feed(&self, id: i32) -> Result<Option<Feed>, FeedError>;
    async fn list_feeds(&self) -> Result<Vec<Feed>, FeedError>;

    async fn find_item_by_link(&self, feed_id: i32, link: &str) -> Result<Option<FeedItem>, FeedError>;
    async fn create_item(&self, item: &NewFeedItem) -> Result<Option<FeedItem>, FeedError>;
    /// Items of one feed, `published` descending.
    async fn list_items_by_feed(&self, feed_id: i32) -> Result<Vec<FeedItem>, FeedError>;
    /// Items of every feed, `published` descending.
    async fn list_items(&self) -> Result<Vec<FeedItem>, FeedError>;
    async fn set_item_read(&self, item_id: i32, is_read: bool) -> Result<Option<FeedItem>, FeedError>;
}
