use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::FeedError;

use super::{Feed, FeedItem, FeedStore, NewFeedItem};

/// In-process store with the same uniqueness rules as the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    feeds: Vec<Feed>,
    items: Vec<FeedItem>,
    next_feed_id: i32,
    next_item_id: i32,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    fn with<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.lock().expect("memory store poisoned");
        f(&mut state)
    }
}

fn by_published_desc(items: &mut [FeedItem]) {
    items.sort_by(|a, b| b.published.cmp(&a.published).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl FeedStore for MemoryStore {
    async fn find_feed_by_url(&self, url: &str) -> Result<Option<Feed>, FeedError> {
        Ok(self.with(|s| s.feeds.iter().find(|f| f.url == url).cloned()))
    }

    async fn find_feed_by_id(&self, id: i32) -> Result<Option<Feed>, FeedError> {
        Ok(self.with(|s| s.feeds.iter().find(|f| f.id == id).cloned()))
    }

    async fn create_feed(&self, url: &str, title: &str) -> Result<Option<Feed>, FeedError> {
        Ok(self.with(|s| {
            if s.feeds.iter().any(|f| f.url == url) {
                return None;
            }
            s.next_feed_id += 1;
            let feed = Feed { id: s.next_feed_id, url: url.to_string(), title: title.to_string() };
            s.feeds.push(feed.clone());
            Some(feed)
        }))
    }

    async fn delete_feed(&self, id: i32) -> Result<Option<Feed>, FeedError> {
        Ok(self.with(|s| {
            let pos = s.feeds.iter().position(|f| f.id == id)?;
            s.items.retain(|i| i.feed_id != id);
            Some(s.feeds.remove(pos))
        }))
    }

    async fn list_feeds(&self) -> Result<Vec<Feed>, FeedError> {
        Ok(self.with(|s| s.feeds.clone()))
    }

    async fn find_item_by_link(&self, feed_id: i32, link: &str) -> Result<Option<FeedItem>, FeedError> {
        Ok(self.with(|s| s.items.iter().find(|i| i.feed_id == feed_id && i.link == link).cloned()))
    }

    async fn create_item(&self, item: &NewFeedItem) -> Result<Option<FeedItem>, FeedError> {
        Ok(self.with(|s| {
            if s.items.iter().any(|i| i.link == item.link) {
                return None;
            }
            s.next_item_id += 1;
            let row = FeedItem {
                id: s.next_item_id,
                feed_id: item.feed_id,
                title: item.title.clone(),
                link: item.link.clone(),
                summary: item.summary.clone(),
                published: item.published.clone(),
                image_url: item.image_url.clone(),
                is_read: false,
            };
            s.items.push(row.clone());
            Some(row)
        }))
    }

    async fn list_items_by_feed(&self, feed_id: i32) -> Result<Vec<FeedItem>, FeedError> {
        let mut items: Vec<FeedItem> = self.with(|s| s.items.iter().filter(|i| i.feed_id == feed_id).cloned().collect());
        by_published_desc(&mut items);
        Ok(items)
    }

    async fn list_items(&self) -> Result<Vec<FeedItem>, FeedError> {
        let mut items = self.with(|s| s.items.clone());
        by_published_desc(&mut items);
        Ok(items)
    }

    async fn set_item_read(&self, item_id: i32, is_read: bool) -> Result<Option<FeedItem>, FeedError> {
        Ok(self.with(|s| {
            let item = s.items.iter_mut().find(|i| i.id == item_id)?;
            item.is_read = is_read;
            Some(item.clone())
        }))
    }
}
