use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::FeedError;

use super::{Feed, FeedItem, FeedStore, NewFeedItem};

const ITEM_COLUMNS: &str = "id, feed_id, title, link, summary, published, image_url, is_read";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self { PgStore { pool } }
}

#[async_trait]
impl FeedStore for PgStore {
    async fn find_feed_by_url(&self, url: &str) -> Result<Option<Feed>, FeedError> {
        let row = sqlx::query_as::<_, Feed>("SELECT id, url, title FROM feeds WHERE url = $1")
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_feed_by_id(&self, id: i32) -> Result<Option<Feed>, FeedError> {
        let row = sqlx::query_as::<_, Feed>("SELECT id, url, title FROM feeds WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_feed(&self, url: &str, title: &str) -> Result<Option<Feed>, FeedError> {
        let row = sqlx::query_as::<_, Feed>(
            r#"
            INSERT INTO feeds (url, title)
            VALUES ($1, $2)
            ON CONFLICT (url) DO NOTHING
            RETURNING id, url, title
            "#,
        )
        .bind(url)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_feed(&self, id: i32) -> Result<Option<Feed>, FeedError> {
        // feed_items.feed_id is ON DELETE CASCADE
        let row = sqlx::query_as::<_, Feed>("DELETE FROM feeds WHERE id = $1 RETURNING id, url, title")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_feeds(&self) -> Result<Vec<Feed>, FeedError> {
        let rows = sqlx::query_as::<_, Feed>("SELECT id, url, title FROM feeds ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_item_by_link(&self, feed_id: i32, link: &str) -> Result<Option<FeedItem>, FeedError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM feed_items WHERE link = $1 AND feed_id = $2");
        let row = sqlx::query_as::<_, FeedItem>(&sql)
            .bind(link)
            .bind(feed_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_item(&self, item: &NewFeedItem) -> Result<Option<FeedItem>, FeedError> {
        let sql = format!(
            r#"
            INSERT INTO feed_items (feed_id, title, link, summary, published, image_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (link) DO NOTHING
            RETURNING {ITEM_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, FeedItem>(&sql)
            .bind(item.feed_id)
            .bind(&item.title)
            .bind(&item.link)
            .bind(&item.summary)
            .bind(&item.published)
            .bind(item.image_url.as_deref())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_items_by_feed(&self, feed_id: i32) -> Result<Vec<FeedItem>, FeedError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM feed_items WHERE feed_id = $1 ORDER BY published DESC, id");
        let rows = sqlx::query_as::<_, FeedItem>(&sql)
            .bind(feed_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_items(&self) -> Result<Vec<FeedItem>, FeedError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM feed_items ORDER BY published DESC, id");
        let rows = sqlx::query_as::<_, FeedItem>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn set_item_read(&self, item_id: i32, is_read: bool) -> Result<Option<FeedItem>, FeedError> {
        let sql = format!("UPDATE feed_items SET is_read = $2 WHERE id = $1 RETURNING {ITEM_COLUMNS}");
        let row = sqlx::query_as::<_, FeedItem>(&sql)
            .bind(item_id)
            .bind(is_read)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
