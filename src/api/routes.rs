use axum::extract::{Path, State};
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::error::FeedError;
use crate::feed;
use crate::ingestion;
use crate::items;
use crate::store::{Feed, FeedItem};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedCreate {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeedItemUpdate {
    pub is_read: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/feeds", get(list_feeds).post(create_feed))
        .route("/feeds/", get(list_feeds).post(create_feed))
        .route("/feeds/{feed_id}", delete(remove_feed))
        .route("/feeds/{feed_id}/refresh", post(refresh_feed))
        .route("/feeds/{feed_id}/items", get(feed_items))
        .route("/items", get(all_items))
        .route("/items/{item_id}", patch(update_item))
}

/// POST /feeds/
async fn create_feed(State(state): State<AppState>, Json(body): Json<FeedCreate>) -> Result<Json<Feed>, FeedError> {
    let title = body.title.unwrap_or_default();
    let feed = feed::add_feed(state.store.as_ref(), &body.url, &title).await?;
    Ok(Json(feed))
}

/// GET /feeds/
async fn list_feeds(State(state): State<AppState>) -> Result<Json<Vec<Feed>>, FeedError> {
    Ok(Json(state.store.list_feeds().await?))
}

/// DELETE /feeds/{feed_id}
async fn remove_feed(State(state): State<AppState>, Path(feed_id): Path<i32>) -> Result<Json<Feed>, FeedError> {
    Ok(Json(feed::remove_feed(state.store.as_ref(), feed_id).await?))
}

/// POST /feeds/{feed_id}/refresh - only the items created by this call
async fn refresh_feed(State(state): State<AppState>, Path(feed_id): Path<i32>) -> Result<Json<Vec<FeedItem>>, FeedError> {
    let report = ingestion::refresh_feed(state.store.as_ref(), state.source.as_ref(), state.vocab, feed_id).await?;
    Ok(Json(report.items))
}

/// GET /feeds/{feed_id}/items
async fn feed_items(State(state): State<AppState>, Path(feed_id): Path<i32>) -> Result<Json<Vec<FeedItem>>, FeedError> {
    Ok(Json(items::list_items(state.store.as_ref(), Some(feed_id)).await?))
}

/// GET /items
async fn all_items(State(state): State<AppState>) -> Result<Json<Vec<FeedItem>>, FeedError> {
    Ok(Json(items::list_items(state.store.as_ref(), None).await?))
}

/// PATCH /items/{item_id}
async fn update_item(
    State(state): State<AppState>,
    Path(item_id): Path<i32>,
    Json(body): Json<FeedItemUpdate>,
) -> Result<Json<FeedItem>, FeedError> {
    Ok(Json(items::mark_read(state.store.as_ref(), item_id, body.is_read).await?))
}
