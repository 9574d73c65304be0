use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::FeedError;

impl FeedError {
    pub fn status(&self) -> StatusCode {
        match self {
            FeedError::DuplicateFeed(_) | FeedError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            FeedError::FeedNotFound(_) | FeedError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            FeedError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        if let FeedError::Store(e) = &self {
            error!("store failure: {}", e);
        }
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}
