use thiserror::Error;

/// Failures surfaced by the store, the refresh pipeline and the HTTP layer.
///
/// Fetch/parse failures of an upstream feed are not listed here: a refresh
/// treats them as zero entries and reports them through `RefreshReport`.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed already exists: {0}")]
    DuplicateFeed(String),

    #[error("Feed not found: {0}")]
    FeedNotFound(i32),

    #[error("Item not found: {0}")]
    ItemNotFound(i32),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl FeedError {
    /// Short message shown to API clients.
    pub fn detail(&self) -> String {
        match self {
            FeedError::DuplicateFeed(_) => "Feed already exists".to_string(),
            FeedError::FeedNotFound(_) => "Feed not found".to_string(),
            FeedError::ItemNotFound(_) => "Item not found".to_string(),
            FeedError::InvalidUrl(url) => format!("Invalid URL: {url}"),
            FeedError::Store(_) => "Internal server error".to_string(),
        }
    }
}
