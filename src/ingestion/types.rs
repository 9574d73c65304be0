use serde::Serialize;

use crate::store::FeedItem;

/// One upstream entry as handed over by the feed parser, before filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub media: Vec<MediaContent>,
    pub enclosures: Vec<Enclosure>,
    /// Full-content HTML blocks (`content:encoded`, Atom `<content>`).
    pub content: Vec<String>,
}

/// `media:content` attachment; both attributes are optional in the wild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaContent {
    pub url: Option<String>,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub mime_type: String,
}

/// Result of fetching and parsing one feed URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Entries(Vec<FeedEntry>),
    Failed(String),
}

impl FetchOutcome {
    pub fn error(&self) -> Option<&str> {
        match self {
            FetchOutcome::Failed(reason) => Some(reason),
            FetchOutcome::Entries(_) => None,
        }
    }

    /// A failed fetch reads as an empty feed.
    pub fn into_entries(self) -> Vec<FeedEntry> {
        match self {
            FetchOutcome::Entries(entries) => entries,
            FetchOutcome::Failed(_) => Vec::new(),
        }
    }
}

/// Per-feed outcome of a refresh. `items` holds only rows created by this run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshReport {
    pub feed_id: i32,
    pub entries: usize,
    pub items: Vec<FeedItem>,
    pub skipped_existing: usize,
    pub skipped_irrelevant: usize,
    pub skipped_no_link: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl RefreshReport {
    pub fn new(feed_id: i32) -> Self { RefreshReport { feed_id, ..Default::default() } }
}

// Plan envelope types
#[derive(Serialize)]
pub struct FeedSample { pub feed_id: i32, pub url: String, pub title: String }

#[derive(Serialize)]
pub struct RefreshPlan { pub feeds: usize, pub fetch_timeout_secs: u64, pub sample_feeds: Vec<FeedSample> }

// Apply/result envelope types
#[derive(Serialize)]
pub struct RefreshTotals { pub feeds: usize, pub inserted: usize, pub existing: usize, pub irrelevant: usize, pub fetch_errors: usize }

#[derive(Serialize)]
pub struct RefreshApply { pub totals: RefreshTotals, pub per_feed: Vec<RefreshReport> }
