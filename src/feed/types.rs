use serde::Serialize;

use crate::store::Feed;

#[derive(Serialize)]
pub struct FeedAddPlan {
    pub action: &'static str,
    pub url: String,
    pub title: String,
    pub exists: bool,
}

#[derive(Serialize)]
pub struct FeedRemovePlan {
    pub action: &'static str,
    pub feed: Feed,
    pub items: usize,
}

#[derive(Serialize)]
pub struct FeedSeedPlan {
    pub action: &'static str,
    pub missing: Vec<String>,
}

#[derive(Serialize)]
pub struct FeedSeedResult {
    pub inserted: Vec<Feed>,
}

#[derive(Serialize)]
pub struct FeedList {
    pub feeds: Vec<Feed>,
}
