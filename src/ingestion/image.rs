use scraper::{Html, Selector};

use super::types::FeedEntry;

pub type ImageStrategy = fn(&FeedEntry) -> Option<String>;

/// Tried in order; the first hit wins and is not validated further.
pub const STRATEGIES: &[(&str, ImageStrategy)] = &[
    ("media_content", from_media_content),
    ("enclosure", from_enclosures),
    ("embedded_html", from_embedded_html),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub strategy: &'static str,
    pub url: String,
}

pub fn resolve(entry: &FeedEntry) -> Option<ResolvedImage> {
    STRATEGIES
        .iter()
        .find_map(|&(name, strategy)| strategy(entry).map(|url| ResolvedImage { strategy: name, url }))
}

#[cfg(test)]
pub fn resolve_image(entry: &FeedEntry) -> Option<String> {
    resolve(entry).map(|r| r.url)
}

fn from_media_content(entry: &FeedEntry) -> Option<String> {
    entry.media.iter().find_map(|m| m.url.clone())
}

fn from_enclosures(entry: &FeedEntry) -> Option<String> {
    entry
        .enclosures
        .iter()
        .find(|e| e.mime_type.contains("image"))
        .map(|e| e.url.clone())
}

/// Summary HTML if non-empty, otherwise the first content block.
fn from_embedded_html(entry: &FeedEntry) -> Option<String> {
    let html = entry
        .summary
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| entry.content.first().map(String::as_str))
        .unwrap_or("");
    first_img_src(html)
}

/// `src` of the first `<img>` in an HTML fragment. Only the first element is
/// considered: if it has no `src`, later images are ignored.
pub fn first_img_src(html: &str) -> Option<String> {
    if html.trim().is_empty() {
        return None;
    }
    let doc = Html::parse_fragment(html);
    let sel = Selector::parse("img").ok()?;
    let img = doc.select(&sel).next()?;
    let src = img.value().attr("src")?;
    if src.is_empty() { None } else { Some(src.to_string()) }
}
