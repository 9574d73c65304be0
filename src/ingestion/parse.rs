use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rss::{Channel, Item};

use super::types::{Enclosure, FeedEntry, MediaContent};

/// Parse an RSS 2.0 document, falling back to Atom.
pub fn parse_entries(xml: &[u8]) -> Result<Vec<FeedEntry>> {
    if let Ok(channel) = Channel::read_from(xml) {
        return Ok(channel.items().iter().map(entry_from_rss).collect());
    }
    let feed = atom_syndication::Feed::read_from(xml).context("document is neither RSS nor Atom")?;
    Ok(feed.entries().iter().map(entry_from_atom).collect())
}

// `media:content` directly on the entry or nested in `media:group`. rss and
// atom_syndication have distinct but identically shaped extension types.
macro_rules! media_contents {
    ($extensions:expr) => {{
        let mut out: Vec<MediaContent> = Vec::new();
        if let Some(media) = $extensions.get("media") {
            for ext in media.get("content").into_iter().flatten() {
                out.push(media_from_attrs(ext.attrs()));
            }
            for group in media.get("group").into_iter().flatten() {
                for ext in group.children().get("content").into_iter().flatten() {
                    out.push(media_from_attrs(ext.attrs()));
                }
            }
        }
        out
    }};
}

fn media_from_attrs(attrs: &BTreeMap<String, String>) -> MediaContent {
    MediaContent { url: attrs.get("url").cloned(), mime_type: attrs.get("type").cloned() }
}

fn entry_from_rss(item: &Item) -> FeedEntry {
    FeedEntry {
        title: item.title().unwrap_or_default().to_string(),
        summary: item.description().map(str::to_string),
        link: item.link().map(str::to_string),
        published: rss_published(item),
        media: media_contents!(item.extensions()),
        enclosures: item
            .enclosure()
            .map(|e| Enclosure { url: e.url().to_string(), mime_type: e.mime_type().to_string() })
            .into_iter()
            .collect(),
        content: item.content().map(str::to_string).into_iter().collect(),
    }
}

/// Raw `pubDate`, or the first Dublin Core date. Stored verbatim, not normalized.
fn rss_published(item: &Item) -> Option<String> {
    if let Some(pub_date) = item.pub_date() {
        return Some(pub_date.to_string());
    }
    item.dublin_core_ext()
        .and_then(|dc| dc.dates().first())
        .map(|d| d.to_string())
}

fn entry_from_atom(entry: &atom_syndication::Entry) -> FeedEntry {
    let links = entry.links();
    let link = links
        .iter()
        .find(|l| l.rel() == "alternate")
        .or_else(|| links.first())
        .map(|l| l.href().to_string());

    FeedEntry {
        title: entry.title().as_str().to_string(),
        summary: entry.summary().map(|s| s.as_str().to_string()),
        link,
        published: entry.published().map(|d| d.to_rfc3339()),
        media: media_contents!(entry.extensions()),
        enclosures: links
            .iter()
            .filter(|l| l.rel() == "enclosure")
            .map(|l| Enclosure { url: l.href().to_string(), mime_type: l.mime_type().unwrap_or_default().to_string() })
            .collect(),
        content: entry.content().and_then(|c| c.value()).map(str::to_string).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
     xmlns:media="http://search.yahoo.com/mrss/"
     xmlns:content="http://purl.org/rss/1.0/modules/content/"
     xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>KFOR</title>
    <link>https://kfor.com</link>
    <description>News</description>
    <item>
      <title>OKC council votes on shelter</title>
      <link>https://kfor.com/news/shelter</link>
      <description>&lt;p&gt;Homeless shelter expansion&lt;/p&gt;</description>
      <pubDate>Mon, 06 Jan 2025 10:00:00 -0600</pubDate>
      <media:content url="https://kfor.com/img/a.jpg" type="image/jpeg" />
      <enclosure url="https://kfor.com/img/b.png" length="10" type="image/png" />
      <content:encoded><![CDATA[<p><img src="https://kfor.com/img/c.jpg"></p>]]></content:encoded>
    </item>
    <item>
      <title>Tulsa jail report</title>
      <link>https://kfor.com/news/jail</link>
      <dc:date>2025-01-05T08:00:00Z</dc:date>
      <media:group>
        <media:content url="https://kfor.com/img/group.jpg" />
      </media:group>
    </item>
    <item>
      <description>no title, no link</description>
    </item>
  </channel>
</rss>"#;

    const ATOM: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Oklahoma Watch</title>
  <id>urn:ow</id>
  <updated>2025-01-06T12:00:00Z</updated>
  <entry>
    <title>Medicaid expansion in Norman</title>
    <id>urn:ow:1</id>
    <updated>2025-01-06T12:00:00Z</updated>
    <published>2025-01-06T11:00:00Z</published>
    <link rel="enclosure" type="image/jpeg" href="https://ow.org/img/e.jpg"/>
    <link rel="alternate" href="https://ow.org/medicaid"/>
    <summary>Summary text</summary>
    <content type="html">&lt;img src="https://ow.org/img/inline.jpg"&gt;</content>
  </entry>
</feed>"#;

    #[test]
    fn rss_items_map_all_fields() {
        let entries = parse_entries(RSS.as_bytes()).unwrap();
        assert_eq!(entries.len(), 3);

        let first = &entries[0];
        assert_eq!(first.title, "OKC council votes on shelter");
        assert_eq!(first.link.as_deref(), Some("https://kfor.com/news/shelter"));
        assert_eq!(first.summary.as_deref(), Some("<p>Homeless shelter expansion</p>"));
        assert_eq!(first.published.as_deref(), Some("Mon, 06 Jan 2025 10:00:00 -0600"));
        assert_eq!(first.media, vec![MediaContent {
            url: Some("https://kfor.com/img/a.jpg".into()),
            mime_type: Some("image/jpeg".into()),
        }]);
        assert_eq!(first.enclosures, vec![Enclosure {
            url: "https://kfor.com/img/b.png".into(),
            mime_type: "image/png".into(),
        }]);
        assert_eq!(first.content, vec![r#"<p><img src="https://kfor.com/img/c.jpg"></p>"#.to_string()]);
    }

    #[test]
    fn rss_falls_back_to_dublin_core_date_and_media_group() {
        let entries = parse_entries(RSS.as_bytes()).unwrap();
        let second = &entries[1];
        assert_eq!(second.published.as_deref(), Some("2025-01-05T08:00:00Z"));
        assert_eq!(second.media[0].url.as_deref(), Some("https://kfor.com/img/group.jpg"));
        assert!(second.summary.is_none());
    }

    #[test]
    fn rss_item_without_title_or_link() {
        let entries = parse_entries(RSS.as_bytes()).unwrap();
        let third = &entries[2];
        assert_eq!(third.title, "");
        assert!(third.link.is_none());
        assert!(third.published.is_none());
    }

    #[test]
    fn atom_entries_prefer_alternate_link() {
        let entries = parse_entries(ATOM.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.title, "Medicaid expansion in Norman");
        assert_eq!(e.link.as_deref(), Some("https://ow.org/medicaid"));
        assert_eq!(e.summary.as_deref(), Some("Summary text"));
        assert_eq!(e.published.as_deref(), Some("2025-01-06T11:00:00+00:00"));
        assert_eq!(e.enclosures[0].mime_type, "image/jpeg");
        assert_eq!(e.content, vec![r#"<img src="https://ow.org/img/inline.jpg">"#.to_string()]);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_entries(b"<html><body>not a feed</body></html>").is_err());
        assert!(parse_entries(b"").is_err());
    }
}
