pub struct DefaultFeed {
    pub url: &'static str,
    pub title: &'static str,
}

/// Regional outlets seeded on first start.
pub const DEFAULT_FEEDS: &[DefaultFeed] = &[
    DefaultFeed { url: "https://kfor.com/feed/", title: "KFOR News" },
    DefaultFeed { url: "https://www.dallasnews.com/news/rss/", title: "Dallas Morning News" },
    DefaultFeed { url: "https://oklahoman.com/rss/news", title: "The Oklahoman" },
    DefaultFeed { url: "https://www.koco.com/topstories-rss", title: "KOCO 5 News" },
    DefaultFeed { url: "https://www.oklahomadaily.news/feed/", title: "The Oklahoma Daily News" },
    DefaultFeed { url: "https://journalrecord.com/feed/", title: "The Journal Record" },
    DefaultFeed { url: "https://freepressokc.com/feed/", title: "Oklahoma Free Press" },
    DefaultFeed { url: "https://oklahomawatch.org/feed/", title: "Oklahoma Watch" },
    DefaultFeed { url: "https://www.405magazine.com/feed/", title: "405 Magazine" },
    DefaultFeed { url: "https://www.oudaily.com/feed/", title: "The Oklahoma Daily" },
    DefaultFeed { url: "https://www.tulsaworld.com/feed/", title: "Tulsa World" },
    DefaultFeed { url: "https://www.nondoc.com/feed/", title: "NonDoc" },
    DefaultFeed { url: "https://feeds.texastribune.org/feeds/main/", title: "The Texas Tribune" },
    DefaultFeed {
        url: "https://www.star-telegram.com/news/local/?widgetName=rssfeed&widgetId=1158999&getXmlFeed=true",
        title: "Fort Worth Star-Telegram",
    },
    DefaultFeed { url: "https://www.spectrumlocalnews.com/tx/dallas-fort-worth/rss", title: "Spectrum News 1 Dallas-Fort Worth" },
];
