//! Syndication projections: RSS items and sitemap entries.

/// One RSS item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RssItem {
    pub title: String,
    /// Absolute URL.
    pub link: String,
    pub description: String,
    /// Publication time in epoch milliseconds.
    pub published: i64,
    /// Absolute image URL attached as an enclosure.
    pub image: Option<String>,
}

/// RSS 2.0 channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RssFeed {
    pub title: String,
    pub description: String,
    /// Absolute URL of the site the channel describes.
    pub link: String,
    pub items: Vec<RssItem>,
}

/// Sitemap `changefreq` hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// One crawlable URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    pub name: String,
    /// Absolute URL.
    pub url: String,
    /// Last modification in epoch milliseconds.
    pub last_updated: i64,
    pub change_frequency: ChangeFrequency,
    /// Relative priority such as `"0.6"`; omitted when `None`.
    pub priority: Option<&'static str>,
}
