//! sitemaps.org 0.9 `urlset` rendering.

use crate::model::feed::SitemapEntry;
use crate::render::xml::XmlWriter;
use chrono::{DateTime, SecondsFormat, Utc};

pub const SITEMAP_CONTENT_TYPE: &str = "text/xml";
const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut writer = XmlWriter::new();
    writer.open("urlset", &[("xmlns", SITEMAP_NAMESPACE)]);
    for entry in entries {
        writer.open("url", &[]);
        writer.text_element("loc", &entry.url);
        writer.text_element("lastmod", &lastmod(entry.last_updated));
        writer.text_element("changefreq", entry.change_frequency.as_str());
        if let Some(priority) = entry.priority {
            writer.text_element("priority", priority);
        }
        writer.close("url");
    }
    writer.close("urlset");
    writer.finish()
}

fn lastmod(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
