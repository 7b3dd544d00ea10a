//! RSS 2.0 channel rendering.

use crate::model::feed::{RssFeed, RssItem};
use crate::render::xml::XmlWriter;
use chrono::{DateTime, Utc};

pub const RSS_CONTENT_TYPE: &str = "application/rss+xml";

/// Renders `feed` as an RSS 2.0 document.
pub fn render_rss(feed: &RssFeed) -> String {
    let mut writer = XmlWriter::new();
    writer.open("rss", &[("version", "2.0")]);
    writer.open("channel", &[]);
    writer.text_element("title", &feed.title);
    writer.text_element("link", &feed.link);
    writer.text_element("description", &feed.description);
    for item in &feed.items {
        write_item(&mut writer, item);
    }
    writer.close("channel");
    writer.close("rss");
    writer.finish()
}

fn write_item(writer: &mut XmlWriter, item: &RssItem) {
    writer.open("item", &[]);
    writer.text_element("title", &item.title);
    writer.text_element("link", &item.link);
    writer.text_element("description", &item.description);
    writer.text_element("pubDate", &rfc2822(item.published));
    if let Some(image) = item.image.as_deref() {
        writer.empty_element(
            "enclosure",
            &[("url", image), ("length", "0"), ("type", image_mime(image))],
        );
    }
    writer.close("item");
}

fn rfc2822(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .unwrap_or_default()
        .to_rfc2822()
}

fn image_mime(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();
    if path.ends_with(".png") {
        "image/png"
    } else if path.ends_with(".gif") {
        "image/gif"
    } else {
        "image/jpeg"
    }
}

#[cfg(test)]
mod tests {
    use super::render_rss;
    use crate::model::feed::{RssFeed, RssItem};

    #[test]
    fn renders_items_with_dates_and_enclosures() {
        let feed = RssFeed {
            title: "Latest Activity".to_string(),
            description: "News & views".to_string(),
            link: "https://forum.example.com/".to_string(),
            items: vec![RssItem {
                title: "Hello <world>".to_string(),
                link: "https://forum.example.com/chat/hello".to_string(),
                description: "first post".to_string(),
                published: 1_709_288_430_000,
                image: Some("https://forum.example.com/content/badges/a.png".to_string()),
            }],
        };

        let xml = render_rss(&feed);

        assert!(xml.contains("<rss version=\"2.0\">"));
        assert!(xml.contains("<description>News &amp; views</description>"));
        assert!(xml.contains("<title>Hello &lt;world&gt;</title>"));
        assert!(xml.contains("Mar 2024 10:20:30 +0000</pubDate>"));
        assert!(xml.contains(
            "<enclosure url=\"https://forum.example.com/content/badges/a.png\" length=\"0\" type=\"image/png\" />"
        ));
    }

    #[test]
    fn control_characters_never_reach_the_document() {
        let feed = RssFeed {
            title: "Latest Activity".to_string(),
            description: String::new(),
            link: "https://forum.example.com/".to_string(),
            items: vec![RssItem {
                title: "bell\u{8}x".to_string(),
                link: "https://forum.example.com/chat/bell".to_string(),
                description: "esc\u{1b}[0m".to_string(),
                published: 0,
                image: None,
            }],
        };

        let xml = render_rss(&feed);

        assert!(xml.contains("<title>bellx</title>"));
        assert!(xml.contains("<description>esc[0m</description>"));
        assert!(!xml.chars().any(|ch| ch == '\u{8}' || ch == '\u{1b}'));
    }
}
