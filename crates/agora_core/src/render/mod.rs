//! XML renderers for syndication output.
//!
//! # Invariants
//! - Output is UTF-8 with an XML declaration.
//! - Every text and attribute value is escaped.
//! - Dates are UTC: RFC 2822 in RSS, RFC 3339 in sitemaps.

mod xml;

pub mod rss;
pub mod sitemap;

pub use rss::{render_rss, RSS_CONTENT_TYPE};
pub use sitemap::{render_sitemap, SITEMAP_CONTENT_TYPE};
