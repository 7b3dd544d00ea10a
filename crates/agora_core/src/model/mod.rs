//! Forum domain model.
//!
//! # Responsibility
//! - Define the records services read and write: members, roles,
//!   categories, topics, badges, activities, languages and settings.
//! - Define the per-request projections built from them: CSV reports,
//!   RSS items, sitemap entries and paged lists.
//!
//! # Invariants
//! - Every stored record is identified by a stable UUID.
//! - Timestamps are UTC epoch milliseconds.

pub mod activity;
pub mod category;
pub mod csv_report;
pub mod culture;
pub mod feed;
pub mod language;
pub mod member;
pub mod paging;
pub mod settings;
pub mod topic;

/// Current UTC time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
