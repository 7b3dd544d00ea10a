//! Site-wide settings persisted in the `settings` table.

use serde::Serialize;

/// Forum configuration read at the start of each action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForumSettings {
    pub site_name: String,
    /// Absolute base URL used to build feed and sitemap links.
    pub site_url: String,
    pub activities_per_page: u32,
    /// Role name assigned to imported and newly registered members.
    pub new_member_starting_role: String,
    /// Culture whose strings title the feeds.
    pub default_culture: String,
}

impl ForumSettings {
    /// Joins a site-relative path onto `site_url`; absolute URLs pass through.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.site_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}
