//! Forum-wide names and limits shared by services and actions.

/// Role with unrestricted administration rights.
pub const ADMIN_ROLE_NAME: &str = "Admin";
/// Role assigned to newly registered members by default.
pub const STANDARD_ROLE_NAME: &str = "Standard Members";
/// Role used for anonymous visitors and public syndication.
pub const GUEST_ROLE_NAME: &str = "Guest";

/// Category permission that hides a category from a role entirely.
pub const PERMISSION_DENY_ACCESS: &str = "Deny Access";

/// Cache lifetime hint for feeds and sitemaps, in seconds.
pub const SHORT_CACHE_SECONDS: u32 = 60;
/// Topics included in the latest-topics RSS feed.
pub const ACTIVE_TOPICS_LIST_SIZE: u32 = 20;
/// Activities included in the activity RSS feed.
pub const ACTIVITY_RSS_SIZE: u32 = 20;
/// Pixel size requested for member images in feeds.
pub const GRAVATAR_POST_SIZE: u32 = 50;

/// Download name of the member export.
pub const USERS_EXPORT_FILE_NAME: &str = "MVCForumUsers.csv";
/// Body returned when a language export targets an unknown culture.
pub const NO_SUCH_LANGUAGE_BODY: &str = "No such language";

pub const RESOURCE_RSS_LATEST_TITLE: &str = "Rss.LatestActivity.Title";
pub const RESOURCE_RSS_LATEST_DESCRIPTION: &str = "Rss.LatestActivity.Description";
pub const RESOURCE_USER_AWARDED_BADGE: &str = "Activity.UserAwardedBadge";
pub const RESOURCE_BADGE: &str = "Activity.Badge";
pub const RESOURCE_USER_JOINED: &str = "Activity.UserJoined";
pub const RESOURCE_PROFILE_UPDATED: &str = "Activity.ProfileUpdated";
