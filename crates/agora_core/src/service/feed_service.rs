//! Feed and sitemap projections.
//!
//! # Responsibility
//! - Build RSS channels for latest topics and latest activity.
//! - Build sitemap entry lists for topics, members and categories.
//!
//! # Invariants
//! - Topic and category output only contains categories the viewing role
//!   is allowed to see.
//! - Activity items are ordered by timestamp descending.
//! - Every link is absolute against the configured site URL.

use crate::constants::{
    ACTIVE_TOPICS_LIST_SIZE, GRAVATAR_POST_SIZE, RESOURCE_BADGE, RESOURCE_PROFILE_UPDATED,
    RESOURCE_RSS_LATEST_DESCRIPTION, RESOURCE_RSS_LATEST_TITLE, RESOURCE_USER_AWARDED_BADGE,
    RESOURCE_USER_JOINED,
};
use crate::model::activity::{Activity, ActivityDetail};
use crate::model::category::Category;
use crate::model::feed::{ChangeFrequency, RssFeed, RssItem, SitemapEntry};
use crate::model::language::Language;
use crate::model::member::Member;
use crate::model::settings::ForumSettings;
use crate::repo::localization_repo::LocalizationRepository;
use crate::repo::topic_repo::TopicRepository;
use crate::repo::RepoResult;
use crate::service::localization_service::LocalizationService;
use crate::service::permission_service::CategoryPermissions;

/// Site-relative path of the activity page.
pub const ACTIVITY_PATH: &str = "/activity";

const TOPIC_PRIORITY: &str = "0.6";
const MEMBER_PRIORITY: &str = "0.4";

/// Localized strings used to title feeds and activity items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedStrings {
    pub channel_title: String,
    pub channel_description: String,
    pub user_awarded_badge: String,
    pub badge: String,
    pub user_joined: String,
    pub profile_updated: String,
}

impl FeedStrings {
    /// Resolves every feed string in `language`; without a language each
    /// string is its own key.
    pub fn load<R: LocalizationRepository>(
        localization: &LocalizationService<R>,
        language: Option<&Language>,
    ) -> RepoResult<Self> {
        let lookup = |key: &str| match language {
            Some(language) => localization.resource_string(language, key),
            None => Ok(key.to_string()),
        };
        Ok(Self {
            channel_title: lookup(RESOURCE_RSS_LATEST_TITLE)?,
            channel_description: lookup(RESOURCE_RSS_LATEST_DESCRIPTION)?,
            user_awarded_badge: lookup(RESOURCE_USER_AWARDED_BADGE)?,
            badge: lookup(RESOURCE_BADGE)?,
            user_joined: lookup(RESOURCE_USER_JOINED)?,
            profile_updated: lookup(RESOURCE_PROFILE_UPDATED)?,
        })
    }
}

/// Latest topics visible to the role, each described by its starter post.
pub fn latest_topics_feed<T: TopicRepository>(
    topics: &T,
    permissions: &CategoryPermissions,
    settings: &ForumSettings,
    strings: &FeedStrings,
) -> RepoResult<RssFeed> {
    let recent = topics.list_recent_topics(
        &permissions.allowed_categories(),
        ACTIVE_TOPICS_LIST_SIZE,
    )?;

    let mut items = Vec::new();
    for topic in recent {
        if !permissions.allows(topic.category_id) {
            continue;
        }
        let Some(starter) = topics.topic_starter(topic.id)? else {
            continue;
        };
        items.push(RssItem {
            title: topic.name.clone(),
            link: settings.absolute_url(&topic.nice_url()),
            description: starter.content,
            published: topic.create_date,
            image: None,
        });
    }

    Ok(channel(settings, strings, items))
}

/// Activity channel; every item links to the activity page.
pub fn activity_feed(
    activities: &[Activity],
    settings: &ForumSettings,
    strings: &FeedStrings,
) -> RssFeed {
    let link = settings.absolute_url(ACTIVITY_PATH);
    let mut ordered: Vec<&Activity> = activities.iter().collect();
    ordered.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));

    let items = ordered
        .into_iter()
        .map(|activity| {
            let (title, description, image) = match &activity.detail {
                ActivityDetail::BadgeAwarded { badge, member } => (
                    format!(
                        "{} {} {} {}",
                        member.user_name,
                        strings.user_awarded_badge,
                        badge.display_name,
                        strings.badge
                    ),
                    badge.description.clone(),
                    badge.image_url(),
                ),
                ActivityDetail::MemberJoined { member } => (
                    strings.user_joined.clone(),
                    String::new(),
                    member.image_url(GRAVATAR_POST_SIZE),
                ),
                ActivityDetail::ProfileUpdated { member } => (
                    strings.profile_updated.clone(),
                    String::new(),
                    member.image_url(GRAVATAR_POST_SIZE),
                ),
            };
            RssItem {
                title,
                link: link.clone(),
                description,
                published: activity.timestamp,
                image: Some(settings.absolute_url(&image)),
            }
        })
        .collect();

    channel(settings, strings, items)
}

/// Visible topics that have at least one post, dated by their last edit.
pub fn topic_sitemap<T: TopicRepository>(
    topics: &T,
    permissions: &CategoryPermissions,
    settings: &ForumSettings,
) -> RepoResult<Vec<SitemapEntry>> {
    let mut entries = Vec::new();
    for topic in topics.list_topics_in(&permissions.allowed_categories())? {
        if !permissions.allows(topic.category_id) {
            continue;
        }
        let Some(last_post) = topics.last_post(topic.id)? else {
            continue;
        };
        entries.push(SitemapEntry {
            name: topic.name.clone(),
            url: settings.absolute_url(&topic.nice_url()),
            last_updated: last_post.date_edited,
            change_frequency: ChangeFrequency::Daily,
            priority: Some(TOPIC_PRIORITY),
        });
    }
    Ok(entries)
}

pub fn member_sitemap(members: &[Member], settings: &ForumSettings) -> Vec<SitemapEntry> {
    members
        .iter()
        .map(|member| SitemapEntry {
            name: member.user_name.clone(),
            url: settings.absolute_url(&member.nice_url()),
            last_updated: member.create_date,
            change_frequency: ChangeFrequency::Weekly,
            priority: Some(MEMBER_PRIORITY),
        })
        .collect()
}

pub fn category_sitemap(
    categories: &[Category],
    permissions: &CategoryPermissions,
    settings: &ForumSettings,
) -> Vec<SitemapEntry> {
    categories
        .iter()
        .filter(|category| permissions.allows(category.id))
        .map(|category| SitemapEntry {
            name: category.name.clone(),
            url: settings.absolute_url(&category.nice_url()),
            last_updated: category.date_created,
            change_frequency: ChangeFrequency::Monthly,
            priority: None,
        })
        .collect()
}

fn channel(settings: &ForumSettings, strings: &FeedStrings, items: Vec<RssItem>) -> RssFeed {
    RssFeed {
        title: strings.channel_title.clone(),
        description: strings.channel_description.clone(),
        link: settings.absolute_url("/"),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::{activity_feed, category_sitemap, member_sitemap, FeedStrings};
    use crate::constants::PERMISSION_DENY_ACCESS;
    use crate::model::activity::{Activity, ActivityDetail, Badge};
    use crate::model::category::{Category, PermissionSet};
    use crate::model::feed::ChangeFrequency;
    use crate::model::member::{Member, Role};
    use crate::model::settings::ForumSettings;
    use crate::service::permission_service::CategoryPermissions;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn settings() -> ForumSettings {
        ForumSettings {
            site_name: "Agora".to_string(),
            site_url: "https://forum.example.com".to_string(),
            activities_per_page: 20,
            new_member_starting_role: "Standard Members".to_string(),
            default_culture: "en-GB".to_string(),
        }
    }

    fn strings() -> FeedStrings {
        FeedStrings {
            channel_title: "Latest Activity".to_string(),
            channel_description: "The latest activity on the forum".to_string(),
            user_awarded_badge: "was awarded the".to_string(),
            badge: "badge".to_string(),
            user_joined: "A new member joined".to_string(),
            profile_updated: "A member updated their profile".to_string(),
        }
    }

    #[test]
    fn activity_feed_orders_newest_first_and_titles_badges() {
        let member = Member::new("ada", "ada@example.com", 0);
        let badge = Badge {
            id: Uuid::new_v4(),
            name: "PosterOne".to_string(),
            display_name: "First Post".to_string(),
            description: "Wrote a first post".to_string(),
            image: "first.png".to_string(),
        };
        let activities = vec![
            Activity {
                id: Uuid::new_v4(),
                timestamp: 100,
                detail: ActivityDetail::MemberJoined {
                    member: member.clone(),
                },
            },
            Activity {
                id: Uuid::new_v4(),
                timestamp: 200,
                detail: ActivityDetail::BadgeAwarded { badge, member },
            },
        ];

        let feed = activity_feed(&activities, &settings(), &strings());

        assert_eq!(feed.items.len(), 2);
        assert_eq!(feed.items[0].title, "ada was awarded the First Post badge");
        assert_eq!(feed.items[0].description, "Wrote a first post");
        assert_eq!(
            feed.items[0].image.as_deref(),
            Some("https://forum.example.com/content/badges/first.png")
        );
        assert_eq!(feed.items[1].title, "A new member joined");
        assert!(feed
            .items
            .iter()
            .all(|item| item.link == "https://forum.example.com/activity"));
    }

    #[test]
    fn category_sitemap_skips_denied_categories() {
        let open = Category::new("General", "general", 10);
        let hidden = Category::new("Staff", "staff", 20);
        let mut deny = PermissionSet::new();
        deny.set(PERMISSION_DENY_ACCESS, true);
        let permissions = CategoryPermissions::new(
            Role {
                id: Uuid::new_v4(),
                name: "Guest".to_string(),
            },
            HashMap::from([(open.id, PermissionSet::new()), (hidden.id, deny)]),
        );

        let entries = category_sitemap(&[open, hidden], &permissions, &settings());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].url, "https://forum.example.com/cat/general");
        assert_eq!(entries[0].change_frequency, ChangeFrequency::Monthly);
        assert_eq!(entries[0].priority, None);
    }

    #[test]
    fn member_sitemap_uses_join_date() {
        let mut member = Member::new("ada", "ada@example.com", 1_000);
        member.slug = "ada".to_string();

        let entries = member_sitemap(&[member], &settings());

        assert_eq!(entries[0].url, "https://forum.example.com/members/ada");
        assert_eq!(entries[0].last_updated, 1_000);
        assert_eq!(entries[0].priority, Some("0.4"));
    }
}
