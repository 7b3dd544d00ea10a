//! Public activity page, RSS feeds and sitemaps.
//!
//! Feed and sitemap actions take the viewing role by name; public output
//! passes [`crate::constants::GUEST_ROLE_NAME`].

use crate::api::{ApiError, ApiResult, XmlResult};
use crate::constants::{ACTIVITY_RSS_SIZE, GRAVATAR_POST_SIZE, SHORT_CACHE_SECONDS};
use crate::db::{SqliteUnitOfWork, UnitOfWork};
use crate::model::activity::{Activity, ActivityDetail, ActivityKind};
use crate::model::feed::SitemapEntry;
use crate::model::paging::PagedList;
use crate::model::settings::ForumSettings;
use crate::render::{render_rss, render_sitemap, RSS_CONTENT_TYPE, SITEMAP_CONTENT_TYPE};
use crate::repo::activity_repo::SqliteActivityRepository;
use crate::repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
use crate::repo::localization_repo::SqliteLocalizationRepository;
use crate::repo::member_repo::SqliteMemberRepository;
use crate::repo::role_repo::SqliteRoleRepository;
use crate::repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
use crate::repo::topic_repo::SqliteTopicRepository;
use crate::service::activity_service::ActivityService;
use crate::service::feed_service::{
    activity_feed, category_sitemap, latest_topics_feed, member_sitemap, topic_sitemap,
    FeedStrings,
};
use crate::service::localization_service::LocalizationService;
use crate::service::membership_service::{format_export_date, MembershipService};
use crate::service::permission_service::{CategoryPermissions, PermissionService};
use log::info;
use rusqlite::Connection;
use serde::Serialize;
use std::time::Instant;

/// One activity as shown on the activity page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityView {
    pub kind: ActivityKind,
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
    pub user_name: String,
    pub member_url: String,
    pub image_url: String,
    pub badge_display_name: Option<String>,
}

/// Activity page view model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPageView {
    pub activities: Vec<ActivityView>,
    pub page_index: u32,
    pub page_size: u32,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl ActivityPageView {
    fn from_page(page: PagedList<Activity>, settings: &ForumSettings) -> Self {
        let total_pages = page.total_pages();
        let has_next_page = page.has_next_page();
        let has_previous_page = page.has_previous_page();
        Self {
            activities: page
                .items
                .iter()
                .map(|activity| activity_view(activity, settings))
                .collect(),
            page_index: page.page_index,
            page_size: page.page_size,
            total_count: page.total_count,
            total_pages,
            has_next_page,
            has_previous_page,
        }
    }
}

/// Activity page `p`, sized by the configured activities per page.
pub fn activity(conn: &mut Connection, p: Option<u32>) -> ApiResult<ActivityPageView> {
    let uow = SqliteUnitOfWork::begin_read(conn, "activity")?;
    let outcome = build_activity_page(uow.conn(), p);
    uow.release();
    outcome
}

/// Latest topics visible to `role_name`.
pub fn latest_rss(conn: &mut Connection, role_name: &str) -> ApiResult<XmlResult> {
    let started_at = Instant::now();
    let uow = SqliteUnitOfWork::begin_read(conn, "latest_rss")?;
    let outcome = build_latest_rss(uow.conn(), role_name);
    uow.release();
    finish_xml("latest_rss", started_at, outcome)
}

pub fn activity_rss(conn: &mut Connection) -> ApiResult<XmlResult> {
    let started_at = Instant::now();
    let uow = SqliteUnitOfWork::begin_read(conn, "activity_rss")?;
    let outcome = build_activity_rss(uow.conn());
    uow.release();
    finish_xml("activity_rss", started_at, outcome)
}

/// Topic sitemap for `role_name`.
pub fn google_sitemap(conn: &mut Connection, role_name: &str) -> ApiResult<XmlResult> {
    let started_at = Instant::now();
    let uow = SqliteUnitOfWork::begin_read(conn, "topic_sitemap")?;
    let outcome = build_topic_sitemap(uow.conn(), role_name);
    uow.release();
    finish_xml("topic_sitemap", started_at, outcome)
}

pub fn google_member_sitemap(conn: &mut Connection) -> ApiResult<XmlResult> {
    let started_at = Instant::now();
    let uow = SqliteUnitOfWork::begin_read(conn, "member_sitemap")?;
    let outcome = build_member_sitemap(uow.conn());
    uow.release();
    finish_xml("member_sitemap", started_at, outcome)
}

/// Category sitemap for `role_name`, in display order.
pub fn google_category_sitemap(conn: &mut Connection, role_name: &str) -> ApiResult<XmlResult> {
    let started_at = Instant::now();
    let uow = SqliteUnitOfWork::begin_read(conn, "category_sitemap")?;
    let outcome = build_category_sitemap(uow.conn(), role_name);
    uow.release();
    finish_xml("category_sitemap", started_at, outcome)
}

fn build_activity_page(conn: &Connection, p: Option<u32>) -> ApiResult<ActivityPageView> {
    let settings = SqliteSettingsRepository::new(conn).get_settings()?;
    let page = ActivityService::new(SqliteActivityRepository::new(conn))
        .paged_activities(p, settings.activities_per_page)?;
    Ok(ActivityPageView::from_page(page, &settings))
}

fn build_latest_rss(conn: &Connection, role_name: &str) -> ApiResult<XmlResult> {
    let settings = SqliteSettingsRepository::new(conn).get_settings()?;
    let permissions = load_permissions(conn, role_name)?;
    let strings = load_feed_strings(conn, &settings)?;
    let feed = latest_topics_feed(
        &SqliteTopicRepository::new(conn),
        &permissions,
        &settings,
        &strings,
    )?;
    Ok(rss_result(&render_rss(&feed)))
}

fn build_activity_rss(conn: &Connection) -> ApiResult<XmlResult> {
    let settings = SqliteSettingsRepository::new(conn).get_settings()?;
    let strings = load_feed_strings(conn, &settings)?;
    let activities =
        ActivityService::new(SqliteActivityRepository::new(conn)).latest(ACTIVITY_RSS_SIZE)?;
    let feed = activity_feed(&activities, &settings, &strings);
    Ok(rss_result(&render_rss(&feed)))
}

fn build_topic_sitemap(conn: &Connection, role_name: &str) -> ApiResult<XmlResult> {
    let settings = SqliteSettingsRepository::new(conn).get_settings()?;
    let permissions = load_permissions(conn, role_name)?;
    let entries = topic_sitemap(&SqliteTopicRepository::new(conn), &permissions, &settings)?;
    Ok(sitemap_result(&entries))
}

fn build_member_sitemap(conn: &Connection) -> ApiResult<XmlResult> {
    let settings = SqliteSettingsRepository::new(conn).get_settings()?;
    let members = MembershipService::new(SqliteMemberRepository::new(conn)).get_all()?;
    Ok(sitemap_result(&member_sitemap(&members, &settings)))
}

fn build_category_sitemap(conn: &Connection, role_name: &str) -> ApiResult<XmlResult> {
    let settings = SqliteSettingsRepository::new(conn).get_settings()?;
    let permissions = load_permissions(conn, role_name)?;
    let categories = SqliteCategoryRepository::new(conn).list_categories()?;
    Ok(sitemap_result(&category_sitemap(
        &categories,
        &permissions,
        &settings,
    )))
}

fn load_permissions(conn: &Connection, role_name: &str) -> ApiResult<CategoryPermissions> {
    let permissions = PermissionService::new(SqliteRoleRepository::new(conn));
    let role = permissions
        .role_by_name(role_name)?
        .ok_or_else(|| ApiError::RoleNotFound(role_name.to_string()))?;
    Ok(permissions.category_permissions(&role)?)
}

fn load_feed_strings(conn: &Connection, settings: &ForumSettings) -> ApiResult<FeedStrings> {
    let localization = LocalizationService::new(SqliteLocalizationRepository::new(conn));
    let language = localization.get_language_by_culture(&settings.default_culture)?;
    Ok(FeedStrings::load(&localization, language.as_ref())?)
}

fn activity_view(activity: &Activity, settings: &ForumSettings) -> ActivityView {
    let member = activity.member();
    let (image, badge_display_name) = match &activity.detail {
        ActivityDetail::BadgeAwarded { badge, .. } => {
            (badge.image_url(), Some(badge.display_name.clone()))
        }
        ActivityDetail::MemberJoined { member } | ActivityDetail::ProfileUpdated { member } => {
            (member.image_url(GRAVATAR_POST_SIZE), None)
        }
    };
    ActivityView {
        kind: activity.kind(),
        timestamp: format_export_date(activity.timestamp),
        user_name: member.user_name.clone(),
        member_url: settings.absolute_url(&member.nice_url()),
        image_url: settings.absolute_url(&image),
        badge_display_name,
    }
}

fn rss_result(body: &str) -> XmlResult {
    XmlResult {
        content_type: RSS_CONTENT_TYPE,
        body: body.to_string(),
        cache_max_age_secs: SHORT_CACHE_SECONDS,
    }
}

fn sitemap_result(entries: &[SitemapEntry]) -> XmlResult {
    XmlResult {
        content_type: SITEMAP_CONTENT_TYPE,
        body: render_sitemap(entries),
        cache_max_age_secs: SHORT_CACHE_SECONDS,
    }
}

fn finish_xml(
    kind: &str,
    started_at: Instant,
    outcome: ApiResult<XmlResult>,
) -> ApiResult<XmlResult> {
    if let Ok(result) = &outcome {
        info!(
            "event=feed_render module=home kind={kind} status=ok bytes={} duration_ms={}",
            result.body.len(),
            started_at.elapsed().as_millis()
        );
    }
    outcome
}
