//! Activity stream service: paging, latest entries and event recording.

use crate::model::activity::{Activity, ActivityKind, ActivityRecord, Badge};
use crate::model::member::Member;
use crate::model::paging::{normalize_page_index, PagedList};
use crate::repo::activity_repo::ActivityRepository;
use crate::repo::RepoResult;
use uuid::Uuid;

pub struct ActivityService<R: ActivityRepository> {
    repo: R,
}

impl<R: ActivityRepository> ActivityService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// One newest-first page; `page` of `None` or `0` is the first page.
    pub fn paged_activities(
        &self,
        page: Option<u32>,
        page_size: u32,
    ) -> RepoResult<PagedList<Activity>> {
        let page_index = normalize_page_index(page);
        let total_count = self.repo.count_activities()?;
        let offset = PagedList::<Activity>::offset_for(page_index, page_size);
        let items = self.repo.list_activities(page_size, offset)?;
        Ok(PagedList {
            items,
            page_index,
            page_size,
            total_count,
        })
    }

    pub fn latest(&self, limit: u32) -> RepoResult<Vec<Activity>> {
        self.repo.list_activities(limit, 0)
    }

    pub fn create_badge(
        &self,
        name: &str,
        display_name: &str,
        description: &str,
        image: &str,
    ) -> RepoResult<Badge> {
        let badge = Badge {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            image: image.to_string(),
        };
        self.repo.create_badge(&badge)?;
        Ok(badge)
    }

    pub fn badge_awarded(&self, badge: &Badge, member: &Member, at: i64) -> RepoResult<()> {
        self.record(ActivityKind::BadgeAwarded, member, Some(badge), at)
    }

    pub fn member_joined(&self, member: &Member, at: i64) -> RepoResult<()> {
        self.record(ActivityKind::MemberJoined, member, None, at)
    }

    pub fn profile_updated(&self, member: &Member, at: i64) -> RepoResult<()> {
        self.record(ActivityKind::ProfileUpdated, member, None, at)
    }

    fn record(
        &self,
        kind: ActivityKind,
        member: &Member,
        badge: Option<&Badge>,
        timestamp: i64,
    ) -> RepoResult<()> {
        self.repo.record_activity(&ActivityRecord {
            id: Uuid::new_v4(),
            kind,
            member_id: member.id,
            badge_id: badge.map(|badge| badge.id),
            timestamp,
        })?;
        Ok(())
    }
}
