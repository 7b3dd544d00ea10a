//! Activity stream and badge repository.
//!
//! # Responsibility
//! - Record activity rows and resolve them into typed [`Activity`] values.
//! - Persist badges referenced by badge activities.
//!
//! # Invariants
//! - Listing order is `timestamp DESC, uuid ASC`.
//! - A badge activity always resolves its badge; a row that does not is
//!   reported as invalid data.

use crate::model::activity::{
    Activity, ActivityDetail, ActivityId, ActivityKind, ActivityRecord, Badge, BadgeId,
};
use crate::repo::member_repo::load_member;
use crate::repo::{parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for activities and badges.
pub trait ActivityRepository {
    fn create_badge(&self, badge: &Badge) -> RepoResult<BadgeId>;
    fn get_badge(&self, id: BadgeId) -> RepoResult<Option<Badge>>;
    fn record_activity(&self, record: &ActivityRecord) -> RepoResult<ActivityId>;
    fn count_activities(&self) -> RepoResult<u64>;
    /// Newest-first page of activities.
    fn list_activities(&self, limit: u32, offset: u64) -> RepoResult<Vec<Activity>>;
}

/// SQLite-backed activity repository.
pub struct SqliteActivityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActivityRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn resolve(&self, row: StoredActivity) -> RepoResult<Activity> {
        let member = load_member(self.conn, row.member_id)?.ok_or_else(|| {
            RepoError::InvalidData(format!(
                "activity {} references missing member {}",
                row.id, row.member_id
            ))
        })?;

        let detail = match row.kind {
            ActivityKind::BadgeAwarded => {
                let badge_id = row.badge_id.ok_or_else(|| {
                    RepoError::InvalidData(format!("badge activity {} has no badge", row.id))
                })?;
                let badge = self.get_badge(badge_id)?.ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "activity {} references missing badge {badge_id}",
                        row.id
                    ))
                })?;
                ActivityDetail::BadgeAwarded { badge, member }
            }
            ActivityKind::MemberJoined => ActivityDetail::MemberJoined { member },
            ActivityKind::ProfileUpdated => ActivityDetail::ProfileUpdated { member },
        };

        Ok(Activity {
            id: row.id,
            timestamp: row.timestamp,
            detail,
        })
    }
}

struct StoredActivity {
    id: ActivityId,
    kind: ActivityKind,
    member_id: uuid::Uuid,
    badge_id: Option<BadgeId>,
    timestamp: i64,
}

impl ActivityRepository for SqliteActivityRepository<'_> {
    fn create_badge(&self, badge: &Badge) -> RepoResult<BadgeId> {
        if badge.name.trim().is_empty() {
            return Err(RepoError::Validation("badge name is blank".to_string()));
        }

        self.conn.execute(
            "INSERT INTO badges (uuid, name, display_name, description, image)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                badge.id.to_string(),
                badge.name.as_str(),
                badge.display_name.as_str(),
                badge.description.as_str(),
                badge.image.as_str(),
            ],
        )?;
        Ok(badge.id)
    }

    fn get_badge(&self, id: BadgeId) -> RepoResult<Option<Badge>> {
        let row = self
            .conn
            .query_row(
                "SELECT uuid, name, display_name, description, image
                 FROM badges
                 WHERE uuid = ?1;",
                [id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((uuid_text, name, display_name, description, image)) => Ok(Some(Badge {
                id: parse_uuid(&uuid_text, "badges.uuid")?,
                name,
                display_name,
                description,
                image,
            })),
            None => Ok(None),
        }
    }

    fn record_activity(&self, record: &ActivityRecord) -> RepoResult<ActivityId> {
        let needs_badge = record.kind == ActivityKind::BadgeAwarded;
        if needs_badge != record.badge_id.is_some() {
            return Err(RepoError::Validation(format!(
                "activity kind `{}` does not match badge presence",
                record.kind.as_str()
            )));
        }

        self.conn.execute(
            "INSERT INTO activities (uuid, kind, member_uuid, badge_uuid, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                record.id.to_string(),
                record.kind.as_str(),
                record.member_id.to_string(),
                record.badge_id.map(|id| id.to_string()),
                record.timestamp,
            ],
        )?;
        Ok(record.id)
    }

    fn count_activities(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM activities;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative activity count {count}")))
    }

    fn list_activities(&self, limit: u32, offset: u64) -> RepoResult<Vec<Activity>> {
        let offset = i64::try_from(offset)
            .map_err(|_| RepoError::Validation(format!("activity offset {offset} too large")))?;
        let mut stmt = self.conn.prepare(
            "SELECT uuid, kind, member_uuid, badge_uuid, timestamp
             FROM activities
             ORDER BY timestamp DESC, uuid ASC
             LIMIT ?1 OFFSET ?2;",
        )?;
        let mut rows = stmt.query(params![i64::from(limit), offset])?;

        let mut stored = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            let kind_text: String = row.get(1)?;
            let member_text: String = row.get(2)?;
            let badge_text: Option<String> = row.get(3)?;
            stored.push(StoredActivity {
                id: parse_uuid(&uuid_text, "activities.uuid")?,
                kind: ActivityKind::parse(&kind_text).ok_or_else(|| {
                    RepoError::InvalidData(format!(
                        "invalid activity kind `{kind_text}` in activities.kind"
                    ))
                })?,
                member_id: parse_uuid(&member_text, "activities.member_uuid")?,
                badge_id: badge_text
                    .map(|text| parse_uuid(&text, "activities.badge_uuid"))
                    .transpose()?,
                timestamp: row.get(4)?,
            });
        }

        stored.into_iter().map(|row| self.resolve(row)).collect()
    }
}
