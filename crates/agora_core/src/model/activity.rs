//! Activity stream records.
//!
//! An activity is one of a closed set of events; each variant carries the
//! records its rendering needs, so consumers match exhaustively instead of
//! probing runtime types.

use crate::model::member::{Member, MemberId};
use serde::Serialize;
use uuid::Uuid;

pub type ActivityId = Uuid;
pub type BadgeId = Uuid;

/// Award that can be granted to members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub id: BadgeId,
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Image file name under the badge content folder.
    pub image: String,
}

impl Badge {
    /// Site-relative badge image URL.
    pub fn image_url(&self) -> String {
        format!("/content/badges/{}", self.image)
    }
}

/// Stored discriminant of an activity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    BadgeAwarded,
    MemberJoined,
    ProfileUpdated,
}

impl ActivityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BadgeAwarded => "badge_awarded",
            Self::MemberJoined => "member_joined",
            Self::ProfileUpdated => "profile_updated",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "badge_awarded" => Some(Self::BadgeAwarded),
            "member_joined" => Some(Self::MemberJoined),
            "profile_updated" => Some(Self::ProfileUpdated),
            _ => None,
        }
    }
}

/// Write model for recording one activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub id: ActivityId,
    pub kind: ActivityKind,
    pub member_id: MemberId,
    /// Required for `BadgeAwarded`, absent otherwise.
    pub badge_id: Option<BadgeId>,
    pub timestamp: i64,
}

/// Variant payloads of a loaded activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityDetail {
    BadgeAwarded { badge: Badge, member: Member },
    MemberJoined { member: Member },
    ProfileUpdated { member: Member },
}

/// Loaded activity with its referenced records resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: ActivityId,
    /// Event time in epoch milliseconds.
    pub timestamp: i64,
    pub detail: ActivityDetail,
}

impl Activity {
    pub fn kind(&self) -> ActivityKind {
        match self.detail {
            ActivityDetail::BadgeAwarded { .. } => ActivityKind::BadgeAwarded,
            ActivityDetail::MemberJoined { .. } => ActivityKind::MemberJoined,
            ActivityDetail::ProfileUpdated { .. } => ActivityKind::ProfileUpdated,
        }
    }

    /// Member the activity is about.
    pub fn member(&self) -> &Member {
        match &self.detail {
            ActivityDetail::BadgeAwarded { member, .. }
            | ActivityDetail::MemberJoined { member }
            | ActivityDetail::ProfileUpdated { member } => member,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ActivityKind;

    #[test]
    fn kind_strings_match_storage_values() {
        for kind in [
            ActivityKind::BadgeAwarded,
            ActivityKind::MemberJoined,
            ActivityKind::ProfileUpdated,
        ] {
            assert_eq!(ActivityKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ActivityKind::parse("post_liked"), None);
    }
}
