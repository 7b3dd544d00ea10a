//! Topic and post records.

use crate::model::category::CategoryId;
use crate::model::member::MemberId;
use uuid::Uuid;

pub type TopicId = Uuid;
pub type PostId = Uuid;

/// Discussion thread inside one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub id: TopicId,
    pub category_id: CategoryId,
    pub member_id: MemberId,
    pub name: String,
    pub slug: String,
    /// Creation date in epoch milliseconds.
    pub create_date: i64,
}

impl Topic {
    /// Site-relative topic URL.
    pub fn nice_url(&self) -> String {
        format!("/chat/{}", self.slug)
    }
}

/// One post; exactly one post per topic is the topic starter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub topic_id: TopicId,
    pub member_id: MemberId,
    pub content: String,
    pub is_topic_starter: bool,
    pub date_created: i64,
    /// Last edit date; equals `date_created` for unedited posts.
    pub date_edited: i64,
}
