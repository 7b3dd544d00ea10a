//! Topic and post repository.
//!
//! # Invariants
//! - Topic listings are ordered by `create_date DESC, uuid ASC`.
//! - Listings restricted to a category set return nothing for an empty set.

use crate::model::category::CategoryId;
use crate::model::topic::{Post, PostId, Topic, TopicId};
use crate::repo::{
    bool_to_int, parse_flag, parse_uuid, row_exists, uuid_in_list, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const TOPIC_SELECT_SQL: &str = "SELECT
    uuid,
    category_uuid,
    member_uuid,
    name,
    slug,
    create_date
FROM topics";

const POST_SELECT_SQL: &str = "SELECT
    uuid,
    topic_uuid,
    member_uuid,
    content,
    is_topic_starter,
    date_created,
    date_edited
FROM posts";

/// Repository interface for topics and their posts.
pub trait TopicRepository {
    fn create_topic(&self, topic: &Topic) -> RepoResult<TopicId>;
    fn create_post(&self, post: &Post) -> RepoResult<PostId>;
    fn get_topic(&self, id: TopicId) -> RepoResult<Option<Topic>>;
    fn slug_exists(&self, slug: &str) -> RepoResult<bool>;
    /// Most recent topics inside `category_ids`, at most `limit`.
    fn list_recent_topics(&self, category_ids: &[CategoryId], limit: u32)
        -> RepoResult<Vec<Topic>>;
    /// Every topic inside `category_ids`.
    fn list_topics_in(&self, category_ids: &[CategoryId]) -> RepoResult<Vec<Topic>>;
    fn topic_starter(&self, topic_id: TopicId) -> RepoResult<Option<Post>>;
    /// Most recently created post of a topic.
    fn last_post(&self, topic_id: TopicId) -> RepoResult<Option<Post>>;
}

/// SQLite-backed topic repository.
pub struct SqliteTopicRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTopicRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_topics(
        &self,
        category_ids: &[CategoryId],
        limit: Option<u32>,
    ) -> RepoResult<Vec<Topic>> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        let (placeholders, mut bind_values) = uuid_in_list(category_ids);
        let mut sql = format!(
            "{TOPIC_SELECT_SQL}
             WHERE category_uuid IN ({placeholders})
             ORDER BY create_date DESC, uuid ASC"
        );
        if let Some(limit) = limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut topics = Vec::new();
        while let Some(row) = rows.next()? {
            topics.push(parse_topic_row(row)?);
        }
        Ok(topics)
    }

    fn query_post(&self, sql_suffix: &str, topic_id: TopicId) -> RepoResult<Option<Post>> {
        self.conn
            .query_row(
                &format!("{POST_SELECT_SQL} {sql_suffix}"),
                [topic_id.to_string()],
                |row| Ok(parse_post_row(row)),
            )
            .optional()?
            .transpose()
    }
}

impl TopicRepository for SqliteTopicRepository<'_> {
    fn create_topic(&self, topic: &Topic) -> RepoResult<TopicId> {
        if topic.name.trim().is_empty() || topic.slug.trim().is_empty() {
            return Err(RepoError::Validation(
                "topic name and slug must not be blank".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT INTO topics (
                uuid,
                category_uuid,
                member_uuid,
                name,
                slug,
                create_date
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                topic.id.to_string(),
                topic.category_id.to_string(),
                topic.member_id.to_string(),
                topic.name.as_str(),
                topic.slug.as_str(),
                topic.create_date,
            ],
        )?;
        Ok(topic.id)
    }

    fn create_post(&self, post: &Post) -> RepoResult<PostId> {
        if post.date_edited < post.date_created {
            return Err(RepoError::Validation(
                "post edit date precedes creation date".to_string(),
            ));
        }

        self.conn.execute(
            "INSERT INTO posts (
                uuid,
                topic_uuid,
                member_uuid,
                content,
                is_topic_starter,
                date_created,
                date_edited
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                post.id.to_string(),
                post.topic_id.to_string(),
                post.member_id.to_string(),
                post.content.as_str(),
                bool_to_int(post.is_topic_starter),
                post.date_created,
                post.date_edited,
            ],
        )?;
        Ok(post.id)
    }

    fn get_topic(&self, id: TopicId) -> RepoResult<Option<Topic>> {
        self.conn
            .query_row(
                &format!("{TOPIC_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_topic_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn slug_exists(&self, slug: &str) -> RepoResult<bool> {
        row_exists(
            self.conn,
            "SELECT EXISTS(SELECT 1 FROM topics WHERE slug = ?1);",
            slug,
        )
    }

    fn list_recent_topics(
        &self,
        category_ids: &[CategoryId],
        limit: u32,
    ) -> RepoResult<Vec<Topic>> {
        self.query_topics(category_ids, Some(limit))
    }

    fn list_topics_in(&self, category_ids: &[CategoryId]) -> RepoResult<Vec<Topic>> {
        self.query_topics(category_ids, None)
    }

    fn topic_starter(&self, topic_id: TopicId) -> RepoResult<Option<Post>> {
        self.query_post(
            "WHERE topic_uuid = ?1 AND is_topic_starter = 1
             ORDER BY date_created ASC, uuid ASC
             LIMIT 1;",
            topic_id,
        )
    }

    fn last_post(&self, topic_id: TopicId) -> RepoResult<Option<Post>> {
        self.query_post(
            "WHERE topic_uuid = ?1
             ORDER BY date_created DESC, uuid DESC
             LIMIT 1;",
            topic_id,
        )
    }
}

fn parse_topic_row(row: &Row<'_>) -> RepoResult<Topic> {
    let uuid_text: String = row.get("uuid")?;
    let category_text: String = row.get("category_uuid")?;
    let member_text: String = row.get("member_uuid")?;
    Ok(Topic {
        id: parse_uuid(&uuid_text, "topics.uuid")?,
        category_id: parse_uuid(&category_text, "topics.category_uuid")?,
        member_id: parse_uuid(&member_text, "topics.member_uuid")?,
        name: row.get("name")?,
        slug: row.get("slug")?,
        create_date: row.get("create_date")?,
    })
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    let uuid_text: String = row.get("uuid")?;
    let topic_text: String = row.get("topic_uuid")?;
    let member_text: String = row.get("member_uuid")?;
    Ok(Post {
        id: parse_uuid(&uuid_text, "posts.uuid")?,
        topic_id: parse_uuid(&topic_text, "posts.topic_uuid")?,
        member_id: parse_uuid(&member_text, "posts.member_uuid")?,
        content: row.get("content")?,
        is_topic_starter: parse_flag(row.get("is_topic_starter")?, "posts.is_topic_starter")?,
        date_created: row.get("date_created")?,
        date_edited: row.get("date_edited")?,
    })
}
