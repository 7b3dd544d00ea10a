//! Category, topic and post write operations.
//!
//! # Invariants
//! - A topic is always created together with exactly one starter post.
//! - Category and topic slugs are unique; collisions get a numeric suffix.

use crate::model::category::Category;
use crate::model::member::Member;
use crate::model::topic::{Post, Topic};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::topic_repo::TopicRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::{slugify, unique_slug};
use uuid::Uuid;

pub struct ForumService<C: CategoryRepository, T: TopicRepository> {
    categories: C,
    topics: T,
}

impl<C: CategoryRepository, T: TopicRepository> ForumService<C, T> {
    pub fn new(categories: C, topics: T) -> Self {
        Self { categories, topics }
    }

    pub fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
        sort_order: i32,
        date_created: i64,
    ) -> RepoResult<Category> {
        let slug = unique_slug(&slugify(name, "category"), |candidate| {
            self.categories.slug_exists(candidate)
        })?;
        let mut category = Category::new(name.trim(), slug, date_created);
        category.description = description.map(str::to_string);
        category.sort_order = sort_order;
        self.categories.create_category(&category)?;
        Ok(category)
    }

    pub fn list_categories(&self) -> RepoResult<Vec<Category>> {
        self.categories.list_categories()
    }

    /// Opens a topic in `category` with `content` as its starter post.
    pub fn create_topic(
        &self,
        category: &Category,
        author: &Member,
        name: &str,
        content: &str,
        created_at: i64,
    ) -> RepoResult<(Topic, Post)> {
        let slug = unique_slug(&slugify(name, "topic"), |candidate| {
            self.topics.slug_exists(candidate)
        })?;
        let topic = Topic {
            id: Uuid::new_v4(),
            category_id: category.id,
            member_id: author.id,
            name: name.trim().to_string(),
            slug,
            create_date: created_at,
        };
        self.topics.create_topic(&topic)?;

        let starter = Post {
            id: Uuid::new_v4(),
            topic_id: topic.id,
            member_id: author.id,
            content: content.to_string(),
            is_topic_starter: true,
            date_created: created_at,
            date_edited: created_at,
        };
        self.topics.create_post(&starter)?;
        Ok((topic, starter))
    }

    /// Adds a reply to an existing topic.
    pub fn add_post(
        &self,
        topic: &Topic,
        author: &Member,
        content: &str,
        created_at: i64,
    ) -> RepoResult<Post> {
        if self.topics.get_topic(topic.id)?.is_none() {
            return Err(RepoError::not_found("topic", topic.id));
        }
        let post = Post {
            id: Uuid::new_v4(),
            topic_id: topic.id,
            member_id: author.id,
            content: content.to_string(),
            is_topic_starter: false,
            date_created: created_at,
            date_edited: created_at,
        };
        self.topics.create_post(&post)?;
        Ok(post)
    }
}
