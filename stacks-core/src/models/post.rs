use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::models::comment::CommentResponse;

/// A blog post. `author_id` is fixed at creation from the session
/// identity and never changes afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub published_date: DateTime<Utc>,
    pub tags: Vec<String>,
}

/// Write payload for creating or fully replacing a post. Deliberately
/// has no author field; the server takes the author from the session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PostRequest {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(CoreError::validation("title", "title must not be empty"));
        }
        if self.content.trim().is_empty() {
            return Err(CoreError::validation("content", "content must not be empty"));
        }
        Ok(())
    }
}

/// Partial-update payload; absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PostPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(CoreError::validation("title", "title must not be empty"));
            }
        }
        if let Some(content) = &self.content {
            if content.trim().is_empty() {
                return Err(CoreError::validation("content", "content must not be empty"));
            }
        }
        Ok(())
    }
}

/// Read payload: the post plus its resolved author username.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub author: String,
    pub published_date: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl PostResponse {
    pub fn new(post: Post, author: String) -> Self {
        PostResponse {
            id: post.id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            author,
            published_date: post.published_date,
            tags: post.tags,
        }
    }
}

/// Post detail with its comments, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}
