use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{ToResponse, ToSchema};
use uuid::Uuid;

use crate::error::{CoreError, Result};

/// A comment on a post. `author_id` is fixed at creation from the
/// session identity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Write payload for creating or editing a comment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentRequest {
    pub content: String,
}

impl CommentRequest {
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(CoreError::validation("content", "content must not be empty"));
        }
        Ok(())
    }
}

/// Read payload: the comment plus its resolved author username.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, ToResponse)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn new(comment: Comment, author: String) -> Self {
        CommentResponse {
            id: comment.id,
            post_id: comment.post_id,
            content: comment.content,
            author_id: comment.author_id,
            author,
            created_at: comment.created_at,
        }
    }
}
