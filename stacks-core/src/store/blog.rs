use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::models::{Comment, CommentRequest, Post, PostPatch, PostRequest};

#[derive(Debug, Default)]
struct BlogState {
    posts: Vec<Post>,
    comments: Vec<Comment>,
}

/// Shared store for posts and their comments.
///
/// Owner-gated mutations take a `guard` closure evaluated against the
/// current entity inside the write lock; if the guard fails nothing is
/// touched.
#[derive(Debug, Clone, Default)]
pub struct BlogStore {
    state: Arc<RwLock<BlogState>>,
}

impl BlogStore {
    pub fn new() -> BlogStore {
        BlogStore::default()
    }

    // Post operations

    /// Creates a post. The author comes from the session identity,
    /// never from client input.
    pub async fn add_post(&self, author_id: Uuid, request: PostRequest) -> Result<Post> {
        request.validate()?;
        let post = Post {
            id: Uuid::new_v4(),
            title: request.title.trim().to_string(),
            content: request.content,
            author_id,
            published_date: Utc::now(),
            tags: request.tags,
        };
        self.state.write().await.posts.push(post.clone());
        Ok(post)
    }

    #[instrument]
    pub async fn list_posts(&self) -> Vec<Post> {
        self.state.read().await.posts.clone()
    }

    pub async fn get_post(&self, id: Uuid) -> Option<Post> {
        let state = self.state.read().await;
        state.posts.iter().find(|post| post.id == id).cloned()
    }

    /// Comments of a post, newest first.
    pub async fn post_comments(&self, post_id: Uuid) -> Vec<Comment> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments
    }

    /// Full update. `guard` runs against the stored post under the
    /// write lock. The author field is never touched.
    pub async fn update_post(
        &self,
        id: Uuid,
        guard: impl FnOnce(&Post) -> Result<()>,
        request: PostRequest,
    ) -> Result<Post> {
        request.validate()?;
        let mut state = self.state.write().await;
        let post = state
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| CoreError::NotFound("post", id.to_string()))?;
        guard(post)?;
        post.title = request.title.trim().to_string();
        post.content = request.content;
        post.tags = request.tags;
        Ok(post.clone())
    }

    pub async fn patch_post(
        &self,
        id: Uuid,
        guard: impl FnOnce(&Post) -> Result<()>,
        patch: PostPatch,
    ) -> Result<Post> {
        patch.validate()?;
        let mut state = self.state.write().await;
        let post = state
            .posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| CoreError::NotFound("post", id.to_string()))?;
        guard(post)?;
        if let Some(title) = patch.title {
            post.title = title.trim().to_string();
        }
        if let Some(content) = patch.content {
            post.content = content;
        }
        if let Some(tags) = patch.tags {
            post.tags = tags;
        }
        Ok(post.clone())
    }

    /// Deletes a post and its comments.
    pub async fn remove_post(
        &self,
        id: Uuid,
        guard: impl FnOnce(&Post) -> Result<()>,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let index = state
            .posts
            .iter()
            .position(|post| post.id == id)
            .ok_or_else(|| CoreError::NotFound("post", id.to_string()))?;
        guard(&state.posts[index])?;
        state.posts.remove(index);
        state.comments.retain(|comment| comment.post_id != id);
        Ok(())
    }

    pub async fn post_count(&self) -> usize {
        self.state.read().await.posts.len()
    }

    // Comment operations

    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        request: CommentRequest,
    ) -> Result<Comment> {
        request.validate()?;
        let mut state = self.state.write().await;
        if !state.posts.iter().any(|post| post.id == post_id) {
            return Err(CoreError::NotFound("post", post_id.to_string()));
        }
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            content: request.content,
            author_id,
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    pub async fn get_comment(&self, id: Uuid) -> Option<Comment> {
        let state = self.state.read().await;
        state
            .comments
            .iter()
            .find(|comment| comment.id == id)
            .cloned()
    }

    pub async fn update_comment(
        &self,
        id: Uuid,
        guard: impl FnOnce(&Comment) -> Result<()>,
        request: CommentRequest,
    ) -> Result<Comment> {
        request.validate()?;
        let mut state = self.state.write().await;
        let comment = state
            .comments
            .iter_mut()
            .find(|comment| comment.id == id)
            .ok_or_else(|| CoreError::NotFound("comment", id.to_string()))?;
        guard(comment)?;
        comment.content = request.content;
        Ok(comment.clone())
    }

    pub async fn remove_comment(
        &self,
        id: Uuid,
        guard: impl FnOnce(&Comment) -> Result<()>,
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let index = state
            .comments
            .iter()
            .position(|comment| comment.id == id)
            .ok_or_else(|| CoreError::NotFound("comment", id.to_string()))?;
        guard(&state.comments[index])?;
        state.comments.remove(index);
        Ok(())
    }

    pub async fn comment_count(&self) -> usize {
        self.state.read().await.comments.len()
    }
}
