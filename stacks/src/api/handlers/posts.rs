use axum::{
    debug_handler,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use stacks_core::models::{
    Comment, CommentResponse, Post, PostDetail, PostPatch, PostRequest, PostResponse,
};
use stacks_core::policy::{Action, ResourceKind};
use stacks_core::query::{filter_and_sort_posts, PostQuery};

use crate::api::auth::MaybeUser;
use crate::api::authorize::{authorize, owner_guard};
use crate::api::error::AppError;
use crate::app_state::SharedAppState;

/// Resolves a user id to a display username. Posts outlive their
/// authors, so a missing user renders as a placeholder instead of
/// failing the request.
pub(crate) async fn author_name(state: &SharedAppState, id: Uuid) -> String {
    match state.users.get(id).await {
        Some(user) => user.username,
        None => "deleted user".to_string(),
    }
}

async fn post_response(state: &SharedAppState, post: Post) -> PostResponse {
    let author = author_name(state, post.author_id).await;
    PostResponse::new(post, author)
}

pub(crate) async fn comment_response(state: &SharedAppState, comment: Comment) -> CommentResponse {
    let author = author_name(state, comment.author_id).await;
    CommentResponse::new(comment, author)
}

#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(PostQuery),
    responses(
    (status = 200, body = [PostResponse]),
    (status = 400, description = "Unsupported ordering key"),
    )
)]
#[debug_handler]
pub async fn list_posts_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Query(query): Query<PostQuery>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Post, Action::List)?;
    let mut posts = Vec::new();
    for post in state.blog.list_posts().await {
        posts.push(post_response(&state, post).await);
    }
    let posts = filter_and_sort_posts(posts, &query)?;
    Ok(Json(posts))
}

#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
    (status = 200, response = inline(PostDetail)),
    (status = 404, description = "Post not found"),
    )
)]
#[debug_handler]
pub async fn post_detail_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Post, Action::Retrieve)?;
    let post = state
        .blog
        .get_post(id)
        .await
        .ok_or_else(|| AppError::NotFound("post", id.to_string()))?;
    let mut comments = Vec::new();
    for comment in state.blog.post_comments(id).await {
        comments.push(comment_response(&state, comment).await);
    }
    Ok(Json(PostDetail {
        post: post_response(&state, post).await,
        comments,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body(content = PostRequest, content_type = "application/json"),
    responses(
    (status = 201, response = inline(PostResponse)),
    (status = 400, description = "Validation failure"),
    (status = 401, description = "Login required"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn create_post_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Json(payload): Json<PostRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Post, Action::Create)?;
    let user = user.require()?;
    let post = state.blog.add_post(user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(post_response(&state, post).await)))
}

#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body(content = PostRequest, content_type = "application/json"),
    responses(
    (status = 200, response = inline(PostResponse)),
    (status = 403, description = "Caller is neither the author nor an admin"),
    (status = 404, description = "Post not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn update_post_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostRequest>,
) -> Result<impl IntoResponse, AppError> {
    let guard = owner_guard(&state, &user, ResourceKind::Post, Action::Update);
    let post = state
        .blog
        .update_post(id, |post| guard(Some(post.author_id)), payload)
        .await?;
    Ok(Json(post_response(&state, post).await))
}

#[utoipa::path(
    patch,
    path = "/api/v1/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body(content = PostPatch, content_type = "application/json"),
    responses(
    (status = 200, response = inline(PostResponse)),
    (status = 403, description = "Caller is neither the author nor an admin"),
    (status = 404, description = "Post not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn patch_post_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostPatch>,
) -> Result<impl IntoResponse, AppError> {
    let guard = owner_guard(&state, &user, ResourceKind::Post, Action::Update);
    let post = state
        .blog
        .patch_post(id, |post| guard(Some(post.author_id)), payload)
        .await?;
    Ok(Json(post_response(&state, post).await))
}

#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
    (status = 204, description = "Post and its comments deleted"),
    (status = 403, description = "Caller is neither the author nor an admin"),
    (status = 404, description = "Post not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn delete_post_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let guard = owner_guard(&state, &user, ResourceKind::Post, Action::Delete);
    state
        .blog
        .remove_post(id, |post| guard(Some(post.author_id)))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
