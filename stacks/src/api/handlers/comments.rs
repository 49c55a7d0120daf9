use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use stacks_core::models::{CommentRequest, CommentResponse};
use stacks_core::policy::{Action, ResourceKind};

use crate::api::auth::MaybeUser;
use crate::api::authorize::{authorize, owner_guard};
use crate::api::error::AppError;
use crate::api::handlers::posts::comment_response;
use crate::app_state::SharedAppState;

#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body(content = CommentRequest, content_type = "application/json"),
    responses(
    (status = 201, response = inline(CommentResponse)),
    (status = 400, description = "Validation failure"),
    (status = 401, description = "Login required"),
    (status = 404, description = "Post not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn create_comment_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Comment, Action::Create)?;
    let user = user.require()?;
    let comment = state.blog.add_comment(id, user.id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(comment_response(&state, comment).await),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/comments/{id}",
    params(("id" = Uuid, Path, description = "Comment id")),
    request_body(content = CommentRequest, content_type = "application/json"),
    responses(
    (status = 200, response = inline(CommentResponse)),
    (status = 403, description = "Caller is neither the author nor an admin"),
    (status = 404, description = "Comment not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn update_comment_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let guard = owner_guard(&state, &user, ResourceKind::Comment, Action::Update);
    let comment = state
        .blog
        .update_comment(id, |comment| guard(Some(comment.author_id)), payload)
        .await?;
    Ok(Json(comment_response(&state, comment).await))
}

#[utoipa::path(
    delete,
    path = "/api/v1/comments/{id}",
    params(("id" = Uuid, Path, description = "Comment id")),
    responses(
    (status = 204, description = "Comment deleted"),
    (status = 403, description = "Caller is neither the author nor an admin"),
    (status = 404, description = "Comment not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn delete_comment_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let guard = owner_guard(&state, &user, ResourceKind::Comment, Action::Delete);
    state
        .blog
        .remove_comment(id, |comment| guard(Some(comment.author_id)))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
