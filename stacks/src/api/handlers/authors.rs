use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use stacks_core::models::{Author, AuthorDetail, AuthorRequest};
use stacks_core::policy::{Action, ResourceKind};

use crate::api::auth::MaybeUser;
use crate::api::authorize::authorize;
use crate::api::error::AppError;
use crate::app_state::SharedAppState;

#[utoipa::path(
    get,
    path = "/api/v1/authors",
    responses(
    (status = 200, body = [Author]),
    (status = 401, description = "Login required when catalog reads are restricted"),
    )
)]
#[debug_handler]
pub async fn list_authors_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Author, Action::List)?;
    Ok(Json(state.catalog.list_authors().await))
}

#[utoipa::path(
    get,
    path = "/api/v1/authors/{id}",
    params(("id" = Uuid, Path, description = "Author id")),
    responses(
    (status = 200, response = inline(AuthorDetail)),
    (status = 404, description = "Author not found"),
    )
)]
#[debug_handler]
pub async fn author_detail_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Author, Action::Retrieve)?;
    let author = state
        .catalog
        .get_author(id)
        .await
        .ok_or_else(|| AppError::NotFound("author", id.to_string()))?;
    let books = state.catalog.author_book_titles(id).await;
    Ok(Json(AuthorDetail::new(author, books)))
}

#[utoipa::path(
    post,
    path = "/api/v1/authors",
    request_body(content = AuthorRequest, content_type = "application/json"),
    responses(
    (status = 201, response = inline(Author)),
    (status = 400, description = "Validation failure"),
    (status = 403, description = "Caller is not a librarian"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn create_author_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Json(payload): Json<AuthorRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Author, Action::Create)?;
    let author = state.catalog.add_author(payload).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

#[utoipa::path(
    put,
    path = "/api/v1/authors/{id}",
    params(("id" = Uuid, Path, description = "Author id")),
    request_body(content = AuthorRequest, content_type = "application/json"),
    responses(
    (status = 200, response = inline(Author)),
    (status = 403, description = "Caller is not a librarian"),
    (status = 404, description = "Author not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn update_author_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AuthorRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Author, Action::Update)?;
    let author = state.catalog.update_author(id, payload).await?;
    Ok(Json(author))
}

#[utoipa::path(
    delete,
    path = "/api/v1/authors/{id}",
    params(("id" = Uuid, Path, description = "Author id")),
    responses(
    (status = 204, description = "Author and their books deleted"),
    (status = 403, description = "Caller is not a librarian"),
    (status = 404, description = "Author not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn delete_author_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Author, Action::Delete)?;
    state.catalog.remove_author(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
