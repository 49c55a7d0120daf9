use axum::{
    debug_handler,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use stacks_core::models::{BookPatch, BookRequest, BookResponse};
use stacks_core::policy::{Action, ResourceKind};
use stacks_core::query::{filter_and_sort_books, BookQuery};

use crate::api::auth::MaybeUser;
use crate::api::authorize::authorize;
use crate::api::error::AppError;
use crate::app_state::SharedAppState;

#[utoipa::path(
    get,
    path = "/api/v1/books",
    params(BookQuery),
    responses(
    (status = 200, body = [BookResponse]),
    (status = 400, description = "Unsupported ordering key"),
    (status = 401, description = "Login required when catalog reads are restricted"),
    )
)]
#[debug_handler]
pub async fn list_books_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Query(query): Query<BookQuery>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Book, Action::List)?;
    let books = state.catalog.list_books().await;
    let books = filter_and_sort_books(books, &query)?;
    Ok(Json(books))
}

#[utoipa::path(
    get,
    path = "/api/v1/books/{id}",
    params(("id" = Uuid, Path, description = "Book id")),
    responses(
    (status = 200, response = inline(BookResponse)),
    (status = 404, description = "Book not found"),
    )
)]
#[debug_handler]
pub async fn book_detail_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Book, Action::Retrieve)?;
    let book = state
        .catalog
        .get_book(id)
        .await
        .ok_or_else(|| AppError::NotFound("book", id.to_string()))?;
    Ok(Json(book))
}

#[utoipa::path(
    post,
    path = "/api/v1/books",
    request_body(content = BookRequest, content_type = "application/json"),
    responses(
    (status = 201, response = inline(BookResponse)),
    (status = 400, description = "Validation failure (future publication year, unknown author_id)"),
    (status = 401, description = "Login required"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn create_book_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Json(payload): Json<BookRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Book, Action::Create)?;
    let book = state.catalog.add_book(payload).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    put,
    path = "/api/v1/books/{id}",
    params(("id" = Uuid, Path, description = "Book id")),
    request_body(content = BookRequest, content_type = "application/json"),
    responses(
    (status = 200, response = inline(BookResponse)),
    (status = 403, description = "Caller is not a librarian"),
    (status = 404, description = "Book not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn update_book_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Book, Action::Update)?;
    let book = state.catalog.update_book(id, payload).await?;
    Ok(Json(book))
}

#[utoipa::path(
    patch,
    path = "/api/v1/books/{id}",
    params(("id" = Uuid, Path, description = "Book id")),
    request_body(content = BookPatch, content_type = "application/json"),
    responses(
    (status = 200, response = inline(BookResponse)),
    (status = 403, description = "Caller is not a librarian"),
    (status = 404, description = "Book not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn patch_book_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookPatch>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Book, Action::Update)?;
    let book = state.catalog.patch_book(id, payload).await?;
    Ok(Json(book))
}

#[utoipa::path(
    delete,
    path = "/api/v1/books/{id}",
    params(("id" = Uuid, Path, description = "Book id")),
    responses(
    (status = 204, description = "Book deleted"),
    (status = 403, description = "Caller is not a librarian"),
    (status = 404, description = "Book not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn delete_book_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Book, Action::Delete)?;
    state.catalog.remove_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
