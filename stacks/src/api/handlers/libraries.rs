use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;

use stacks_core::models::{Library, LibraryDetail, LibraryRequest};
use stacks_core::policy::{Action, ResourceKind};

use crate::api::auth::MaybeUser;
use crate::api::authorize::authorize;
use crate::api::error::AppError;
use crate::app_state::SharedAppState;

#[utoipa::path(
    get,
    path = "/api/v1/libraries",
    responses(
    (status = 200, body = [Library]),
    (status = 401, description = "Login required when catalog reads are restricted"),
    )
)]
#[debug_handler]
pub async fn list_libraries_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Library, Action::List)?;
    Ok(Json(state.catalog.list_libraries().await))
}

#[utoipa::path(
    get,
    path = "/api/v1/libraries/{id}",
    params(("id" = Uuid, Path, description = "Library id")),
    responses(
    (status = 200, response = inline(LibraryDetail)),
    (status = 404, description = "Library not found"),
    )
)]
#[debug_handler]
pub async fn library_detail_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Library, Action::Retrieve)?;
    let (library, books) = state
        .catalog
        .get_library(id)
        .await
        .ok_or_else(|| AppError::NotFound("library", id.to_string()))?;
    Ok(Json(LibraryDetail::new(library, books)))
}

#[utoipa::path(
    post,
    path = "/api/v1/libraries",
    request_body(content = LibraryRequest, content_type = "application/json"),
    responses(
    (status = 201, response = inline(Library)),
    (status = 400, description = "Validation failure"),
    (status = 403, description = "Caller is not a librarian"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn create_library_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Json(payload): Json<LibraryRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Library, Action::Create)?;
    let library = state.catalog.add_library(payload).await?;
    Ok((StatusCode::CREATED, Json(library)))
}

#[utoipa::path(
    put,
    path = "/api/v1/libraries/{id}",
    params(("id" = Uuid, Path, description = "Library id")),
    request_body(content = LibraryRequest, content_type = "application/json"),
    responses(
    (status = 200, response = inline(Library)),
    (status = 403, description = "Caller is not a librarian"),
    (status = 404, description = "Library not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn update_library_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<LibraryRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Library, Action::Update)?;
    let library = state.catalog.update_library(id, payload).await?;
    Ok(Json(library))
}

#[utoipa::path(
    delete,
    path = "/api/v1/libraries/{id}",
    params(("id" = Uuid, Path, description = "Library id")),
    responses(
    (status = 204, description = "Library deleted"),
    (status = 403, description = "Caller is not an admin"),
    (status = 404, description = "Library not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn delete_library_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Library, Action::Delete)?;
    state.catalog.remove_library(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/v1/libraries/{id}/books/{book_id}",
    params(
        ("id" = Uuid, Path, description = "Library id"),
        ("book_id" = Uuid, Path, description = "Book id")
    ),
    responses(
    (status = 200, response = inline(Library)),
    (status = 403, description = "Caller is not a librarian"),
    (status = 404, description = "Library or book not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn add_library_book_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path((id, book_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Library, Action::Update)?;
    let library = state.catalog.add_library_book(id, book_id).await?;
    Ok(Json(library))
}

#[utoipa::path(
    delete,
    path = "/api/v1/libraries/{id}/books/{book_id}",
    params(
        ("id" = Uuid, Path, description = "Library id"),
        ("book_id" = Uuid, Path, description = "Book id")
    ),
    responses(
    (status = 200, response = inline(Library)),
    (status = 403, description = "Caller is not a librarian"),
    (status = 404, description = "Library not found or book not a member"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn remove_library_book_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path((id, book_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::Library, Action::Update)?;
    let library = state.catalog.remove_library_book(id, book_id).await?;
    Ok(Json(library))
}
