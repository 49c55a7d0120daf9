use axum::{
    debug_handler,
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use tracing::info;
use uuid::Uuid;

use stacks_core::models::{Role, UserResponse};
use stacks_core::policy::{Action, ResourceKind};

use crate::api::auth::MaybeUser;
use crate::api::authorize::authorize;
use crate::api::error::AppError;
use crate::app_state::SharedAppState;

/// Admin payload for changing a user's role. The role arrives as a
/// plain string so unknown values surface as a field-level error
/// rather than a deserialization failure.
#[derive(Debug, serde::Deserialize, utoipa::ToSchema)]
pub struct RoleChangeRequest {
    pub role: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
    (status = 200, body = [UserResponse]),
    (status = 401, description = "Session token is missing or invalid"),
    (status = 403, description = "Caller is not an admin"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn list_users_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::User, Action::List)?;
    let users: Vec<UserResponse> = state
        .users
        .list()
        .await
        .iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(users))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/role",
    params(("id" = Uuid, Path, description = "User id")),
    request_body(content = RoleChangeRequest, content_type = "application/json"),
    responses(
    (status = 200, response = inline(UserResponse)),
    (status = 400, description = "Unknown role"),
    (status = 403, description = "Caller is not an admin"),
    (status = 404, description = "User not found"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn set_role_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoleChangeRequest>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&state, &user, ResourceKind::User, Action::Update)?;
    let role = Role::parse(&payload.role).ok_or_else(|| AppError::Validation {
        field: "role".to_string(),
        message: format!("unknown role '{}'", payload.role),
    })?;
    let record = state.users.set_role(id, role).await?;
    info!("Role of user '{}' set to {}", record.username, role.as_str());
    Ok(Json(UserResponse::from(&record)))
}
