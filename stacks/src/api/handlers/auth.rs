use axum::{
    debug_handler,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use tracing::debug;

use stacks_core::models::{ProfileUpdate, UserResponse};

use crate::api::auth::MaybeUser;
use crate::api::error::AppError;
use crate::app_state::SharedAppState;
use crate::services::accounts::{self, LoginRequest, RegisterRequest, SessionResponse};

#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body(content = RegisterRequest, content_type = "application/json"),
    responses(
    (status = 201, response = inline(SessionResponse)),
    (status = 400, description = "Validation failure"),
    (status = 409, description = "Username already taken"),
    )
)]
#[debug_handler]
pub async fn register_handler(
    State(state): State<SharedAppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = accounts::register(&state.users, &state.sessions, payload).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body(content = LoginRequest, content_type = "application/json"),
    responses(
    (status = 200, response = inline(SessionResponse)),
    (status = 401, description = "Invalid credentials"),
    )
)]
#[debug_handler]
pub async fn login_handler(
    State(state): State<SharedAppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Login attempt for '{}'", payload.username);
    let session = accounts::login(&state.users, &state.sessions, payload).await?;
    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
    (status = 204, description = "Session revoked"),
    (status = 401, description = "Session token is missing or invalid"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn logout_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = user.require()?;
    state.sessions.revoke(&user.token).await;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
    (status = 200, response = inline(UserResponse)),
    (status = 401, description = "Session token is missing or invalid"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn profile_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
) -> Result<impl IntoResponse, AppError> {
    let user = user.require()?;
    let record = state
        .users
        .get(user.id)
        .await
        .ok_or_else(|| AppError::NotFound("user", user.id.to_string()))?;
    Ok(Json(UserResponse::from(&record)))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body(content = ProfileUpdate, content_type = "application/json"),
    responses(
    (status = 200, response = inline(UserResponse)),
    (status = 401, description = "Session token is missing or invalid"),
    ),
    security(
        ("bearerAuth" = [])
    )
)]
#[debug_handler]
pub async fn update_profile_handler(
    State(state): State<SharedAppState>,
    Extension(user): Extension<MaybeUser>,
    Json(payload): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let user = user.require()?;
    let record = state.users.update_profile(user.id, payload).await?;
    Ok(Json(UserResponse::from(&record)))
}
