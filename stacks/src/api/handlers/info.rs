use axum::{debug_handler, extract::State, response::IntoResponse, Json};

use crate::app_state::SharedAppState;

/// Server identification for clients.
#[derive(Debug, serde::Serialize, serde::Deserialize, utoipa::ToSchema, utoipa::ToResponse)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
    pub public_catalog_reads: bool,
}

#[utoipa::path(
    get,
    path = "/api/v1/info",
    responses(
    (status = 200, response = inline(ServerInfo))
    )
)]
#[debug_handler]
pub async fn info_handler(State(state): State<SharedAppState>) -> impl IntoResponse {
    Json(ServerInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        public_catalog_reads: state.settings.api.public_catalog_reads,
    })
}
