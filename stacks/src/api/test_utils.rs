//! Shared helpers for the API tests: test server construction and
//! account bootstrapping.

use axum_test::TestServer;
use config::Config;
use serde_json::json;
use uuid::Uuid;

use crate::api::router::ApiRoutes;
use crate::app_state::{AppState, SharedAppState};
use crate::settings::config::Settings;
use crate::stop_flag::StopFlag;

pub const ADMIN_PASSWORD: &str = "admin-secret-1";

/// Settings for tests: in-memory only, with a bootstrapped admin.
pub fn test_settings(public_catalog_reads: bool) -> Settings {
    let config = Config::builder()
        .set_override("api.public_catalog_reads", public_catalog_reads)
        .unwrap()
        .set_override("api.admin_password", ADMIN_PASSWORD)
        .unwrap()
        .build()
        .unwrap();
    config.try_deserialize().unwrap()
}

pub async fn create_test_server_with_settings(settings: Settings) -> (TestServer, SharedAppState) {
    let state = AppState::from_settings(settings, StopFlag::new())
        .await
        .expect("failed to build test app state");
    let server = TestServer::new(ApiRoutes::create(state.clone())).unwrap();
    (server, state)
}

pub async fn create_test_server() -> (TestServer, SharedAppState) {
    create_test_server_with_settings(test_settings(true)).await
}

/// Registers a fresh account and returns its session token and user id.
pub async fn register(server: &TestServer, username: &str) -> (String, Uuid) {
    let response = server
        .post("/api/v1/register")
        .json(&json!({
            "username": username,
            "password": "correct horse battery staple",
        }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    let body: serde_json::Value = response.json();
    let token = body["token"].as_str().unwrap().to_string();
    let id = body["user"]["id"].as_str().unwrap().parse().unwrap();
    (token, id)
}

pub async fn login_admin(server: &TestServer) -> String {
    let response = server
        .post("/api/v1/login")
        .json(&json!({
            "username": "admin",
            "password": ADMIN_PASSWORD,
        }))
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    let body: serde_json::Value = response.json();
    body["token"].as_str().unwrap().to_string()
}

/// Registers an account and promotes it via the admin role endpoint.
pub async fn register_with_role(server: &TestServer, username: &str, role: &str) -> (String, Uuid) {
    let (token, id) = register(server, username).await;
    let admin_token = login_admin(server).await;
    let response = server
        .put(&format!("/api/v1/users/{id}/role"))
        .authorization_bearer(&admin_token)
        .json(&json!({ "role": role }))
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
    (token, id)
}

/// Creates an author through the API using a librarian session.
pub async fn create_author(server: &TestServer, librarian_token: &str, name: &str) -> Uuid {
    let response = server
        .post("/api/v1/authors")
        .authorization_bearer(librarian_token)
        .json(&json!({ "name": name }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().parse().unwrap()
}

/// Creates a book through the API.
pub async fn create_book(
    server: &TestServer,
    token: &str,
    title: &str,
    year: i32,
    author_id: Uuid,
) -> Uuid {
    let response = server
        .post("/api/v1/books")
        .authorization_bearer(token)
        .json(&json!({
            "title": title,
            "publication_year": year,
            "author_id": author_id,
        }))
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    let body: serde_json::Value = response.json();
    body["id"].as_str().unwrap().parse().unwrap()
}
