use chrono::Datelike;
use serde_json::json;
use uuid::Uuid;

use crate::api::test_utils::{
    create_author, create_book, create_test_server, create_test_server_with_settings, login_admin,
    register, register_with_role, test_settings,
};

#[tokio::test]
async fn anonymous_writes_are_rejected_and_leave_no_trace() {
    let (server, state) = create_test_server().await;
    let response = server
        .post("/api/v1/books")
        .json(&json!({
            "title": "Ghost",
            "publication_year": 2000,
            "author_id": Uuid::new_v4(),
        }))
        .await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(state.catalog.book_count().await, 0);
}

#[tokio::test]
async fn book_create_and_fetch_round_trip() {
    let (server, _state) = create_test_server().await;
    let (librarian, _) = register_with_role(&server, "libby", "librarian").await;
    let author_id = create_author(&server, &librarian, "Jane Austen").await;

    // Members may add books, the catalog is collaborative.
    let (member, _) = register(&server, "alice").await;
    let book_id = create_book(&server, &member, "Pride and Prejudice", 1813, author_id).await;

    let response = server.get(&format!("/api/v1/books/{book_id}")).await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Pride and Prejudice");
    assert_eq!(body["publication_year"], 1813);
    assert_eq!(body["author"], "Jane Austen");
}

#[tokio::test]
async fn future_publication_years_are_a_field_error() {
    let (server, state) = create_test_server().await;
    let (librarian, _) = register_with_role(&server, "libby", "librarian").await;
    let author_id = create_author(&server, &librarian, "Jane Austen").await;

    let future = chrono::Utc::now().date_naive().year() + 3;
    let response = server
        .post("/api/v1/books")
        .authorization_bearer(&librarian)
        .json(&json!({
            "title": "Tomorrow",
            "publication_year": future,
            "author_id": author_id,
        }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["field"], "publication_year");
    assert_eq!(state.catalog.book_count().await, 0);
}

#[tokio::test]
async fn unknown_author_references_are_a_field_error() {
    let (server, _state) = create_test_server().await;
    let (member, _) = register(&server, "alice").await;
    let response = server
        .post("/api/v1/books")
        .authorization_bearer(&member)
        .json(&json!({
            "title": "Orphan",
            "publication_year": 1990,
            "author_id": Uuid::new_v4(),
        }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["field"], "author_id");
}

#[tokio::test]
async fn book_updates_require_the_librarian_role() {
    let (server, _state) = create_test_server().await;
    let (librarian, _) = register_with_role(&server, "libby", "librarian").await;
    let author_id = create_author(&server, &librarian, "George Orwell").await;
    let (member, _) = register(&server, "alice").await;
    let book_id = create_book(&server, &member, "1984", 1949, author_id).await;

    let update = json!({
        "title": "Nineteen Eighty-Four",
        "publication_year": 1949,
        "author_id": author_id,
    });

    let response = server
        .put(&format!("/api/v1/books/{book_id}"))
        .authorization_bearer(&member)
        .json(&update)
        .await;
    assert_eq!(response.status_code(), 403);

    let response = server
        .put(&format!("/api/v1/books/{book_id}"))
        .authorization_bearer(&librarian)
        .json(&update)
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Nineteen Eighty-Four");
}

#[tokio::test]
async fn patch_changes_only_the_given_fields() {
    let (server, _state) = create_test_server().await;
    let (librarian, _) = register_with_role(&server, "libby", "librarian").await;
    let author_id = create_author(&server, &librarian, "George Orwell").await;
    let book_id = create_book(&server, &librarian, "Animal Farm", 1944, author_id).await;

    let response = server
        .patch(&format!("/api/v1/books/{book_id}"))
        .authorization_bearer(&librarian)
        .json(&json!({ "publication_year": 1945 }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Animal Farm");
    assert_eq!(body["publication_year"], 1945);
}

#[tokio::test]
async fn deleting_a_book_twice_is_not_found() {
    let (server, _state) = create_test_server().await;
    let (librarian, _) = register_with_role(&server, "libby", "librarian").await;
    let author_id = create_author(&server, &librarian, "A").await;
    let book_id = create_book(&server, &librarian, "Once", 2001, author_id).await;

    let path = format!("/api/v1/books/{book_id}");
    let response = server.delete(&path).authorization_bearer(&librarian).await;
    assert_eq!(response.status_code(), 204);

    let response = server.delete(&path).authorization_bearer(&librarian).await;
    assert_eq!(response.status_code(), 404);

    let response = server.get(&path).await;
    assert_eq!(response.status_code(), 404);
}

async fn seed_classics(server: &axum_test::TestServer) -> String {
    let (librarian, _) = register_with_role(server, "libby", "librarian").await;
    let austen = create_author(server, &librarian, "Jane Austen").await;
    let orwell = create_author(server, &librarian, "George Orwell").await;
    create_book(server, &librarian, "Pride and Prejudice", 1813, austen).await;
    create_book(server, &librarian, "1984", 1949, orwell).await;
    create_book(server, &librarian, "Animal Farm", 1945, orwell).await;
    create_book(server, &librarian, "Sense and Sensibility", 1811, austen).await;
    librarian
}

#[tokio::test]
async fn listing_filters_by_publication_year_range() {
    let (server, _state) = create_test_server().await;
    seed_classics(&server).await;

    let response = server
        .get("/api/v1/books")
        .add_query_param("publication_year_gte", 1900)
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["title"].as_str().unwrap())
        .collect();
    // Default ordering is title ascending.
    assert_eq!(titles, vec!["1984", "Animal Farm"]);
}

#[tokio::test]
async fn listing_orders_by_year_descending_on_request() {
    let (server, _state) = create_test_server().await;
    seed_classics(&server).await;

    let response = server
        .get("/api/v1/books")
        .add_query_param("ordering", "-publication_year")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    let years: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|book| book["publication_year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, vec![1949, 1945, 1813, 1811]);
}

#[tokio::test]
async fn unknown_ordering_keys_are_rejected() {
    let (server, _state) = create_test_server().await;
    let response = server
        .get("/api/v1/books")
        .add_query_param("ordering", "price")
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["field"], "ordering");
}

#[tokio::test]
async fn search_matches_author_names_too() {
    let (server, _state) = create_test_server().await;
    seed_classics(&server).await;

    let response = server
        .get("/api/v1/books")
        .add_query_param("search", "austen")
        .await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn private_catalogs_require_a_login_to_read() {
    let (server, _state) = create_test_server_with_settings(test_settings(false)).await;

    let response = server.get("/api/v1/books").await;
    assert_eq!(response.status_code(), 401);

    let (member, _) = register(&server, "alice").await;
    let response = server
        .get("/api/v1/books")
        .authorization_bearer(&member)
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn deleting_an_author_cascades_through_the_api() {
    let (server, _state) = create_test_server().await;
    let (librarian, _) = register_with_role(&server, "libby", "librarian").await;
    let austen = create_author(&server, &librarian, "Jane Austen").await;
    let book_id = create_book(&server, &librarian, "Emma", 1815, austen).await;

    let response = server
        .delete(&format!("/api/v1/authors/{austen}"))
        .authorization_bearer(&librarian)
        .await;
    assert_eq!(response.status_code(), 204);

    let response = server.get(&format!("/api/v1/books/{book_id}")).await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn author_detail_lists_their_book_titles() {
    let (server, _state) = create_test_server().await;
    let (librarian, _) = register_with_role(&server, "libby", "librarian").await;
    let orwell = create_author(&server, &librarian, "George Orwell").await;
    create_book(&server, &librarian, "1984", 1949, orwell).await;
    create_book(&server, &librarian, "Animal Farm", 1945, orwell).await;

    let response = server.get(&format!("/api/v1/authors/{orwell}")).await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["books"], json!(["1984", "Animal Farm"]));
}

#[tokio::test]
async fn library_membership_is_managed_by_librarians() {
    let (server, _state) = create_test_server().await;
    let (librarian, _) = register_with_role(&server, "libby", "librarian").await;
    let (member, _) = register(&server, "alice").await;
    let author_id = create_author(&server, &librarian, "A").await;
    let book_id = create_book(&server, &librarian, "B", 1990, author_id).await;

    let response = server
        .post("/api/v1/libraries")
        .authorization_bearer(&librarian)
        .json(&json!({ "name": "Central" }))
        .await;
    assert_eq!(response.status_code(), 201);
    let library: serde_json::Value = response.json();
    let library_id = library["id"].as_str().unwrap();

    let membership = format!("/api/v1/libraries/{library_id}/books/{book_id}");
    let response = server.put(&membership).authorization_bearer(&member).await;
    assert_eq!(response.status_code(), 403);

    let response = server
        .put(&membership)
        .authorization_bearer(&librarian)
        .await;
    assert_eq!(response.status_code(), 200);

    let response = server.get(&format!("/api/v1/libraries/{library_id}")).await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["books"].as_array().unwrap().len(), 1);
    assert_eq!(body["books"][0]["title"], "B");
}

#[tokio::test]
async fn deleting_a_library_takes_an_admin() {
    let (server, _state) = create_test_server().await;
    let (librarian, _) = register_with_role(&server, "libby", "librarian").await;

    let response = server
        .post("/api/v1/libraries")
        .authorization_bearer(&librarian)
        .json(&json!({ "name": "Doomed" }))
        .await;
    assert_eq!(response.status_code(), 201);
    let library: serde_json::Value = response.json();
    let path = format!("/api/v1/libraries/{}", library["id"].as_str().unwrap());

    let response = server.delete(&path).authorization_bearer(&librarian).await;
    assert_eq!(response.status_code(), 403);

    let admin = login_admin(&server).await;
    let response = server.delete(&path).authorization_bearer(&admin).await;
    assert_eq!(response.status_code(), 204);
}
