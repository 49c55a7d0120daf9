use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;

use stacks_core::models::{
    Author, AuthorDetail, AuthorRequest, BookPatch, BookRequest, BookResponse, Comment,
    CommentRequest, CommentResponse, Library, LibraryDetail, LibraryRequest, Post, PostDetail,
    PostPatch, PostRequest, PostResponse, ProfileUpdate, UserResponse,
};

use utoipa::openapi::security::SecurityScheme;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::auth::__path_login_handler;
use crate::api::handlers::auth::__path_logout_handler;
use crate::api::handlers::auth::__path_profile_handler;
use crate::api::handlers::auth::__path_register_handler;
use crate::api::handlers::auth::__path_update_profile_handler;
use crate::api::handlers::authors::__path_author_detail_handler;
use crate::api::handlers::authors::__path_create_author_handler;
use crate::api::handlers::authors::__path_delete_author_handler;
use crate::api::handlers::authors::__path_list_authors_handler;
use crate::api::handlers::authors::__path_update_author_handler;
use crate::api::handlers::books::__path_book_detail_handler;
use crate::api::handlers::books::__path_create_book_handler;
use crate::api::handlers::books::__path_delete_book_handler;
use crate::api::handlers::books::__path_list_books_handler;
use crate::api::handlers::books::__path_patch_book_handler;
use crate::api::handlers::books::__path_update_book_handler;
use crate::api::handlers::comments::__path_create_comment_handler;
use crate::api::handlers::comments::__path_delete_comment_handler;
use crate::api::handlers::comments::__path_update_comment_handler;
use crate::api::handlers::health::__path_health_checker_handler;
use crate::api::handlers::info::__path_info_handler;
use crate::api::handlers::libraries::__path_add_library_book_handler;
use crate::api::handlers::libraries::__path_create_library_handler;
use crate::api::handlers::libraries::__path_delete_library_handler;
use crate::api::handlers::libraries::__path_library_detail_handler;
use crate::api::handlers::libraries::__path_list_libraries_handler;
use crate::api::handlers::libraries::__path_remove_library_book_handler;
use crate::api::handlers::libraries::__path_update_library_handler;
use crate::api::handlers::posts::__path_create_post_handler;
use crate::api::handlers::posts::__path_delete_post_handler;
use crate::api::handlers::posts::__path_list_posts_handler;
use crate::api::handlers::posts::__path_patch_post_handler;
use crate::api::handlers::posts::__path_post_detail_handler;
use crate::api::handlers::posts::__path_update_post_handler;
use crate::api::handlers::users::__path_list_users_handler;
use crate::api::handlers::users::__path_set_role_handler;

use crate::api::handlers::auth::{
    login_handler, logout_handler, profile_handler, register_handler, update_profile_handler,
};
use crate::api::handlers::authors::{
    author_detail_handler, create_author_handler, delete_author_handler, list_authors_handler,
    update_author_handler,
};
use crate::api::handlers::books::{
    book_detail_handler, create_book_handler, delete_book_handler, list_books_handler,
    patch_book_handler, update_book_handler,
};
use crate::api::handlers::comments::{
    create_comment_handler, delete_comment_handler, update_comment_handler,
};
use crate::api::handlers::health::health_checker_handler;
use crate::api::handlers::info::{info_handler, ServerInfo};
use crate::api::handlers::libraries::{
    add_library_book_handler, create_library_handler, delete_library_handler,
    library_detail_handler, list_libraries_handler, remove_library_book_handler,
    update_library_handler,
};
use crate::api::handlers::posts::{
    create_post_handler, delete_post_handler, list_posts_handler, patch_post_handler,
    post_detail_handler, update_post_handler,
};
use crate::api::handlers::users::{list_users_handler, set_role_handler, RoleChangeRequest};
use crate::app_state::SharedAppState;
use crate::services::accounts::{LoginRequest, RegisterRequest, SessionResponse};

use super::auth::auth;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_checker_handler,
        info_handler,
        register_handler,
        login_handler,
        logout_handler,
        profile_handler,
        update_profile_handler,
        list_users_handler,
        set_role_handler,
        list_authors_handler,
        author_detail_handler,
        create_author_handler,
        update_author_handler,
        delete_author_handler,
        list_books_handler,
        book_detail_handler,
        create_book_handler,
        update_book_handler,
        patch_book_handler,
        delete_book_handler,
        list_libraries_handler,
        library_detail_handler,
        create_library_handler,
        update_library_handler,
        delete_library_handler,
        add_library_book_handler,
        remove_library_book_handler,
        list_posts_handler,
        post_detail_handler,
        create_post_handler,
        update_post_handler,
        patch_post_handler,
        delete_post_handler,
        create_comment_handler,
        update_comment_handler,
        delete_comment_handler,
    ),
    components(
        schemas(
            Author, AuthorDetail, AuthorRequest, BookRequest, BookPatch, BookResponse,
            Library, LibraryDetail, LibraryRequest, Post, PostRequest, PostPatch,
            PostResponse, PostDetail, Comment, CommentRequest, CommentResponse,
            UserResponse, ProfileUpdate, RegisterRequest, LoginRequest, SessionResponse,
            RoleChangeRequest, ServerInfo
        )
    ),
    tags(
        (name = "stacks-service", description = "stacks api")
    ),
    modifiers(&SecurityAddon)
)]
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap(); // we can unwrap safely since there already is components registered.
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        )
    }
}

struct ApiDoc;

impl utoipa::OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        SecurityAddon::openapi()
    }
}

pub struct ApiRoutes;

impl ApiRoutes {
    pub fn create(state: SharedAppState) -> Router {
        let api = ApiDoc::openapi();

        // One router for everything: the identity middleware passes
        // anonymous callers through and the policy table decides per
        // operation, so there is no separate public/authenticated split.
        Router::new()
            .route("/api/v1/health", get(health_checker_handler))
            .route("/api/v1/info", get(info_handler))
            .route("/api/v1/register", post(register_handler))
            .route("/api/v1/login", post(login_handler))
            .route("/api/v1/logout", post(logout_handler))
            .route(
                "/api/v1/profile",
                get(profile_handler).put(update_profile_handler),
            )
            .route("/api/v1/users", get(list_users_handler))
            .route("/api/v1/users/{id}/role", put(set_role_handler))
            .route(
                "/api/v1/authors",
                get(list_authors_handler).post(create_author_handler),
            )
            .route(
                "/api/v1/authors/{id}",
                get(author_detail_handler)
                    .put(update_author_handler)
                    .delete(delete_author_handler),
            )
            .route(
                "/api/v1/books",
                get(list_books_handler).post(create_book_handler),
            )
            .route(
                "/api/v1/books/{id}",
                get(book_detail_handler)
                    .put(update_book_handler)
                    .patch(patch_book_handler)
                    .delete(delete_book_handler),
            )
            .route(
                "/api/v1/libraries",
                get(list_libraries_handler).post(create_library_handler),
            )
            .route(
                "/api/v1/libraries/{id}",
                get(library_detail_handler)
                    .put(update_library_handler)
                    .delete(delete_library_handler),
            )
            .route(
                "/api/v1/libraries/{id}/books/{book_id}",
                put(add_library_book_handler).delete(remove_library_book_handler),
            )
            .route(
                "/api/v1/posts",
                get(list_posts_handler).post(create_post_handler),
            )
            .route(
                "/api/v1/posts/{id}",
                get(post_detail_handler)
                    .put(update_post_handler)
                    .patch(patch_post_handler)
                    .delete(delete_post_handler),
            )
            .route("/api/v1/posts/{id}/comments", post(create_comment_handler))
            .route(
                "/api/v1/comments/{id}",
                put(update_comment_handler).delete(delete_comment_handler),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), auth))
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
            .with_state(state)
    }
}
