use super::handlers::{health, joke, jokes, login, logout, root};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        login::login_page,
        login::login,
        logout::logout,
        logout::logout_page,
        jokes::jokes,
        jokes::random_joke,
        jokes::new_joke_page,
        jokes::create_joke,
        joke::joke,
        joke::joke_action,
    ),
    tags(
        (name = "jokes", description = "Browse, post and delete jokes"),
        (name = "auth", description = "Login, registration and logout"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

/// The `OpenAPI` document for every served route.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
