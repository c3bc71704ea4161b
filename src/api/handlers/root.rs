use axum::response::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Debug)]
pub struct Index {
    name: String,
    version: String,
    jokes: String,
    login: String,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Application index", body = Index)
    ),
    tag = "jokes"
)]
pub async fn root() -> Json<Index> {
    Json(Index {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        jokes: "/jokes".to_string(),
        login: "/login".to_string(),
    })
}
