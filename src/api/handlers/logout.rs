use axum::extract::Extension;
use std::sync::Arc;

use crate::{api::outcome::Redirect, auth::SessionCodec};

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 302, description = "Session cleared, redirect to /login")
    ),
    tag = "auth"
)]
pub async fn logout(codec: Extension<Arc<SessionCodec>>) -> Redirect {
    // Always clear the cookie, even if there was no valid session.
    codec.logout()
}

#[utoipa::path(
    get,
    path = "/logout",
    responses(
        (status = 302, description = "Logging out requires POST; redirect to /")
    ),
    tag = "auth"
)]
pub async fn logout_page() -> Redirect {
    Redirect::to("/")
}
