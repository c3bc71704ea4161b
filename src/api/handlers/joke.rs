//! `/jokes/{joke_id}`: view a joke, and delete it when you own it.

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, Uri},
    Form,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    api::outcome::{Failure, Outcome, Redirect},
    auth::SessionCodec,
    store::{Joke, Store},
};

#[derive(ToSchema, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JokePage {
    joke: Joke,
    is_owner: bool,
}

#[utoipa::path(
    get,
    path = "/jokes/{joke_id}",
    params(
        ("joke_id" = String, Path, description = "Joke id")
    ),
    responses(
        (status = 200, description = "The joke, and whether the session user owns it", body = JokePage),
        (status = 404, description = "Joke not found", body = crate::api::outcome::ErrorBody)
    ),
    tag = "jokes"
)]
#[instrument(skip(headers, codec, store))]
pub async fn joke(
    Path(joke_id): Path<String>,
    headers: HeaderMap,
    codec: Extension<Arc<SessionCodec>>,
    store: Extension<Arc<dyn Store>>,
) -> Outcome<JokePage> {
    let user_id = codec.get_user_id(&headers);

    match find_joke(&**store, &joke_id).await {
        Ok(Some(joke)) => {
            let is_owner = user_id == Some(joke.jokester_id);
            Outcome::Page(JokePage { joke, is_owner })
        }
        Ok(None) => Failure::not_found("Joke not found").into(),
        Err(failure) => failure.into(),
    }
}

#[derive(ToSchema, Deserialize)]
pub struct JokeActionForm {
    /// Only `delete` is supported.
    #[serde(rename = "_method")]
    method: Option<String>,
}

#[utoipa::path(
    post,
    path = "/jokes/{joke_id}",
    params(
        ("joke_id" = String, Path, description = "Joke id")
    ),
    request_body(content = JokeActionForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Deleted, redirect to /jokes; or not logged in, redirect to /login"),
        (status = 400, description = "Unsupported action", body = crate::api::outcome::ErrorBody),
        (status = 401, description = "Session user is not the author", body = crate::api::outcome::ErrorBody),
        (status = 404, description = "Joke not found", body = crate::api::outcome::ErrorBody)
    ),
    tag = "jokes"
)]
#[instrument(skip(uri, headers, codec, store, form))]
pub async fn joke_action(
    Path(joke_id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
    codec: Extension<Arc<SessionCodec>>,
    store: Extension<Arc<dyn Store>>,
    Form(form): Form<JokeActionForm>,
) -> Outcome<()> {
    if form.method.as_deref() != Some("delete") {
        return Failure::bad_request(format!(
            "Unsupported action: {}",
            form.method.as_deref().unwrap_or_default()
        ))
        .into();
    }

    let user_id = match codec.require_user_id(&headers, uri.path()) {
        Ok(user_id) => user_id,
        Err(login) => return login.into(),
    };

    let joke = match find_joke(&**store, &joke_id).await {
        Ok(Some(joke)) => joke,
        Ok(None) => return Failure::not_found("Joke was not found").into(),
        Err(failure) => return failure.into(),
    };

    if joke.jokester_id != user_id {
        warn!(%user_id, "delete attempted by non-owner");
        return Failure::unauthorized("You are not the author of the joke").into();
    }

    match store.delete_joke(joke.id).await {
        Ok(_) => {
            info!(joke_id = %joke.id, "deleted joke");
            Redirect::to("/jokes").into()
        }
        Err(err) => {
            error!("Failed to delete joke: {err:#}");
            Failure::internal().into()
        }
    }
}

/// Malformed ids cannot name a joke, so they read as "not found".
async fn find_joke(store: &dyn Store, joke_id: &str) -> Result<Option<Joke>, Failure> {
    let Ok(id) = Uuid::parse_str(joke_id) else {
        return Ok(None);
    };
    store.find_joke(id).await.map_err(|err| {
        error!("Failed to lookup joke: {err:#}");
        Failure::internal()
    })
}
