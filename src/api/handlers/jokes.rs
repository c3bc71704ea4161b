//! `/jokes` listing, random pick, and the new-joke form.

use axum::{
    extract::Extension,
    http::{HeaderMap, Uri},
    Form,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;

use super::{validate_joke_content, validate_joke_name, FORM_NOT_SUBMITTED};
use crate::{
    api::outcome::{Failure, Outcome, Redirect},
    auth::SessionCodec,
    store::{Joke, JokeListItem, NewJoke, Store, UserSummary},
};

/// How many jokes the listing shows.
const RECENT_JOKES: i64 = 5;

#[derive(ToSchema, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JokesPage {
    user: Option<UserSummary>,
    joke_list_items: Vec<JokeListItem>,
}

#[utoipa::path(
    get,
    path = "/jokes",
    responses(
        (status = 200, description = "Current user and most recent jokes", body = JokesPage),
        (status = 302, description = "Session user lookup failed, forced logout")
    ),
    tag = "jokes"
)]
#[instrument(skip_all)]
pub async fn jokes(
    headers: HeaderMap,
    codec: Extension<Arc<SessionCodec>>,
    store: Extension<Arc<dyn Store>>,
) -> Outcome<JokesPage> {
    let user = match codec.get_user(&headers, &**store).await {
        Ok(user) => user,
        Err(logout) => return logout.into(),
    };

    match store.recent_jokes(RECENT_JOKES).await {
        Ok(joke_list_items) => Outcome::Page(JokesPage {
            user: user.as_ref().map(UserSummary::from),
            joke_list_items,
        }),
        Err(err) => {
            error!("Failed to list jokes: {err:#}");
            Failure::internal().into()
        }
    }
}

#[derive(ToSchema, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RandomJokePage {
    random_joke: Joke,
}

#[utoipa::path(
    get,
    path = "/jokes/random",
    responses(
        (status = 200, description = "A random joke", body = RandomJokePage),
        (status = 404, description = "There are no jokes", body = crate::api::outcome::ErrorBody)
    ),
    tag = "jokes"
)]
pub async fn random_joke(store: Extension<Arc<dyn Store>>) -> Outcome<RandomJokePage> {
    let count = match store.count_jokes().await {
        Ok(count) => count,
        Err(err) => {
            error!("Failed to count jokes: {err:#}");
            return Failure::internal().into();
        }
    };
    if count < 1 {
        return Failure::not_found("Random joke not found").into();
    }

    let offset = rand::thread_rng().gen_range(0..count);
    match store.joke_at_offset(offset).await {
        Ok(Some(random_joke)) => Outcome::Page(RandomJokePage { random_joke }),
        // deleted between COUNT and OFFSET
        Ok(None) => Failure::not_found("Random joke not found").into(),
        Err(err) => {
            error!("Failed to fetch random joke: {err:#}");
            Failure::internal().into()
        }
    }
}

#[derive(ToSchema, Serialize, Debug, Default)]
pub struct NewJokePage {}

#[utoipa::path(
    get,
    path = "/jokes/new",
    responses(
        (status = 200, description = "New joke form", body = NewJokePage),
        (status = 401, description = "Not logged in", body = crate::api::outcome::ErrorBody)
    ),
    tag = "jokes"
)]
pub async fn new_joke_page(
    headers: HeaderMap,
    codec: Extension<Arc<SessionCodec>>,
) -> Outcome<NewJokePage> {
    if codec.get_user_id(&headers).is_none() {
        return Failure::unauthorized("Unauthorized").into();
    }
    Outcome::Page(NewJokePage::default())
}

#[derive(ToSchema, Deserialize)]
pub struct NewJokeForm {
    name: Option<String>,
    content: Option<String>,
}

#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct NewJokeFields {
    name: String,
    content: String,
}

#[derive(ToSchema, Serialize, Debug, Default, PartialEq, Eq)]
pub struct NewJokeFieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

#[derive(ToSchema, Serialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewJokeActionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    form_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<NewJokeFieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<NewJokeFields>,
}

#[utoipa::path(
    post,
    path = "/jokes/new",
    request_body(content = NewJokeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Joke created, redirect to it; or not logged in, redirect to /login"),
        (status = 400, description = "Invalid form", body = NewJokeActionData)
    ),
    tag = "jokes"
)]
#[instrument(skip_all)]
pub async fn create_joke(
    uri: Uri,
    headers: HeaderMap,
    codec: Extension<Arc<SessionCodec>>,
    store: Extension<Arc<dyn Store>>,
    Form(form): Form<NewJokeForm>,
) -> Outcome<NewJokeActionData> {
    let jokester_id = match codec.require_user_id(&headers, uri.path()) {
        Ok(user_id) => user_id,
        Err(login) => return login.into(),
    };

    let (Some(name), Some(content)) = (form.name, form.content) else {
        return Outcome::Rejected(NewJokeActionData {
            form_error: Some(FORM_NOT_SUBMITTED.to_string()),
            ..NewJokeActionData::default()
        });
    };

    let field_errors = NewJokeFieldErrors {
        name: validate_joke_name(&name),
        content: validate_joke_content(&content),
    };
    if field_errors.name.is_some() || field_errors.content.is_some() {
        return Outcome::Rejected(NewJokeActionData {
            form_error: None,
            field_errors: Some(field_errors),
            fields: Some(NewJokeFields { name, content }),
        });
    }

    match store
        .create_joke(NewJoke {
            name,
            content,
            jokester_id,
        })
        .await
    {
        Ok(joke) => {
            info!(joke_id = %joke.id, "created joke");
            Redirect::to(format!("/jokes/{}", joke.id)).into()
        }
        Err(err) => {
            error!("Failed to create joke: {err:#}");
            Failure::internal().into()
        }
    }
}
