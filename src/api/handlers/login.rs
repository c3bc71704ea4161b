//! `/login`: one form for both logging in and registering.

use axum::{
    extract::{Extension, Query},
    Form,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::{IntoParams, ToSchema};

use super::{safe_redirect, validate_password, validate_username, FORM_NOT_SUBMITTED};
use crate::{
    api::outcome::{Failure, Outcome},
    auth::{credentials, SessionCodec},
    store::{CreateUser, Store},
};

const BAD_CREDENTIALS: &str = "Username/Password combination is incorrect";

#[derive(Deserialize, IntoParams, Debug)]
#[into_params(parameter_in = Query)]
pub struct LoginQuery {
    /// Where to go after a successful login.
    #[serde(rename = "redirectTo")]
    redirect_to: Option<String>,
}

#[derive(ToSchema, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginPage {
    redirect_to: Option<String>,
}

#[utoipa::path(
    get,
    path = "/login",
    params(LoginQuery),
    responses(
        (status = 200, description = "Login form", body = LoginPage)
    ),
    tag = "auth"
)]
pub async fn login_page(Query(query): Query<LoginQuery>) -> Outcome<LoginPage> {
    Outcome::Page(LoginPage {
        redirect_to: query.redirect_to,
    })
}

#[derive(ToSchema, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginForm {
    /// `login` or `register`.
    login_type: Option<String>,
    username: Option<String>,
    password: Option<String>,
    redirect_to: Option<String>,
}

/// Submitted values echoed back to the form. The password is never echoed.
#[derive(ToSchema, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginFields {
    login_type: String,
    username: String,
}

#[derive(ToSchema, Serialize, Debug, Default, PartialEq, Eq)]
pub struct LoginFieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<String>,
}

impl LoginFieldErrors {
    fn any(&self) -> bool {
        self.username.is_some() || self.password.is_some()
    }
}

#[derive(ToSchema, Serialize, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginActionData {
    #[serde(skip_serializing_if = "Option::is_none")]
    form_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field_errors: Option<LoginFieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<LoginFields>,
}

impl LoginActionData {
    fn form_error(message: impl Into<String>, fields: Option<LoginFields>) -> Outcome<Self> {
        Outcome::Rejected(Self {
            form_error: Some(message.into()),
            field_errors: None,
            fields,
        })
    }
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 302, description = "Session created, redirect to `redirectTo`"),
        (status = 400, description = "Invalid form or credentials", body = LoginActionData),
        (status = 500, description = "Store failure", body = crate::api::outcome::ErrorBody)
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    codec: Extension<Arc<SessionCodec>>,
    store: Extension<Arc<dyn Store>>,
    Form(form): Form<LoginForm>,
) -> Outcome<LoginActionData> {
    let (Some(login_type), Some(username), Some(password)) =
        (form.login_type, form.username, form.password)
    else {
        return LoginActionData::form_error(FORM_NOT_SUBMITTED, None);
    };
    let redirect_to = safe_redirect(form.redirect_to.as_deref());

    let fields = LoginFields {
        login_type: login_type.clone(),
        username: username.clone(),
    };

    let field_errors = LoginFieldErrors {
        username: validate_username(&username),
        password: validate_password(&password),
    };
    if field_errors.any() {
        return Outcome::Rejected(LoginActionData {
            form_error: None,
            field_errors: Some(field_errors),
            fields: Some(fields),
        });
    }

    let user_id = match login_type.as_str() {
        "login" => match credentials::login(&**store, &username, &password).await {
            Ok(Some(user)) => user.id,
            Ok(None) => return LoginActionData::form_error(BAD_CREDENTIALS, Some(fields)),
            Err(err) => {
                error!("Failed to verify credentials: {err:#}");
                return Failure::internal().into();
            }
        },
        "register" => {
            match store.find_user_by_username(&username).await {
                Ok(None) => (),
                Ok(Some(_)) => return user_exists(&username, fields),
                Err(err) => {
                    error!("Error checking if user exists: {err:#}");
                    return Failure::internal().into();
                }
            }
            match credentials::register(&**store, &username, &password).await {
                Ok(CreateUser::Created(user)) => {
                    info!(user_id = %user.id, "registered new user");
                    user.id
                }
                Ok(CreateUser::Conflict) => return user_exists(&username, fields),
                Err(err) => {
                    error!("Error registering user: {err:#}");
                    return Failure::internal().into();
                }
            }
        }
        _ => return LoginActionData::form_error("Login type invalid", Some(fields)),
    };

    match codec.create_user_session(user_id, &redirect_to) {
        Ok(redirect) => redirect.into(),
        Err(err) => {
            error!("Failed to create session: {err:#}");
            Failure::internal().into()
        }
    }
}

fn user_exists(username: &str, fields: LoginFields) -> Outcome<LoginActionData> {
    LoginActionData::form_error(
        format!("User with username {username} already exists"),
        Some(fields),
    )
}
