//! Handler results: a page payload, a rejected form, a redirect, or an HTTP error.

use axum::{
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

/// What a handler produced.
#[derive(Debug)]
pub enum Outcome<T> {
    /// `200` with the page payload.
    Page(T),
    /// `400` with the payload echoed back to the form (field errors and input).
    Rejected(T),
    Redirect(Redirect),
    Failure(Failure),
}

impl<T> From<Redirect> for Outcome<T> {
    fn from(redirect: Redirect) -> Self {
        Self::Redirect(redirect)
    }
}

impl<T> From<Failure> for Outcome<T> {
    fn from(failure: Failure) -> Self {
        Self::Failure(failure)
    }
}

impl<T: Serialize> IntoResponse for Outcome<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Page(page) => (StatusCode::OK, Json(page)).into_response(),
            Self::Rejected(page) => (StatusCode::BAD_REQUEST, Json(page)).into_response(),
            Self::Redirect(redirect) => redirect.into_response(),
            Self::Failure(failure) => failure.into_response(),
        }
    }
}

/// A `302 Found`, optionally carrying a `Set-Cookie` header.
#[derive(Debug, Clone)]
pub struct Redirect {
    location: String,
    set_cookie: Option<HeaderValue>,
}

impl Redirect {
    #[must_use]
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            set_cookie: None,
        }
    }

    #[must_use]
    pub fn with_cookie(mut self, cookie: HeaderValue) -> Self {
        self.set_cookie = Some(cookie);
        self
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    #[must_use]
    pub fn set_cookie(&self) -> Option<&HeaderValue> {
        self.set_cookie.as_ref()
    }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&self.location) {
            Ok(location) => {
                headers.insert(LOCATION, location);
            }
            Err(err) => {
                error!("Invalid redirect location {:?}: {err}", self.location);
                return Failure::internal().into_response();
            }
        }
        if let Some(cookie) = self.set_cookie {
            headers.insert(SET_COOKIE, cookie);
        }
        (StatusCode::FOUND, headers).into_response()
    }
}

#[derive(ToSchema, Serialize, Debug)]
pub struct ErrorBody {
    error: String,
}

/// Terminal HTTP error for the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    status: StatusCode,
    message: String,
}

impl Failure {
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Generic 500; details belong in the log, not the response.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_sets_location_and_cookie() {
        let response = Redirect::to("/jokes")
            .with_cookie(HeaderValue::from_static("__session=abc; Path=/"))
            .into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(LOCATION),
            Some(&HeaderValue::from_static("/jokes"))
        );
        assert_eq!(
            response.headers().get(SET_COOKIE),
            Some(&HeaderValue::from_static("__session=abc; Path=/"))
        );
    }

    #[test]
    fn redirect_without_cookie_has_no_set_cookie() {
        let response = Redirect::to("/").into_response();
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[test]
    fn outcome_status_codes() {
        let page: Outcome<&str> = Outcome::Page("ok");
        assert_eq!(page.into_response().status(), StatusCode::OK);

        let rejected: Outcome<&str> = Outcome::Rejected("bad");
        assert_eq!(rejected.into_response().status(), StatusCode::BAD_REQUEST);

        let missing: Outcome<&str> = Failure::not_found("gone").into();
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let denied: Outcome<&str> = Failure::unauthorized("no").into();
        assert_eq!(denied.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
