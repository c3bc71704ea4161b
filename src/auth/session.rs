//! Signed cookie sessions.
//!
//! The session holds one field, `userId`. The cookie value is
//! `<payload>.<signature>`: `payload` is base64url(JSON) and `signature` is
//! base64url(HMAC-SHA256(secret, payload)), both unpadded. A value that fails
//! to decode or verify is indistinguishable from a missing cookie.

use anyhow::{anyhow, Context, Result};
use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, error};
use url::form_urlencoded;
use uuid::Uuid;

use crate::api::outcome::Redirect;
use crate::store::{Store, User};

pub const SESSION_COOKIE_NAME: &str = "__session";
pub const DEFAULT_MAX_AGE_SECONDS: i64 = 60;
const LOGIN_PATH: &str = "/login";

type HmacSha256 = Hmac<Sha256>;

#[derive(Serialize, Deserialize)]
struct SessionData {
    #[serde(rename = "userId")]
    user_id: String,
}

/// Cookie attributes shared by every `Set-Cookie` the codec emits.
#[derive(Clone, Debug)]
pub struct CookieConfig {
    max_age_seconds: i64,
    secure: bool,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            max_age_seconds: DEFAULT_MAX_AGE_SECONDS,
            secure: false,
        }
    }
}

impl CookieConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_age_seconds(mut self, seconds: i64) -> Self {
        self.max_age_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    #[must_use]
    pub fn max_age_seconds(&self) -> i64 {
        self.max_age_seconds
    }

    #[must_use]
    pub fn secure(&self) -> bool {
        self.secure
    }
}

/// Encodes, verifies and clears the session cookie.
///
/// Built once at startup from the configured secret and shared with handlers.
#[derive(Clone)]
pub struct SessionCodec {
    secret: SecretString,
    cookie: CookieConfig,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("secret", &"***")
            .field("cookie", &self.cookie)
            .finish()
    }
}

impl SessionCodec {
    /// # Errors
    /// Returns an error if the secret is empty.
    pub fn new(secret: SecretString, cookie: CookieConfig) -> Result<Self> {
        if secret.expose_secret().is_empty() {
            return Err(anyhow!("session secret must not be empty"));
        }
        Ok(Self { secret, cookie })
    }

    #[must_use]
    pub fn cookie_config(&self) -> &CookieConfig {
        &self.cookie
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .context("failed to initialize session HMAC")
    }

    /// Signed cookie value carrying `user_id`.
    ///
    /// # Errors
    /// Returns an error if the payload cannot be serialized or signed.
    pub fn encode(&self, user_id: Uuid) -> Result<String> {
        let data = SessionData {
            user_id: user_id.to_string(),
        };
        let json = serde_json::to_vec(&data).context("failed to serialize session")?;
        let payload = Base64UrlUnpadded::encode_string(&json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    /// Verify a cookie value and return its user id.
    #[must_use]
    pub fn decode(&self, value: &str) -> Option<Uuid> {
        let (payload, signature) = value.rsplit_once('.')?;
        let signature = Base64UrlUnpadded::decode_vec(signature).ok()?;

        let mut mac = self.mac().ok()?;
        mac.update(payload.as_bytes());
        if mac.verify_slice(&signature).is_err() {
            debug!("session cookie signature mismatch");
            return None;
        }

        let json = Base64UrlUnpadded::decode_vec(payload).ok()?;
        let data: SessionData = serde_json::from_slice(&json).ok()?;
        Uuid::parse_str(&data.user_id).ok()
    }

    /// `Set-Cookie` value establishing a session for `user_id`.
    ///
    /// # Errors
    /// Returns an error if the cookie cannot be encoded.
    pub fn commit_cookie(&self, user_id: Uuid) -> Result<HeaderValue> {
        let value = self.encode(user_id)?;
        let mut cookie = format!(
            "{SESSION_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie.max_age_seconds
        );
        if self.cookie.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).context("failed to build session cookie")
    }

    /// `Set-Cookie` value that expires the session immediately.
    ///
    /// # Errors
    /// Returns an error if the header value is invalid.
    pub fn destroy_cookie(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let mut cookie =
            format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
        if self.cookie.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
    }

    /// Start a session for `user_id` and redirect to `redirect_to`.
    ///
    /// # Errors
    /// Returns an error if the session cookie cannot be built.
    pub fn create_user_session(&self, user_id: Uuid, redirect_to: &str) -> Result<Redirect> {
        let cookie = self.commit_cookie(user_id)?;
        Ok(Redirect::to(redirect_to).with_cookie(cookie))
    }

    /// The session user id, or `None` when the cookie is missing or invalid.
    #[must_use]
    pub fn get_user_id(&self, headers: &HeaderMap) -> Option<Uuid> {
        extract_session_cookie(headers).and_then(|value| self.decode(&value))
    }

    /// Like [`Self::get_user_id`], but short-circuits to the login page,
    /// remembering `redirect_to` as the return target.
    ///
    /// # Errors
    /// Returns the login redirect when there is no valid session.
    pub fn require_user_id(&self, headers: &HeaderMap, redirect_to: &str) -> Result<Uuid, Redirect> {
        self.get_user_id(headers)
            .ok_or_else(|| Redirect::to(login_path(redirect_to)))
    }

    /// Load the session's user record.
    ///
    /// A store failure forces a logout instead of surfacing the error.
    ///
    /// # Errors
    /// Returns the logout redirect when the user lookup fails.
    pub async fn get_user(&self, headers: &HeaderMap, store: &dyn Store) -> Result<Option<User>, Redirect> {
        let Some(user_id) = self.get_user_id(headers) else {
            return Ok(None);
        };
        match store.find_user_by_id(user_id).await {
            Ok(user) => Ok(user),
            Err(err) => {
                error!("Failed to lookup session user {user_id}: {err:#}");
                Err(self.logout())
            }
        }
    }

    /// Destroy the session and send the client to the login page.
    #[must_use]
    pub fn logout(&self) -> Redirect {
        let redirect = Redirect::to(LOGIN_PATH);
        match self.destroy_cookie() {
            Ok(cookie) => redirect.with_cookie(cookie),
            Err(err) => {
                error!("Failed to build session clearing cookie: {err}");
                redirect
            }
        }
    }
}

/// `/login?redirectTo=<redirect_to>` with the target form-encoded.
#[must_use]
pub fn login_path(redirect_to: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirectTo", redirect_to)
        .finish();
    format!("{LOGIN_PATH}?{query}")
}

fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                continue;
            };
            if key.trim() == SESSION_COOKIE_NAME {
                return Some(val.trim().to_string());
            }
        }
    }
    None
}
