//! Route handlers and the form validation they share.

pub mod health;
pub mod joke;
pub mod jokes;
pub mod login;
pub mod logout;
pub mod root;

const USERNAME_MIN_LENGTH: usize = 3;
const PASSWORD_MIN_LENGTH: usize = 6;
const JOKE_NAME_MIN_LENGTH: usize = 3;
const JOKE_CONTENT_MIN_LENGTH: usize = 10;
const DEFAULT_REDIRECT: &str = "/jokes";

/// Generic message for a form missing required fields.
pub(crate) const FORM_NOT_SUBMITTED: &str = "Form not submitted correctly.";

pub(crate) fn validate_username(username: &str) -> Option<String> {
    (username.chars().count() < USERNAME_MIN_LENGTH).then(|| {
        format!("Username needs to be at least {USERNAME_MIN_LENGTH} characters")
    })
}

pub(crate) fn validate_password(password: &str) -> Option<String> {
    (password.chars().count() < PASSWORD_MIN_LENGTH).then(|| {
        format!("Password needs to be at least {PASSWORD_MIN_LENGTH} characters")
    })
}

pub(crate) fn validate_joke_name(name: &str) -> Option<String> {
    (name.chars().count() < JOKE_NAME_MIN_LENGTH).then(|| "That joke's name is too short".to_string())
}

pub(crate) fn validate_joke_content(content: &str) -> Option<String> {
    (content.chars().count() < JOKE_CONTENT_MIN_LENGTH).then(|| "That joke is too short".to_string())
}

/// Only local absolute paths are followed after login; anything else lands on `/jokes`.
///
/// Browsers drop tabs and newlines while parsing a `Location`, so `/\t/host`
/// would become `//host`. Only visible ASCII is accepted.
pub(crate) fn safe_redirect(to: Option<&str>) -> String {
    match to.map(str::trim) {
        Some(path) if is_local_path(path) => path.to_string(),
        _ => DEFAULT_REDIRECT.to_string(),
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && path.chars().all(|c| c.is_ascii_graphic() && c != '\\')
}
