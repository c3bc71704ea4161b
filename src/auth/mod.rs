//! Credentials and cookie sessions.

pub mod credentials;
pub mod password;
pub mod session;

pub use session::{CookieConfig, SessionCodec, SESSION_COOKIE_NAME};
