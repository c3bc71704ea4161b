//! # Jokes
//!
//! `jokes` is a small content-sharing service: users register, log in, post
//! short jokes, browse them, and delete the ones they own.
//!
//! ## Sessions
//!
//! A session is a single `userId` carried in the `__session` cookie. The value
//! is signed with HMAC-SHA256 using the `SESSION_SECRET` provided at startup, so
//! any tampering is detected and treated as "no session". There is no
//! server-side session table.
//!
//! ## Credentials
//!
//! Passwords are hashed with Argon2id and only the PHC string is stored.
//!
//! ## Handlers
//!
//! Handlers return JSON page payloads or redirects. Owner-only actions compare
//! the session user with the joke's `jokester_id` and answer `401` on mismatch.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
