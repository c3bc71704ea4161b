//! Username/password checks against the [`Store`].

use anyhow::Result;
use tracing::{debug, instrument};

use super::password::{hash_password_blocking, verify_password_blocking};
use crate::store::{CreateUser, Store, User};

/// Resolve `username` and check `password` against its stored hash.
///
/// Unknown usernames and wrong passwords both yield `Ok(None)`.
///
/// # Errors
/// Returns an error if the store fails or the stored hash is malformed.
#[instrument(skip(store, password))]
pub async fn login(store: &dyn Store, username: &str, password: &str) -> Result<Option<User>> {
    let Some(user) = store.find_user_by_username(username).await? else {
        debug!("no such user");
        return Ok(None);
    };

    if verify_password_blocking(password.to_string(), user.password_hash.clone()).await? {
        Ok(Some(user))
    } else {
        debug!("password mismatch");
        Ok(None)
    }
}

/// Hash `password` and persist a new user.
///
/// Callers check for an existing username first; a concurrent insert that
/// wins the race still comes back as [`CreateUser::Conflict`].
///
/// # Errors
/// Returns an error if hashing or the insert fails.
#[instrument(skip(store, password))]
pub async fn register(store: &dyn Store, username: &str, password: &str) -> Result<CreateUser> {
    let password_hash = hash_password_blocking(password.to_string()).await?;
    store.create_user(username, &password_hash).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use anyhow::anyhow;

    async fn registered(store: &MemoryStore, username: &str, password: &str) -> Result<User> {
        match register(store, username, password).await? {
            CreateUser::Created(user) => Ok(user),
            CreateUser::Conflict => Err(anyhow!("unexpected conflict for {username}")),
        }
    }

    #[tokio::test]
    async fn register_then_login_returns_same_user() -> Result<()> {
        let store = MemoryStore::new();
        for (username, password) in [("kody", "twixrox"), ("abc", "123456"), ("mañana", "pässwörd")] {
            let user = registered(&store, username, password).await?;
            let logged_in = login(&store, username, password).await?;
            assert_eq!(logged_in.map(|u| u.id), Some(user.id));
        }
        Ok(())
    }

    #[tokio::test]
    async fn stored_hash_is_not_plaintext() -> Result<()> {
        let store = MemoryStore::new();
        let user = registered(&store, "kody", "twixrox").await?;
        assert_ne!(user.password_hash, "twixrox");
        assert!(user.password_hash.starts_with("$argon2id$"));
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_fails() -> Result<()> {
        let store = MemoryStore::new();
        registered(&store, "kody", "twixrox").await?;
        for wrong in ["twixroxx", "TWIXROX", "", "twixro"] {
            assert!(login(&store, "kody", wrong).await?.is_none(), "password {wrong:?}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_fails() -> Result<()> {
        let store = MemoryStore::new();
        assert!(login(&store, "nobody", "whatever").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() -> Result<()> {
        let store = MemoryStore::new();
        registered(&store, "kody", "twixrox").await?;
        assert!(matches!(
            register(&store, "kody", "another1").await?,
            CreateUser::Conflict
        ));
        Ok(())
    }
}
