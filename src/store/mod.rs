//! Persistence seam for users and jokes.
//!
//! Handlers only see the [`Store`] trait; production wiring uses
//! [`PgStore`] on top of a `sqlx` pool.

#[cfg(test)]
pub(crate) mod memory;
pub mod models;
pub mod postgres;

pub use models::{CreateUser, Joke, JokeListItem, NewJoke, User, UserSummary};
pub use postgres::PgStore;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait Store: Send + Sync {
    /// Round-trip to the backing database.
    async fn ping(&self) -> Result<()>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Insert a user; a taken username yields [`CreateUser::Conflict`].
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<CreateUser>;

    /// Most recently created jokes first.
    async fn recent_jokes(&self, limit: i64) -> Result<Vec<JokeListItem>>;

    async fn count_jokes(&self) -> Result<i64>;

    /// Joke at `offset` in a stable ordering, used for random picks.
    async fn joke_at_offset(&self, offset: i64) -> Result<Option<Joke>>;

    async fn find_joke(&self, id: Uuid) -> Result<Option<Joke>>;

    async fn create_joke(&self, joke: NewJoke) -> Result<Joke>;

    /// Returns `false` when no row matched.
    async fn delete_joke(&self, id: Uuid) -> Result<bool>;
}
