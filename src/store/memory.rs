//! In-memory [`Store`] used by handler and router tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CreateUser, Joke, JokeListItem, NewJoke, Store, User};

#[derive(Default)]
pub(crate) struct MemoryStore {
    users: RwLock<Vec<User>>,
    jokes: RwLock<Vec<Joke>>,
    fail_user_lookups: AtomicBool,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Make `find_user_by_id` return an error, simulating a broken database.
    pub(crate) fn fail_user_lookups(&self) {
        self.fail_user_lookups.store(true, Ordering::SeqCst);
    }

    pub(crate) async fn joke_count(&self) -> usize {
        self.jokes.read().await.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        if self.fail_user_lookups.load(Ordering::SeqCst) {
            return Err(anyhow!("simulated database failure"));
        }
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<CreateUser> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.username == username) {
            return Ok(CreateUser::Conflict);
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(CreateUser::Created(user))
    }

    async fn recent_jokes(&self, limit: i64) -> Result<Vec<JokeListItem>> {
        let jokes = self.jokes.read().await;
        let mut sorted: Vec<&Joke> = jokes.iter().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sorted
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|j| JokeListItem {
                id: j.id,
                name: j.name.clone(),
            })
            .collect())
    }

    async fn count_jokes(&self) -> Result<i64> {
        Ok(i64::try_from(self.jokes.read().await.len())?)
    }

    async fn joke_at_offset(&self, offset: i64) -> Result<Option<Joke>> {
        let jokes = self.jokes.read().await;
        Ok(usize::try_from(offset)
            .ok()
            .and_then(|index| jokes.get(index))
            .cloned())
    }

    async fn find_joke(&self, id: Uuid) -> Result<Option<Joke>> {
        let jokes = self.jokes.read().await;
        Ok(jokes.iter().find(|j| j.id == id).cloned())
    }

    async fn create_joke(&self, joke: NewJoke) -> Result<Joke> {
        let mut jokes = self.jokes.write().await;
        // Strictly increasing timestamps keep "most recent first" deterministic.
        let now = Utc::now() + Duration::milliseconds(i64::try_from(jokes.len())?);
        let joke = Joke {
            id: Uuid::new_v4(),
            name: joke.name,
            content: joke.content,
            jokester_id: joke.jokester_id,
            created_at: now,
            updated_at: now,
        };
        jokes.push(joke.clone());
        Ok(joke)
    }

    async fn delete_joke(&self, id: Uuid) -> Result<bool> {
        let mut jokes = self.jokes.write().await;
        let before = jokes.len();
        jokes.retain(|j| j.id != id);
        Ok(jokes.len() != before)
    }
}
