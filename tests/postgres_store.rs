//! `PgStore` against a live PostgreSQL.
//!
//! Set `JOKES_TEST_DSN` to run; without it every test returns early.

use anyhow::{bail, Result};
use jokes::store::{CreateUser, NewJoke, PgStore, Store, User};
use sqlx::postgres::PgPoolOptions;
use std::env;
use uuid::Uuid;

const SCHEMA: &str = include_str!("../sql/schema.sql");

async fn store() -> Result<Option<PgStore>> {
    let Ok(dsn) = env::var("JOKES_TEST_DSN") else {
        return Ok(None);
    };
    let pool = PgPoolOptions::new().max_connections(2).connect(&dsn).await?;
    sqlx::raw_sql(SCHEMA).execute(&pool).await?;
    Ok(Some(PgStore::new(pool)))
}

async fn user(store: &PgStore) -> Result<User> {
    let username = format!("jokester-{}", Uuid::new_v4().simple());
    match store.create_user(&username, "unused-hash").await? {
        CreateUser::Created(user) => Ok(user),
        CreateUser::Conflict => bail!("fresh username {username} conflicted"),
    }
}

#[tokio::test]
async fn count_tracks_created_and_deleted_jokes() -> Result<()> {
    let Some(store) = store().await? else {
        return Ok(());
    };
    let owner = user(&store).await?;

    let before = store.count_jokes().await?;
    let joke = store
        .create_joke(NewJoke {
            name: "Counting".to_string(),
            content: "There are two kinds of people".to_string(),
            jokester_id: owner.id,
        })
        .await?;
    assert!(store.count_jokes().await? >= before + 1);

    assert!(store.delete_joke(joke.id).await?);
    assert!(store.find_joke(joke.id).await?.is_none());
    assert!(!store.delete_joke(joke.id).await?);
    Ok(())
}

#[tokio::test]
async fn duplicate_username_conflicts() -> Result<()> {
    let Some(store) = store().await? else {
        return Ok(());
    };
    let existing = user(&store).await?;

    let result = store.create_user(&existing.username, "other-hash").await?;
    assert!(matches!(result, CreateUser::Conflict));
    Ok(())
}
