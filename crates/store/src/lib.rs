//! Persistent records for the responder: the joke catalogue with usage
//! counters and the `info` settings table holding the last-run timestamp.

pub mod error;
pub mod store;
pub mod store_memory;
pub mod store_sqlite;
pub mod types;

pub use {
    error::{Error, Result},
    store::{JokeStore, RunInfoStore},
    store_memory::InMemoryStore,
    store_sqlite::SqliteStore,
    types::{Joke, LAST_RUN_KEY, RunInfo},
};

/// Apply the store schema to `pool`.
///
/// Tables are created with `IF NOT EXISTS`, so this is safe to run against a
/// database that was populated by hand.
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .set_ignore_missing(true)
        .run(pool)
        .await?;
    Ok(())
}
