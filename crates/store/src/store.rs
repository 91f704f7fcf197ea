//! Persistence traits consumed by the responder.

use async_trait::async_trait;

use crate::{
    Result,
    types::{Joke, RunInfo},
};

/// Joke catalogue access.
///
/// `least_used_joke` and `increment_usage` are separate calls; callers must
/// not assume the pair is atomic.
#[async_trait]
pub trait JokeStore: Send + Sync {
    /// One joke with the lowest usage count, ties broken at random.
    async fn least_used_joke(&self) -> Result<Option<Joke>>;
    async fn increment_usage(&self, id: i64) -> Result<()>;
    async fn add_joke(&self, text: &str) -> Result<i64>;
    /// All jokes ordered by id.
    async fn list_jokes(&self) -> Result<Vec<Joke>>;
}

/// Access to the last-run settings row.
#[async_trait]
pub trait RunInfoStore: Send + Sync {
    async fn get_run_info(&self) -> Result<Option<RunInfo>>;
    async fn insert_run_info(&self, timestamp: &str) -> Result<()>;
    async fn update_run_info(&self, timestamp: &str) -> Result<()>;
}
