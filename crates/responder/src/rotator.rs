use std::sync::Arc;

use {
    regina_store::{Joke, JokeStore},
    tracing::debug,
};

use crate::{Error, Result};

/// Least-used-first joke selection.
///
/// The read and the usage increment are two separate store calls. Two
/// selections racing each other can both pick the same joke before either
/// increment lands; that is accepted rather than serialised.
pub struct JokeRotator {
    store: Arc<dyn JokeStore>,
}

impl JokeRotator {
    pub fn new(store: Arc<dyn JokeStore>) -> Self {
        Self { store }
    }

    /// Pick a joke with the minimum usage count and bump its count by one.
    ///
    /// The joke is only returned once the increment has succeeded.
    pub async fn select_and_mark(&self) -> Result<Joke> {
        let joke = self.store.least_used_joke().await?.ok_or(Error::NoJokes)?;
        self.store.increment_usage(joke.id).await?;
        debug!(joke_id = joke.id, usage = joke.usage_count + 1, "joke selected");
        Ok(joke)
    }
}
