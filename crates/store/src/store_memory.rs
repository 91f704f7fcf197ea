//! In-memory store for testing.

use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use {async_trait::async_trait, rand::seq::IndexedRandom};

use crate::{
    Error, Result,
    store::{JokeStore, RunInfoStore},
    types::{Joke, RunInfo},
};

/// In-memory store backed by `Vec`. No persistence, tests only.
///
/// Counts run-info writes so callers can assert how often the last-run row
/// was touched. Reads and writes can be switched to fail.
#[derive(Default)]
pub struct InMemoryStore {
    jokes: Mutex<Vec<Joke>>,
    run_info: Mutex<Option<RunInfo>>,
    run_info_inserts: AtomicUsize,
    run_info_updates: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the catalogue with unused jokes, ids starting at 1.
    pub fn with_jokes<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let jokes = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Joke {
                id: i as i64 + 1,
                text: text.into(),
                usage_count: 0,
            })
            .collect();
        Self {
            jokes: Mutex::new(jokes),
            ..Self::default()
        }
    }

    /// Seed an existing last-run row.
    #[must_use]
    pub fn with_run_info(self, last_run: impl Into<String>) -> Self {
        *self.run_info.lock().unwrap_or_else(|e| e.into_inner()) = Some(RunInfo {
            last_run: last_run.into(),
        });
        self
    }

    /// Make `least_used_joke`, `list_jokes` and `get_run_info` fail.
    #[must_use]
    pub fn failing_reads(self) -> Self {
        self.fail_reads.store(true, Ordering::SeqCst);
        self
    }

    /// Make every mutation fail without changing state.
    #[must_use]
    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::message("read failed: store unavailable"));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::message("write failed: store is read-only"));
        }
        Ok(())
    }

    pub fn run_info_inserts(&self) -> usize {
        self.run_info_inserts.load(Ordering::SeqCst)
    }

    pub fn run_info_updates(&self) -> usize {
        self.run_info_updates.load(Ordering::SeqCst)
    }

    pub fn usage_of(&self, id: i64) -> Option<i64> {
        let jokes = self.jokes.lock().unwrap_or_else(|e| e.into_inner());
        jokes.iter().find(|j| j.id == id).map(|j| j.usage_count)
    }
}

#[async_trait]
impl JokeStore for InMemoryStore {
    async fn least_used_joke(&self) -> Result<Option<Joke>> {
        self.check_read()?;
        let jokes = self.jokes.lock().unwrap_or_else(|e| e.into_inner());
        let Some(min) = jokes.iter().map(|j| j.usage_count).min() else {
            return Ok(None);
        };
        let candidates: Vec<&Joke> = jokes.iter().filter(|j| j.usage_count == min).collect();
        Ok(candidates.choose(&mut rand::rng()).map(|j| (*j).clone()))
    }

    async fn increment_usage(&self, id: i64) -> Result<()> {
        self.check_write()?;
        let mut jokes = self.jokes.lock().unwrap_or_else(|e| e.into_inner());
        let joke = jokes
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or(Error::JokeNotFound { id })?;
        joke.usage_count += 1;
        Ok(())
    }

    async fn add_joke(&self, text: &str) -> Result<i64> {
        self.check_write()?;
        let mut jokes = self.jokes.lock().unwrap_or_else(|e| e.into_inner());
        let id = jokes.iter().map(|j| j.id).max().unwrap_or(0) + 1;
        jokes.push(Joke {
            id,
            text: text.to_string(),
            usage_count: 0,
        });
        Ok(id)
    }

    async fn list_jokes(&self) -> Result<Vec<Joke>> {
        self.check_read()?;
        let mut jokes = self.jokes.lock().unwrap_or_else(|e| e.into_inner()).clone();
        jokes.sort_by_key(|j| j.id);
        Ok(jokes)
    }
}

#[async_trait]
impl RunInfoStore for InMemoryStore {
    async fn get_run_info(&self) -> Result<Option<RunInfo>> {
        self.check_read()?;
        Ok(self
            .run_info
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    async fn insert_run_info(&self, timestamp: &str) -> Result<()> {
        self.check_write()?;
        let mut row = self.run_info.lock().unwrap_or_else(|e| e.into_inner());
        if row.is_some() {
            return Err(Error::message("UNIQUE constraint failed: info.name"));
        }
        *row = Some(RunInfo {
            last_run: timestamp.to_string(),
        });
        self.run_info_inserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update_run_info(&self, timestamp: &str) -> Result<()> {
        self.check_write()?;
        let mut row = self.run_info.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(info) = row.as_mut() {
            info.last_run = timestamp.to_string();
        }
        self.run_info_updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
