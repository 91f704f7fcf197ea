//! SQLite-backed store using sqlx.

use std::path::Path;

use {
    async_trait::async_trait,
    sqlx::{
        Row, SqlitePool,
        sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    },
    tracing::debug,
};

use crate::{
    Error, Result,
    store::{JokeStore, RunInfoStore},
    types::{Joke, LAST_RUN_KEY, RunInfo},
};

/// SQLite-backed persistence for jokes and run info.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open an existing database file.
    ///
    /// A missing file is an error rather than an empty database: the joke
    /// catalogue has to be provisioned before the bot starts.
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::missing_database(path));
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(false);
        let store = Self::connect(options).await?;
        debug!(path = %path.display(), "opened store");
        Ok(store)
    }

    /// Create the database file (and parent directories) if needed and apply
    /// the schema.
    pub async fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let store = Self::connect(options).await?;
        debug!(path = %path.display(), "created store");
        Ok(store)
    }

    /// Connect by URL (e.g. `sqlite::memory:`) and apply the schema.
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        crate::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    async fn connect(options: SqliteConnectOptions) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        crate::run_migrations(&pool).await?;
        Ok(Self { pool })
    }
}

fn joke_from_row(row: &sqlx::sqlite::SqliteRow) -> Joke {
    Joke {
        id: row.get("id"),
        text: row
            .try_get::<Option<String>, _>("joke")
            .ok()
            .flatten()
            .unwrap_or_default(),
        usage_count: row.get("used"),
    }
}

#[async_trait]
impl JokeStore for SqliteStore {
    async fn least_used_joke(&self) -> Result<Option<Joke>> {
        let row = sqlx::query(
            "SELECT id, joke, COALESCE(used, 0) AS used FROM jokes
             ORDER BY COALESCE(used, 0) ASC, RANDOM()
             LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(joke_from_row))
    }

    async fn increment_usage(&self, id: i64) -> Result<()> {
        let result = sqlx::query("UPDATE jokes SET used = COALESCE(used, 0) + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::JokeNotFound { id });
        }
        Ok(())
    }

    async fn add_joke(&self, text: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO jokes (joke, used) VALUES (?, 0)")
            .bind(text)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn list_jokes(&self) -> Result<Vec<Joke>> {
        let rows = sqlx::query("SELECT id, joke, COALESCE(used, 0) AS used FROM jokes ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(joke_from_row).collect())
    }
}

#[async_trait]
impl RunInfoStore for SqliteStore {
    async fn get_run_info(&self) -> Result<Option<RunInfo>> {
        let row = sqlx::query("SELECT val FROM info WHERE name = ? LIMIT 1")
            .bind(LAST_RUN_KEY)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| RunInfo {
            last_run: row
                .try_get::<Option<String>, _>("val")
                .ok()
                .flatten()
                .unwrap_or_default(),
        }))
    }

    async fn insert_run_info(&self, timestamp: &str) -> Result<()> {
        sqlx::query("INSERT INTO info (name, val) VALUES (?, ?)")
            .bind(LAST_RUN_KEY)
            .bind(timestamp)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_run_info(&self, timestamp: &str) -> Result<()> {
        sqlx::query("UPDATE info SET val = ? WHERE name = ?")
            .bind(timestamp)
            .bind(LAST_RUN_KEY)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
