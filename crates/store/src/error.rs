use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("database path \"{}\" does not exist or is not readable", path.display())]
    MissingDatabase { path: PathBuf },

    #[error("joke not found: {id}")]
    JokeNotFound { id: i64 },

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn missing_database(path: impl Into<PathBuf>) -> Self {
        Self::MissingDatabase { path: path.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
