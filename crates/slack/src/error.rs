use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Channel(#[from] regina_channels::Error),

    /// Slack answered with `ok: false`.
    #[error("{method} failed: {reason}")]
    Api { method: String, reason: String },
}

impl Error {
    #[must_use]
    pub fn api(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Api {
            method: method.into(),
            reason: reason.into(),
        }
    }
}

impl From<Error> for regina_channels::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Channel(inner) => inner,
            Error::Api { method, reason } => Self::api(method, reason),
            other => Self::external("slack", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
