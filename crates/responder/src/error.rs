use thiserror::Error;

/// Faults raised while answering an event.
///
/// None of these ever reach the chat: the dispatcher logs them and drops the
/// event.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] regina_store::Error),

    #[error(transparent)]
    Channel(#[from] regina_channels::Error),

    #[error("link relay request failed: {0}")]
    Relay(#[from] reqwest::Error),

    #[error("unknown channel id {id}")]
    UnknownChannel { id: String },

    #[error("unknown user id {id}")]
    UnknownUser { id: String },

    #[error("the joke table is empty")]
    NoJokes,

    #[error("no channel available to post to")]
    NoChannel,
}

impl Error {
    #[must_use]
    pub fn unknown_channel(id: impl Into<String>) -> Self {
        Self::UnknownChannel { id: id.into() }
    }

    #[must_use]
    pub fn unknown_user(id: impl Into<String>) -> Self {
        Self::UnknownUser { id: id.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
