use std::error::Error as StdError;

/// Crate-wide result type for transport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed transport errors shared by every chat adapter.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The chat service rejected a call (`ok: false` or a non-2xx status).
    #[error("{method} failed: {reason}")]
    Api { method: String, reason: String },

    /// Wrapped source error from an external dependency.
    #[error("transport operation failed: {context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn api(method: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Api {
            method: method.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn external(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::External {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
