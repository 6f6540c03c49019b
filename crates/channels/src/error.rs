use std::error::Error as StdError;

/// Crate-wide result type for reply delivery.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed delivery errors shared by every [`ReplyChannel`](crate::ReplyChannel).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The payload cannot be sent on this channel (too large, wrong kind).
    #[error("invalid reply payload: {message}")]
    InvalidPayload { message: String },

    /// The conversation can no longer be replied to.
    #[error("reply channel unavailable: {message}")]
    Unavailable { message: String },

    /// Wrapped source error from the adapter's transport.
    #[error("reply delivery failed: {context}: {source}")]
    External {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// JSON (de)serialization failed.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn invalid_payload(message: impl std::fmt::Display) -> Self {
        Self::InvalidPayload {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
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
