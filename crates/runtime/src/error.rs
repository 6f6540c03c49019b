use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A directory the render pipeline needs could not be created. This is a
    /// host configuration problem (permissions, missing data dir), not a
    /// render failure.
    #[error("cannot provision render directory {path}: {source}")]
    Provisioning {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{message}")]
    Message { message: String },
}

impl Error {
    #[must_use]
    pub fn provisioning(path: &Path, source: std::io::Error) -> Self {
        Self::Provisioning {
            path: path.to_path_buf(),
            source,
        }
    }

    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }

    /// True for failures the host has to fix before any render can succeed.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Provisioning { .. })
    }
}

impl herald_common::FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message { message }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

herald_common::impl_context!();
