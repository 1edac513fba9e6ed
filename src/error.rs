//! Unified SDK error types.

use crate::shared::Username;
use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Network tree error: {0}")]
    Network(#[from] NetworkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,
}

impl HttpError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, HttpError::NotFound(_))
    }
}

/// Errors raised while assembling a placement tree.
///
/// Only root-level failures surface here. A failed lookup below the root is
/// absorbed into a [`Truncation`](crate::domain::network::Truncation) on the
/// assembled tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Please enter a username.")]
    EmptyUsername,

    #[error("Member not found: {username} ({reason})")]
    MemberNotFound { username: Username, reason: String },

    #[error("Placement cycle detected at {username}")]
    CycleDetected { username: Username },

    #[error("Tree assembly for {username} was cancelled")]
    Cancelled { username: Username },
}

impl NetworkError {
    /// Message shown on the tree screens for a failed load.
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::EmptyUsername => "Please enter a username.",
            NetworkError::MemberNotFound { .. } => "User not found!",
            NetworkError::CycleDetected { .. } | NetworkError::Cancelled { .. } => {
                "Something went wrong."
            }
        }
    }
}

/// Durable client storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O failed for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage payload for key {key} could not be encoded: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
