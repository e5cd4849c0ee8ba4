use thiserror::Error;

use crate::ripple::storage::StorageError;

pub type Result<T> = core::result::Result<T, RippleError>;

#[derive(Error, Debug)]
pub enum RippleError {
    #[error("Failed to initialize Ripple")]
    Initialization,

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("Logging setup error: {0}")]
    LoggingSetup(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Bad input; rejected before any local state was touched.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or invalid credential; action aborted before mutation.
    #[error("Auth error: {0}")]
    Auth(String),

    /// A domain precondition failed (self-reaction, duplicate pending action).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response or a non-success envelope code with a server message.
    #[error("Server error ({code}): {message}")]
    Server { code: i64, message: String },

    /// Response shape did not match any known envelope after all fallbacks.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("No authenticated user")]
    NotLoggedIn,

    #[error("Unknown reaction type: {0}")]
    UnknownReactionType(i64),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl RippleError {
    /// True for errors that occur at or after the network boundary and must
    /// trigger a rollback when they follow an optimistic apply.
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            RippleError::Transport(_) | RippleError::Server { .. } | RippleError::Decode(_)
        )
    }
}
