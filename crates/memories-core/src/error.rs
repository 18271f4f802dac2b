//! Error types for Memories

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    #[error("User not authorized")]
    NotAuthorized,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("You cannot follow yourself")]
    SelfFollow,

    #[error("Comment text is required")]
    EmptyComment,

    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl CoreError {
    /// True when the error is the caller's fault rather than the system's.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CoreError::Upstream(_) | CoreError::Storage(_))
    }
}
