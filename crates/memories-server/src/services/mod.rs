//! Business logic services
//!
//! Services fetch the affected state, run the pure rules from
//! `memories-core`, and persist the outcome. The requester identity is a
//! parameter of every mutating call.

pub mod auth;
pub mod memories;
pub mod social;

pub use auth::AuthService;
pub use memories::MemoryService;
pub use social::SocialService;

use memories_core::CoreError;

/// Content-store failures all surface as storage errors; details go to the
/// log, not the client.
pub(crate) fn storage_err<E: std::fmt::Display>(err: E) -> CoreError {
    tracing::error!("Storage operation failed: {}", err);
    CoreError::Storage(err.to_string())
}
