//! Memories Core - decision logic shared by the server and the web client
//!
//! Two pieces live here, both pure and runtime-free so they compile for
//! WASM as well as the server:
//!
//! - [`rules`]: the social-graph and ownership rules. Every mutation the
//!   API accepts is decided and computed here, with the requester identity
//!   passed in explicitly.
//! - [`feed`]: the client-side feed store that keeps the global and
//!   per-profile caches consistent after each successful mutation.

pub mod error;
pub mod feed;
pub mod rules;

pub use error::{CoreError, Result};
