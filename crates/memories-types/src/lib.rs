//! Memories Types - Pure type definitions for WASM compatibility
//!
//! This crate contains only pure data types with no async runtime dependencies,
//! making it usable from both the server and the browser (WASM) frontend.

pub mod api;
pub mod memory;
pub mod user;

pub use api::*;
pub use memory::*;
pub use user::*;
