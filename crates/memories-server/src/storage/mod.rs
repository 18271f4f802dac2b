//! Storage layer
//!
//! SQLite (embedded) holds the two collections, users and memories, with
//! set/sequence fields stored as JSON text columns. A DashMap-based TTL
//! cache fronts hot reads.

pub mod cache;
pub mod db;

pub use cache::EntityCache;
pub use db::Database;
