//! Repository implementations.
//!
//! - `inmemory`: process-local presence registry and a volatile message store
//! - `sqlite`: durable message store backed by SQLite

pub mod inmemory;
pub mod sqlite;

pub use inmemory::{InMemoryMessageStore, InMemoryPresenceRepository};
pub use sqlite::SqliteMessageStore;
