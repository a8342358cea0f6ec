//! Storage layer
//!
//! Uses SQLite (embedded) instead of PostgreSQL for simplicity.
//! `MemoryStore` (DashMap) honors the same contract without a database.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
