//! Blog Core Library
//!
//! Domain ports for the blog service: storage traits, the identifier
//! capability, update patches and the storage error kinds.

// Re-export pure types from blog-types
pub use blog_types::*;

pub mod error;
pub mod ids;
pub mod patch;
pub mod ports;

pub use error::{Entity, Result, StoreError};
pub use ids::{IdProvider, UuidProvider};
pub use patch::{PostPatch, UserPatch};
pub use ports::{BlogStore, PostStore, UserStore};
