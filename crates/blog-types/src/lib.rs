//! Blog Types - Pure type definitions
//!
//! Entities and the request/response bodies exchanged over HTTP. No async
//! runtime or storage dependencies.

pub mod api;
pub mod post;
pub mod user;

pub use api::*;
pub use post::*;
pub use user::*;
