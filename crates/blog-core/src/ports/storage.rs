//! Storage traits for persistence

use crate::patch::{PostPatch, UserPatch};
use crate::Result;
use async_trait::async_trait;
use blog_types::{Post, User};

/// User store
///
/// `get_user` reports a missing row as `Ok(None)`. `update_user` and
/// `delete_user` report it as `StoreError::NotFound`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: &str) -> Result<Option<User>>;
    /// Inserts a user under a freshly generated id and returns that id.
    async fn create_user(&self, name: Option<&str>, email: &str) -> Result<String>;
    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<String>;
    /// Deletes the user and, by cascade, every post they own.
    async fn delete_user(&self, id: &str) -> Result<String>;
}

/// Post store
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn get_post(&self, id: &str) -> Result<Option<Post>>;
    async fn get_all_posts(&self, user_id: &str) -> Result<Vec<Post>>;
    /// Fails with `StoreError::ConstraintViolation` when `user_id` is unknown.
    async fn create_post(&self, user_id: &str, title: &str, content: &str) -> Result<String>;
    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<String>;
    async fn delete_post(&self, id: &str) -> Result<String>;
}

/// Everything the HTTP layer needs from storage
#[async_trait]
pub trait BlogStore: UserStore + PostStore {
    /// Release connections. Called once at shutdown.
    async fn close(&self);
}
