//! In-memory store using DashMap (same contract as SQLite, no database)
//!
//! Lock order is `emails` -> `users` -> `posts`; no guard on a later map is
//! held while acquiring an earlier one.

use async_trait::async_trait;
use blog_core::{
    BlogStore, Entity, IdProvider, Post, PostPatch, PostStore, Result, StoreError, User,
    UserPatch, UserStore,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

pub struct MemoryStore {
    users: DashMap<String, User>,
    /// email -> owning user id, enforces uniqueness
    emails: DashMap<String, String>,
    posts: DashMap<String, PostEntry>,
    next_seq: AtomicU64,
    ids: Arc<dyn IdProvider>,
}

struct PostEntry {
    seq: u64,
    post: Post,
}

impl MemoryStore {
    pub fn new(ids: Arc<dyn IdProvider>) -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            posts: DashMap::new(),
            next_seq: AtomicU64::new(0),
            ids,
        }
    }
}

fn duplicate(column: &str) -> StoreError {
    StoreError::ConstraintViolation(format!("UNIQUE constraint failed: {}", column))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.get(id).map(|user| user.clone()))
    }

    async fn create_user(&self, name: Option<&str>, email: &str) -> Result<String> {
        let id = self.ids.new_id();
        debug!("Creating user {}", id);

        match self.emails.entry(email.to_string()) {
            Entry::Occupied(_) => Err(duplicate("users.email")),
            Entry::Vacant(email_slot) => match self.users.entry(id.clone()) {
                Entry::Occupied(_) => Err(duplicate("users.id")),
                Entry::Vacant(user_slot) => {
                    user_slot.insert(User::new(id.clone(), name.map(str::to_string), email));
                    email_slot.insert(id.clone());
                    Ok(id)
                }
            },
        }
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<String> {
        debug!("Updating user {}", id);

        // Lock the target address first (emails -> users), then decide under
        // the user's guard. A slot already owned by this user is a no-op.
        let email_slot = match patch.email {
            Some(email) => match self.emails.entry(email) {
                Entry::Occupied(owner) if owner.get() != id => {
                    return Err(duplicate("users.email"))
                }
                slot => Some(slot),
            },
            None => None,
        };

        let mut released_email = None;
        {
            let mut user = self
                .users
                .get_mut(id)
                .ok_or_else(|| StoreError::not_found(Entity::User, id))?;
            if let Some(Entry::Vacant(slot)) = email_slot {
                let email = slot.key().clone();
                released_email = Some(std::mem::replace(&mut user.email, email));
                slot.insert(id.to_string());
            }
            if let Some(name) = patch.name {
                user.name = Some(name);
            }
        }

        if let Some(old) = released_email {
            self.emails.remove_if(&old, |_, owner| owner == id);
        }
        Ok(id.to_string())
    }

    async fn delete_user(&self, id: &str) -> Result<String> {
        debug!("Deleting user {}", id);

        let (_, user) = self
            .users
            .remove(id)
            .ok_or_else(|| StoreError::not_found(Entity::User, id))?;
        self.emails.remove_if(&user.email, |_, owner| owner == id);

        // Cascade
        self.posts.retain(|_, entry| entry.post.user_id != id);

        Ok(id.to_string())
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn get_post(&self, id: &str) -> Result<Option<Post>> {
        Ok(self.posts.get(id).map(|entry| entry.post.clone()))
    }

    async fn get_all_posts(&self, user_id: &str) -> Result<Vec<Post>> {
        let mut entries: Vec<(u64, Post)> = self
            .posts
            .iter()
            .filter(|entry| entry.post.user_id == user_id)
            .map(|entry| (entry.seq, entry.post.clone()))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);

        Ok(entries.into_iter().map(|(_, post)| post).collect())
    }

    async fn create_post(&self, user_id: &str, title: &str, content: &str) -> Result<String> {
        let id = self.ids.new_id();
        debug!("Creating post {} for user {}", id, user_id);

        // Holding the owner's guard keeps a concurrent delete_user from
        // running its cascade before this post is visible.
        let _owner = self.users.get(user_id).ok_or_else(|| {
            StoreError::ConstraintViolation("FOREIGN KEY constraint failed".to_string())
        })?;

        match self.posts.entry(id.clone()) {
            Entry::Occupied(_) => Err(duplicate("posts.id")),
            Entry::Vacant(slot) => {
                slot.insert(PostEntry {
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    post: Post {
                        id: id.clone(),
                        user_id: user_id.to_string(),
                        title: title.to_string(),
                        content: content.to_string(),
                    },
                });
                Ok(id)
            }
        }
    }

    async fn update_post(&self, id: &str, patch: PostPatch) -> Result<String> {
        debug!("Updating post {}", id);

        let mut entry = self
            .posts
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(Entity::Post, id))?;
        if let Some(title) = patch.title {
            entry.post.title = title;
        }
        if let Some(content) = patch.content {
            entry.post.content = content;
        }

        Ok(id.to_string())
    }

    async fn delete_post(&self, id: &str) -> Result<String> {
        debug!("Deleting post {}", id);

        self.posts
            .remove(id)
            .map(|_| id.to_string())
            .ok_or_else(|| StoreError::not_found(Entity::Post, id))
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn close(&self) {
        self.posts.clear();
        self.users.clear();
        self.emails.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubIds;

    #[tokio::test]
    async fn test_email_moves_with_update() {
        let store = MemoryStore::new(Arc::new(StubIds::new(["u-1", "u-2"])));
        store.create_user(None, "old@cat.com").await.unwrap();

        store
            .update_user("u-1", UserPatch::from_wire(String::new(), "new@cat.com".into()))
            .await
            .unwrap();

        // The old address is free again, the new one is taken.
        store.create_user(None, "old@cat.com").await.unwrap();
        let err = store
            .update_user("u-2", UserPatch::from_wire(String::new(), "new@cat.com".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_update_to_own_email_is_allowed() {
        let store = MemoryStore::new(Arc::new(StubIds::new(["u-1"])));
        store.create_user(Some("cat"), "cat@cat.com").await.unwrap();

        store
            .update_user(
                "u-1",
                UserPatch::from_wire("kitten".into(), "cat@cat.com".into()),
            )
            .await
            .unwrap();

        let user = store.get_user("u-1").await.unwrap().unwrap();
        assert_eq!(user.name.as_deref(), Some("kitten"));
        assert_eq!(user.email, "cat@cat.com");
    }

    #[tokio::test]
    async fn test_email_can_move_back_to_released_address() {
        let store = MemoryStore::new(Arc::new(StubIds::new(["u-1", "u-2"])));
        store.create_user(None, "a@cat.com").await.unwrap();

        for email in ["b@cat.com", "b@cat.com", "a@cat.com"] {
            store
                .update_user("u-1", UserPatch::from_wire(String::new(), email.into()))
                .await
                .unwrap();
        }

        let user = store.get_user("u-1").await.unwrap().unwrap();
        assert_eq!(user.email, "a@cat.com");

        // b@ was released by the last update; a@ is held again.
        store.create_user(None, "b@cat.com").await.unwrap();
        let err = store
            .update_user("u-2", UserPatch::from_wire(String::new(), "a@cat.com".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_update_missing_user_releases_nothing() {
        let store = MemoryStore::new(Arc::new(StubIds::new(["u-1"])));
        let err = store
            .update_user("ghost", UserPatch::from_wire(String::new(), "x@cat.com".into()))
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::not_found(Entity::User, "ghost"));

        // The address was never claimed.
        store.create_user(None, "x@cat.com").await.unwrap();
    }

    #[tokio::test]
    async fn test_posts_listed_in_insertion_order() {
        let store = MemoryStore::new(Arc::new(StubIds::new(["u-1", "p-b", "p-a", "p-c"])));
        store.create_user(None, "cat@cat.com").await.unwrap();
        for title in ["first", "second", "third"] {
            store.create_post("u-1", title, "").await.unwrap();
        }

        let titles: Vec<String> = store
            .get_all_posts("u-1")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }
}
