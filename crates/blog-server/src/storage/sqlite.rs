//! SQLite storage (embedded, no external dependencies)

use anyhow::{Context, Result};
use async_trait::async_trait;
use blog_core::{
    BlogStore, Entity, IdProvider, Post, PostPatch, PostStore, StoreError, User, UserPatch,
    UserStore,
};
use sqlx::error::ErrorKind;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

pub struct SqliteStore {
    pool: SqlitePool,
    ids: Arc<dyn IdProvider>,
}

impl SqliteStore {
    pub async fn open(database_path: &Path, ids: Arc<dyn IdProvider>) -> Result<Self> {
        info!("Opening SQLite database at: {}", database_path.display());

        if let Some(parent) = database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!(
                    "Failed to connect to SQLite database at: {}",
                    database_path.display()
                )
            })?;

        Self::with_pool(pool, ids).await
    }

    /// Private in-memory database. The pool pins a single connection, since
    /// every SQLite connection to `:memory:` sees its own database.
    pub async fn open_in_memory(ids: Arc<dyn IdProvider>) -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::with_pool(pool, ids).await
    }

    async fn with_pool(pool: SqlitePool, ids: Arc<dyn IdProvider>) -> Result<Self> {
        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        info!("Database initialization complete");
        Ok(Self { pool, ids })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        debug!("Creating users table");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT,
                email TEXT UNIQUE
            )
            "#,
        )
        .execute(pool)
        .await?;

        debug!("Creating posts table");
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY NOT NULL,
                user_id TEXT NOT NULL
                    REFERENCES users (id) ON DELETE CASCADE ON UPDATE CASCADE,
                title TEXT NOT NULL,
                content TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_posts_user_id ON posts (user_id)")
            .execute(pool)
            .await?;

        Ok(())
    }
}

/// Constraint failures are the caller's fault; everything else is ours.
fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = matches!(
            db_err.kind(),
            ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation
        ) || db_err.message().contains("constraint failed");

        if constraint {
            return StoreError::ConstraintViolation(db_err.message().to_string());
        }
    }
    StoreError::Infrastructure(err.to_string())
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn get_user(&self, id: &str) -> blog_core::Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, name, email FROM users WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(|r| r.into()))
    }

    async fn create_user(&self, name: Option<&str>, email: &str) -> blog_core::Result<String> {
        let id = self.ids.new_id();
        debug!("Creating user {}", id);

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&id)
        .bind(name)
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(id)
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> blog_core::Result<String> {
        debug!("Updating user {}", id);

        // One statement: absent fields keep their column value, and a zero
        // row count means the user does not exist.
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?1, name), email = COALESCE(?2, email)
            WHERE id = ?3
            "#,
        )
        .bind(patch.name)
        .bind(patch.email)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Entity::User, id));
        }
        Ok(id.to_string())
    }

    async fn delete_user(&self, id: &str) -> blog_core::Result<String> {
        debug!("Deleting user {}", id);

        let result = sqlx::query(
            r#"
            DELETE FROM users WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Entity::User, id));
        }
        Ok(id.to_string())
    }
}

#[async_trait]
impl PostStore for SqliteStore {
    async fn get_post(&self, id: &str) -> blog_core::Result<Option<Post>> {
        let row: Option<PostRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, content FROM posts WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(row.map(|r| r.into()))
    }

    async fn get_all_posts(&self, user_id: &str) -> blog_core::Result<Vec<Post>> {
        let rows: Vec<PostRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, title, content FROM posts
            WHERE user_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn create_post(
        &self,
        user_id: &str,
        title: &str,
        content: &str,
    ) -> blog_core::Result<String> {
        let id = self.ids.new_id();
        debug!("Creating post {} for user {}", id, user_id);

        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, title, content)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(title)
        .bind(content)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(id)
    }

    async fn update_post(&self, id: &str, patch: PostPatch) -> blog_core::Result<String> {
        debug!("Updating post {}", id);

        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = COALESCE(?1, title), content = COALESCE(?2, content)
            WHERE id = ?3
            "#,
        )
        .bind(patch.title)
        .bind(patch.content)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Entity::Post, id));
        }
        Ok(id.to_string())
    }

    async fn delete_post(&self, id: &str) -> blog_core::Result<String> {
        debug!("Deleting post {}", id);

        let result = sqlx::query(
            r#"
            DELETE FROM posts WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(Entity::Post, id));
        }
        Ok(id.to_string())
    }
}

#[async_trait]
impl BlogStore for SqliteStore {
    async fn close(&self) {
        info!("Closing SQLite pool");
        self.pool.close().await;
    }
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: Option<String>,
    email: Option<String>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            name: r.name,
            email: r.email.unwrap_or_default(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: String,
    user_id: String,
    title: String,
    content: Option<String>,
}

impl From<PostRow> for Post {
    fn from(r: PostRow) -> Self {
        Post {
            id: r.id,
            user_id: r.user_id,
            title: r.title,
            content: r.content.unwrap_or_default(),
        }
    }
}
