//! Error types for blog storage

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Entity kind, used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Post,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Entity::User => write!(f, "user"),
            Entity::Post => write!(f, "post"),
        }
    }
}

/// Storage failure. Display text is returned to API callers as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} does not exist for ID: {id}")]
    NotFound { entity: Entity, id: String },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Storage error: {0}")]
    Infrastructure(String),
}

impl StoreError {
    pub fn not_found(entity: Entity, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Short machine-readable kind
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::NotFound { .. } => "not_found",
            StoreError::ConstraintViolation(_) => "constraint_violation",
            StoreError::Infrastructure(_) => "storage_error",
        }
    }
}
