//! User types

use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: Option<String>,
    pub email: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: Option<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name,
            email: email.into(),
        }
    }
}
