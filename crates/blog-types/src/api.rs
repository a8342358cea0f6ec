//! HTTP request and response bodies
//!
//! Request fields default to the empty string when omitted or `null`, so a
//! missing field and an empty one are rejected the same way by [`Validate`].

use crate::{Post, User};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Request validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid request: missing required parameters")]
    MissingParameters { fields: Vec<&'static str> },
}

/// Required-field check for request bodies
pub trait Validate {
    /// Required fields paired with their current values.
    fn required(&self) -> Vec<(&'static str, &str)>;

    fn validate(&self) -> Result<(), ValidationError> {
        let fields: Vec<&'static str> = self
            .required()
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect();

        if fields.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingParameters { fields })
        }
    }
}

/// `null` decodes as the empty string.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// Users

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetUserRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserResponse {
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateUserRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteUserRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
}

// Posts

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetPostRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPostResponse {
    pub post: Option<Post>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GetAllPostsRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub user_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetAllPostsResponse {
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePostRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub user_id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePostRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeletePostRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
}

/// Body returned by every create, update and delete operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

impl IdResponse {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Validate for GetUserRequest {
    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.id.as_str())]
    }
}

impl Validate for CreateUserRequest {
    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("email", self.email.as_str())]
    }
}

impl Validate for UpdateUserRequest {
    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.id.as_str())]
    }
}

impl Validate for DeleteUserRequest {
    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.id.as_str())]
    }
}

impl Validate for GetPostRequest {
    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.id.as_str())]
    }
}

impl Validate for GetAllPostsRequest {
    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("user_id", self.user_id.as_str())]
    }
}

impl Validate for CreatePostRequest {
    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("user_id", self.user_id.as_str())]
    }
}

impl Validate for UpdatePostRequest {
    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.id.as_str())]
    }
}

impl Validate for DeletePostRequest {
    fn required(&self) -> Vec<(&'static str, &str)> {
        vec![("id", self.id.as_str())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req: UpdateUserRequest = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        assert_eq!(req.id, "abc");
        assert_eq!(req.name, "");
        assert_eq!(req.email, "");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let req: CreateUserRequest =
            serde_json::from_str(r#"{"name": null, "email": "tiny@cat.com"}"#).unwrap();
        assert_eq!(req.name, "");
        assert_eq!(req.email, "tiny@cat.com");
        assert!(req.validate().is_ok());

        let req: GetUserRequest = serde_json::from_str(r#"{"id": null}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_validation_reports_empty_required_field() {
        let req = CreateUserRequest {
            name: "tiny cat".to_string(),
            email: String::new(),
        };
        let err = req.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingParameters {
                fields: vec!["email"]
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid request: missing required parameters"
        );
    }

    #[test]
    fn test_post_requests_require_owner_or_id() {
        assert!(CreatePostRequest::default().validate().is_err());
        assert!(GetAllPostsRequest::default().validate().is_err());
        assert!(UpdatePostRequest {
            id: "p1".to_string(),
            ..Default::default()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_absent_entity_serializes_as_null() {
        let body = serde_json::to_value(GetUserResponse { user: None }).unwrap();
        assert_eq!(body, serde_json::json!({ "user": null }));

        let body = serde_json::to_value(GetAllPostsResponse::default()).unwrap();
        assert_eq!(body, serde_json::json!({ "posts": [] }));
    }
}
