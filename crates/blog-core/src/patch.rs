//! Partial updates
//!
//! `None` leaves a column untouched. The wire format cannot express "set to
//! empty", so `from_wire` treats an empty string as "no change".

fn present(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Fields of a user to overwrite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserPatch {
    pub fn from_wire(name: String, email: String) -> Self {
        Self {
            name: present(name),
            email: present(email),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }
}

/// Fields of a post to overwrite
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostPatch {
    pub fn from_wire(title: String, content: String) -> Self {
        Self {
            title: present(title),
            content: present(content),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_wire_fields_mean_no_change() {
        let patch = UserPatch::from_wire(String::new(), "new@cat.com".to_string());
        assert_eq!(patch.name, None);
        assert_eq!(patch.email.as_deref(), Some("new@cat.com"));
        assert!(!patch.is_empty());

        assert!(PostPatch::from_wire(String::new(), String::new()).is_empty());
    }
}
