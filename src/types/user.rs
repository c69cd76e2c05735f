use serde::{Deserialize, Serialize};

/// The signed-in account as returned by the auth endpoints.
///
/// Unknown fields from the server are kept in `extra` so the stored record
/// round-trips without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-side identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,

    /// Login name.
    pub username: String,

    /// Contact address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Any other fields the server sent.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Creates a user with only a username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Sets the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_round_trip() {
        let raw = r#"{"id": 3, "username": "ada", "role": "student"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(user.extra["role"], "student");
        let back: serde_json::Value = serde_json::to_value(&user).unwrap();
        assert_eq!(back["role"], "student");
        assert!(back.get("email").is_none());
    }

    #[test]
    fn builder() {
        let user = User::new("ada").with_email("ada@uni.edu");
        assert_eq!(user.email.as_deref(), Some("ada@uni.edu"));
        assert!(user.id.is_none());
    }
}
