use serde::{Deserialize, Serialize};

/// A user record as stored in the document store.
///
/// This job only reads users; it never creates, updates, or deletes them.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct User {
    /// The stable document id of the user.
    pub id: String,
    /// Optional display name; logging falls back to the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    /// Display name for diagnostics, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(User::new("u1").display_name(), "u1");
        assert_eq!(User::with_name("u1", "Alice").display_name(), "Alice");
    }
}
