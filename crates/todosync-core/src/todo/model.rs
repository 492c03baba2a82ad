//! Todo domain models.

use serde::{Deserialize, Serialize};

/// A todo item as held by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl Todo {
    pub fn new(id: impl Into<String>, text: impl Into<String>, completed: bool) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed,
        }
    }
}

/// Payload of an add request.
///
/// Any `id` sent by a client is not part of this type and is dropped on
/// deserialization; the server always assigns its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub text: String,
    pub completed: bool,
}

impl NewTodo {
    /// An open (not completed) todo with the given text.
    pub fn open(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }

    /// Attach a server-assigned id.
    pub fn with_id(self, id: String) -> Todo {
        Todo {
            id,
            text: self.text,
            completed: self.completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_todo_ignores_client_id() {
        let json = r#"{"id":"forged","text":"X","completed":false}"#;
        let new: NewTodo = serde_json::from_str(json).unwrap();
        assert_eq!(new, NewTodo::open("X"));

        let todo = new.with_id("42".to_string());
        assert_eq!(todo.id, "42");
    }

    #[test]
    fn test_new_todo_requires_fields() {
        assert!(serde_json::from_str::<NewTodo>(r#"{"text":"X"}"#).is_err());
        assert!(serde_json::from_str::<NewTodo>(r#"{"completed":true}"#).is_err());
    }

    #[test]
    fn test_empty_text_accepted() {
        let new: NewTodo = serde_json::from_str(r#"{"text":"","completed":false}"#).unwrap();
        assert_eq!(new.text, "");
    }
}
