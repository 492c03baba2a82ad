//! Wire protocol spoken over the WebSocket.
//!
//! One event per text frame: `{"type": "<eventName>", "data": <payload>}`.

use serde::{Deserialize, Serialize};

use crate::error::{TodoError, TodoResult};
use crate::todo::{NewTodo, Todo};

/// Requests a client sends to the server.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    GetAllTodos,
    AddTodo(NewTodo),
    UpdateTodo(Todo),
    DeleteTodo(String),
}

/// Events the server sends to clients.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    /// Snapshot, sent only to the connection that asked.
    InitialTodos(Vec<Todo>),
    TodoAdded(Todo),
    TodoUpdated(Todo),
    TodoDeleted(String),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetAllTodos => "getAllTodos",
            Self::AddTodo(_) => "addTodo",
            Self::UpdateTodo(_) => "updateTodo",
            Self::DeleteTodo(_) => "deleteTodo",
        }
    }

    pub fn encode(&self) -> TodoResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse one inbound frame.
    pub fn decode(text: &str) -> TodoResult<Self> {
        serde_json::from_str(text).map_err(|e| TodoError::malformed(e.to_string()))
    }
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InitialTodos(_) => "initialTodos",
            Self::TodoAdded(_) => "todoAdded",
            Self::TodoUpdated(_) => "todoUpdated",
            Self::TodoDeleted(_) => "todoDeleted",
        }
    }

    /// Whether this event goes to every connection rather than one.
    pub fn is_broadcast(&self) -> bool {
        !matches!(self, Self::InitialTodos(_))
    }

    pub fn encode(&self) -> TodoResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(text: &str) -> TodoResult<Self> {
        serde_json::from_str(text).map_err(|e| TodoError::malformed(e.to_string()))
    }
}
