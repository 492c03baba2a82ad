//! todosync Core Library
//!
//! Todo item model, the revisioned in-memory store and the event protocol
//! shared by the server and its clients.

pub mod error;
pub mod protocol;
pub mod todo;

pub use error::{TodoError, TodoResult};
pub use protocol::{ClientEvent, ServerEvent};
pub use todo::{IdScheme, NewTodo, Store, Todo};
