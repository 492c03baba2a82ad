//! Todo items and their store.

pub mod id;
pub mod model;
pub mod store;

pub use id::IdScheme;
pub use model::{NewTodo, Todo};
pub use store::{Snapshot, Store};

/// Items a fresh server starts with.
pub fn seed() -> Vec<Todo> {
    vec![
        Todo::new("1", "Learn Svelte 5", false),
        Todo::new("2", "Build a todo app", false),
        Todo::new("3", "Add Socket.IO", true),
    ]
}
