//! Local, non-authoritative view of the server's todo list.

use todosync_core::{ServerEvent, Store, Todo};

/// Folds server events into a list a UI can render.
#[derive(Debug, Clone)]
pub struct TodoMirror {
    store: Store,
    synced: bool,
}

impl TodoMirror {
    pub fn new() -> Self {
        Self {
            store: Store::empty(),
            synced: false,
        }
    }

    /// Apply one event from the server.
    pub fn apply(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::InitialTodos(todos) => {
                self.store.reset(todos.clone());
                self.synced = true;
            }
            // A snapshot can already contain an item whose add is still in flight
            ServerEvent::TodoAdded(todo) => {
                if !self.store.contains(&todo.id) {
                    self.store.insert(todo.clone());
                }
            }
            ServerEvent::TodoUpdated(todo) => {
                self.store.replace(todo);
            }
            ServerEvent::TodoDeleted(id) => {
                self.store.remove(id);
            }
        }
    }

    pub fn todos(&self) -> &[Todo] {
        self.store.items()
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.store.get(id)
    }

    /// Whether a snapshot has been received yet.
    pub fn is_synced(&self) -> bool {
        self.synced
    }
}

impl Default for TodoMirror {
    fn default() -> Self {
        Self::new()
    }
}
