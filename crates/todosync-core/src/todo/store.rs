//! Revisioned in-memory todo store.
//!
//! Every mutation builds a new item sequence and swaps it in, so a
//! [`Snapshot`] handed out earlier never changes underneath its holder.

use std::sync::Arc;

use super::model::Todo;

/// Immutable view of the store at one revision.
pub type Snapshot = Arc<[Todo]>;

/// Ordered sequence of todos. Lookup is by id equality scan.
#[derive(Debug, Clone)]
pub struct Store {
    items: Snapshot,
    revision: u64,
}

impl Store {
    /// Create a store holding `items`, at revision 0.
    pub fn new(items: Vec<Todo>) -> Self {
        Self {
            items: items.into(),
            revision: 0,
        }
    }

    /// Store holding the default seed items.
    pub fn seeded() -> Self {
        Self::new(super::seed())
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Current contents. Cheap: clones an `Arc`.
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.items)
    }

    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    /// Number of mutations applied since creation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.items.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append a todo.
    pub fn insert(&mut self, todo: Todo) {
        let next: Vec<Todo> = self
            .items
            .iter()
            .cloned()
            .chain(std::iter::once(todo))
            .collect();
        self.swap(next);
    }

    /// Replace the todo with the same id. Returns whether one matched;
    /// an unknown id leaves the contents as they were.
    pub fn replace(&mut self, todo: &Todo) -> bool {
        let mut matched = false;
        let next: Vec<Todo> = self
            .items
            .iter()
            .map(|t| {
                if t.id == todo.id {
                    matched = true;
                    todo.clone()
                } else {
                    t.clone()
                }
            })
            .collect();
        self.swap(next);
        matched
    }

    /// Remove every todo with the given id. Returns whether any was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        let next: Vec<Todo> = self.items.iter().filter(|t| t.id != id).cloned().collect();
        let removed = next.len() != before;
        self.swap(next);
        removed
    }

    /// Replace the whole contents.
    pub fn reset(&mut self, items: Vec<Todo>) {
        self.swap(items);
    }

    fn swap(&mut self, next: Vec<Todo>) {
        self.items = next.into();
        self.revision += 1;
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(store: &Store) -> Vec<&str> {
        store.items().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_seed() {
        let store = Store::seeded();
        assert_eq!(ids(&store), vec!["1", "2", "3"]);
        assert_eq!(store.revision(), 0);
        assert!(store.get("3").unwrap().completed);
    }

    #[test]
    fn test_insert_appends() {
        let mut store = Store::seeded();
        store.insert(Todo::new("4", "X", false));
        assert_eq!(ids(&store), vec!["1", "2", "3", "4"]);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut store = Store::seeded();
        assert!(store.replace(&Todo::new("2", "Ship it", true)));
        assert_eq!(ids(&store), vec!["1", "2", "3"]);
        assert_eq!(store.get("2").unwrap().text, "Ship it");
        assert!(store.get("2").unwrap().completed);
    }

    #[test]
    fn test_replace_unknown_is_noop() {
        let mut store = Store::seeded();
        let before = store.snapshot();
        assert!(!store.replace(&Todo::new("99", "ghost", true)));
        assert_eq!(&*store.snapshot(), &*before);
    }

    #[test]
    fn test_remove() {
        let mut store = Store::seeded();
        assert!(store.remove("2"));
        assert_eq!(ids(&store), vec!["1", "3"]);
        assert!(!store.remove("2"));
        assert_eq!(ids(&store), vec!["1", "3"]);
    }

    #[test]
    fn test_snapshot_is_stable_across_revisions() {
        let mut store = Store::seeded();
        let old = store.snapshot();
        store.remove("1");
        store.insert(Todo::new("5", "later", false));
        assert_eq!(old.len(), 3);
        assert_eq!(old[0].id, "1");
        assert_eq!(store.len(), 3);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn test_matches_functional_fold() {
        enum Op {
            Add(Todo),
            Update(Todo),
            Delete(&'static str),
        }

        let ops = vec![
            Op::Add(Todo::new("a", "first", false)),
            Op::Delete("1"),
            Op::Update(Todo::new("a", "first (edited)", true)),
            Op::Update(Todo::new("missing", "nope", false)),
            Op::Add(Todo::new("b", "", false)),
            Op::Delete("missing"),
            Op::Update(Todo::new("3", "Add WebSockets", false)),
        ];

        let mut store = Store::seeded();
        let mut expected = super::super::seed();
        for op in &ops {
            match op {
                Op::Add(t) => {
                    store.insert(t.clone());
                    expected.push(t.clone());
                }
                Op::Update(t) => {
                    store.replace(t);
                    expected = expected
                        .into_iter()
                        .map(|e| if e.id == t.id { t.clone() } else { e })
                        .collect();
                }
                Op::Delete(id) => {
                    store.remove(id);
                    expected.retain(|e| e.id != *id);
                }
            }
        }

        assert_eq!(store.items(), expected.as_slice());
        assert_eq!(store.revision(), ops.len() as u64);
    }
}
