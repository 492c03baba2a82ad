//! Broadcast coordinator.
//!
//! Sole owner of the todo store and of the registry of connected clients.
//! Each request is applied and its resulting event queued to every recipient
//! while the lock is held, so every connection sees events in the order the
//! mutations were applied.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;
use todosync_core::todo::Snapshot;
use todosync_core::{ClientEvent, IdScheme, NewTodo, ServerEvent, Store, Todo};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Identifies one connected client for the lifetime of its connection.
pub type ConnectionId = Uuid;

type Outbox = mpsc::Sender<Arc<ServerEvent>>;

/// Who an event is addressed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Target {
    All,
    Only(ConnectionId),
}

/// One connection's queue of outbound events.
pub struct Subscription {
    id: ConnectionId,
    rx: mpsc::Receiver<Arc<ServerEvent>>,
}

impl Subscription {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Next event addressed to this connection.
    ///
    /// `None` once the coordinator has let go of this connection, either
    /// because it disconnected or because it fell a full queue behind. The
    /// connection should then be closed so the client resynchronizes.
    pub async fn recv(&mut self) -> Option<Arc<ServerEvent>> {
        self.rx.recv().await
    }
}

struct Inner {
    store: Store,
    connections: HashMap<ConnectionId, Outbox>,
}

impl Inner {
    fn deliver(&mut self, target: Target, event: ServerEvent) {
        let event = Arc::new(event);
        match target {
            Target::Only(conn) => {
                let keep = match self.connections.get(&conn) {
                    Some(outbox) => offer(conn, outbox, event),
                    None => return,
                };
                if !keep {
                    self.connections.remove(&conn);
                }
            }
            Target::All => {
                self.connections
                    .retain(|conn, outbox| offer(*conn, outbox, Arc::clone(&event)));
            }
        }
    }
}

/// Queue an event without waiting. Returns false when the connection has to
/// be dropped from the registry.
fn offer(conn: ConnectionId, outbox: &Outbox, event: Arc<ServerEvent>) -> bool {
    match outbox.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            warn!(%conn, "Connection fell behind, disconnecting it");
            false
        }
        Err(TrySendError::Closed(_)) => {
            debug!(%conn, "Connection already gone");
            false
        }
    }
}

/// Applies client requests to the store and fans out the results.
pub struct Coordinator {
    inner: Mutex<Inner>,
    id_scheme: IdScheme,
    capacity: usize,
}

impl Coordinator {
    /// `capacity` is how many events each connection may have queued before
    /// it counts as too slow and is disconnected.
    pub fn new(store: Store, id_scheme: IdScheme, capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                store,
                connections: HashMap::new(),
            }),
            id_scheme,
            capacity: capacity.max(1),
        }
    }

    /// Register a new connection. Events published after this call are
    /// visible through the returned subscription.
    pub async fn connect(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.capacity);
        let id = Uuid::new_v4();
        let mut inner = self.inner.lock().await;
        inner.connections.insert(id, tx);
        info!(conn = %id, connections = inner.connections.len(), "Client connected");
        Subscription { id, rx }
    }

    /// Forget the connection. The store is not touched.
    pub async fn on_disconnect(&self, conn: ConnectionId) {
        let mut inner = self.inner.lock().await;
        inner.connections.remove(&conn);
        info!(%conn, connections = inner.connections.len(), "Client disconnected");
    }

    /// Number of registered connections.
    pub async fn connection_count(&self) -> usize {
        self.inner.lock().await.connections.len()
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.inner.lock().await.store.snapshot()
    }

    pub async fn revision(&self) -> u64 {
        self.inner.lock().await.store.revision()
    }

    /// Dispatch one inbound request.
    pub async fn handle(&self, conn: ConnectionId, event: ClientEvent) {
        debug!(%conn, event = event.name(), "Handling client event");
        match event {
            ClientEvent::GetAllTodos => self.request_all_items(conn).await,
            ClientEvent::AddTodo(new) => self.request_add(new).await,
            ClientEvent::UpdateTodo(todo) => self.request_update(todo).await,
            ClientEvent::DeleteTodo(id) => self.request_delete(id).await,
        }
    }

    /// Send the current snapshot to `conn` only.
    pub async fn request_all_items(&self, conn: ConnectionId) {
        let mut inner = self.inner.lock().await;
        let todos = inner.store.snapshot().to_vec();
        debug!(%conn, count = todos.len(), "Sending snapshot");
        inner.deliver(Target::Only(conn), ServerEvent::InitialTodos(todos));
    }

    /// Create a todo with a fresh id and broadcast it.
    pub async fn request_add(&self, new: NewTodo) {
        let mut inner = self.inner.lock().await;
        let todo = new.with_id(self.id_scheme.generate());
        if inner.store.contains(&todo.id) {
            warn!(id = %todo.id, "Generated id collides with an existing todo");
        }
        inner.store.insert(todo.clone());
        debug!(id = %todo.id, revision = inner.store.revision(), "Todo added");
        inner.deliver(Target::All, ServerEvent::TodoAdded(todo));
    }

    /// Replace the todo with the same id, then broadcast the supplied
    /// todo whether or not it matched anything.
    pub async fn request_update(&self, todo: Todo) {
        let mut inner = self.inner.lock().await;
        let matched = inner.store.replace(&todo);
        debug!(id = %todo.id, matched, revision = inner.store.revision(), "Todo updated");
        inner.deliver(Target::All, ServerEvent::TodoUpdated(todo));
    }

    /// Remove the todo with this id, then broadcast the id whether or not
    /// it was present.
    pub async fn request_delete(&self, id: String) {
        let mut inner = self.inner.lock().await;
        let removed = inner.store.remove(&id);
        debug!(%id, removed, revision = inner.store.revision(), "Todo deleted");
        inner.deliver(Target::All, ServerEvent::TodoDeleted(id));
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new(
            Store::seeded(),
            IdScheme::default(),
            crate::config::DEFAULT_BROADCAST_CAPACITY,
        )
    }
}
