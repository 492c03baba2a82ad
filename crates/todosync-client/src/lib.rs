//! todosync Client
//!
//! Facade over one WebSocket connection to the todo server. Requests are
//! fire-and-forget; results come back as [`ServerEvent`]s on
//! [`TodoClient::subscribe`].

mod connection;
pub mod error;
pub mod mirror;

use std::sync::OnceLock;

use todosync_core::{ClientEvent, NewTodo, ServerEvent, Todo};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};

use connection::Connection;
pub use error::{ClientError, ClientResult};
pub use mirror::TodoMirror;

/// Server URL when `TODOSYNC_URL` is not set.
pub const DEFAULT_URL: &str = "ws://localhost:3001/ws";

const EVENT_CAPACITY: usize = 256;

/// Client for the todo server.
///
/// Connects lazily on first use and then keeps that single connection. If
/// the connection drops, the next request opens a new one. Every time a
/// connection is opened the client asks for the full list, so a subscriber
/// sees `initialTodos` first and again after each reconnect.
pub struct TodoClient {
    url: String,
    conn: Mutex<Option<Connection>>,
    events: broadcast::Sender<ServerEvent>,
}

impl TodoClient {
    pub fn new(url: impl Into<String>) -> Self {
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self {
            url: url.into(),
            conn: Mutex::new(None),
            events,
        }
    }

    /// Client pointed at `TODOSYNC_URL`, or [`DEFAULT_URL`].
    pub fn from_env() -> Self {
        let url = std::env::var("TODOSYNC_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        debug!(url = %url, "TodoClient configured from environment");
        Self::new(url)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Stream of events from the server. Subscribe before the first
    /// request to be sure of seeing the initial snapshot.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.events.subscribe()
    }

    pub async fn is_connected(&self) -> bool {
        self.conn
            .lock()
            .await
            .as_ref()
            .is_some_and(Connection::is_connected)
    }

    /// Establish the connection now instead of on the first request.
    /// Reconnects if the previous connection was lost.
    pub async fn connect(&self) -> ClientResult<()> {
        let mut slot = self.conn.lock().await;
        self.live(&mut slot).await?;
        Ok(())
    }

    /// The open connection in `slot`, opening a new one if there is none
    /// or the old one has dropped.
    async fn live<'a>(&self, slot: &'a mut Option<Connection>) -> ClientResult<&'a Connection> {
        tokio::runtime::Handle::try_current().map_err(|_| ClientError::NoRuntime)?;
        if !slot.as_ref().is_some_and(Connection::is_connected) {
            if slot.is_some() {
                info!(url = %self.url, "Reconnecting to todo server");
            }
            let conn = Connection::open(&self.url, self.events.clone()).await?;
            conn.emit(&ClientEvent::GetAllTodos)?;
            *slot = Some(conn);
        }
        slot.as_ref().ok_or(ClientError::Disconnected)
    }

    async fn emit(&self, event: ClientEvent) -> ClientResult<()> {
        let mut slot = self.conn.lock().await;
        let conn = self.live(&mut slot).await?;
        conn.emit(&event)
    }

    /// Ask the server to create an open todo with this text.
    pub async fn add_todo(&self, text: impl Into<String>) -> ClientResult<()> {
        self.emit(ClientEvent::AddTodo(NewTodo::open(text))).await
    }

    /// Ask the server to replace the todo with `todo.id`.
    pub async fn update_todo(&self, todo: &Todo) -> ClientResult<()> {
        self.emit(ClientEvent::UpdateTodo(todo.clone())).await
    }

    pub async fn delete_todo(&self, id: impl Into<String>) -> ClientResult<()> {
        self.emit(ClientEvent::DeleteTodo(id.into())).await
    }

    /// Ask for a fresh snapshot, delivered as `initialTodos`.
    pub async fn get_all_todos(&self) -> ClientResult<()> {
        self.emit(ClientEvent::GetAllTodos).await
    }
}

static SHARED: OnceLock<TodoClient> = OnceLock::new();

/// The process-wide client, configured from the environment on first use.
pub fn shared() -> &'static TodoClient {
    SHARED.get_or_init(TodoClient::from_env)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fails_fast_outside_runtime() {
        let client = TodoClient::new("ws://127.0.0.1:9/ws");
        let res = futures::executor::block_on(client.add_todo("offline"));
        assert!(matches!(res, Err(ClientError::NoRuntime)));
        assert!(!futures::executor::block_on(client.is_connected()));
    }

    #[test]
    fn test_shared_is_a_singleton() {
        assert!(std::ptr::eq(shared(), shared()));
        assert!(shared().url().starts_with("ws"));
    }

    #[tokio::test]
    async fn test_connect_error_is_reported() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = TodoClient::new(format!("ws://127.0.0.1:{port}/ws"));
        let res = client.get_all_todos().await;
        assert!(matches!(res, Err(ClientError::Connect(_))));
        assert!(!client.is_connected().await);
    }
}
