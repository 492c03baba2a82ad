//! Client facade against a live server.

use futures::{SinkExt, StreamExt};
use todosync_client::{ClientError, TodoClient, TodoMirror};
use todosync_core::{ClientEvent, ServerEvent, Todo};
use todosync_web::state::AppState;
use todosync_web::ServerConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::time::{sleep, timeout, Duration};
use tokio_tungstenite::tungstenite::Message;

async fn start_server() -> (String, AppState) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(&ServerConfig::default());
    let server_state = state.clone();
    tokio::spawn(async move {
        todosync_web::serve(listener, server_state).await.unwrap();
    });
    (format!("ws://{addr}/ws"), state)
}

async fn next(rx: &mut broadcast::Receiver<ServerEvent>) -> ServerEvent {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event stream closed")
}

/// Accept one connection, answer its `getAllTodos` with `todos`, then hang up.
async fn serve_once(listener: &TcpListener, todos: Vec<Todo>) {
    let (stream, _) = listener.accept().await.unwrap();
    let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
    let frame = ws.next().await.unwrap().unwrap();
    assert_eq!(
        ClientEvent::decode(frame.to_text().unwrap()).unwrap(),
        ClientEvent::GetAllTodos
    );
    let reply = ServerEvent::InitialTodos(todos).encode().unwrap();
    ws.send(Message::text(reply)).await.unwrap();
    ws.close(None).await.unwrap();
}

async fn wait_disconnected(client: &TodoClient) {
    timeout(Duration::from_secs(2), async {
        while client.is_connected().await {
            sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("client never noticed the disconnect");
}

/// Connect and wait for the automatic snapshot.
async fn synced_client(url: &str) -> (TodoClient, broadcast::Receiver<ServerEvent>, Vec<Todo>) {
    let client = TodoClient::new(url);
    let mut rx = client.subscribe();
    client.connect().await.unwrap();
    match next(&mut rx).await {
        ServerEvent::InitialTodos(todos) => (client, rx, todos),
        other => panic!("expected initialTodos, got {other:?}"),
    }
}

#[tokio::test]
async fn test_first_connection_requests_snapshot() {
    let (url, _state) = start_server().await;
    let (client, _rx, todos) = synced_client(&url).await;
    assert!(client.is_connected().await);
    assert_eq!(todos, todosync_core::todo::seed());
}

#[tokio::test]
async fn test_single_connection_per_client() {
    let (url, state) = start_server().await;
    let (client, mut rx, _) = synced_client(&url).await;

    client.connect().await.unwrap();
    client.get_all_todos().await.unwrap();

    // Only the explicit request produces a second snapshot
    assert!(matches!(next(&mut rx).await, ServerEvent::InitialTodos(_)));
    assert!(timeout(Duration::from_millis(100), rx.recv()).await.is_err());
    assert_eq!(state.coordinator.connection_count().await, 1);
}

#[tokio::test]
async fn test_add_is_seen_by_both_clients() {
    let (url, _state) = start_server().await;
    let (alice, mut alice_rx, _) = synced_client(&url).await;
    let (_bob, mut bob_rx, _) = synced_client(&url).await;

    alice.add_todo("Write tests").await.unwrap();

    for rx in [&mut alice_rx, &mut bob_rx] {
        match next(rx).await {
            ServerEvent::TodoAdded(todo) => {
                assert_eq!(todo.text, "Write tests");
                assert!(!todo.completed);
            }
            other => panic!("expected todoAdded, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_mirror_converges_with_server() {
    let (url, state) = start_server().await;
    let (alice, _alice_rx, _) = synced_client(&url).await;
    let (bob, mut bob_rx, initial) = synced_client(&url).await;

    let mut mirror = TodoMirror::new();
    mirror.apply(&ServerEvent::InitialTodos(initial));

    alice.delete_todo("2").await.unwrap();
    alice
        .update_todo(&Todo::new("1", "Learn Rust", true))
        .await
        .unwrap();
    bob.add_todo("").await.unwrap();

    for _ in 0..3 {
        mirror.apply(&next(&mut bob_rx).await);
    }

    assert_eq!(mirror.todos(), &*state.coordinator.snapshot().await);
    assert_eq!(mirror.get("1").unwrap().text, "Learn Rust");
    assert!(mirror.get("2").is_none());
}

#[tokio::test]
async fn test_reconnects_and_resyncs_after_server_restart() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());
    let client = TodoClient::new(&url);
    let mut rx = client.subscribe();

    let first = tokio::spawn(async move {
        serve_once(&listener, Vec::new()).await;
        listener
    });
    client.connect().await.unwrap();
    assert_eq!(next(&mut rx).await, ServerEvent::InitialTodos(Vec::new()));
    let listener = first.await.unwrap();
    wait_disconnected(&client).await;

    let second = tokio::spawn(async move { serve_once(&listener, todosync_core::todo::seed()).await });
    client.delete_todo("2").await.unwrap();
    assert_eq!(
        next(&mut rx).await,
        ServerEvent::InitialTodos(todosync_core::todo::seed())
    );
    second.await.unwrap();
}

#[tokio::test]
async fn test_requests_fail_once_server_is_gone() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("ws://{}/ws", listener.local_addr().unwrap());
    let client = TodoClient::new(&url);
    let mut rx = client.subscribe();

    let server = tokio::spawn(async move { serve_once(&listener, Vec::new()).await });
    client.connect().await.unwrap();
    next(&mut rx).await;
    // The listener is dropped with the task, so nothing accepts a reconnect
    server.await.unwrap();
    wait_disconnected(&client).await;

    let res = client.add_todo("lost").await;
    assert!(matches!(res, Err(ClientError::Connect(_))), "{res:?}");
    assert!(!client.is_connected().await);
}
