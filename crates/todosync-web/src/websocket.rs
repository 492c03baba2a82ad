//! WebSocket handler: the server end of the event channel.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use todosync_core::ClientEvent;
use tracing::{debug, warn};

use crate::state::AppState;

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscription = state.coordinator.connect().await;
    let conn = subscription.id();

    // Forward events addressed to this connection
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            let json = match event.encode() {
                Ok(json) => json,
                Err(e) => {
                    warn!(%conn, error = %e, "Failed to encode event");
                    continue;
                }
            };
            debug!(%conn, event = event.name(), "Sending event to WebSocket client");
            if sender.send(Message::Text(json.into())).await.is_err() {
                debug!(%conn, "WebSocket send failed, client disconnected");
                return;
            }
        }
        // Dropped by the coordinator; tell the client so it can resync
        let _ = sender.send(Message::Close(None)).await;
    });

    // Handle incoming requests from client
    let coordinator = state.coordinator.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match ClientEvent::decode(text.as_str()) {
                    Ok(event) => coordinator.handle(conn, event).await,
                    Err(e) => {
                        warn!(%conn, error = %e, "Dropping malformed event");
                    }
                },
                Message::Close(_) => {
                    debug!(%conn, "WebSocket client sent close frame");
                    break;
                }
                _ => {}
            }
        }
    });

    // Whichever side finishes first takes the other down with it
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.coordinator.on_disconnect(conn).await;
}
