//! Client end of the event channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use todosync_core::{ClientEvent, ServerEvent};
use tokio::sync::{broadcast, mpsc};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

/// A live WebSocket connection with its reader and writer tasks.
pub(crate) struct Connection {
    outgoing: mpsc::UnboundedSender<String>,
    connected: Arc<AtomicBool>,
}

impl Connection {
    /// Connect and spawn the I/O tasks. Inbound events are published on
    /// `events`.
    pub(crate) async fn open(
        url: &str,
        events: broadcast::Sender<ServerEvent>,
    ) -> ClientResult<Self> {
        let (ws, _) = tokio_tungstenite::connect_async(url).await?;
        let (mut writer, mut reader) = ws.split();
        info!(url = %url, "Connected to todo server");

        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        let connected = Arc::new(AtomicBool::new(true));

        // Writer task: forward outgoing frames to the socket
        let writer_task = tokio::spawn(async move {
            while let Some(json) = out_rx.recv().await {
                if let Err(e) = writer.send(Message::text(json)).await {
                    debug!(error = %e, "WebSocket send failed");
                    break;
                }
            }
            let _ = writer.close().await;
        });

        // Reader task: decode frames and hand them to subscribers
        let flag = connected.clone();
        let writer_abort = writer_task.abort_handle();
        tokio::spawn(async move {
            while let Some(msg) = reader.next().await {
                match msg {
                    Ok(Message::Text(text)) => match ServerEvent::decode(text.as_str()) {
                        Ok(event) => {
                            debug!(event = event.name(), "Received event");
                            // No subscribers is fine
                            let _ = events.send(event);
                        }
                        Err(e) => warn!(error = %e, "Ignoring malformed server event"),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        debug!(error = %e, "WebSocket read failed");
                        break;
                    }
                }
            }
            flag.store(false, Ordering::SeqCst);
            writer_abort.abort();
            info!("Disconnected from todo server");
        });

        Ok(Self {
            outgoing: out_tx,
            connected,
        })
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Queue one event for sending. Fire-and-forget: success means the
    /// event was handed to the writer, not that the server applied it.
    pub(crate) fn emit(&self, event: &ClientEvent) -> ClientResult<()> {
        if !self.is_connected() {
            return Err(ClientError::Disconnected);
        }
        let json = event.encode()?;
        debug!(event = event.name(), "Emitting event");
        self.outgoing
            .send(json)
            .map_err(|_| ClientError::Disconnected)
    }
}
