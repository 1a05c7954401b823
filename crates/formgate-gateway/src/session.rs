//! Per-connection session lifecycle: receive loop, routing, teardown

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use formgate_core::{FormStore, SubmitPolicy, ToolDispatcher};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, warn};

use crate::protocol::{Inbound, Outbound, classify};
use crate::registry::{Broadcaster, ConnectionId, ConnectionRegistry, Session};

/// Drive one WebSocket connection from accept to close.
///
/// The session registers itself, processes inbound messages strictly
/// in receipt order, and deregisters exactly once on any receive,
/// parse, or send failure. A fault here never touches other sessions.
pub async fn run(
    socket: WebSocket,
    registry: Arc<ConnectionRegistry>,
    submit_policy: SubmitPolicy,
) {
    let id = ConnectionId::new();
    let store = Arc::new(RwLock::new(FormStore::with_policy(submit_policy)));
    let dispatcher = ToolDispatcher::new(Arc::clone(&store));
    let broadcaster = Broadcaster::new(Arc::clone(&registry));

    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<String>();
    registry
        .insert(Arc::new(Session::new(id.clone(), outbound_tx.clone(), store)))
        .await;
    info!(connection_id = %id, "connection open");

    let (mut ws_tx, mut ws_rx) = socket.split();

    // Writer half: drain the queue in order, replies before any
    // broadcasts that followed them.
    let writer_id = id.clone();
    let writer = tokio::spawn(async move {
        while let Some(text) = outbound_rx.recv().await {
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                debug!(connection_id = %writer_id, "writer closed");
                break;
            }
        }
    });

    // Reader half: one message at a time, no reordering.
    while let Some(Ok(message)) = ws_rx.next().await {
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            // Control frames are transport-level noise here
            _ => continue,
        };

        let payload: serde_json::Value = match serde_json::from_str(text.as_str()) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(connection_id = %id, error = %err, "unparseable payload, closing session");
                break;
            }
        };

        let mut broadcast_form = None;
        let reply = match classify(payload) {
            Inbound::Ping => serde_json::to_string(&Outbound::Pong),
            Inbound::ToolCall { tool, args } => {
                let envelope = dispatcher.dispatch(&tool, &args).await;
                broadcast_form = envelope.form.clone();
                serde_json::to_string(&envelope)
            }
            Inbound::Other(original) => serde_json::to_string(&Outbound::Echo { data: original }),
        };
        let reply = match reply {
            Ok(reply) => reply,
            Err(err) => {
                warn!(connection_id = %id, error = %err, "reply serialization failed");
                break;
            }
        };
        if outbound_tx.send(reply).is_err() {
            break;
        }
        // State-changing dispatches fan out after the direct reply
        if let Some(form) = broadcast_form {
            broadcaster.form_update(&form).await;
        }
    }

    registry.remove(&id).await;
    drop(outbound_tx);
    writer.abort();
    info!(connection_id = %id, "connection closed");
}
