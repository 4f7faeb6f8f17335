//! WebSocket connection handlers.
//!
//! Each socket is split into a reader that forwards frames to the gateway and
//! a writer (`pusher_loop`) that drains the connection's outbound channel.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::ui::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and writes them to the socket.
///
/// The task ends when the channel closes (the gateway released the connection)
/// or when a write fails.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = match state.gateway.connect(tx).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Rejecting WebSocket connection: {}", e);
            return;
        }
    };

    let (sender, mut receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);

    let gateway = state.gateway.clone();
    let reader_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", reader_id, e);
                    break;
                }
            };

            let forwarded = match msg {
                Message::Text(text) => gateway.inbound(reader_id.clone(), text.to_string()),
                Message::Binary(_) => gateway.reject(
                    reader_id.clone(),
                    "binary frames are not supported".to_string(),
                ),
                Message::Close(_) => {
                    tracing::debug!("Connection '{}' requested close", reader_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => Ok(()),
            };
            if forwarded.is_err() {
                break;
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = state.gateway.disconnect(connection_id.clone()) {
        tracing::debug!("Could not report disconnect of '{}': {}", connection_id, e);
    }
}
