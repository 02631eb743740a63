//! `GET /progress`: WebSocket push of upload progress events.
//!
//! Server-to-client only. A subscriber gets future events, never history;
//! a disconnected client simply misses whatever it missed.

use super::AppState;
use crate::events::{ProgressEvent, PROGRESS_EVENT_NAME};
use crate::ports::storage::StoragePort;
use crate::ports::transcoder::TranscoderPort;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};

pub async fn ws_handler<S, T>(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState<S, T>>>,
) -> Response
where
    S: StoragePort + 'static,
    T: TranscoderPort + 'static,
{
    let rx = state.progress.subscribe();
    ws.on_upgrade(move |socket| forward_progress(socket, rx))
}

async fn forward_progress(mut socket: WebSocket, mut rx: broadcast::Receiver<ProgressEvent>) {
    info!("progress observer connected");
    loop {
        match rx.recv().await {
            Ok(event) => {
                let envelope = json!({ "event": PROGRESS_EVENT_NAME, "data": event });
                if socket.send(Message::Text(envelope.to_string())).await.is_err() {
                    // Client went away; no delivery guarantee to uphold.
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "progress observer lagged, events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    info!("progress observer disconnected");
}
