//! Inbound HTTP adapter: upload ingress, history snapshot, progress socket.

use crate::application::pipeline::PipelineService;
use crate::domain::history::HistoryLedger;
use crate::events::hub::ProgressHub;
use crate::ports::storage::StoragePort;
use crate::ports::transcoder::TranscoderPort;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;

pub mod history;
pub mod progress;
pub mod upload;

/// Everything the handlers need, shared behind one `Arc`.
pub struct AppState<S, T> {
    pub pipeline: PipelineService<S, T>,
    pub history: Arc<HistoryLedger>,
    pub progress: Arc<ProgressHub>,
    pub upload_root: PathBuf,
}

pub fn router<S, T>(state: Arc<AppState<S, T>>) -> Router
where
    S: StoragePort + 'static,
    T: TranscoderPort + 'static,
{
    Router::new()
        .route("/upload", post(upload::upload_media::<S, T>))
        .route("/history", get(history::get_history::<S, T>))
        .route("/progress", get(progress::ws_handler::<S, T>))
        // Slack above the per-file cap for the multipart framing and the
        // two text fields; the real limit is enforced per file.
        .layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES as usize + 64 * 1024))
        .with_state(state)
}
