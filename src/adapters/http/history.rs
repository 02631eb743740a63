//! `GET /history`: read-only snapshot of the completed-job ledger.

use super::AppState;
use crate::domain::history::HistoryEntry;
use crate::ports::storage::StoragePort;
use crate::ports::transcoder::TranscoderPort;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

pub async fn get_history<S, T>(State(state): State<Arc<AppState<S, T>>>) -> Json<Vec<HistoryEntry>>
where
    S: StoragePort + 'static,
    T: TranscoderPort + 'static,
{
    Json(state.history.list().await)
}
