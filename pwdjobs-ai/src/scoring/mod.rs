//! Scoring orchestrators
//!
//! Each flow validates input, scores locally where it can, asks the model for
//! the rest, falls back when the model is unavailable, then persists the
//! result and queues it for workspace sync. Persistence and sync never affect
//! the response.

pub mod challenge;
pub mod fallback;
pub mod quiz;
pub mod roadmap;
pub mod skill_gap;

use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use tracing::warn;

use crate::services::SyncRecord;
use crate::AppState;

/// Await a database write; log and remember a failure instead of returning it
pub(crate) async fn persist_best_effort<F>(state: &AppState, what: &str, write: F)
where
    F: Future<Output = pwdjobs_common::Result<()>>,
{
    if let Err(e) = write.await {
        warn!(what, error = %e, "Failed to persist result; response unaffected");
        *state.last_error.write().await = Some(format!("persist {}: {}", what, e));
    }
}

/// Queue a result for workspace sync
pub(crate) fn enqueue_sync<T: Serialize>(
    state: &AppState,
    kind: &str,
    user_id: Option<String>,
    reference_id: impl ToString,
    result: &T,
) {
    let payload = serde_json::to_value(result).unwrap_or(Value::Null);
    state
        .sync
        .enqueue(SyncRecord::new(kind, user_id, reference_id, payload));
}
