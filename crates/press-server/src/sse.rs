use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::extract::{Path, State};
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use futures::stream::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use press_core::event::EventId;

use crate::error::AppError;
use crate::state::{AppState, ConnectionGuard, ScoreUpdate};

/// GET /api/v1/events/{event_id}/stream: live score updates for one event.
pub async fn score_stream(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, AppError> {
    if state.store.read().await.event(&event_id).is_none() {
        return Err(AppError::NotFound(format!("Event {event_id} not found")));
    }

    let max_sse = state.config.limits.max_sse_subscribers;
    let current = state.sse_subscriber_count.load(Ordering::Relaxed);
    if current >= max_sse {
        tracing::warn!(current, max = max_sse, "SSE subscriber limit reached");
        return Err(AppError::Unavailable(
            "Too many live score subscribers".to_string(),
        ));
    }

    let guard = ConnectionGuard::new(Arc::clone(&state.sse_subscriber_count));
    let rx = state.score_updates.subscribe();
    tracing::debug!(%event_id, "SSE subscriber connected");

    let stream = BroadcastStream::new(rx).filter_map(move |result: Result<ScoreUpdate, _>| {
        let _guard = &guard;
        match result {
            Ok(update) if update.event_id == event_id => {
                let json = serde_json::to_string(&update).unwrap_or_default();
                Some(Ok(SseEvent::default().event("score").data(json)))
            },
            Ok(_) => None,
            Err(e) => {
                tracing::warn!("SSE broadcast receive error: {e}");
                None
            },
        }
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
