use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::{RwLock, broadcast};

use press_core::event::EventId;
use press_core::game::{GameId, HoleNumber};
use press_core::player::PlayerId;
use press_core::store::PressStore;

use crate::auth::AuthConfig;
use crate::config::ServerConfig;

pub type SharedStore = Arc<RwLock<PressStore>>;

/// Pushed to SSE subscribers whenever a score is recorded.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreUpdate {
    pub event_id: EventId,
    pub player_id: PlayerId,
    pub hole: HoleNumber,
    pub strokes: i32,
    pub previous_strokes: Option<i32>,
    /// Presses opened by this score.
    pub presses: Vec<GameId>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub auth: AuthConfig,
    pub score_updates: broadcast::Sender<ScoreUpdate>,
    pub sse_subscriber_count: Arc<AtomicUsize>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let mut store = PressStore::in_memory();
        if config.mock_mode {
            match press_core::demo::seed(&mut store) {
                Ok(event_id) => tracing::info!(%event_id, "Mock mode enabled"),
                Err(e) => tracing::error!("Failed to seed demo data: {e}"),
            }
        }
        let (score_updates, _) = broadcast::channel(config.limits.broadcast_capacity.max(1));
        Self {
            store: Arc::new(RwLock::new(store)),
            auth: AuthConfig {
                bearer_token: config.auth.bearer_token.clone(),
            },
            score_updates,
            sse_subscriber_count: Arc::new(AtomicUsize::new(0)),
            config: Arc::new(config),
        }
    }
}

/// Holds one slot of a connection counter until dropped.
pub struct ConnectionGuard {
    counter: Arc<AtomicUsize>,
}

impl ConnectionGuard {
    pub fn new(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::Relaxed);
        Self { counter }
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::Relaxed);
    }
}
