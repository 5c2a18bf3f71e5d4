pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod health;
pub mod sse;
pub mod state;

use axum::Router;
use axum::middleware;
use axum::routing::{get, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use config::ServerConfig;
use state::AppState;

/// Build the Axum router and application state from a config.
pub fn build_app(config: ServerConfig) -> (Router<()>, AppState) {
    let state = AppState::new(config);

    // API routes (behind bearer auth middleware)
    let api_routes = Router::new()
        .route("/events", get(api::list_events).post(api::create_event))
        .route("/events/{event_id}", get(api::get_event))
        .route(
            "/events/{event_id}/games",
            get(api::list_games).post(api::create_game),
        )
        .route(
            "/events/{event_id}/scores",
            put(api::put_score).get(api::get_scores),
        )
        .route("/events/{event_id}/settlement", get(api::get_settlement))
        .route("/events/{event_id}/stream", get(sse::score_stream))
        .route("/games/{game_id}/status", get(api::get_game_status))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    (app, state)
}

/// Middleware wrapper that injects AuthConfig into request extensions for the
/// bearer auth middleware.
async fn bearer_auth_layer(
    axum::extract::State(state): axum::extract::State<AppState>,
    mut request: axum::extract::Request,
    next: middleware::Next,
) -> Result<axum::response::Response, axum::http::StatusCode> {
    request.extensions_mut().insert(state.auth.clone());
    auth::bearer_auth_middleware(request, next).await
}
